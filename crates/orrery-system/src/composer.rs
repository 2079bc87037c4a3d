//! Builds and maintains a running planetary system from configuration
//! snapshots.

use std::path::Path;
use std::sync::Arc;

use glam::DVec3;
use orrery_config::{PlanetDescriptor, PredictionConfig, SimulationConfig, SystemConfiguration};
use orrery_physics::{
    BodyId, CelestialBody, CentralBody, GravityParams, PhysicsError, StepReport, Trajectory,
    compute_initial_state, initial_rotation, predict_trajectories, step, total_momentum,
};
use orrery_planet::{HeightFieldProvider, MeshCache, MeshData, ShapeSettings, validate_shape};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use crate::{
    BodyTransforms, DebugLineDrawer, SystemError, Tickable, draw_orbit_extremes, draw_orbits,
};

/// What changed when a snapshot was applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Bodies that did not exist before.
    pub added: Vec<BodyId>,
    /// Bodies that were dropped from the configuration.
    pub removed: Vec<BodyId>,
    /// Bodies that existed before and were re-initialised.
    pub updated: Vec<BodyId>,
    /// Meshes served from the cache.
    pub meshes_reused: u64,
    /// Meshes generated for this snapshot.
    pub meshes_generated: u64,
}

impl ApplyReport {
    /// Drop the host transforms of every removed body.
    pub fn forget_removed(&self, transforms: &mut dyn BodyTransforms) {
        for id in &self.removed {
            transforms.remove(*id);
        }
    }
}

struct StagedBody {
    body: CelestialBody,
    shape: ShapeSettings,
}

/// A central body and its planets, with one mesh per body.
///
/// Bodies are ordered as configured: the central body first, then the
/// planets. Configuration is applied all at once; a snapshot that fails
/// validation leaves the system untouched.
#[derive(Debug)]
pub struct PlanetarySystem {
    params: GravityParams,
    config: Option<Arc<SystemConfiguration>>,
    origin: DVec3,
    bodies: Vec<CelestialBody>,
    shapes: FxHashMap<BodyId, ShapeSettings>,
    meshes: FxHashMap<BodyId, Arc<MeshData>>,
    cache: MeshCache,
}

impl PlanetarySystem {
    /// An empty system integrated with `params`.
    pub fn new(params: GravityParams) -> Self {
        Self {
            params,
            config: None,
            origin: DVec3::ZERO,
            bodies: Vec::new(),
            shapes: FxHashMap::default(),
            meshes: FxHashMap::default(),
            cache: MeshCache::new(),
        }
    }

    /// An empty system using the constants from `simulation`.
    pub fn from_simulation(simulation: &SimulationConfig) -> Self {
        Self::new(GravityParams::from(simulation))
    }

    /// Replace the running system with `config`.
    ///
    /// New ids are created, missing ids are removed, and every remaining body
    /// is re-initialised: physical parameters, initial position and velocity,
    /// axial tilt and mesh. Any error rejects the whole snapshot.
    pub fn apply(
        &mut self,
        config: Arc<SystemConfiguration>,
        provider: &dyn HeightFieldProvider,
    ) -> Result<ApplyReport, SystemError> {
        let staged = self.stage(&config, provider)?;

        let hits = self.cache.hits();
        let misses = self.cache.misses();
        let mut meshes = FxHashMap::default();
        for entry in &staged {
            let mesh = self
                .cache
                .get_or_generate(&entry.shape)
                .map_err(|source| SystemError::Shape {
                    name: entry.body.name().to_owned(),
                    source,
                })?;
            meshes.insert(entry.body.id(), mesh);
        }

        let previous: FxHashSet<BodyId> = self.bodies.iter().map(CelestialBody::id).collect();
        let current: FxHashSet<BodyId> = staged.iter().map(|s| s.body.id()).collect();
        let mut report = ApplyReport {
            meshes_reused: self.cache.hits() - hits,
            meshes_generated: self.cache.misses() - misses,
            ..ApplyReport::default()
        };
        for body in &self.bodies {
            if !current.contains(&body.id()) {
                info!(id = %body.id(), name = body.name(), "Removed body");
                report.removed.push(body.id());
            }
        }

        let mut bodies = Vec::with_capacity(staged.len());
        let mut shapes = FxHashMap::default();
        for StagedBody { body, shape } in staged {
            if previous.contains(&body.id()) {
                report.updated.push(body.id());
            } else {
                info!(id = %body.id(), name = body.name(), mass = body.mass(), "Created body");
                report.added.push(body.id());
            }
            shapes.insert(body.id(), shape);
            bodies.push(body);
        }

        self.cache.retain_shapes(shapes.values());
        self.origin = DVec3::from_array(config.origin);
        self.bodies = bodies;
        self.shapes = shapes;
        self.meshes = meshes;
        self.config = Some(config);

        info!(
            bodies = self.bodies.len(),
            added = report.added.len(),
            removed = report.removed.len(),
            updated = report.updated.len(),
            meshes_generated = report.meshes_generated,
            meshes_reused = report.meshes_reused,
            "Applied system configuration"
        );
        Ok(report)
    }

    /// Validate `config` and build every body without touching `self`.
    fn stage(
        &self,
        config: &SystemConfiguration,
        provider: &dyn HeightFieldProvider,
    ) -> Result<Vec<StagedBody>, SystemError> {
        check_identities(config)?;

        let origin = DVec3::from_array(config.origin);
        if !origin.is_finite() {
            return Err(SystemError::NonFiniteFrame("origin"));
        }
        let central_velocity = DVec3::from_array(config.central_body_velocity);
        if !central_velocity.is_finite() {
            return Err(SystemError::NonFiniteFrame("central body velocity"));
        }

        let g = self.params.gravitational_constant;
        let mut staged = Vec::with_capacity(config.planets.len() + 1);

        let mut central = self.stage_body(&config.central_body, provider)?;
        central.body.launch(origin, central_velocity);
        let frame = CentralBody {
            position: origin,
            velocity: central_velocity,
            mass: central.body.mass(),
        };
        staged.push(central);

        for descriptor in &config.planets {
            let mut planet = self.stage_body(descriptor, provider)?;
            let state = compute_initial_state(&descriptor.orbit, planet.body.mass(), &frame, g)
                .map_err(|source| SystemError::Orbit {
                    name: descriptor.name.clone(),
                    source,
                })?;
            planet.body.launch_into(&state);
            planet.body.rotation = initial_rotation(&descriptor.orbit);
            debug!(
                name = %descriptor.name,
                position = ?state.position,
                velocity = ?state.velocity,
                "Solved initial orbit"
            );
            staged.push(planet);
        }

        Ok(staged)
    }

    fn stage_body(
        &self,
        descriptor: &PlanetDescriptor,
        provider: &dyn HeightFieldProvider,
    ) -> Result<StagedBody, SystemError> {
        let invalid = |source| SystemError::Body {
            name: descriptor.name.clone(),
            source,
        };
        if descriptor.surface_gravity <= 0.0 {
            return Err(invalid(PhysicsError::InvalidSurfaceGravity(
                descriptor.surface_gravity,
            )));
        }

        let mut body = CelestialBody::new(
            BodyId(descriptor.id),
            descriptor.name.clone(),
            descriptor.shape.radius,
            descriptor.surface_gravity,
            self.params.gravitational_constant,
        )
        .map_err(invalid)?;
        body.color = descriptor.color;

        let shape = ShapeSettings::from_config(&descriptor.shape, provider).map_err(|source| {
            SystemError::HeightField {
                name: descriptor.name.clone(),
                source,
            }
        })?;
        validate_shape(&shape).map_err(|source| SystemError::Shape {
            name: descriptor.name.clone(),
            source,
        })?;

        Ok(StagedBody { body, shape })
    }

    /// Advance every body by one integration step.
    pub fn tick(&mut self, dt: f64) -> Result<StepReport, SystemError> {
        Ok(step(&mut self.bodies, dt, &self.params)?)
    }

    /// Predict future paths of all bodies, parallel to [`bodies`](Self::bodies).
    ///
    /// An unknown `reference` predicts in world coordinates.
    pub fn predict(
        &self,
        num_steps: usize,
        dt: f64,
        reference: Option<BodyId>,
    ) -> Result<Vec<Trajectory>, SystemError> {
        let reference = reference.and_then(|id| {
            let index = self.index_of(id);
            if index.is_none() {
                warn!(%id, "Unknown reference body, predicting in world frame");
            }
            index
        });
        Ok(predict_trajectories(
            &self.bodies,
            num_steps,
            dt,
            &self.params,
            reference,
        )?)
    }

    /// Predict with the step count, time step and reference body from
    /// configuration.
    pub fn predict_with(
        &self,
        prediction: &PredictionConfig,
        simulation: &SimulationConfig,
    ) -> Result<Vec<Trajectory>, SystemError> {
        self.predict(
            prediction.clamped_steps() as usize,
            prediction.effective_time_step(simulation),
            prediction.reference_body.map(BodyId),
        )
    }

    /// Draw whichever orbit overlays `prediction` enables.
    pub fn draw_debug(
        &self,
        prediction: &PredictionConfig,
        simulation: &SimulationConfig,
        drawer: &mut dyn DebugLineDrawer,
    ) -> Result<(), SystemError> {
        if prediction.display_orbits {
            let trajectories = self.predict_with(prediction, simulation)?;
            let segments = draw_orbits(&self.bodies, &trajectories, drawer);
            debug!(segments, "Drew predicted orbits");
        }
        if prediction.display_orbit_extremes {
            draw_orbit_extremes(self.origin, self.planets(), drawer);
        }
        Ok(())
    }

    /// Push every body's position and rotation to the host.
    pub fn sync_transforms(&self, transforms: &mut dyn BodyTransforms) {
        for body in &self.bodies {
            transforms.set_position(body.id(), body.position);
            transforms.set_rotation(body.id(), body.rotation);
        }
    }

    /// Change `G` and recompute every body's mass.
    pub fn set_gravitational_constant(&mut self, g: f64) -> Result<(), SystemError> {
        if !g.is_finite() || g <= 0.0 {
            return Err(PhysicsError::InvalidGravitationalConstant(g).into());
        }
        for body in &mut self.bodies {
            body.set_gravitational_constant(g)?;
        }
        self.params.gravitational_constant = g;
        Ok(())
    }

    /// Gravity constants used by every tick.
    pub fn params(&self) -> &GravityParams {
        &self.params
    }

    /// The snapshot currently applied.
    pub fn configuration(&self) -> Option<&Arc<SystemConfiguration>> {
        self.config.as_ref()
    }

    /// Where the central body was placed.
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// All bodies; the central body comes first.
    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    /// Body with identifier `id`.
    pub fn body(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    /// The central body, if a configuration was applied.
    pub fn central(&self) -> Option<&CelestialBody> {
        self.bodies.first()
    }

    /// Every body except the central one.
    pub fn planets(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().skip(1)
    }

    /// Mesh generated for `id`.
    pub fn mesh(&self, id: BodyId) -> Option<&Arc<MeshData>> {
        self.meshes.get(&id)
    }

    /// Shape settings the mesh of `id` was built from.
    pub fn shape(&self, id: BodyId) -> Option<&ShapeSettings> {
        self.shapes.get(&id)
    }

    /// Texture the renderer should show on `id`.
    pub fn display_texture(&self, id: BodyId) -> Option<&Path> {
        self.config
            .as_ref()?
            .get(id.0)?
            .shape
            .display_texture()
            .map(|p| p.as_path())
    }

    /// Meshes shared between bodies with identical shapes.
    pub fn mesh_cache(&self) -> &MeshCache {
        &self.cache
    }

    /// Sum of `mass * velocity` over the system.
    pub fn total_momentum(&self) -> DVec3 {
        total_momentum(&self.bodies)
    }

    /// Number of bodies, central included.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True if the system holds no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id() == id)
    }
}

impl Tickable for PlanetarySystem {
    fn on_tick(&mut self, dt: f64) {
        match self.tick(dt) {
            Ok(report) if !report.is_clean() => {
                warn!(?report, "Clamped degenerate body pairs");
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Skipping physics tick"),
        }
    }
}

fn check_identities(config: &SystemConfiguration) -> Result<(), SystemError> {
    let mut ids = FxHashSet::default();
    let mut names = FxHashSet::default();
    for descriptor in config.descriptors() {
        if descriptor.name.trim().is_empty() {
            return Err(SystemError::EmptyName { id: descriptor.id });
        }
        if !ids.insert(descriptor.id) {
            return Err(SystemError::DuplicateId(descriptor.id));
        }
        if !names.insert(descriptor.name.as_str()) {
            return Err(SystemError::DuplicateName(descriptor.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use orrery_planet::{HeightField, HeightFieldLibrary};

    use super::*;
    use crate::{DebugLineBuffer, TransformTable};

    fn system() -> PlanetarySystem {
        PlanetarySystem::from_simulation(&SimulationConfig::default())
    }

    fn applied() -> PlanetarySystem {
        let mut system = system();
        system
            .apply(
                Arc::new(SystemConfiguration::default()),
                &HeightFieldLibrary::new(),
            )
            .unwrap();
        system
    }

    #[test]
    fn test_apply_creates_every_body() {
        let mut system = system();
        let config = Arc::new(SystemConfiguration::default());
        let report = system
            .apply(Arc::clone(&config), &HeightFieldLibrary::new())
            .unwrap();

        assert_eq!(report.added.len(), config.planets.len() + 1);
        assert!(report.removed.is_empty());
        assert_eq!(system.len(), config.planets.len() + 1);
        assert_eq!(system.central().unwrap().id(), BodyId(config.central_body.id));
        for body in system.bodies() {
            assert!(system.mesh(body.id()).is_some());
        }
    }

    #[test]
    fn test_central_body_at_origin_with_velocity() {
        let mut config = SystemConfiguration::default();
        config.origin = [1.0, 2.0, 3.0];
        config.central_body_velocity = [0.5, 0.0, 0.0];
        let mut system = system();
        system
            .apply(Arc::new(config), &HeightFieldLibrary::new())
            .unwrap();

        let central = system.central().unwrap();
        assert_eq!(central.position, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(central.velocity, DVec3::new(0.5, 0.0, 0.0));
        // Planet velocities include the central body's.
        for planet in system.planets() {
            assert!(planet.initial_velocity().x > 0.5);
        }
    }

    #[test]
    fn test_planets_start_at_apoapsis_with_tilt() {
        let system = applied();
        for planet in system.planets() {
            assert_eq!(planet.position, planet.apoapsis);
            let descriptor = system.configuration().unwrap().get(planet.id().0).unwrap();
            assert_eq!(planet.rotation, initial_rotation(&descriptor.orbit));
        }
    }

    #[test]
    fn test_duplicate_id_rejected_atomically() {
        let mut system = applied();
        let before: Vec<DVec3> = system.bodies().iter().map(|b| b.position).collect();

        let mut config = SystemConfiguration::default();
        config.planets[1].id = config.planets[0].id;
        let result = system.apply(Arc::new(config), &HeightFieldLibrary::new());

        assert!(matches!(result, Err(SystemError::DuplicateId(_))));
        let after: Vec<DVec3> = system.bodies().iter().map(|b| b.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let mut config = SystemConfiguration::default();
        config.planets[1].name = config.planets[0].name.clone();
        let result = system().apply(Arc::new(config), &HeightFieldLibrary::new());
        assert!(matches!(result, Err(SystemError::DuplicateName(_))));

        let mut config = SystemConfiguration::default();
        config.planets[0].name = "  ".into();
        let result = system().apply(Arc::new(config), &HeightFieldLibrary::new());
        assert!(matches!(result, Err(SystemError::EmptyName { .. })));
    }

    #[test]
    fn test_invalid_resolution_rejected() {
        let mut config = SystemConfiguration::default();
        config.planets[0].shape.resolution = 0;
        let result = system().apply(Arc::new(config), &HeightFieldLibrary::new());
        assert!(matches!(result, Err(SystemError::Shape { .. })));
    }

    #[test]
    fn test_invalid_orbit_and_gravity_rejected() {
        let mut config = SystemConfiguration::default();
        config.planets[0].orbit.apoapsis = 0.0;
        let result = system().apply(Arc::new(config), &HeightFieldLibrary::new());
        assert!(matches!(result, Err(SystemError::Orbit { .. })));

        let mut config = SystemConfiguration::default();
        config.central_body.surface_gravity = 0.0;
        let result = system().apply(Arc::new(config), &HeightFieldLibrary::new());
        assert!(matches!(result, Err(SystemError::Body { .. })));
    }

    #[test]
    fn test_missing_height_map_rejected() {
        let mut config = SystemConfiguration::default();
        config.planets[0].shape.height_map = Some("missing.png".into());
        let result = system().apply(Arc::new(config), &HeightFieldLibrary::new());
        assert!(matches!(result, Err(SystemError::HeightField { .. })));
    }

    #[test]
    fn test_reapply_removes_updates_and_reuses_meshes() {
        let mut system = applied();
        let mut config = SystemConfiguration::default();
        let dropped = config.planets.pop().unwrap();

        let report = system
            .apply(Arc::new(config), &HeightFieldLibrary::new())
            .unwrap();
        assert_eq!(report.removed, vec![BodyId(dropped.id)]);
        assert!(report.added.is_empty());
        assert_eq!(report.updated.len(), system.len());
        assert_eq!(report.meshes_generated, 0);
        assert_eq!(report.meshes_reused, system.len() as u64);
        assert!(system.body(BodyId(dropped.id)).is_none());
        assert_eq!(system.mesh_cache().len(), system.len());
    }

    #[test]
    fn test_reapply_resets_motion() {
        let mut system = applied();
        let start = system.planets().next().unwrap().position;
        for _ in 0..10 {
            system.on_tick(0.1);
        }
        assert_ne!(system.planets().next().unwrap().position, start);

        system
            .apply(
                Arc::new(SystemConfiguration::default()),
                &HeightFieldLibrary::new(),
            )
            .unwrap();
        assert_eq!(system.planets().next().unwrap().position, start);
    }

    #[test]
    fn test_height_map_shapes_the_mesh() {
        let mut library = HeightFieldLibrary::new();
        library.insert("bumps.png", HeightField::new(1, 1, vec![1.0]).unwrap());
        let mut config = SystemConfiguration::default();
        config.planets[0].shape.height_map = Some("bumps.png".into());
        config.planets[0].shape.elevation = 1;
        let radius = config.planets[0].shape.radius as f32;
        let id = BodyId(config.planets[0].id);

        let mut system = system();
        system.apply(Arc::new(config), &library).unwrap();
        let mesh = system.mesh(id).unwrap();
        for v in mesh.vertices() {
            assert!((v.length() - 2.0 * radius).abs() < 1e-3);
        }
        assert_eq!(
            system.display_texture(id),
            Some(Path::new("bumps.png")),
            "height map doubles as display texture"
        );
    }

    #[test]
    fn test_tick_rejects_non_finite_dt() {
        let mut system = applied();
        assert!(matches!(
            system.tick(f64::NAN),
            Err(SystemError::Physics(PhysicsError::InvalidTimeStep(_)))
        ));
    }

    #[test]
    fn test_predict_unknown_reference_falls_back() {
        let system = applied();
        let world = system.predict(10, 0.01, None).unwrap();
        let unknown = system.predict(10, 0.01, Some(BodyId(999))).unwrap();
        assert_eq!(world, unknown);
    }

    #[test]
    fn test_draw_debug_respects_toggles() {
        let system = applied();
        let simulation = SimulationConfig::default();
        let mut prediction = PredictionConfig {
            display_orbits: false,
            display_orbit_extremes: true,
            ..PredictionConfig::default()
        };

        let mut buffer = DebugLineBuffer::new();
        system
            .draw_debug(&prediction, &simulation, &mut buffer)
            .unwrap();
        assert_eq!(buffer.len(), 2 * (system.len() - 1));

        buffer.clear();
        prediction.display_orbits = true;
        prediction.display_orbit_extremes = false;
        prediction.num_steps = 5;
        system
            .draw_debug(&prediction, &simulation, &mut buffer)
            .unwrap();
        assert_eq!(buffer.len(), 4 * system.len());
    }

    #[test]
    fn test_sync_transforms_and_forget_removed() {
        let mut system = applied();
        let mut table = TransformTable::new();
        system.sync_transforms(&mut table);
        assert_eq!(table.len(), system.len());

        let mut config = SystemConfiguration::default();
        config.planets.truncate(1);
        let report = system
            .apply(Arc::new(config), &HeightFieldLibrary::new())
            .unwrap();
        report.forget_removed(&mut table);
        assert_eq!(table.len(), system.len());
    }

    #[test]
    fn test_gravitational_constant_recomputes_mass() {
        let mut system = applied();
        let mass = system.central().unwrap().mass();
        system.set_gravitational_constant(0.0002).unwrap();
        assert!((system.central().unwrap().mass() - mass / 2.0).abs() < 1e-6 * mass);
        assert!(system.set_gravitational_constant(-1.0).is_err());
        assert_eq!(system.params().gravitational_constant, 0.0002);
    }
}
