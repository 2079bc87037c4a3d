//! Declarative description of a planetary system: one central body and an
//! ordered list of orbiting planets.
//!
//! These are plain values. A change to the system is expressed by building a
//! new [`SystemConfiguration`] and handing it to the composer again.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Snapshot of a whole system.
///
/// `central_body` is required when deserializing; every other field falls
/// back to its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemConfiguration {
    /// The body every planet orbits. Placed at `origin`.
    pub central_body: PlanetDescriptor,
    /// Initial velocity of the central body, also composed into every planet's
    /// initial velocity.
    #[serde(default)]
    pub central_body_velocity: [f64; 3],
    /// World position of the central body.
    #[serde(default)]
    pub origin: [f64; 3],
    /// Orbiting bodies, in creation order.
    #[serde(default)]
    pub planets: Vec<PlanetDescriptor>,
}

/// One body in a [`SystemConfiguration`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetDescriptor {
    /// Stable identifier. Bodies are matched across snapshots by this value.
    pub id: u32,
    /// Display label. Must also be unique within a configuration.
    pub name: String,
    /// RGBA display colour for trajectories and debug lines.
    pub color: [f32; 4],
    /// Gravitational acceleration at the surface, in m/s².
    pub surface_gravity: f64,
    /// Shape of the generated mesh.
    pub shape: ShapeConfig,
    /// Orbit around the central body. Ignored for the central body itself.
    pub orbit: OrbitSettings,
}

/// Mesh shape as written in configuration files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShapeConfig {
    /// Base sphere radius in meters.
    pub radius: f64,
    /// Vertices per cube-face edge.
    pub resolution: u32,
    /// Scale applied to normalised height-map samples.
    pub elevation: i32,
    /// Grayscale height map, equirectangular.
    pub height_map: Option<PathBuf>,
    /// Colour map handed to the renderer untouched.
    pub color_map: Option<PathBuf>,
}

impl ShapeConfig {
    /// Texture the renderer should display: the colour map, falling back to
    /// the height map.
    pub fn display_texture(&self) -> Option<&PathBuf> {
        self.color_map.as_ref().or(self.height_map.as_ref())
    }
}

/// Orbital elements used to place a planet at construction time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrbitSettings {
    /// Orbit direction as seen from +Y.
    pub clockwise_orbit: bool,
    /// Farthest distance from the central body.
    pub apoapsis: f64,
    /// Nearest distance from the central body.
    pub periapsis: f64,
    /// Orbit inclination in degrees.
    pub inclination: f64,
    /// Axial tilt in degrees.
    pub axis: f64,
    /// Reserved; not used by the simulation.
    pub rotation_speed: f64,
}

impl Default for SystemConfiguration {
    fn default() -> Self {
        Self {
            central_body: PlanetDescriptor {
                id: 0,
                name: "Sun".to_string(),
                color: [1.0, 0.85, 0.3, 1.0],
                surface_gravity: 100.0,
                shape: ShapeConfig {
                    radius: 50.0,
                    resolution: 32,
                    ..ShapeConfig::default()
                },
                orbit: OrbitSettings::default(),
            },
            central_body_velocity: [0.0; 3],
            origin: [0.0; 3],
            planets: vec![
                PlanetDescriptor {
                    id: 1,
                    name: "Terra".to_string(),
                    color: [0.3, 0.6, 1.0, 1.0],
                    surface_gravity: 9.81,
                    shape: ShapeConfig {
                        radius: 8.0,
                        resolution: 24,
                        ..ShapeConfig::default()
                    },
                    orbit: OrbitSettings {
                        clockwise_orbit: true,
                        apoapsis: 420.0,
                        periapsis: 380.0,
                        inclination: 0.0,
                        axis: 23.4,
                        rotation_speed: 0.0,
                    },
                },
                PlanetDescriptor {
                    id: 2,
                    name: "Ares".to_string(),
                    color: [0.9, 0.35, 0.2, 1.0],
                    surface_gravity: 3.7,
                    shape: ShapeConfig {
                        radius: 5.0,
                        resolution: 16,
                        ..ShapeConfig::default()
                    },
                    orbit: OrbitSettings {
                        clockwise_orbit: true,
                        apoapsis: 700.0,
                        periapsis: 600.0,
                        inclination: 2.0,
                        axis: 25.0,
                        rotation_speed: 0.0,
                    },
                },
            ],
        }
    }
}

impl Default for PlanetDescriptor {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            color: [1.0; 4],
            surface_gravity: 1.0,
            shape: ShapeConfig::default(),
            orbit: OrbitSettings::default(),
        }
    }
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            resolution: 16,
            elevation: 0,
            height_map: None,
            color_map: None,
        }
    }
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            clockwise_orbit: true,
            apoapsis: 100.0,
            periapsis: 100.0,
            inclination: 0.0,
            axis: 0.0,
            rotation_speed: 0.0,
        }
    }
}

impl SystemConfiguration {
    /// Central body followed by the planets, in creation order.
    pub fn descriptors(&self) -> impl Iterator<Item = &PlanetDescriptor> {
        std::iter::once(&self.central_body).chain(self.planets.iter())
    }

    /// Look up a descriptor (central body included) by id.
    pub fn get(&self, id: u32) -> Option<&PlanetDescriptor> {
        self.descriptors().find(|d| d.id == id)
    }
}
