//! Headless orrery host.
//!
//! Loads `config.ron` (overridable via CLI flags), builds the configured
//! planetary system, runs it for a number of fixed ticks and logs what
//! happened. Run with `cargo run -p orrery-demo -- --steps 5000`.

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use orrery_config::{CliArgs, Config};
use orrery_planet::ImageHeightFieldProvider;
use orrery_system::{DebugLineBuffer, FixedTimestep, PlanetarySystem, SystemError, TransformTable};
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();

    let config_dir = match Config::resolve_dir(args.config.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    orrery_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %config_dir.display(), "Orrery starting");

    if let Err(e) = run(&config, &config_dir, args.steps) {
        error!(error = %e, "Simulation aborted");
        std::process::exit(1);
    }
}

fn run(config: &Config, config_dir: &Path, steps: u32) -> Result<(), SystemError> {
    let mut system = PlanetarySystem::from_simulation(&config.simulation);
    system.apply(Arc::new(config.system.clone()), &ImageHeightFieldProvider)?;

    for body in system.bodies() {
        if let Some(mesh) = system.mesh(body.id()) {
            info!(
                body = body.name(),
                mass = body.mass(),
                vertices = mesh.vertex_count(),
                triangles = mesh.triangle_count(),
                texture = ?system.display_texture(body.id()),
                "Body ready"
            );
        }
    }

    let mut transforms = TransformTable::new();
    system.sync_transforms(&mut transforms);

    let initial_momentum = system.total_momentum();
    let mut clock = FixedTimestep::new(config.simulation.physics_time_step);
    for _ in 0..steps {
        clock.advance(clock.step(), &mut system);
    }
    system.sync_transforms(&mut transforms);

    info!(
        ticks = clock.tick_count(),
        simulated_seconds = clock.total_time(),
        momentum_drift = (system.total_momentum() - initial_momentum).length(),
        "Simulation finished"
    );

    if let Some(central) = system.central() {
        for planet in system.planets() {
            info!(
                body = planet.name(),
                distance = planet.position.distance(central.position),
                speed = (planet.velocity - central.velocity).length(),
                "Planet state"
            );
        }
    }

    let mut lines = DebugLineBuffer::new();
    system.draw_debug(&config.prediction, &config.simulation, &mut lines)?;
    info!(lines = lines.len(), "Debug overlay drawn");

    // Pick up edits made to config.ron while the simulation ran.
    match config.reload(config_dir) {
        Ok(Some(updated)) if updated.system != config.system => {
            let report = system.apply(Arc::new(updated.system), &ImageHeightFieldProvider)?;
            report.forget_removed(&mut transforms);
            system.sync_transforms(&mut transforms);
            info!(
                added = report.added.len(),
                removed = report.removed.len(),
                "Re-applied edited configuration"
            );
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Config reload failed"),
    }

    Ok(())
}
