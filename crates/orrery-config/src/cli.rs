//! Command-line argument parsing for host binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "orrery", about = "Planetary system simulator")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Number of live physics ticks to run.
    #[arg(long, default_value_t = 1000)]
    pub steps: u32,

    /// Physics tick length in seconds.
    #[arg(long)]
    pub time_step: Option<f64>,

    /// Number of orbit-prediction steps.
    #[arg(long)]
    pub prediction_steps: Option<u32>,

    /// Id of the body to use as the prediction reference frame.
    #[arg(long)]
    pub reference_body: Option<u32>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(dt) = args.time_step {
            self.simulation.physics_time_step = dt;
        }
        if let Some(steps) = args.prediction_steps {
            self.prediction.num_steps = steps;
        }
        if let Some(id) = args.reference_body {
            self.prediction.reference_body = Some(id);
        }
    }
}
