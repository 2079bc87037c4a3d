//! Configuration for the orrery simulator.
//!
//! Holds the physical constants, orbit-prediction settings and the declarative
//! [`SystemConfiguration`] snapshot. Persists to disk as RON, supports CLI
//! overrides via clap and hot-reload detection.

mod cli;
mod config;
mod error;
mod system;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, PREDICTION_STEPS_RANGE, PredictionConfig, SimulationConfig};
pub use error::ConfigError;
pub use system::{OrbitSettings, PlanetDescriptor, ShapeConfig, SystemConfiguration};
