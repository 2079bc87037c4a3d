//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SystemConfiguration;
use crate::error::ConfigError;

/// Inclusive bounds for the number of orbit-prediction steps.
pub const PREDICTION_STEPS_RANGE: std::ops::RangeInclusive<u32> = 1..=99_999;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Physical constants and the fixed tick length.
    pub simulation: SimulationConfig,
    /// Orbit-prediction display settings.
    pub prediction: PredictionConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
    /// The planetary system to build.
    pub system: SystemConfiguration,
}

/// Physical constants and integrator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Gravitational constant `G` in simulation units.
    pub gravitational_constant: f64,
    /// Length of one live physics tick in seconds.
    pub physics_time_step: f64,
    /// Pairs of bodies closer than this are clamped to this separation.
    pub min_distance: f64,
}

/// Orbit-prediction settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictionConfig {
    /// Draw predicted trajectories.
    pub display_orbits: bool,
    /// Draw lines from the origin to each planet's apoapsis and periapsis.
    pub display_orbit_extremes: bool,
    /// Number of integrator steps to predict.
    pub num_steps: u32,
    /// Prediction step length, ignored when `use_physics_time_step` is set.
    pub time_step: f64,
    /// Predict with `simulation.physics_time_step` instead of `time_step`.
    pub use_physics_time_step: bool,
    /// Body whose co-moving frame trajectories are expressed in.
    pub reference_body: Option<u32>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 0.0001,
            physics_time_step: 0.01,
            min_distance: 1e-3,
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            display_orbits: false,
            display_orbit_extremes: false,
            num_steps: 1000,
            time_step: 0.01,
            use_physics_time_step: false,
            reference_body: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl PredictionConfig {
    /// Step length the predictor should use.
    pub fn effective_time_step(&self, simulation: &SimulationConfig) -> f64 {
        if self.use_physics_time_step {
            simulation.physics_time_step
        } else {
            self.time_step
        }
    }

    /// `num_steps` clamped to [`PREDICTION_STEPS_RANGE`].
    pub fn clamped_steps(&self) -> u32 {
        self.num_steps.clamp(
            *PREDICTION_STEPS_RANGE.start(),
            *PREDICTION_STEPS_RANGE.end(),
        )
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for this application, if one exists.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("orrery"))
    }

    /// `explicit` if given, otherwise [`Config::default_dir`].
    pub fn resolve_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        match explicit {
            Some(dir) => Ok(dir.to_path_buf()),
            None => Self::default_dir().ok_or(ConfigError::NoConfigDir),
        }
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
