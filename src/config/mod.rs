//! Application configuration.
//!
//! Holds the team roster, the default distribution, ledger storage settings
//! and the daily goal. Loaded from YAML files and environment variables.

use serde::Deserialize;

use crate::directory::{RosterError, Worker, WorkerDirectory, WorkerRole};
use crate::ledger::STORAGE_MEMORY;
use crate::policy::{DistributionPolicy, SplitCandidate, ValidationError};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "tipscan.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "TIPSCAN_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "TIPSCAN";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "TIPSCAN_LOG";

/// Default daily goal, in the smallest currency unit.
pub const DEFAULT_DAILY_GOAL: u64 = 200_000;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid default distribution: {0}")]
    InvalidDefaultSplit(#[from] ValidationError),

    #[error("Invalid worker roster: {0}")]
    Roster(#[from] RosterError),
}

/// Ledger storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage type (memory, sqlite).
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Path to database file (sqlite only).
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: STORAGE_MEMORY.to_string(),
            path: "./data/tips.db".to_string(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default role split applied to new tips.
    pub distribution: SplitCandidate,
    /// Team roster, in display order.
    pub workers: Vec<Worker>,
    /// Ledger storage.
    pub storage: StorageConfig,
    /// Daily tip goal.
    pub daily_goal: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distribution: SplitCandidate::default(),
            workers: default_roster(),
            storage: StorageConfig::default(),
            daily_goal: DEFAULT_DAILY_GOAL,
        }
    }
}

/// The five-person team the MVP shipped with.
fn default_roster() -> Vec<Worker> {
    vec![
        Worker::new("mesero1", "Juan Pérez", WorkerRole::Service, 8.0),
        Worker::new("mesero2", "María García", WorkerRole::Service, 8.0),
        Worker::new("cocina1", "Carlos López", WorkerRole::Kitchen, 8.0),
        Worker::new("cocina2", "Ana Martínez", WorkerRole::Kitchen, 8.0),
        Worker::new("bar1", "Luis Rodríguez", WorkerRole::Bar, 6.0),
    ]
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `tipscan.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validated default split wrapped in a policy.
    pub fn policy(&self) -> Result<DistributionPolicy, ConfigError> {
        let split = self.distribution.validate()?;
        Ok(DistributionPolicy::new(split))
    }

    /// Validated roster.
    pub fn directory(&self) -> Result<WorkerDirectory, ConfigError> {
        Ok(WorkerDirectory::new(self.workers.clone())?)
    }
}
