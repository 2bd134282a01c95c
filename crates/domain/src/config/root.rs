use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::replay::{ReplayConfig, RetryPolicy, ScheduleMode, UnsupportedTypePolicy};

const LOCAL_CONFIG_PATH: &str = "ferrous-replay.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-replay/config.toml";

/// Main configuration structure for Ferrous Replay
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Replay workload and target
    #[serde(default)]
    pub replay: ReplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-replay.toml in current directory
    /// 3. /etc/ferrous-replay/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        let replay = &mut self.replay;
        if let Some(input) = overrides.input {
            replay.input = input;
        }
        if let Some(nameserver) = overrides.nameserver {
            replay.nameserver = nameserver;
        }
        if let Some(workers) = overrides.workers {
            replay.workers = workers;
        }
        if let Some(schedule) = overrides.schedule {
            replay.schedule = schedule;
        }
        if let Some(timeout) = overrides.query_timeout_ms {
            replay.query_timeout_ms = timeout;
        }
        if let Some(validate) = overrides.validate_response_id {
            replay.validate_response_id = validate;
        }
        if let Some(policy) = overrides.unsupported_types {
            replay.unsupported_types = policy;
        }
        if let Some(seed) = overrides.seed {
            replay.seed = Some(seed);
        }
        // An explicit percentage wins over a truncation flag.
        if overrides.truncation_retry {
            replay.retry = RetryPolicy::Truncation;
        }
        if let Some(percentage) = overrides.tcp_percentage {
            replay.retry = RetryPolicy::Sampled { percentage };
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Log level cannot be empty".to_string(),
            ));
        }
        self.replay.validate()
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub input: Option<String>,
    pub nameserver: Option<String>,
    pub tcp_percentage: Option<f64>,
    pub truncation_retry: bool,
    pub workers: Option<usize>,
    pub schedule: Option<ScheduleMode>,
    pub query_timeout_ms: Option<u64>,
    pub validate_response_id: Option<bool>,
    pub unsupported_types: Option<UnsupportedTypePolicy>,
    pub seed: Option<u64>,
    pub log_level: Option<String>,
}
