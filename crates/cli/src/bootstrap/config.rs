use ferrous_replay_domain::{CliOverrides, Config, ConfigError};
use tracing_subscriber::EnvFilter;

/// Loads and validates configuration. Every check runs here, before any
/// record is read or packet sent.
pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    validate_log_level(&config)?;
    Ok(config)
}

/// The configured level must parse as an `EnvFilter`, even when `RUST_LOG`
/// ends up overriding it.
fn validate_log_level(config: &Config) -> Result<(), ConfigError> {
    EnvFilter::try_new(&config.logging.level)
        .map(|_| ())
        .map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid log level '{}': {}",
                config.logging.level, e
            ))
        })
}
