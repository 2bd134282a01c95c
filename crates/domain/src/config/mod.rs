//! Configuration module for Ferrous Replay
//!
//! - `root`: Main configuration and CLI overrides
//! - `replay`: Input, target nameserver, worker pool and retry policy
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod errors;
pub mod logging;
pub mod replay;
pub mod root;

pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use replay::{ReplayConfig, RetryPolicy, ScheduleMode, UnsupportedTypePolicy};
pub use root::{CliOverrides, Config};
