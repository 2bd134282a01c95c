//! Ferrous Replay Domain Layer
pub mod config;
pub mod dispatch_result;
pub mod dns_reply;
pub mod errors;
pub mod offset;
pub mod query_descriptor;
pub mod record_type;
pub mod replay_report;

pub use config::{
    CliOverrides, Config, ConfigError, LogFormat, LoggingConfig, ReplayConfig, RetryPolicy,
    ScheduleMode, UnsupportedTypePolicy,
};
pub use dispatch_result::DispatchResult;
pub use dns_reply::{DnsReply, ResponseCode};
pub use errors::DomainError;
pub use offset::parse_offset;
pub use query_descriptor::QueryDescriptor;
pub use record_type::RecordType;
pub use replay_report::ReplayReport;
