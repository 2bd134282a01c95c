use crate::RecordType;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use super::errors::ConfigError;

/// One ephemeral UDP port per in-flight exchange caps useful concurrency.
pub const MAX_WORKERS: usize = 65_535;

pub const MAX_QUEUE_CAPACITY: usize = 1_000_000;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_WIRE_LEN: usize = 255;

/// Replay workload and target settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplayConfig {
    /// CSV file holding the captured queries.
    #[serde(default = "default_input")]
    pub input: String,

    /// Nameserver under test, `ip:port`.
    #[serde(default = "default_nameserver")]
    pub nameserver: String,

    /// Maximum number of queries in flight at once.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Capacity of the descriptor and result queues.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default)]
    pub schedule: ScheduleMode,

    /// Timeout applied to each single UDP or TCP exchange.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Treat replies whose transaction ID differs from the query as errors.
    #[serde(default)]
    pub validate_response_id: bool,

    #[serde(default)]
    pub retry: RetryPolicy,

    #[serde(default)]
    pub unsupported_types: UnsupportedTypePolicy,

    /// Seed for the sampled retry draw. Unseeded runs draw from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            nameserver: default_nameserver(),
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            schedule: ScheduleMode::default(),
            query_timeout_ms: default_query_timeout_ms(),
            validate_response_id: false,
            retry: RetryPolicy::default(),
            unsupported_types: UnsupportedTypePolicy::default(),
            seed: None,
        }
    }
}

impl ReplayConfig {
    pub fn nameserver_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.nameserver.trim().parse().map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid nameserver address '{}': {}",
                self.nameserver, e
            ))
        })
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.trim().is_empty() {
            return Err(ConfigError::Validation(
                "No input file configured".to_string(),
            ));
        }

        self.nameserver_addr()?;

        if !(1..=MAX_WORKERS).contains(&self.workers) {
            return Err(ConfigError::Validation(format!(
                "Worker count must be within 1-{}, got {}",
                MAX_WORKERS, self.workers
            )));
        }

        if !(1..=MAX_QUEUE_CAPACITY).contains(&self.queue_capacity) {
            return Err(ConfigError::Validation(format!(
                "Queue capacity must be within 1-{}, got {}",
                MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }

        if self.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Query timeout cannot be 0".to_string(),
            ));
        }

        if let RetryPolicy::Sampled { percentage } = self.retry {
            if !(0.0..=100.0).contains(&percentage) {
                return Err(ConfigError::Validation(format!(
                    "TCP retry percentage must be within 0-100, got {}",
                    percentage
                )));
            }
        }

        if let UnsupportedTypePolicy::Substitute {
            domain,
            record_type,
        } = &self.unsupported_types
        {
            validate_domain_name(domain).map_err(|reason| {
                ConfigError::Validation(format!(
                    "Substitute domain '{}' is invalid: {}",
                    domain, reason
                ))
            })?;
            record_type.parse::<RecordType>().map_err(|_| {
                ConfigError::Validation(format!(
                    "Substitute record type '{}' is not supported",
                    record_type
                ))
            })?;
        }

        Ok(())
    }
}

/// Iteration order handed to the dispatcher.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Sort ascending by offset before dispatch.
    #[default]
    Sorted,

    /// Dispatch in input order; the input is already ascending.
    Trust,
}

impl ScheduleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sorted => "sorted",
            Self::Trust => "trust",
        }
    }
}

/// When a UDP query is re-sent over TCP.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Retry when the UDP reply has the TC bit set.
    Truncation,

    /// Retry a random `percentage` of all queries, truncated or not.
    Sampled { percentage: f64 },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Sampled { percentage: 100.0 }
    }
}

impl RetryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Truncation => "truncation",
            Self::Sampled { .. } => "sampled",
        }
    }
}

/// What ingestion does with records whose type token is not recognised.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum UnsupportedTypePolicy {
    /// Report and drop the record.
    #[default]
    Skip,

    /// Replace the question with a fixed stand-in and keep the record.
    Substitute { domain: String, record_type: String },
}

/// Structural name check matching what the message builder accepts: one
/// optional leading dot, no empty labels, RFC 1035 length limits.
fn validate_domain_name(raw: &str) -> Result<(), &'static str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("empty name");
    }
    if name == "." {
        return Ok(());
    }

    let name = name.strip_prefix('.').unwrap_or(name);
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.is_empty() {
        return Err("empty label");
    }

    let mut wire_len = 1;
    for label in name.split('.') {
        if label.is_empty() {
            return Err("empty label");
        }
        if label.len() > MAX_LABEL_LEN {
            return Err("label longer than 63 bytes");
        }
        wire_len += label.len() + 1;
    }
    if wire_len > MAX_NAME_WIRE_LEN {
        return Err("name longer than 255 bytes");
    }
    Ok(())
}

fn default_input() -> String {
    "queries.csv".to_string()
}

fn default_nameserver() -> String {
    "127.0.0.1:4242".to_string()
}

fn default_workers() -> usize {
    165
}

fn default_queue_capacity() -> usize {
    1000
}

fn default_query_timeout_ms() -> u64 {
    2000
}
