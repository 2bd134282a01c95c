use crate::{DnsReply, DomainError};
use std::time::Duration;

/// Terminal outcome of one dispatched descriptor.
///
/// Exactly one is produced per descriptor. `round_trip_time` covers the last
/// exchange attempted, which is the TCP one when `used_tcp` is set.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub reply: Option<DnsReply>,
    pub round_trip_time: Duration,
    pub used_tcp: bool,
    pub error: Option<DomainError>,
}

impl DispatchResult {
    pub fn answered(reply: DnsReply, round_trip_time: Duration, used_tcp: bool) -> Self {
        Self {
            reply: Some(reply),
            round_trip_time,
            used_tcp,
            error: None,
        }
    }

    pub fn failed(error: DomainError, used_tcp: bool) -> Self {
        Self {
            reply: None,
            round_trip_time: Duration::ZERO,
            used_tcp,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.reply.is_some()
    }
}
