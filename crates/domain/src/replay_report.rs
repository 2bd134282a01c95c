use crate::ResponseCode;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Immutable snapshot of a finished replay.
///
/// `total_dispatched` counts every terminal outcome plus one extra exchange
/// for each answered TCP retry, so
/// `total_dispatched == success_count + tcp_retry_count + error_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub records_read: u64,
    pub records_skipped: u64,
    pub total_dispatched: u64,
    pub success_count: u64,
    pub tcp_retry_count: u64,
    pub error_count: u64,
    pub errors_by_kind: BTreeMap<&'static str, u64>,
    pub rcode_counts: BTreeMap<ResponseCode, u64>,
    #[serde(with = "duration_micros")]
    pub mean_rtt: Duration,
    #[serde(with = "duration_micros")]
    pub max_rtt: Duration,
    #[serde(with = "duration_micros")]
    pub elapsed: Duration,
}

impl ReplayReport {
    pub fn rcode_total(&self) -> u64 {
        self.rcode_counts.values().sum()
    }
}

mod duration_micros {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_micros().min(u64::MAX as u128) as u64)
    }
}
