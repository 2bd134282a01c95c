use ferrous_replay_domain::{DispatchResult, ReplayReport};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::trace;

/// Single consumer of the result queue.
///
/// Results arrive in completion order, which is unrelated to offset order.
#[derive(Debug, Default)]
pub struct ResponseAggregator {
    report: ReplayReport,
    rtt_sum: Duration,
}

impl ResponseAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one outcome into the running counters.
    ///
    /// Every result counts once toward `total_dispatched`. An answered TCP
    /// retry adds one more; a failed one only counts as an error.
    pub fn record(&mut self, result: &DispatchResult) {
        let report = &mut self.report;
        report.total_dispatched += 1;

        match (&result.error, &result.reply) {
            (None, Some(reply)) => {
                report.success_count += 1;
                if result.used_tcp {
                    report.tcp_retry_count += 1;
                    report.total_dispatched += 1;
                }
                *report.rcode_counts.entry(reply.rcode).or_insert(0) += 1;

                self.rtt_sum += result.round_trip_time;
                if result.round_trip_time > report.max_rtt {
                    report.max_rtt = result.round_trip_time;
                }
            }
            (Some(error), _) => {
                report.error_count += 1;
                *report.errors_by_kind.entry(error.kind()).or_insert(0) += 1;
            }
            (None, None) => {
                report.error_count += 1;
                *report.errors_by_kind.entry("empty").or_insert(0) += 1;
            }
        }

        trace!(
            success = report.success_count,
            errors = report.error_count,
            "Result recorded"
        );
    }

    /// Consumes results until every sender has been dropped.
    pub async fn consume(mut self, mut results: mpsc::Receiver<DispatchResult>) -> Self {
        while let Some(result) = results.recv().await {
            self.record(&result);
        }
        self
    }

    pub fn success_count(&self) -> u64 {
        self.report.success_count
    }

    /// Final immutable snapshot.
    pub fn finish(self, records_read: u64, records_skipped: u64, elapsed: Duration) -> ReplayReport {
        let mut report = self.report;
        report.records_read = records_read;
        report.records_skipped = records_skipped;
        report.elapsed = elapsed;
        if report.success_count > 0 {
            let nanos = self.rtt_sum.as_nanos() / u128::from(report.success_count);
            report.mean_rtt = Duration::from_nanos(nanos.min(u128::from(u64::MAX)) as u64);
        }
        report
    }
}
