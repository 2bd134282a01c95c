use crate::ports::QueryRecordSource;
use crate::services::{BoundedDispatcher, OffsetScheduler, ResponseAggregator};
use ferrous_replay_domain::{DomainError, ReplayReport};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Use case: replay a captured query workload against one nameserver.
///
/// Ingestion runs first and is the only fatal step. The scheduler, the
/// dispatcher and the aggregator then run concurrently, connected by two
/// bounded queues. The reported elapsed time covers dispatch only.
pub struct ReplayTrafficUseCase {
    source: Arc<dyn QueryRecordSource>,
    scheduler: OffsetScheduler,
    dispatcher: Arc<BoundedDispatcher>,
    queue_capacity: usize,
}

impl ReplayTrafficUseCase {
    pub fn new(
        source: Arc<dyn QueryRecordSource>,
        scheduler: OffsetScheduler,
        dispatcher: Arc<BoundedDispatcher>,
        queue_capacity: usize,
    ) -> Self {
        Self {
            source,
            scheduler,
            dispatcher,
            queue_capacity: queue_capacity.max(1),
        }
    }

    pub async fn execute(&self) -> Result<ReplayReport, DomainError> {
        let ingested = self.source.load().await?;
        info!(
            records_read = ingested.records_read,
            records_skipped = ingested.records_skipped,
            accepted = ingested.descriptors.len(),
            "Query records loaded"
        );

        let (descriptor_tx, descriptor_rx) = mpsc::channel(self.queue_capacity);
        let (result_tx, result_rx) = mpsc::channel(self.queue_capacity);

        let (fed, summary, aggregator) = tokio::join!(
            self.scheduler.feed(ingested.descriptors, descriptor_tx),
            self.dispatcher.run(descriptor_rx, result_tx),
            ResponseAggregator::new().consume(result_rx),
        );

        let report = aggregator.finish(
            ingested.records_read,
            ingested.records_skipped,
            summary.elapsed,
        );

        info!(
            fed,
            units = summary.units,
            successes = report.success_count,
            tcp_retries = report.tcp_retry_count,
            errors = report.error_count,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Replay complete"
        );

        Ok(report)
    }
}
