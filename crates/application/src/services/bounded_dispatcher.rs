use crate::ports::{DnsExchanger, ExchangeProtocol, QueryBuilder};
use crate::services::RetryStrategy;
use ferrous_replay_domain::{DispatchResult, DomainError, QueryDescriptor};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

/// What the dispatcher reports once every unit has been joined.
#[derive(Debug, Clone, Copy)]
pub struct DispatchSummary {
    /// Number of descriptors taken from the queue, one result each.
    pub units: u64,
    /// Origin every fire time was computed from.
    pub replay_start: Instant,
    pub elapsed: Duration,
}

/// Fixed-capacity pool firing each descriptor at `replay_start + offset`.
///
/// Every descriptor taken from the queue yields exactly one
/// [`DispatchResult`], including units that fail to build or panic.
pub struct BoundedDispatcher {
    builder: Arc<dyn QueryBuilder>,
    exchanger: Arc<dyn DnsExchanger>,
    retry: Arc<dyn RetryStrategy>,
    workers: usize,
}

impl BoundedDispatcher {
    pub fn new(
        builder: Arc<dyn QueryBuilder>,
        exchanger: Arc<dyn DnsExchanger>,
        retry: Arc<dyn RetryStrategy>,
        workers: usize,
    ) -> Self {
        Self {
            builder,
            exchanger,
            retry,
            workers: workers.max(1),
        }
    }

    /// Drains `descriptors` until the producer hangs up.
    ///
    /// `results` is dropped only after the last unit has been joined, which
    /// closes the result queue for the aggregator.
    pub async fn run(
        &self,
        mut descriptors: mpsc::Receiver<QueryDescriptor>,
        results: mpsc::Sender<DispatchResult>,
    ) -> DispatchSummary {
        let slots = Arc::new(Semaphore::new(self.workers));
        let replay_start = Instant::now();
        let mut in_flight = JoinSet::new();
        let mut units = 0u64;

        info!(
            workers = self.workers,
            retry = self.retry.name(),
            "Replay started"
        );

        while let Some(descriptor) = descriptors.recv().await {
            // The semaphore is never closed, so acquisition only waits.
            let Ok(permit) = Arc::clone(&slots).acquire_owned().await else {
                break;
            };

            while let Some(joined) = in_flight.try_join_next() {
                reap(joined, &results).await;
            }

            let unit = DispatchUnit {
                builder: Arc::clone(&self.builder),
                exchanger: Arc::clone(&self.exchanger),
                retry: Arc::clone(&self.retry),
            };
            let results = results.clone();
            units += 1;

            in_flight.spawn(async move {
                let result = unit.run(descriptor, replay_start).await;
                if results.send(result).await.is_err() {
                    debug!("Result queue closed, outcome dropped");
                }
                drop(permit);
            });
        }

        while let Some(joined) = in_flight.join_next().await {
            reap(joined, &results).await;
        }
        drop(results);

        let elapsed = replay_start.elapsed();
        info!(units, elapsed_ms = elapsed.as_millis() as u64, "Replay finished");

        DispatchSummary {
            units,
            replay_start,
            elapsed,
        }
    }
}

/// A unit that died before emitting still owes the aggregator its result.
async fn reap(joined: Result<(), JoinError>, results: &mpsc::Sender<DispatchResult>) {
    let Err(e) = joined else {
        return;
    };

    let reason = if e.is_panic() {
        panic_message(e.into_panic())
    } else {
        e.to_string()
    };
    warn!(error = %reason, "Replay unit aborted");

    let result = DispatchResult::failed(DomainError::WorkerPanicked(reason), false);
    if results.send(result).await.is_err() {
        debug!("Result queue closed, outcome dropped");
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

struct DispatchUnit {
    builder: Arc<dyn QueryBuilder>,
    exchanger: Arc<dyn DnsExchanger>,
    retry: Arc<dyn RetryStrategy>,
}

impl DispatchUnit {
    async fn run(self, descriptor: QueryDescriptor, replay_start: Instant) -> DispatchResult {
        let offset = descriptor.offset();
        match replay_start.checked_add(offset) {
            Some(fire_at) => tokio::time::sleep_until(fire_at).await,
            None => warn!(
                offset_ms = offset.as_millis() as u64,
                "Offset beyond clock range, firing now"
            ),
        }

        trace!(
            domain = %descriptor.domain(),
            record_type = %descriptor.record_type_token(),
            offset_ms = offset.as_millis() as u64,
            "Firing query"
        );

        let query = match self.builder.build(&descriptor) {
            Ok(query) => query,
            Err(e) => {
                warn!(domain = %descriptor.domain(), error = %e, "Query build failed, unit abandoned");
                return DispatchResult::failed(e, false);
            }
        };

        let udp = match self.exchanger.exchange(&query, ExchangeProtocol::Udp).await {
            Ok(udp) => udp,
            Err(e) => {
                warn!(domain = %descriptor.domain(), protocol = "udp", error = %e, "Exchange failed");
                return DispatchResult::failed(e, false);
            }
        };

        if !self.retry.should_retry(&udp.reply) {
            return DispatchResult::answered(udp.reply, udp.round_trip_time, false);
        }

        debug!(
            domain = %descriptor.domain(),
            truncated = udp.reply.truncated,
            "Retrying over TCP"
        );

        match self.exchanger.exchange(&query, ExchangeProtocol::Tcp).await {
            Ok(tcp) => DispatchResult::answered(tcp.reply, tcp.round_trip_time, true),
            Err(e) => {
                warn!(domain = %descriptor.domain(), protocol = "tcp", error = %e, "Exchange failed");
                DispatchResult::failed(e, true)
            }
        }
    }
}
