use ferrous_replay_domain::{QueryDescriptor, ScheduleMode};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Establishes the order descriptors reach the dispatcher in.
///
/// Fire times are not computed here; the dispatcher derives them from its
/// own replay start instant.
#[derive(Debug, Clone, Copy)]
pub struct OffsetScheduler {
    mode: ScheduleMode,
}

impl OffsetScheduler {
    pub fn new(mode: ScheduleMode) -> Self {
        Self { mode }
    }

    /// Sorted mode orders ascending by offset, keeping input order for equal
    /// offsets. Trust mode leaves the input untouched.
    pub fn order(&self, mut descriptors: Vec<QueryDescriptor>) -> Vec<QueryDescriptor> {
        if self.mode == ScheduleMode::Sorted {
            descriptors.sort_by_key(|d| d.offset());
        }
        descriptors
    }

    /// Orders `descriptors` and pushes them into the bounded dispatch queue.
    ///
    /// Returns how many were handed over. Dropping `queue` on return is what
    /// tells the dispatcher that no more work is coming.
    pub async fn feed(
        &self,
        descriptors: Vec<QueryDescriptor>,
        queue: mpsc::Sender<QueryDescriptor>,
    ) -> u64 {
        let ordered = self.order(descriptors);
        info!(
            mode = self.mode.as_str(),
            descriptors = ordered.len(),
            "Scheduling replay"
        );

        let mut fed = 0u64;
        for descriptor in ordered {
            if queue.send(descriptor).await.is_err() {
                debug!(fed, "Dispatch queue closed early");
                break;
            }
            fed += 1;
        }
        fed
    }
}
