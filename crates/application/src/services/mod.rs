mod bounded_dispatcher;
mod offset_scheduler;
mod response_aggregator;
mod retry_strategy;

pub use bounded_dispatcher::{BoundedDispatcher, DispatchSummary};
pub use offset_scheduler::OffsetScheduler;
pub use response_aggregator::ResponseAggregator;
pub use retry_strategy::{build_retry_strategy, RetryStrategy, SampledRetry, TruncationRetry};
