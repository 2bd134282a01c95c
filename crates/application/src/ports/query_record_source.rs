use async_trait::async_trait;
use ferrous_replay_domain::{DomainError, QueryDescriptor};

/// Outcome of reading the whole input source.
#[derive(Debug, Default)]
pub struct IngestedQueries {
    pub descriptors: Vec<QueryDescriptor>,
    pub records_read: u64,
    pub records_skipped: u64,
}

#[async_trait]
pub trait QueryRecordSource: Send + Sync {
    /// Reads every record. Per-record problems are reported and counted in
    /// `records_skipped`; only an unreadable source is an error.
    async fn load(&self) -> Result<IngestedQueries, DomainError>;
}
