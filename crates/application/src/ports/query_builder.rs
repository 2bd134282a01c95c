use ferrous_replay_domain::{DomainError, QueryDescriptor};

/// A wire-format query ready to hand to a [`DnsExchanger`](super::DnsExchanger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub id: u16,
    pub bytes: Vec<u8>,
}

/// Turns the uninterpreted fields of a descriptor into a protocol message.
///
/// Called once per descriptor, right before its first exchange, so the
/// descriptor queue never holds encoded messages.
pub trait QueryBuilder: Send + Sync {
    fn build(&self, descriptor: &QueryDescriptor) -> Result<BuiltQuery, DomainError>;
}
