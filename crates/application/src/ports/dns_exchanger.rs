use super::BuiltQuery;
use async_trait::async_trait;
use ferrous_replay_domain::{DnsReply, DomainError};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeProtocol {
    Udp,
    Tcp,
}

impl ExchangeProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Tcp => "tcp",
        }
    }
}

impl fmt::Display for ExchangeProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded reply and the time the exchange that produced it took.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub reply: DnsReply,
    pub round_trip_time: Duration,
}

/// One network exchange with the nameserver under test.
///
/// A single instance is shared by every in-flight unit, so implementations
/// must be usable concurrently through `&self`. The per-exchange timeout is
/// the implementation's concern.
#[async_trait]
pub trait DnsExchanger: Send + Sync {
    async fn exchange(
        &self,
        query: &BuiltQuery,
        protocol: ExchangeProtocol,
    ) -> Result<Exchange, DomainError>;
}
