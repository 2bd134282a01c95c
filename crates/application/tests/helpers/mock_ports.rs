use async_trait::async_trait;
use ferrous_replay_application::ports::{
    BuiltQuery, DnsExchanger, Exchange, ExchangeProtocol, IngestedQueries, QueryBuilder,
    QueryRecordSource,
};
use ferrous_replay_domain::{DnsReply, DomainError, QueryDescriptor, ResponseCode};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

// ============================================================================
// Descriptor helpers
// ============================================================================

pub fn descriptor(domain: &str, offset_ms: u64) -> QueryDescriptor {
    descriptor_of_type(domain, "A", offset_ms)
}

pub fn descriptor_of_type(domain: &str, record_type: &str, offset_ms: u64) -> QueryDescriptor {
    QueryDescriptor::new(
        [domain, record_type, "udp", "0"],
        Duration::from_millis(offset_ms),
    )
    .unwrap()
}

// ============================================================================
// Mock QueryBuilder
// ============================================================================

/// Encodes the domain as the message body so the exchanger can tell queries
/// apart. Record type `A6` fails to build.
#[derive(Default)]
pub struct MockQueryBuilder {
    next_id: AtomicU16,
    builds: AtomicUsize,
}

impl MockQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl QueryBuilder for MockQueryBuilder {
    fn build(&self, descriptor: &QueryDescriptor) -> Result<BuiltQuery, DomainError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if descriptor.record_type_token() == "A6" {
            return Err(DomainError::MessageBuild(format!(
                "unsupported record type {}",
                descriptor.record_type_token()
            )));
        }
        Ok(BuiltQuery {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            bytes: descriptor.domain().as_bytes().to_vec(),
        })
    }
}

// ============================================================================
// Mock DnsExchanger
// ============================================================================

#[derive(Debug, Clone)]
pub struct ExchangeCall {
    pub domain: String,
    pub protocol: ExchangeProtocol,
    pub at: Instant,
}

/// Deterministic nameserver stand-in.
///
/// Domain prefixes drive behaviour: `nx` answers NXDOMAIN, `tc` is truncated
/// over UDP, `fail` errors over UDP, `tcpfail` errors over TCP and `panic`
/// panics inside the exchange.
pub struct MockDnsExchanger {
    delay: Duration,
    calls: Mutex<Vec<ExchangeCall>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    failing: Mutex<HashSet<String>>,
}

impl MockDnsExchanger {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Makes every exchange for `domain` fail, whatever its prefix.
    pub fn fail_domain(&self, domain: &str) {
        self.failing.lock().unwrap().insert(domain.to_string());
    }

    pub fn calls(&self) -> Vec<ExchangeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_over(&self, protocol: ExchangeProtocol) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.protocol == protocol)
            .count()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockDnsExchanger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsExchanger for MockDnsExchanger {
    async fn exchange(
        &self,
        query: &BuiltQuery,
        protocol: ExchangeProtocol,
    ) -> Result<Exchange, DomainError> {
        let domain = String::from_utf8_lossy(&query.bytes).to_string();
        self.calls.lock().unwrap().push(ExchangeCall {
            domain: domain.clone(),
            protocol,
            at: Instant::now(),
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if domain.starts_with("panic") {
            panic!("exchange exploded for {}", domain);
        }

        let forced = self.failing.lock().unwrap().contains(&domain);
        let fails = forced
            || match protocol {
                ExchangeProtocol::Udp => domain.starts_with("fail"),
                ExchangeProtocol::Tcp => domain.starts_with("tcpfail"),
            };
        if fails {
            return Err(DomainError::TransportTimeout {
                server: format!("mock/{}", protocol),
            });
        }

        let rcode = if domain.starts_with("nx") {
            ResponseCode::NX_DOMAIN
        } else {
            ResponseCode::NO_ERROR
        };
        let truncated = protocol == ExchangeProtocol::Udp && domain.starts_with("tc");

        Ok(Exchange {
            reply: DnsReply::new(query.id, rcode, truncated),
            round_trip_time: self.delay,
        })
    }
}

// ============================================================================
// Mock QueryRecordSource
// ============================================================================

pub struct MockRecordSource {
    descriptors: Vec<QueryDescriptor>,
    skipped: u64,
    unreadable: bool,
}

impl MockRecordSource {
    pub fn new(descriptors: Vec<QueryDescriptor>) -> Self {
        Self {
            descriptors,
            skipped: 0,
            unreadable: false,
        }
    }

    pub fn with_skipped(mut self, skipped: u64) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn unreadable() -> Self {
        Self {
            descriptors: Vec::new(),
            skipped: 0,
            unreadable: true,
        }
    }
}

#[async_trait]
impl QueryRecordSource for MockRecordSource {
    async fn load(&self) -> Result<IngestedQueries, DomainError> {
        if self.unreadable {
            return Err(DomainError::InputUnreadable(
                "mock source unavailable".to_string(),
            ));
        }
        Ok(IngestedQueries {
            descriptors: self.descriptors.clone(),
            records_read: self.descriptors.len() as u64 + self.skipped,
            records_skipped: self.skipped,
        })
    }
}
