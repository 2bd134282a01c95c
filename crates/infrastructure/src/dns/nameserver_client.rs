use super::forwarding::ResponseParser;
use super::transport::Transport;
use async_trait::async_trait;
use ferrous_replay_application::ports::{BuiltQuery, DnsExchanger, Exchange, ExchangeProtocol};
use ferrous_replay_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// The one client every replay unit shares.
///
/// Holds no per-exchange state, so concurrent use needs no locking.
pub struct NameserverClient {
    server_addr: SocketAddr,
    timeout: Duration,
    validate_response_id: bool,
    udp: Transport,
    tcp: Transport,
}

impl NameserverClient {
    pub fn new(server_addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            server_addr,
            timeout,
            validate_response_id: false,
            udp: Transport::new(ExchangeProtocol::Udp, server_addr),
            tcp: Transport::new(ExchangeProtocol::Tcp, server_addr),
        }
    }

    /// Treat replies carrying a different transaction ID as failures.
    pub fn with_response_id_validation(mut self, enabled: bool) -> Self {
        self.validate_response_id = enabled;
        self
    }

    fn transport(&self, protocol: ExchangeProtocol) -> &Transport {
        match protocol {
            ExchangeProtocol::Udp => &self.udp,
            ExchangeProtocol::Tcp => &self.tcp,
        }
    }
}

#[async_trait]
impl DnsExchanger for NameserverClient {
    async fn exchange(
        &self,
        query: &BuiltQuery,
        protocol: ExchangeProtocol,
    ) -> Result<Exchange, DomainError> {
        let transport = self.transport(protocol);

        let started = Instant::now();
        let response = transport.send(&query.bytes, self.timeout).await?;
        let round_trip_time = started.elapsed();

        let reply = ResponseParser::parse(&response.bytes)?;

        if self.validate_response_id && reply.id != query.id {
            return Err(DomainError::ResponseIdMismatch {
                expected: query.id,
                received: reply.id,
            });
        }

        debug!(
            server = %self.server_addr,
            protocol = transport.protocol_name(),
            rcode = %reply.rcode,
            truncated = reply.truncated,
            rtt_us = round_trip_time.as_micros() as u64,
            "Exchange complete"
        );

        Ok(Exchange {
            reply,
            round_trip_time,
        })
    }
}
