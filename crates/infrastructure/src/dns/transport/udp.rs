use super::{io_error, timed_out, DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_replay_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP, one ephemeral socket per exchange.
///
/// A fresh socket means a late reply to an earlier query can never be taken
/// for the answer to this one.
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let deadline = Instant::now() + timeout;

        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| io_error(self.server_addr, "Failed to bind UDP socket for", e))?;

        let bytes_sent =
            tokio::time::timeout_at(deadline, socket.send_to(message_bytes, self.server_addr))
                .await
                .map_err(|_| timed_out(self.server_addr))?
                .map_err(|e| io_error(self.server_addr, "Failed to send UDP query to", e))?;

        trace!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let (bytes_received, from_addr) =
                tokio::time::timeout_at(deadline, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| timed_out(self.server_addr))?
                    .map_err(|e| {
                        io_error(self.server_addr, "Failed to receive UDP response from", e)
                    })?;

            if from_addr != self.server_addr {
                debug!(
                    expected = %self.server_addr,
                    received_from = %from_addr,
                    "Ignoring UDP datagram from unexpected source"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);
            trace!(server = %self.server_addr, bytes_received, "UDP response received");

            return Ok(TransportResponse { bytes: recv_buf });
        }
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
