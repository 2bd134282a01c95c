pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use ferrous_replay_application::ports::ExchangeProtocol;
use ferrous_replay_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

/// Result of a raw DNS transport operation
#[derive(Debug)]
pub struct TransportResponse {
    /// Raw DNS response bytes (wire format)
    pub bytes: Vec<u8>,
}

/// Trait for sending raw DNS messages over the wire
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

/// Enum-dispatched transport, one variant per replay protocol.
pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub fn new(protocol: ExchangeProtocol, server_addr: SocketAddr) -> Self {
        match protocol {
            ExchangeProtocol::Udp => Self::Udp(udp::UdpTransport::new(server_addr)),
            ExchangeProtocol::Tcp => Self::Tcp(tcp::TcpTransport::new(server_addr)),
        }
    }

    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(t) => t.protocol_name(),
            Self::Tcp(t) => t.protocol_name(),
        }
    }
}

/// Maps socket errors onto the transport error taxonomy.
pub(crate) fn io_error(server: SocketAddr, context: &str, e: io::Error) -> DomainError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server.to_string(),
        },
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => DomainError::TransportConnectionReset {
            server: server.to_string(),
        },
        io::ErrorKind::TimedOut => DomainError::TransportTimeout {
            server: server.to_string(),
        },
        _ => DomainError::TransportIo(format!("{} {}: {}", context, server, e)),
    }
}

pub(crate) fn timed_out(server: SocketAddr) -> DomainError {
    DomainError::TransportTimeout {
        server: server.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let server: SocketAddr = "127.0.0.1:53".parse().unwrap();
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        let other = io::Error::other("boom");

        assert_eq!(io_error(server, "send", refused).kind(), "refused");
        assert_eq!(io_error(server, "read", reset).kind(), "reset");
        assert_eq!(io_error(server, "bind", other).kind(), "io");
    }

    #[test]
    fn test_transport_for_protocol() {
        let server: SocketAddr = "127.0.0.1:53".parse().unwrap();
        assert_eq!(Transport::new(ExchangeProtocol::Udp, server).protocol_name(), "UDP");
        assert_eq!(Transport::new(ExchangeProtocol::Tcp, server).protocol_name(), "TCP");
    }
}
