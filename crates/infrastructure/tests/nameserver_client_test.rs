mod helpers;

use ferrous_replay_application::ports::{DnsExchanger, ExchangeProtocol};
use ferrous_replay_domain::{DomainError, RecordType, ResponseCode};
use ferrous_replay_infrastructure::dns::NameserverClient;
use helpers::{built_query, MockBehavior, MockDnsServer};
use std::time::Duration;
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_millis(500);

// ============================================================================
// UDP
// ============================================================================

#[tokio::test]
async fn test_udp_exchange_decodes_reply() {
    let server = MockDnsServer::start(MockBehavior::default()).await.unwrap();
    let client = NameserverClient::new(server.addr(), TIMEOUT);
    let query = built_query("example.com", RecordType::A, false);

    let exchange = client.exchange(&query, ExchangeProtocol::Udp).await.unwrap();

    assert_eq!(exchange.reply.id, query.id);
    assert_eq!(exchange.reply.rcode, ResponseCode::NO_ERROR);
    assert_eq!(exchange.reply.answer_count, 1);
    assert!(!exchange.reply.truncated);
    assert!(exchange.round_trip_time < TIMEOUT);
    assert_eq!(server.stats().udp(), 1);
    assert_eq!(server.stats().tcp(), 0);
}

#[tokio::test]
async fn test_udp_reports_response_code() {
    let server = MockDnsServer::start(MockBehavior {
        rcode: 3,
        ..Default::default()
    })
    .await
    .unwrap();
    let client = NameserverClient::new(server.addr(), TIMEOUT);

    let exchange = client
        .exchange(&built_query("missing.example", RecordType::A, false), ExchangeProtocol::Udp)
        .await
        .unwrap();

    assert_eq!(exchange.reply.rcode, ResponseCode::NX_DOMAIN);
    assert_eq!(exchange.reply.answer_count, 0);
}

#[tokio::test]
async fn test_udp_sends_do_bit() {
    let server = MockDnsServer::start(MockBehavior::default()).await.unwrap();
    let client = NameserverClient::new(server.addr(), TIMEOUT);
    let query = built_query("example.com", RecordType::DNSKEY, true);

    client.exchange(&query, ExchangeProtocol::Udp).await.unwrap();

    assert_eq!(server.stats().last_query(), query.bytes);
}

#[tokio::test]
async fn test_udp_timeout() {
    let server = MockDnsServer::start(MockBehavior {
        drop_udp: true,
        ..Default::default()
    })
    .await
    .unwrap();
    let client = NameserverClient::new(server.addr(), Duration::from_millis(100));

    let result = client
        .exchange(&built_query("example.com", RecordType::A, false), ExchangeProtocol::Udp)
        .await;

    assert!(matches!(result, Err(DomainError::TransportTimeout { .. })));
}

// ============================================================================
// TCP
// ============================================================================

#[tokio::test]
async fn test_truncated_udp_then_full_tcp() {
    let server = MockDnsServer::start(MockBehavior {
        truncate_udp: true,
        ..Default::default()
    })
    .await
    .unwrap();
    let client = NameserverClient::new(server.addr(), TIMEOUT);
    let query = built_query("big.example", RecordType::TXT, false);

    let udp = client.exchange(&query, ExchangeProtocol::Udp).await.unwrap();
    assert!(udp.reply.truncated);

    let tcp = client.exchange(&query, ExchangeProtocol::Tcp).await.unwrap();
    assert!(!tcp.reply.truncated);
    assert_eq!(tcp.reply.answer_count, 1);
    assert_eq!(server.stats().tcp(), 1);
}

#[tokio::test]
async fn test_tcp_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = NameserverClient::new(addr, TIMEOUT);
    let result = client
        .exchange(&built_query("example.com", RecordType::A, false), ExchangeProtocol::Tcp)
        .await;

    assert_eq!(result.unwrap_err().kind(), "refused");
}

// ============================================================================
// Transaction ID validation
// ============================================================================

#[tokio::test]
async fn test_id_mismatch_rejected_when_validating() {
    let server = MockDnsServer::start(MockBehavior {
        mismatch_id: true,
        ..Default::default()
    })
    .await
    .unwrap();
    let client = NameserverClient::new(server.addr(), TIMEOUT).with_response_id_validation(true);
    let query = built_query("example.com", RecordType::A, false);

    let result = client.exchange(&query, ExchangeProtocol::Udp).await;

    match result {
        Err(DomainError::ResponseIdMismatch { expected, received }) => {
            assert_eq!(expected, query.id);
            assert_eq!(received, !query.id);
        }
        other => panic!("expected id mismatch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_id_mismatch_accepted_by_default() {
    let server = MockDnsServer::start(MockBehavior {
        mismatch_id: true,
        ..Default::default()
    })
    .await
    .unwrap();
    let client = NameserverClient::new(server.addr(), TIMEOUT);
    let query = built_query("example.com", RecordType::A, false);

    let exchange = client.exchange(&query, ExchangeProtocol::Udp).await.unwrap();
    assert_eq!(exchange.reply.id, !query.id);
}
