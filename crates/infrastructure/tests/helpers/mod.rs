#![allow(dead_code)]

mod dns_server_mock;

pub use dns_server_mock::{build_mock_response, MockBehavior, MockDnsServer, ServerStats};

use ferrous_replay_application::ports::BuiltQuery;
use ferrous_replay_domain::RecordType;
use ferrous_replay_infrastructure::dns::forwarding::MessageBuilder;

pub fn built_query(domain: &str, record_type: RecordType, dnssec_ok: bool) -> BuiltQuery {
    let (id, bytes) = MessageBuilder::build_query_with_id(domain, &record_type, dnssec_ok).unwrap();
    BuiltQuery { id, bytes }
}
