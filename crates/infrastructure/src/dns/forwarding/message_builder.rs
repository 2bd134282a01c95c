//! DNS Message Builder
//!
//! Constructs DNS query messages in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use ferrous_replay_application::ports::{BuiltQuery, QueryBuilder};
use ferrous_replay_domain::{DomainError, QueryDescriptor, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// EDNS(0) OPT pseudo-record: root owner, payload 4096, DO flag set.
const OPT_RECORD_DO: [u8; 11] = [
    0x00, 0x00, 0x29, 0x10, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x00,
];

const HEADER_LEN: usize = 12;
const ARCOUNT_OFFSET: usize = 10;

/// Builds DNS query messages in wire format
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageBuilder;

impl MessageBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a query message and return its transaction ID with the bytes.
    ///
    /// Creates a standard recursive query with a random ID, the RD flag, one
    /// IN-class question and, when `dnssec_ok` is set, an OPT record
    /// carrying the DO bit.
    pub fn build_query_with_id(
        domain: &str,
        record_type: &RecordType,
        dnssec_ok: bool,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let normalized = normalize_domain(domain)?;
        let name = Name::from_str(&normalized).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let mut bytes = Self::serialize_message(&message)?;
        if dnssec_ok {
            append_dnssec_ok(&mut bytes)?;
        }
        Ok((id, bytes))
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::MessageBuild(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}

impl QueryBuilder for MessageBuilder {
    fn build(&self, descriptor: &QueryDescriptor) -> Result<BuiltQuery, DomainError> {
        let record_type = descriptor
            .record_type_token()
            .parse::<RecordType>()
            .map_err(|e| DomainError::MessageBuild(e.to_string()))?;

        let (id, bytes) =
            Self::build_query_with_id(descriptor.domain(), &record_type, descriptor.dnssec_ok())?;
        Ok(BuiltQuery { id, bytes })
    }
}

/// Strips one leading dot (captured `.4o.` style names) unless the name is
/// the root, and makes the result fully qualified.
pub fn normalize_domain(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidDomainName(
            "Domain name is empty".to_string(),
        ));
    }
    if trimmed == "." {
        return Ok(".".to_string());
    }

    let stripped = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if stripped.is_empty() || stripped.starts_with('.') {
        return Err(DomainError::InvalidDomainName(format!(
            "Invalid domain '{}'",
            raw
        )));
    }

    let mut fqdn = stripped.to_string();
    if !fqdn.ends_with('.') {
        fqdn.push('.');
    }
    Ok(fqdn)
}

fn append_dnssec_ok(bytes: &mut Vec<u8>) -> Result<(), DomainError> {
    if bytes.len() < HEADER_LEN {
        return Err(DomainError::MessageBuild(
            "Serialized message shorter than a header".to_string(),
        ));
    }
    let arcount = u16::from_be_bytes([bytes[ARCOUNT_OFFSET], bytes[ARCOUNT_OFFSET + 1]]);
    let arcount = arcount
        .checked_add(1)
        .ok_or_else(|| DomainError::MessageBuild("Additional section full".to_string()))?;
    bytes[ARCOUNT_OFFSET..ARCOUNT_OFFSET + 2].copy_from_slice(&arcount.to_be_bytes());
    bytes.extend_from_slice(&OPT_RECORD_DO);
    Ok(())
}
