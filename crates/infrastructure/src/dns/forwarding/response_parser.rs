use ferrous_replay_domain::{DnsReply, DomainError, ResponseCode};
use hickory_proto::op::Message;
use tracing::trace;

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes a wire-format reply into the fields the replay statistics use.
    pub fn parse(response_bytes: &[u8]) -> Result<DnsReply, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        // A decodable message always carries the full 12-byte header.
        let id = u16::from_be_bytes([response_bytes[0], response_bytes[1]]);
        let rcode = ResponseCode::new(u16::from(message.response_code()));
        let truncated = message.truncated();

        trace!(
            id,
            rcode = %rcode,
            answers = message.answers().len(),
            truncated,
            "DNS response parsed"
        );

        Ok(DnsReply {
            id,
            rcode,
            truncated,
            answer_count: message.answers().len(),
            size: response_bytes.len(),
        })
    }
}
