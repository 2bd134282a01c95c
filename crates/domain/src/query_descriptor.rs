use crate::DomainError;
use std::time::Duration;

/// Position of each field inside [`QueryDescriptor::raw_fields`].
pub const DOMAIN_FIELD: usize = 0;
pub const RECORD_TYPE_FIELD: usize = 1;
pub const TRANSPORT_HINT_FIELD: usize = 2;
pub const DNSSEC_OK_FIELD: usize = 3;

/// Minimum number of fields a record must carry after its offset.
pub const MIN_QUERY_FIELDS: usize = 4;

/// One queued unit of replay work.
///
/// The fields stay as raw strings until dispatch so a queued query only
/// holds what was read from the input. Extra trailing fields are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    raw_fields: Box<[Box<str>]>,
    offset: Duration,
}

impl QueryDescriptor {
    pub fn new<I, S>(raw_fields: I, offset: Duration) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        let raw_fields: Box<[Box<str>]> = raw_fields.into_iter().map(Into::into).collect();
        if raw_fields.len() < MIN_QUERY_FIELDS {
            return Err(DomainError::MalformedRecord(format!(
                "expected at least {} query fields, got {}",
                MIN_QUERY_FIELDS,
                raw_fields.len()
            )));
        }
        Ok(Self { raw_fields, offset })
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }

    pub fn raw_fields(&self) -> &[Box<str>] {
        &self.raw_fields
    }

    pub fn domain(&self) -> &str {
        &self.raw_fields[DOMAIN_FIELD]
    }

    pub fn record_type_token(&self) -> &str {
        &self.raw_fields[RECORD_TYPE_FIELD]
    }

    pub fn transport_hint(&self) -> &str {
        &self.raw_fields[TRANSPORT_HINT_FIELD]
    }

    /// Only the literal token `"1"` requests DNSSEC records.
    pub fn dnssec_ok(&self) -> bool {
        self.raw_fields[DNSSEC_OK_FIELD].trim() == "1"
    }

    /// Replaces the question with a stand-in, keeping offset and flags.
    pub fn with_question(mut self, domain: &str, record_type: &str) -> Self {
        self.raw_fields[DOMAIN_FIELD] = domain.into();
        self.raw_fields[RECORD_TYPE_FIELD] = record_type.into();
        self
    }
}
