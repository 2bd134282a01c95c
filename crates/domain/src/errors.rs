use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Invalid offset {0}")]
    InvalidOffset(String),

    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Failed to build DNS message: {0}")]
    MessageBuild(String),

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Transport I/O error: {0}")]
    TransportIo(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Response ID {received} does not match query ID {expected}")]
    ResponseIdMismatch { expected: u16, received: u16 },

    #[error("Input source unreadable: {0}")]
    InputUnreadable(String),

    #[error("Replay worker panicked: {0}")]
    WorkerPanicked(String),
}

impl DomainError {
    /// Stable short label used for per-kind error tallies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRecord(_) => "malformed",
            Self::InvalidOffset(_) => "offset",
            Self::UnknownRecordType(_) => "unknown_type",
            Self::InvalidDomainName(_) | Self::MessageBuild(_) => "build",
            Self::TransportTimeout { .. } => "timeout",
            Self::TransportConnectionRefused { .. } => "refused",
            Self::TransportConnectionReset { .. } => "reset",
            Self::TransportIo(_) => "io",
            Self::InvalidDnsResponse(_) => "parse",
            Self::ResponseIdMismatch { .. } => "id_mismatch",
            Self::InputUnreadable(_) => "input",
            Self::WorkerPanicked(_) => "panic",
        }
    }
}
