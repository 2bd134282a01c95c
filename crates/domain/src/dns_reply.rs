use serde::{Serialize, Serializer};
use std::fmt;

/// Protocol-level status returned by the nameserver (RFC 1035 §4.1.1, RFC 6895).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResponseCode(u16);

impl ResponseCode {
    pub const NO_ERROR: Self = Self(0);
    pub const FORM_ERR: Self = Self(1);
    pub const SERV_FAIL: Self = Self(2);
    pub const NX_DOMAIN: Self = Self(3);
    pub const NOT_IMP: Self = Self(4);
    pub const REFUSED: Self = Self(5);

    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    pub fn mnemonic(&self) -> Option<&'static str> {
        match self.0 {
            0 => Some("NOERROR"),
            1 => Some("FORMERR"),
            2 => Some("SERVFAIL"),
            3 => Some("NXDOMAIN"),
            4 => Some("NOTIMP"),
            5 => Some("REFUSED"),
            6 => Some("YXDOMAIN"),
            7 => Some("YXRRSET"),
            8 => Some("NXRRSET"),
            9 => Some("NOTAUTH"),
            10 => Some("NOTZONE"),
            11 => Some("DSOTYPENI"),
            16 => Some("BADVERS"),
            17 => Some("BADKEY"),
            18 => Some("BADTIME"),
            19 => Some("BADMODE"),
            20 => Some("BADNAME"),
            21 => Some("BADALG"),
            22 => Some("BADTRUNC"),
            23 => Some("BADCOOKIE"),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => f.write_str(name),
            None => write!(f, "RCODE{}", self.0),
        }
    }
}

impl From<u16> for ResponseCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Serialized by mnemonic so report maps read `{"NOERROR": 10}`.
impl Serialize for ResponseCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Decoded reply, reduced to what the replay statistics need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsReply {
    pub id: u16,
    pub rcode: ResponseCode,
    pub truncated: bool,
    pub answer_count: usize,
    pub size: usize,
}

impl DnsReply {
    pub fn new(id: u16, rcode: ResponseCode, truncated: bool) -> Self {
        Self {
            id,
            rcode,
            truncated,
            answer_count: 0,
            size: 0,
        }
    }
}
