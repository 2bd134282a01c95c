//! Ferrous Replay Infrastructure Layer
//!
//! hickory-proto message codec, UDP/TCP transports, the shared nameserver
//! client and CSV ingestion.
pub mod dns;
pub mod input;
