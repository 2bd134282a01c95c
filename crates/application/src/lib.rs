//! Ferrous Replay Application Layer
//!
//! Ports the replay engine depends on, the engine services themselves
//! (scheduler, dispatcher, retry strategies, aggregator) and the use case
//! wiring them together.
pub mod ports;
pub mod services;
pub mod use_cases;
