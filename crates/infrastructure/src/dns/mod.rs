pub mod forwarding;
pub mod nameserver_client;
pub mod transport;

pub use nameserver_client::NameserverClient;
