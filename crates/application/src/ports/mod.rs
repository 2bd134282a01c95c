mod dns_exchanger;
mod query_builder;
mod query_record_source;

pub use dns_exchanger::{DnsExchanger, Exchange, ExchangeProtocol};
pub use query_builder::{BuiltQuery, QueryBuilder};
pub use query_record_source::{IngestedQueries, QueryRecordSource};
