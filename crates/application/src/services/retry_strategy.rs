use ferrous_replay_domain::{DnsReply, RetryPolicy};
use std::sync::{Arc, Mutex};

/// Decides whether a query answered over UDP is sent again over TCP.
pub trait RetryStrategy: Send + Sync {
    fn should_retry(&self, udp_reply: &DnsReply) -> bool;

    fn name(&self) -> &'static str;
}

/// Retry only when the server signalled truncation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TruncationRetry;

impl RetryStrategy for TruncationRetry {
    fn should_retry(&self, udp_reply: &DnsReply) -> bool {
        udp_reply.truncated
    }

    fn name(&self) -> &'static str {
        "truncation"
    }
}

/// Retry a uniform random share of all queries, truncated or not.
///
/// One draw in `[0, 100)` per query; the query is retried when the draw is
/// below `percentage`, so `0.0` never retries and `100.0` always does.
pub struct SampledRetry {
    percentage: f64,
    rng: Option<Mutex<fastrand::Rng>>,
}

impl SampledRetry {
    pub fn new(percentage: f64) -> Self {
        Self {
            percentage,
            rng: None,
        }
    }

    /// Reproducible draw sequence for a given seed.
    pub fn with_seed(percentage: f64, seed: u64) -> Self {
        Self {
            percentage,
            rng: Some(Mutex::new(fastrand::Rng::with_seed(seed))),
        }
    }

    fn draw(&self) -> f64 {
        let unit = match &self.rng {
            Some(rng) => rng.lock().unwrap_or_else(|e| e.into_inner()).f64(),
            None => fastrand::f64(),
        };
        unit * 100.0
    }
}

impl RetryStrategy for SampledRetry {
    fn should_retry(&self, _udp_reply: &DnsReply) -> bool {
        self.draw() < self.percentage
    }

    fn name(&self) -> &'static str {
        "sampled"
    }
}

pub fn build_retry_strategy(policy: &RetryPolicy, seed: Option<u64>) -> Arc<dyn RetryStrategy> {
    match *policy {
        RetryPolicy::Truncation => Arc::new(TruncationRetry),
        RetryPolicy::Sampled { percentage } => match seed {
            Some(seed) => Arc::new(SampledRetry::with_seed(percentage, seed)),
            None => Arc::new(SampledRetry::new(percentage)),
        },
    }
}
