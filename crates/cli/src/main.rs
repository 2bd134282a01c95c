//! # Ferrous Replay
//!
//! Replays a captured DNS query workload against a nameserver, preserving
//! relative timing, and reports the outcome.

use clap::{ArgGroup, Parser, ValueEnum};
use ferrous_replay_domain::{CliOverrides, ScheduleMode, UnsupportedTypePolicy};
use tracing::info;

mod bootstrap;
mod di;
mod report;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnsupportedTypes {
    Skip,
    Substitute,
}

#[derive(Parser)]
#[command(name = "ferrous-replay")]
#[command(version = "0.1.0")]
#[command(about = "Ferrous Replay - timed DNS traffic replay against a nameserver")]
#[command(group(ArgGroup::new("retry").args(["percentage", "truncation_retry"])))]
#[command(group(ArgGroup::new("schedule").args(["sorted", "trust_order"])))]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// CSV file with the queries to replay
    #[arg(short = 'f', long, value_name = "FILE")]
    file: Option<String>,

    /// Nameserver under test, ip:port
    #[arg(short = 's', long, value_name = "ADDR")]
    server: Option<String>,

    /// Percentage of queries also sent over TCP (0-100)
    #[arg(short = 'p', long)]
    percentage: Option<f64>,

    /// Retry over TCP only when the UDP reply is truncated
    #[arg(long)]
    truncation_retry: bool,

    /// Maximum number of queries in flight
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Sort queries by offset before replay
    #[arg(long)]
    sorted: bool,

    /// Replay in file order; offsets must already be ascending
    #[arg(long)]
    trust_order: bool,

    /// What to do with records of an unsupported type
    #[arg(long, value_enum)]
    unsupported_types: Option<UnsupportedTypes>,

    /// Stand-in domain for substituted records
    #[arg(long, default_value = "64hpx3g.4o.")]
    substitute_domain: String,

    /// Stand-in record type for substituted records
    #[arg(long, default_value = "A")]
    substitute_type: String,

    /// Count replies with a mismatching transaction ID as errors
    #[arg(long)]
    validate_id: bool,

    /// Timeout for each UDP or TCP exchange, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Seed for the sampled TCP retry draw
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let schedule = if self.sorted {
            Some(ScheduleMode::Sorted)
        } else if self.trust_order {
            Some(ScheduleMode::Trust)
        } else {
            None
        };

        let unsupported_types = self.unsupported_types.map(|choice| match choice {
            UnsupportedTypes::Skip => UnsupportedTypePolicy::Skip,
            UnsupportedTypes::Substitute => UnsupportedTypePolicy::Substitute {
                domain: self.substitute_domain.clone(),
                record_type: self.substitute_type.clone(),
            },
        });

        CliOverrides {
            input: self.file.clone(),
            nameserver: self.server.clone(),
            tcp_percentage: self.percentage,
            truncation_retry: self.truncation_retry,
            workers: self.workers,
            schedule,
            query_timeout_ms: self.timeout_ms,
            validate_response_id: self.validate_id.then_some(true),
            unsupported_types,
            seed: self.seed,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;
    bootstrap::init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = cli.config.as_deref().unwrap_or("default"),
        input = %config.replay.input,
        nameserver = %config.replay.nameserver,
        "Starting Ferrous Replay"
    );

    let services = di::ReplayServices::new(&config)?;
    let report = services.replay.execute().await?;

    if cli.json {
        println!("{}", report::render_json(&report)?);
    } else {
        print!("{}", report::render_text(&report));
    }

    Ok(())
}
