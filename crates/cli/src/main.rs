//! DynamoDB capacity check
//!
//! Nagios plugin that compares a table's consumed capacity against its
//! provisioned capacity over a recent window and exits with the plugin
//! status code.

mod client;
mod config;
mod output;

use anyhow::Result;
use capacity_lib::{run_check, CapacityKind, CheckConfig};
use chrono::Utc;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Bad invocation or invalid configuration (sysexits `EX_USAGE`)
const EXIT_USAGE: u8 = 64;

/// Metrics backend could not be queried (sysexits `EX_UNAVAILABLE`)
const EXIT_UNAVAILABLE: u8 = 69;

/// Nagios plugin to check DynamoDB consumed capacity
#[derive(Parser, Debug)]
#[command(name = "check_dynamodb_capacity")]
#[command(author, version, about = "Nagios plugin to check DynamoDB consumed capacity", long_about = None)]
pub struct Cli {
    /// Table to get the metric from
    pub table: String,

    /// The AWS region to read metrics from [default: us-east-1]
    #[arg(short = 'R', long)]
    pub region: Option<String>,

    /// Capacity warning threshold, as MAGNITUDE:OCCURRENCE. Each side is an
    /// integer or a percentage. A warning is triggered when the capacity is
    /// over MAGNITUDE for more than OCCURRENCE datapoints [default: 70%:25%]
    #[arg(short, long)]
    pub warning: Option<String>,

    /// Capacity critical threshold, same format as the warning threshold
    /// [default: 85%:25%]
    #[arg(short, long)]
    pub critical: Option<String>,

    /// Granularity of the datapoints in seconds; at least 60 and a multiple
    /// of 60 [default: 60]
    #[arg(short, long)]
    pub period: Option<u32>,

    /// Window to evaluate, in minutes [default: 60]
    #[arg(short, long)]
    pub timedelta: Option<u32>,

    /// The capacity metric to evaluate [default: read]
    #[arg(
        short = 'C',
        long,
        value_parser = PossibleValuesParser::new(CapacityKind::NAMES)
            .try_map(|name| name.parse::<CapacityKind>())
    )]
    pub capacity: Option<CapacityKind>,

    /// Index name, required for read_index and write_index
    #[arg(short, long)]
    pub index: Option<String>,

    /// Enable debug mode (print the collected data)
    #[arg(short, long)]
    pub debug: bool,

    /// Format of the debug data
    #[arg(long, value_enum, default_value_t)]
    pub format: output::OutputFormat,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Settings file providing defaults (TOML, JSON or YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.debug, cli.log_json);

    // Validate everything before touching the network
    let check = match config::Settings::load(cli.config.as_deref())
        .and_then(|settings| config::check_config(&cli, settings))
    {
        Ok(check) => check,
        Err(err) => {
            output::print_error(&format!("{:#}", err));
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match run(&check, cli.format).await {
        Ok(code) => code,
        Err(err) => {
            error!(table = %check.table, error = %format!("{:#}", err), "Capacity check failed");
            output::print_error(&format!("{:#}", err));
            ExitCode::from(EXIT_UNAVAILABLE)
        }
    }
}

async fn run(check: &CheckConfig, format: output::OutputFormat) -> Result<ExitCode> {
    let source = client::CloudWatchSource::connect(&check.region).await;
    let outcome = run_check(&source, check, Utc::now()).await?;

    if check.debug {
        if let Some(grid) = &outcome.grid {
            output::print_grid(grid, format)?;
        }
    }

    println!("{}", outcome.report.status_line());
    Ok(ExitCode::from(outcome.report.exit_code() as u8))
}

/// Initialize tracing on stderr; stdout carries the plugin output
fn init_tracing(debug: bool, json: bool) {
    let default_filter = if debug {
        "warn,capacity_lib=debug,check_dynamodb_capacity=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
