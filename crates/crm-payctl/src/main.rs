//! crm-payctl: operator tool for the payment distribution engine.
//!
//! Reads JSON from a file or stdin, writes JSON results to stdout and logs
//! to stderr.

mod commands;
mod config;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use crate::config::PayctlConfig;

/// Payment distribution CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "crm-payctl")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CRM_PAYCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the effective rates of a company
    Rates(InputArgs),
    /// Distribute one order
    Allocate(AllocateArgs),
    /// Check a candidate rate set
    Validate(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// JSON input file, `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: String,
}

#[derive(Args, Debug)]
struct AllocateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Also print the rounded payment lines
    #[arg(long)]
    payouts: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = PayctlConfig::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("crm={}", config.logging.level).parse()?),
        )
        .init();

    tracing::debug!(
        minor_units = config.payout.minor_units_per_unit,
        "configuration loaded"
    );

    let provider = config.rate_provider();

    let (ok, output) = match &cli.command {
        Command::Rates(args) => (true, commands::rates::resolve(&provider, &read_input(&args.input)?)?),
        Command::Allocate(args) => {
            let input = read_input(&args.input.input)?;
            let value = commands::allocate::run(&provider, &config.rounding(), &input, args.payouts)?;
            (true, value)
        }
        Command::Validate(args) => commands::validate::run(&read_input(&args.input)?)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading {source}"))
    }
}
