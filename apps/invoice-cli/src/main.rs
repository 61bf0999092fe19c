//! # garage-invoice
//!
//! Command-line front end for garage-core.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Parse arguments (clap)                                              │
//! │  2. Load InvoiceConfig from GARAGE_* variables                          │
//! │  3. Initialize tracing (stderr, RUST_LOG or GARAGE_LOG_LEVEL)           │
//! │  4. Run the subcommand, rendered output goes to stdout                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```text
//! garage-invoice words 150000.25
//! garage-invoice invoice service.json
//! garage-invoice report rows.json --today 2024-05-25
//! cat rows.json | garage-invoice dashboard
//! garage-invoice history rows.json --search swift
//! garage-invoice invoice-number
//! ```

mod cli;
mod commands;
mod config;
mod error;

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::Parser;
use garage_core::{AmountInWords, ReportInput};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::InvoiceRequest;
use crate::config::InvoiceConfig;
use crate::error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match InvoiceConfig::load() {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            let err = CliError::from(err);
            error!("{err}");
            return ExitCode::from(err.exit_code());
        }
    };
    init_tracing(&config.log_level);
    debug!(shop = %config.shop.name, "Configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run(cli.cmd, &config, &mut out).and_then(|()| out.flush().map_err(CliError::from));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cmd: Command, config: &InvoiceConfig, out: &mut impl Write) -> Result<(), CliError> {
    match cmd {
        Command::Words(args) => {
            let converter = AmountInWords::new(config.words.clone());
            commands::words(args.amount, &converter, out)
        }
        Command::Invoice(args) => {
            let request: InvoiceRequest = commands::read_json(&args.input)?;
            commands::invoice(&request, config, args.json, out)
        }
        Command::Report(args) => {
            let input: ReportInput = commands::read_json(&args.input)?;
            commands::report(&input, report_date(args.today), out)
        }
        Command::Dashboard(args) => {
            let input: ReportInput = commands::read_json(&args.input)?;
            commands::dashboard(&input, report_date(args.today), out)
        }
        Command::History(args) => {
            let input: ReportInput = commands::read_json(&args.rows.input)?;
            commands::history(
                &input,
                &args.search,
                args.vehicle.as_deref(),
                report_date(args.rows.today),
                out,
            )
        }
        Command::InvoiceNumber => commands::invoice_number(&Local::now(), out),
        Command::Config => commands::config(config, out),
    }
}

fn report_date(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so that
/// stdout carries only the rendered output.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
