use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "garage-invoice",
    version,
    about = "Invoices, reports and amount-in-words for a vehicle service workshop"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Spell an amount in words ("One Thousand Rupees Only")
    Words(WordsArgs),
    /// Render a sale or service invoice from exported rows
    Invoice(InvoiceArgs),
    /// Build the reports page summary as JSON
    Report(ReportArgs),
    /// Build the dashboard cards as JSON
    Dashboard(ReportArgs),
    /// Group services per vehicle, with totals and due reminders, as JSON
    History(HistoryArgs),
    /// Generate a new sale invoice number
    InvoiceNumber,
    /// Print the effective configuration as JSON
    Config,
}

#[derive(Args, Debug)]
pub struct WordsArgs {
    /// Decimal amount, e.g. 1500.75
    #[arg(allow_negative_numbers = true)]
    pub amount: f64,
}

#[derive(Args, Debug)]
pub struct InvoiceArgs {
    /// JSON file with an invoice request, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Emit the invoice as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// JSON file with report rows, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Reporting date (YYYY-MM-DD); defaults to the local date
    #[arg(long, env = "GARAGE_TODAY")]
    pub today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub rows: ReportArgs,

    /// Keep services whose customer, vehicle or service type contains this
    #[arg(long, short, default_value = "")]
    pub search: String,

    /// Keep one vehicle, by `Make Model (REG)` label or id
    #[arg(long)]
    pub vehicle: Option<String>,
}
