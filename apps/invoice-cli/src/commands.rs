//! # Commands
//!
//! One function per subcommand. Each reads its input, calls into
//! garage-core, and writes the result to the given writer.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeZone};
use garage_core::report::vehicle_history;
use garage_core::search::filter_services;
use garage_core::{
    generate_invoice_number, render_text, AmountInWords, DashboardStats, Invoice, ReportInput,
    ReportSummary, SaleDetail, ServiceDetail,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::InvoiceConfig;
use crate::error::CliError;

/// Rows needed to print one invoice.
///
/// ```json
/// { "type": "service", "id": "…", "vehicle": { "kind": "resolved", … }, … }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvoiceRequest {
    Sale(SaleDetail),
    Service(ServiceDetail),
}

/// Invoice plus its total in words, for `invoice --json`.
#[derive(Debug, Serialize)]
struct InvoiceDocument<'a> {
    #[serde(flatten)]
    invoice: &'a Invoice,
    amount_in_words: String,
}

/// Reads and parses a JSON document; `-` reads stdin.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let label = path.display().to_string();
    let mut raw = String::new();

    let read = if path == Path::new("-") {
        io::stdin().read_to_string(&mut raw)
    } else {
        File::open(path).and_then(|file| BufReader::new(file).read_to_string(&mut raw))
    };
    read.map_err(|source| CliError::Input {
        path: label.clone(),
        source,
    })?;
    debug!(path = %label, bytes = raw.len(), "Input read");

    serde_json::from_str(&raw).map_err(|source| CliError::Json {
        path: label,
        source,
    })
}

/// `words <AMOUNT>`
pub fn words(amount: f64, converter: &AmountInWords, out: &mut impl Write) -> Result<(), CliError> {
    let spelled = converter.convert(amount)?;
    writeln!(out, "{spelled}")?;
    Ok(())
}

/// `invoice <FILE>`
pub fn invoice(
    request: &InvoiceRequest,
    config: &InvoiceConfig,
    as_json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let invoice = match request {
        InvoiceRequest::Sale(detail) => {
            let invoice = Invoice::for_sale(&detail.sale, &detail.items)?;
            if invoice.parts_total() != invoice.grand_total() {
                warn!(
                    number = %invoice.number,
                    lines = %invoice.parts_total(),
                    stored = %invoice.grand_total(),
                    "Sale total differs from the sum of its lines"
                );
            }
            invoice
        }
        InvoiceRequest::Service(detail) => Invoice::for_service(detail)?,
    };
    info!(number = %invoice.number, kind = ?invoice.kind, total = %invoice.grand_total(), "Invoice built");

    let converter = AmountInWords::new(config.words.clone());
    if as_json {
        let document = InvoiceDocument {
            invoice: &invoice,
            amount_in_words: invoice.amount_in_words_with(&converter)?,
        };
        serde_json::to_writer_pretty(&mut *out, &document)?;
        writeln!(out)?;
    } else {
        let text = render_text(&invoice, &config.shop, &converter)?;
        writeln!(out, "{text}")?;
    }
    Ok(())
}

/// `report <FILE>`
pub fn report(input: &ReportInput, today: NaiveDate, out: &mut impl Write) -> Result<(), CliError> {
    log_input(input, today);
    let summary = ReportSummary::build(input, today);
    serde_json::to_writer_pretty(&mut *out, &summary)?;
    writeln!(out)?;
    Ok(())
}

/// `dashboard <FILE>`
pub fn dashboard(
    input: &ReportInput,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<(), CliError> {
    log_input(input, today);
    let stats = DashboardStats::build(input, today);
    serde_json::to_writer_pretty(&mut *out, &stats)?;
    writeln!(out)?;
    Ok(())
}

/// `history <FILE>`
///
/// Services matching `search`, grouped per vehicle. `vehicle` keeps only the
/// group whose label (`Make Model (REG)`) or id equals it.
pub fn history(
    input: &ReportInput,
    search: &str,
    vehicle: Option<&str>,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let matching = filter_services(&input.services, search);
    debug!(search, matched = matching.len(), "Services filtered");

    let mut groups = vehicle_history(matching, today);
    if let Some(wanted) = vehicle {
        groups.retain(|group| group.vehicle == wanted || group.vehicle_id == wanted);
    }
    info!(%today, vehicles = groups.len(), "Service history built");

    serde_json::to_writer_pretty(&mut *out, &groups)?;
    writeln!(out)?;
    Ok(())
}

/// `invoice-number`
pub fn invoice_number<Tz: TimeZone>(at: &DateTime<Tz>, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", generate_invoice_number(at))?;
    Ok(())
}

/// `config`
pub fn config(config: &InvoiceConfig, out: &mut impl Write) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, config)?;
    writeln!(out)?;
    Ok(())
}

fn log_input(input: &ReportInput, today: NaiveDate) {
    info!(
        %today,
        sales = input.sales.len(),
        services = input.services.len(),
        parts = input.parts.len(),
        customers = input.customers.len(),
        "Aggregating report"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> InvoiceConfig {
        InvoiceConfig::from_lookup(|_| None).unwrap()
    }

    fn run<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), CliError>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn service_request() -> serde_json::Value {
        json!({
            "type": "service",
            "id": "1a2b3c4d-0000-4000-8000-000000000000",
            "vehicle_id": "v-1",
            "service_type_id": "t-1",
            "service_date": "2024-05-02",
            "status": "completed",
            "labor_charges": 800,
            "total_cost": 1450,
            "mileage": 42000,
            "vehicle": {
                "kind": "resolved",
                "record": {
                    "id": "v-1",
                    "customer_id": "c-1",
                    "make": "Maruti",
                    "model": "Swift",
                    "year": 2019,
                    "registration_number": "MH12AB1234",
                    "customer": {
                        "kind": "resolved",
                        "record": {
                            "id": "c-1",
                            "name": "Ravi Kumar",
                            "created_at": "2023-01-10T09:00:00Z"
                        }
                    }
                }
            },
            "service_type": {
                "kind": "resolved",
                "record": { "id": "t-1", "name": "General Service", "base_price": 500 }
            },
            "parts": [{
                "id": "sp-1",
                "service_id": "1a2b3c4d",
                "spare_part_id": "p-1",
                "quantity": 1,
                "unit_price": 650,
                "subtotal": 650,
                "spare_part": { "kind": "missing", "record": { "id": "p-1" } }
            }]
        })
    }

    #[test]
    fn test_words_command() {
        let converter = AmountInWords::default();
        let out = run(|out| words(1500.75, &converter, out));
        assert_eq!(
            out,
            "One Thousand Five Hundred Rupees and Seventy Five Paise Only\n"
        );
    }

    #[test]
    fn test_words_command_rejects_negative() {
        let mut out = Vec::new();
        let err = words(-1.0, &AmountInWords::default(), &mut out).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(out.is_empty());
    }

    #[test]
    fn test_service_invoice_text() {
        let request: InvoiceRequest = serde_json::from_value(service_request()).unwrap();
        let out = run(|out| invoice(&request, &config(), false, out));

        assert!(out.starts_with("Garage Ledger Workshop"));
        assert!(out.contains("#1A2B3C4D"));
        assert!(out.contains("Bill To: Ravi Kumar"));
        assert!(out.contains("Unknown"));
        assert!(out.ends_with(
            "Amount in Words: One Thousand Four Hundred Fifty Rupees Only\n"
        ));
    }

    #[test]
    fn test_sale_invoice_json() {
        let request: InvoiceRequest = serde_json::from_value(json!({
            "type": "sale",
            "id": "s-1",
            "invoice_number": "INV-0042",
            "customer_name": "Walk-in",
            "sale_date": "2024-05-03",
            "status": "completed",
            "total_amount": 0.5
        }))
        .unwrap();
        let out = run(|out| invoice(&request, &config(), true, out));

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["number"], "INV-0042");
        assert_eq!(value["grand_total"], 0.5);
        assert_eq!(value["amount_in_words"], "Rupees and Fifty Paise Only");
    }

    #[test]
    fn test_missing_owner_is_an_error() {
        let mut raw = service_request();
        raw["vehicle"]["record"]["customer"] = json!({ "kind": "missing", "record": { "id": "c-1" } });
        let request: InvoiceRequest = serde_json::from_value(raw).unwrap();

        let mut out = Vec::new();
        let err = invoice(&request, &config(), false, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "Customer not found: c-1");
    }

    #[test]
    fn test_report_and_dashboard_json() {
        let input: ReportInput = serde_json::from_value(json!({
            "parts": [{
                "id": "p-1",
                "part_name": "Brake Pad",
                "part_number": "BP-01",
                "brand": "Bosch",
                "part_type": "Brakes",
                "price": 900,
                "quantity_in_stock": 1,
                "reorder_threshold": 4
            }]
        }))
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();

        let out = run(|out| report(&input, today, out));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["inventoryAlerts"][0]["alertLevel"], "critical");
        assert_eq!(value["revenueData"].as_array().unwrap().len(), 6);

        let out = run(|out| dashboard(&input, today, out));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["lowStockAlerts"], 1);
    }

    #[test]
    fn test_history_groups_matching_services() {
        let mut second = service_request();
        second["id"] = json!("5e6f7a8b-0000-4000-8000-000000000000");
        second["total_cost"] = json!(550);
        second["service_type"] = json!({ "kind": "missing", "record": { "id": "t-2" } });
        second["next_service_date"] = json!("2024-05-30");
        let input: ReportInput =
            serde_json::from_value(json!({ "services": [service_request(), second] })).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();

        let out = run(|out| history(&input, "", None, today, out));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["vehicle"], "Maruti Swift (MH12AB1234)");
        assert_eq!(value[0]["totalServices"], 2);
        assert_eq!(value[0]["totalCost"], 2000.0);
        assert_eq!(value[0]["services"][1]["due"], true);

        let out = run(|out| history(&input, "GENERAL", None, today, out));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["totalServices"], 1);

        let out = run(|out| history(&input, "", Some("Maruti Swift (KA01)"), today, out));
        assert_eq!(out.trim(), "[]");
    }

    #[test]
    fn test_invoice_number_command() {
        use chrono::Utc;

        let at = Utc.timestamp_millis_opt(1_714_645_812_345).unwrap();
        let out = run(|out| invoice_number(&at, out));
        assert_eq!(out, "INV-20240502-2345\n");
    }

    #[test]
    fn test_config_command() {
        let out = run(|out| super::config(&config(), out));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["words"]["majorUnit"], "Rupees");
        assert_eq!(value["log_level"], "info");
    }

    #[test]
    fn test_read_json_from_file() {
        let path = std::env::temp_dir().join(format!("garage-rows-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "customers": [] }"#).unwrap();

        let input: ReportInput = read_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(input, ReportInput::default());
    }

    #[test]
    fn test_read_json_rejects_malformed() {
        let path = std::env::temp_dir().join(format!("garage-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_json::<ReportInput>(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("invalid JSON in "));
    }

    #[test]
    fn test_read_json_reports_path() {
        let err = read_json::<ReportInput>(Path::new("/nonexistent/rows.json")).unwrap_err();
        assert!(err.to_string().starts_with("could not read /nonexistent/rows.json"));
    }
}
