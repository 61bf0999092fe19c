//! # Invoice Module
//!
//! Builds printable invoices from joined sale and service rows.
//!
//! ## Invoice Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Sale + [SaleItemDetail] ──► Invoice::for_sale()                       │
//! │                                   │  grand total = sale.total_amount    │
//! │                                   ▼                                     │
//! │                               Invoice ──► render_text() ──► printer    │
//! │                                   ▲           │                         │
//! │                                   │           └─► "Amount in Words: …" │
//! │  ServiceDetail ───────────► Invoice::for_service()                     │
//! │                                grand total = labour + Σ part subtotals │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use chrono::NaiveDate;
//! use garage_core::invoice::Invoice;
//! use garage_core::money::Money;
//! use garage_core::types::Sale;
//!
//! let sale = Sale {
//!     id: "s-1".to_string(),
//!     invoice_number: "INV-0042".to_string(),
//!     customer_name: "Walk-in".to_string(),
//!     sale_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
//!     status: "completed".to_string(),
//!     total_amount: Money::from_paise(150_050),
//! };
//! let invoice = Invoice::for_sale(&sale, &[]).unwrap();
//! assert_eq!(
//!     invoice.amount_in_words().unwrap(),
//!     "One Thousand Five Hundred Rupees and Fifty Paise Only"
//! );
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{AmountError, CoreResult};
use crate::money::Money;
use crate::types::{Related, Sale, SaleItemDetail, ServiceDetail, SparePart};
use crate::validation::{
    validate_invoice_number, validate_price, validate_quantity, validate_uuid,
};
use crate::words::AmountInWords;
use crate::UNKNOWN_LABEL;

/// Width of the plain-text invoice in characters.
const TEXT_WIDTH: usize = 72;

// =============================================================================
// Shop Profile
// =============================================================================

/// Letterhead printed at the top of every invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShopProfile {
    pub name: String,
    pub tagline: Option<String>,
    pub contact_lines: Vec<String>,
}

impl Default for ShopProfile {
    fn default() -> Self {
        ShopProfile {
            name: "Garage Ledger Workshop".to_string(),
            tagline: Some("Engine • Suspension • Scanning • AC Works".to_string()),
            contact_lines: vec!["We Repair All Types of Cars".to_string()],
        }
    }
}

// =============================================================================
// Invoice Types
// =============================================================================

/// What the invoice bills for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InvoiceKind {
    /// Over-the-counter parts sale.
    Sale,
    /// Workshop service on a vehicle.
    Service,
}

/// The "Bill To" block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillTo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// The "Vehicle Information" block of a service invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VehicleInfo {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub registration_number: String,
    pub mileage: Option<i64>,
}

/// One part line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceLine {
    /// Part name, or "Unknown" when the part no longer resolves.
    pub description: String,
    pub part_number: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

impl InvoiceLine {
    fn from_part(
        spare_part: &Related<SparePart>,
        quantity: i64,
        unit_price: Money,
        subtotal: Money,
    ) -> CoreResult<Self> {
        validate_quantity(quantity)?;
        validate_price("unit_price", unit_price)?;
        validate_price("subtotal", subtotal)?;

        let (description, part_number) = match spare_part.resolved() {
            Some(part) => (part.part_name.clone(), Some(part.part_number.clone())),
            None => (UNKNOWN_LABEL.to_string(), None),
        };

        Ok(InvoiceLine {
            description,
            part_number,
            quantity,
            unit_price,
            subtotal,
        })
    }
}

/// The service performed, for service invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceSummary {
    /// Service type name ("Unknown" if the type no longer resolves).
    pub name: String,

    /// List price of the service type. Printed, never added to the total.
    pub base_price: Option<Money>,
}

/// A printable invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub kind: InvoiceKind,
    pub number: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub bill_to: BillTo,
    pub vehicle: Option<VehicleInfo>,
    pub service: Option<ServiceSummary>,
    pub lines: Vec<InvoiceLine>,
    pub labor_charges: Money,
    grand_total: Money,
}

impl Invoice {
    /// Builds the invoice for a parts sale.
    ///
    /// The grand total is the sale's stored `total_amount`.
    ///
    /// ## Errors
    /// - Empty invoice number
    /// - Non-positive quantity or negative price on any line
    pub fn for_sale(sale: &Sale, items: &[SaleItemDetail]) -> CoreResult<Self> {
        validate_invoice_number(&sale.invoice_number)?;
        validate_price("total_amount", sale.total_amount)?;

        let lines = items
            .iter()
            .map(|detail| {
                InvoiceLine::from_part(
                    &detail.spare_part,
                    detail.item.quantity,
                    detail.item.unit_price,
                    detail.item.subtotal,
                )
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Invoice {
            kind: InvoiceKind::Sale,
            number: sale.invoice_number.trim().to_string(),
            date: sale.sale_date,
            bill_to: BillTo {
                name: sale.customer_name.clone(),
                email: None,
                phone: None,
                address: None,
            },
            vehicle: None,
            service: None,
            lines,
            labor_charges: Money::zero(),
            grand_total: sale.total_amount,
        })
    }

    /// Builds the invoice for a workshop service.
    ///
    /// ## Rules
    /// - Number is the first 8 characters of the service id, upper-cased
    /// - Grand total is labour charges plus the part subtotals
    /// - The service type's base price is informational only
    ///
    /// ## Errors
    /// - Service id that is not a UUID
    /// - `MissingRelation` if the vehicle or its owner did not resolve
    /// - Non-positive quantity or negative price on any line
    pub fn for_service(detail: &ServiceDetail) -> CoreResult<Self> {
        let service = &detail.service;
        let vehicle = detail.vehicle.require("Vehicle")?;
        let customer = vehicle.customer.require("Customer")?;

        validate_uuid(&service.id)?;
        validate_price("labor_charges", service.labor_charges)?;

        let number: String = service.id.chars().take(8).collect::<String>().to_uppercase();

        let lines = detail
            .parts
            .iter()
            .map(|part| {
                InvoiceLine::from_part(
                    &part.spare_part,
                    part.item.quantity,
                    part.item.unit_price,
                    part.item.subtotal,
                )
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let service_summary = match detail.service_type.resolved() {
            Some(kind) => ServiceSummary {
                name: kind.name.clone(),
                base_price: kind.base_price,
            },
            None => ServiceSummary {
                name: UNKNOWN_LABEL.to_string(),
                base_price: None,
            },
        };

        let parts_total: Money = lines.iter().map(|line| line.subtotal).sum();

        Ok(Invoice {
            kind: InvoiceKind::Service,
            number,
            date: service.service_date,
            bill_to: BillTo {
                name: customer.name.clone(),
                email: customer.email.clone(),
                phone: customer.phone.clone(),
                address: customer.address.clone(),
            },
            vehicle: Some(VehicleInfo {
                make: vehicle.vehicle.make.clone(),
                model: vehicle.vehicle.model.clone(),
                year: vehicle.vehicle.year,
                registration_number: vehicle.vehicle.registration_number.clone(),
                mileage: service.mileage,
            }),
            service: Some(service_summary),
            lines,
            labor_charges: service.labor_charges,
            grand_total: service.labor_charges + parts_total,
        })
    }

    /// Sum of the line subtotals.
    pub fn parts_total(&self) -> Money {
        self.lines.iter().map(|line| line.subtotal).sum()
    }

    /// The amount the customer pays.
    pub fn grand_total(&self) -> Money {
        self.grand_total
    }

    /// The grand total spelled out with the default labels.
    pub fn amount_in_words(&self) -> Result<String, AmountError> {
        self.amount_in_words_with(&AmountInWords::default())
    }

    /// The grand total spelled out with a specific converter.
    pub fn amount_in_words_with(&self, converter: &AmountInWords) -> Result<String, AmountError> {
        converter.convert_money(self.grand_total)
    }
}

// =============================================================================
// Text Rendering
// =============================================================================

/// Renders an invoice as plain text for receipt printers and terminals.
///
/// ## Layout
/// ```text
/// Garage Ledger Workshop                                   INVOICE
/// Engine • Suspension • Scanning • AC Works               #1A2B3C4D
/// We Repair All Types of Cars                     Date: 2024-05-02
/// ────────────────────────────────────────────────────────────────
/// Bill To: Ravi Kumar
/// …
/// Grand Total:                                            ₹1450.00
/// Amount in Words: One Thousand Four Hundred Fifty Rupees Only
/// ```
pub fn render_text(
    invoice: &Invoice,
    shop: &ShopProfile,
    converter: &AmountInWords,
) -> CoreResult<String> {
    let words = invoice.amount_in_words_with(converter)?;
    let rule = "─".repeat(TEXT_WIDTH);
    let mut out: Vec<String> = Vec::new();

    // Header: letterhead on the left, invoice id on the right
    let mut left: Vec<&str> = vec![shop.name.as_str()];
    if let Some(tagline) = &shop.tagline {
        left.push(tagline);
    }
    left.extend(shop.contact_lines.iter().map(String::as_str));
    let number = format!("#{}", invoice.number);
    let date = format!("Date: {}", invoice.date);
    let right = ["INVOICE", number.as_str(), date.as_str()];
    for i in 0..left.len().max(right.len()) {
        out.push(two_columns(
            left.get(i).copied().unwrap_or(""),
            right.get(i).copied().unwrap_or(""),
        ));
    }
    out.push(rule.clone());

    // Bill to
    out.push(format!("Bill To: {}", invoice.bill_to.name));
    for detail in [
        &invoice.bill_to.email,
        &invoice.bill_to.phone,
        &invoice.bill_to.address,
    ]
    .into_iter()
    .flatten()
    {
        out.push(format!("         {detail}"));
    }

    if let Some(vehicle) = &invoice.vehicle {
        out.push(format!("Vehicle: {} {} ({})", vehicle.make, vehicle.model, vehicle.year));
        out.push(format!("Registration: {}", vehicle.registration_number));
        if let Some(km) = vehicle.mileage {
            out.push(format!("Mileage: {km} km"));
        }
    }
    out.push(rule.clone());

    // Service details
    if let Some(service) = &invoice.service {
        let base = service.base_price.unwrap_or_default();
        out.push(two_columns(&service.name, &base.to_string()));
        out.push(two_columns(
            "Labor Charges",
            &invoice.labor_charges.to_string(),
        ));
        out.push(rule.clone());
    }

    // Part lines
    if !invoice.lines.is_empty() {
        out.push(format!(
            "{:<24} {:<14} {:>5} {:>12} {:>13}",
            "Part Name", "Part Number", "Qty", "Unit Price", "Total"
        ));
        for line in &invoice.lines {
            out.push(format!(
                "{:<24} {:<14} {:>5} {:>12} {:>13}",
                truncate(&line.description, 24),
                truncate(line.part_number.as_deref().unwrap_or("-"), 14),
                line.quantity,
                line.unit_price.to_string(),
                line.subtotal.to_string(),
            ));
        }
        out.push(rule.clone());
    }

    if invoice.kind == InvoiceKind::Service {
        out.push(two_columns(
            "Parts Total:",
            &invoice.parts_total().to_string(),
        ));
        out.push(two_columns(
            "Labor Charges:",
            &invoice.labor_charges.to_string(),
        ));
    }
    out.push(two_columns(
        "Grand Total:",
        &invoice.grand_total().to_string(),
    ));
    out.push(format!("Amount in Words: {words}"));

    Ok(out.join("\n"))
}

fn two_columns(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = TEXT_WIDTH.saturating_sub(used).max(1);
    format!("{left}{}{right}", " ".repeat(gap))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max - 1).collect();
        cut.push('…');
        cut
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
