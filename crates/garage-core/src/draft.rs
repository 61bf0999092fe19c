//! # Drafts
//!
//! Sale and service forms before they are submitted to the hosted backend.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Form Action              Draft Method                Line Change       │
//! │  ───────────              ────────────                ───────────       │
//! │                                                                         │
//! │  Pick Part ─────────────► lines.add_part() ─────────► push / qty += n   │
//! │                                                                         │
//! │  Change Quantity ───────► lines.set_quantity() ─────► qty = n (0 drops) │
//! │                                                                         │
//! │  Click Remove ──────────► lines.remove_part() ──────► retain            │
//! │                                                                         │
//! │  Save ──────────────────► submit() ─────────────────► NewSale /         │
//! │                                                       NewService        │
//! │                                                                         │
//! │  subtotal = unit price × quantity, always recomputed, never stored      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use garage_core::draft::SaleDraft;
//! use garage_core::money::Money;
//! use garage_core::types::SparePart;
//!
//! let pad = SparePart {
//!     id: "8f14e45f-ceea-4f2c-9b7e-3f8d1a6c2b10".to_string(),
//!     part_name: "Brake Pad".to_string(),
//!     part_number: "BP-100".to_string(),
//!     brand: "Bosch".to_string(),
//!     part_type: "Brakes".to_string(),
//!     price: Money::from_paise(45_000),
//!     quantity_in_stock: 12,
//!     reorder_threshold: 4,
//! };
//!
//! let mut draft = SaleDraft::new("Anil Sharma", "INV-20240502-2345");
//! draft.lines.add_part(&pad, 2).unwrap();
//! let sale = draft.submit().unwrap();
//! assert_eq!(sale.total_amount, Money::from_paise(90_000));
//! ```

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::SparePart;
use crate::validation::{
    validate_invoice_number, validate_price, validate_quantity, validate_uuid,
};

// =============================================================================
// Invoice Numbers
// =============================================================================

/// Generates a sale invoice number, `INV-YYYYMMDD-NNNN`.
///
/// The date is taken in the timezone of `at`; `NNNN` is the last four
/// digits of its Unix timestamp in milliseconds.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use garage_core::draft::generate_invoice_number;
///
/// let at = Utc.timestamp_millis_opt(1_714_645_812_345).unwrap();
/// assert_eq!(generate_invoice_number(&at), "INV-20240502-2345");
/// ```
pub fn generate_invoice_number<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!(
        "INV-{}-{:04}",
        at.date_naive().format("%Y%m%d"),
        at.timestamp_millis().rem_euclid(10_000)
    )
}

// =============================================================================
// Draft Lines
// =============================================================================

/// A part picked on a sale or service form.
///
/// Price and name are frozen when the part is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftLine {
    pub spare_part_id: String,
    pub part_name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl DraftLine {
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Part lines of a draft.
///
/// ## Invariants
/// - Lines are unique by `spare_part_id` (picking a part again adds to it)
/// - Every quantity is within `1..=MAX_LINE_QUANTITY`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftLines {
    lines: Vec<DraftLine>,
}

impl DraftLines {
    /// Adds `quantity` of a part, or increases it if already present.
    ///
    /// ## Errors
    /// - Part id that is not a UUID
    /// - Negative part price
    /// - Quantity (or the merged quantity) outside `1..=MAX_LINE_QUANTITY`
    pub fn add_part(&mut self, part: &SparePart, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.spare_part_id == part.id)
        {
            let merged = line.quantity.saturating_add(quantity);
            validate_quantity(merged)?;
            line.quantity = merged;
            return Ok(());
        }

        validate_uuid(&part.id)?;
        validate_price("price", part.price)?;
        self.lines.push(DraftLine {
            spare_part_id: part.id.clone(),
            part_name: part.part_name.clone(),
            unit_price: part.price,
            quantity,
        });
        Ok(())
    }

    /// Sets the quantity of a line. Zero removes it.
    pub fn set_quantity(&mut self, spare_part_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_part(spare_part_id);
        }
        validate_quantity(quantity)?;

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.spare_part_id == spare_part_id)
            .ok_or_else(|| missing_line(spare_part_id))?;
        line.quantity = quantity;
        Ok(())
    }

    pub fn remove_part(&mut self, spare_part_id: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|line| line.spare_part_id != spare_part_id);
        if self.lines.len() == before {
            return Err(missing_line(spare_part_id));
        }
        Ok(())
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the line subtotals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(DraftLine::subtotal).sum()
    }

    fn to_items(&self) -> Vec<NewLineItem> {
        self.lines
            .iter()
            .map(|line| NewLineItem {
                spare_part_id: line.spare_part_id.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.subtotal(),
            })
            .collect()
    }
}

fn missing_line(spare_part_id: &str) -> CoreError {
    CoreError::MissingRelation {
        entity: "Draft line",
        id: spare_part_id.to_string(),
    }
}

// =============================================================================
// Submission Payloads
// =============================================================================

/// A `sale_items` / `service_parts` row ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewLineItem {
    pub spare_part_id: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// A `sales` row plus its items, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub customer_name: String,
    pub invoice_number: String,
    pub total_amount: Money,
    pub items: Vec<NewLineItem>,
}

/// A `services` row plus its parts, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewService {
    pub vehicle_id: String,
    pub service_type_id: String,
    #[ts(as = "String")]
    pub service_date: NaiveDate,
    pub labor_charges: Money,
    pub total_cost: Money,
    pub mileage: Option<i64>,
    pub notes: Option<String>,
    #[ts(as = "Option<String>")]
    pub next_service_date: Option<NaiveDate>,
    pub parts: Vec<NewLineItem>,
}

// =============================================================================
// Sale Draft
// =============================================================================

/// The "record sale" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    pub customer_name: String,
    pub invoice_number: String,
    pub lines: DraftLines,
}

impl SaleDraft {
    pub fn new(customer_name: impl Into<String>, invoice_number: impl Into<String>) -> Self {
        SaleDraft {
            customer_name: customer_name.into(),
            invoice_number: invoice_number.into(),
            lines: DraftLines::default(),
        }
    }

    /// The sale total: sum of the line subtotals.
    pub fn total_amount(&self) -> Money {
        self.lines.total()
    }

    /// Checks the form and builds the insert payload.
    ///
    /// ## Errors
    /// - Blank customer name
    /// - Empty or over-long invoice number
    /// - No items
    pub fn submit(&self) -> CoreResult<NewSale> {
        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() {
            return Err(ValidationError::Required {
                field: "customer_name".to_string(),
            }
            .into());
        }
        validate_invoice_number(&self.invoice_number)?;
        let invoice_number = self.invoice_number.trim().to_string();

        if self.lines.is_empty() {
            return Err(CoreError::InvalidInvoice {
                number: invoice_number,
                reason: "at least one item is required".to_string(),
            });
        }

        Ok(NewSale {
            customer_name: customer_name.to_string(),
            invoice_number,
            total_amount: self.total_amount(),
            items: self.lines.to_items(),
        })
    }
}

// =============================================================================
// Service Draft
// =============================================================================

/// The "new service" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDraft {
    pub vehicle_id: String,
    pub service_type_id: String,
    pub service_date: NaiveDate,
    pub labor_charges: Money,
    pub mileage: Option<i64>,
    pub notes: Option<String>,
    pub next_service_date: Option<NaiveDate>,
    pub lines: DraftLines,
}

impl ServiceDraft {
    pub fn new(
        vehicle_id: impl Into<String>,
        service_type_id: impl Into<String>,
        service_date: NaiveDate,
    ) -> Self {
        ServiceDraft {
            vehicle_id: vehicle_id.into(),
            service_type_id: service_type_id.into(),
            service_date,
            labor_charges: Money::zero(),
            mileage: None,
            notes: None,
            next_service_date: None,
            lines: DraftLines::default(),
        }
    }

    pub fn parts_total(&self) -> Money {
        self.lines.total()
    }

    /// Labour charges plus the part subtotals.
    pub fn total_cost(&self) -> Money {
        self.labor_charges + self.parts_total()
    }

    /// Checks the form and builds the insert payload.
    ///
    /// Parts are optional. Blank notes are dropped.
    ///
    /// ## Errors
    /// - Vehicle or service type id that is not a UUID
    /// - Negative labour charges or mileage
    /// - Next service date before the service date
    pub fn submit(&self) -> CoreResult<NewService> {
        validate_uuid(&self.vehicle_id)?;
        validate_uuid(&self.service_type_id)?;
        validate_price("labor_charges", self.labor_charges)?;

        if let Some(km) = self.mileage {
            if km < 0 {
                return Err(ValidationError::OutOfRange {
                    field: "mileage".to_string(),
                    min: 0,
                    max: i64::MAX,
                }
                .into());
            }
        }
        if let Some(next) = self.next_service_date {
            if next < self.service_date {
                return Err(ValidationError::InvalidFormat {
                    field: "next_service_date".to_string(),
                    reason: "must not be before the service date".to_string(),
                }
                .into());
            }
        }

        Ok(NewService {
            vehicle_id: self.vehicle_id.clone(),
            service_type_id: self.service_type_id.clone(),
            service_date: self.service_date,
            labor_charges: self.labor_charges,
            total_cost: self.total_cost(),
            mileage: self.mileage,
            notes: self
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|notes| !notes.is_empty())
                .map(str::to_string),
            next_service_date: self.next_service_date,
            parts: self.lines.to_items(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_LINE_QUANTITY;
    use chrono::{FixedOffset, Utc};

    const PAD_ID: &str = "8f14e45f-ceea-4f2c-9b7e-3f8d1a6c2b10";
    const FILTER_ID: &str = "c9f0f895-fb98-4b91-9f5a-1e2d3c4b5a60";
    const VEHICLE_ID: &str = "45c48cce-2e2d-4fbd-a7a3-9b0c1d2e3f40";
    const TYPE_ID: &str = "d3d94468-02a4-4259-b55d-9d0e1f2a3b4c";

    fn part(id: &str, name: &str, paise: i64) -> SparePart {
        SparePart {
            id: id.to_string(),
            part_name: name.to_string(),
            part_number: format!("PN-{name}"),
            brand: "Bosch".to_string(),
            part_type: "General".to_string(),
            price: Money::from_paise(paise),
            quantity_in_stock: 10,
            reorder_threshold: 2,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generate_invoice_number() {
        let at = Utc.timestamp_millis_opt(1_714_645_812_345).unwrap();
        assert_eq!(generate_invoice_number(&at), "INV-20240502-2345");

        // 2024-05-01T20:00:00.007Z is already 2 May in India
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let at = ist.timestamp_millis_opt(1_714_593_600_007).unwrap();
        assert_eq!(generate_invoice_number(&at), "INV-20240502-0007");
    }

    #[test]
    fn test_lines_subtotal_and_merge() {
        let mut lines = DraftLines::default();
        lines.add_part(&part(PAD_ID, "Brake Pad", 45_000), 2).unwrap();
        lines.add_part(&part(FILTER_ID, "Oil Filter", 12_550), 1).unwrap();
        lines.add_part(&part(PAD_ID, "Brake Pad", 45_000), 1).unwrap();

        assert_eq!(lines.lines().len(), 2);
        assert_eq!(lines.lines()[0].quantity, 3);
        assert_eq!(lines.lines()[0].subtotal(), Money::from_paise(135_000));
        assert_eq!(lines.total(), Money::from_paise(147_550));
    }

    #[test]
    fn test_lines_set_quantity_recomputes() {
        let mut lines = DraftLines::default();
        lines.add_part(&part(PAD_ID, "Brake Pad", 45_000), 1).unwrap();
        lines.set_quantity(PAD_ID, 4).unwrap();
        assert_eq!(lines.total(), Money::from_paise(180_000));

        lines.set_quantity(PAD_ID, 0).unwrap();
        assert!(lines.is_empty());
        assert!(lines.total().is_zero());
    }

    #[test]
    fn test_lines_reject_bad_input() {
        let mut lines = DraftLines::default();
        assert!(lines.add_part(&part(PAD_ID, "Brake Pad", 100), 0).is_err());
        assert!(lines.add_part(&part("p-1", "Brake Pad", 100), 1).is_err());
        assert!(lines.add_part(&part(PAD_ID, "Brake Pad", -100), 1).is_err());
        assert!(lines.is_empty());

        lines
            .add_part(&part(PAD_ID, "Brake Pad", 100), MAX_LINE_QUANTITY)
            .unwrap();
        assert!(lines.add_part(&part(PAD_ID, "Brake Pad", 100), 1).is_err());
        assert_eq!(lines.lines()[0].quantity, MAX_LINE_QUANTITY);

        let err = lines.remove_part(FILTER_ID).unwrap_err();
        assert_eq!(err.to_string(), format!("Draft line not found: {FILTER_ID}"));
        assert!(lines.set_quantity(FILTER_ID, 2).is_err());
    }

    #[test]
    fn test_sale_draft_submit() {
        let mut draft = SaleDraft::new("  Anil Sharma ", " INV-20240502-2345 ");
        draft.lines.add_part(&part(PAD_ID, "Brake Pad", 45_000), 2).unwrap();
        draft.lines.add_part(&part(FILTER_ID, "Oil Filter", 12_550), 1).unwrap();

        let sale = draft.submit().unwrap();
        assert_eq!(sale.customer_name, "Anil Sharma");
        assert_eq!(sale.invoice_number, "INV-20240502-2345");
        assert_eq!(sale.total_amount, Money::from_paise(102_550));
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[0].subtotal, Money::from_paise(90_000));

        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["total_amount"], 1025.5);
        assert_eq!(json["items"][1]["unit_price"], 125.5);
    }

    #[test]
    fn test_sale_draft_requires_fields() {
        let empty = SaleDraft::new("Anil", "INV-1");
        assert!(matches!(
            empty.submit(),
            Err(CoreError::InvalidInvoice { .. })
        ));

        let mut nameless = SaleDraft::new("   ", "INV-1");
        nameless.lines.add_part(&part(PAD_ID, "Brake Pad", 100), 1).unwrap();
        let err = nameless.submit().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: customer_name is required");

        let mut numberless = SaleDraft::new("Anil", "");
        numberless.lines.add_part(&part(PAD_ID, "Brake Pad", 100), 1).unwrap();
        assert!(numberless.submit().is_err());
    }

    #[test]
    fn test_service_draft_total_is_labour_plus_parts() {
        let mut draft = ServiceDraft::new(VEHICLE_ID, TYPE_ID, day(2024, 5, 2));
        draft.labor_charges = Money::from_paise(80_000);
        draft.mileage = Some(42_000);
        draft.notes = Some("   ".to_string());
        draft.next_service_date = Some(day(2024, 11, 2));
        draft.lines.add_part(&part(FILTER_ID, "Oil Filter", 65_000), 1).unwrap();

        assert_eq!(draft.parts_total(), Money::from_paise(65_000));
        assert_eq!(draft.total_cost(), Money::from_paise(145_000));

        let service = draft.submit().unwrap();
        assert_eq!(service.total_cost, Money::from_paise(145_000));
        assert_eq!(service.notes, None);
        assert_eq!(service.parts.len(), 1);
    }

    #[test]
    fn test_service_draft_without_parts() {
        let mut draft = ServiceDraft::new(VEHICLE_ID, TYPE_ID, day(2024, 5, 2));
        draft.labor_charges = Money::from_paise(50_000);
        let service = draft.submit().unwrap();
        assert_eq!(service.total_cost, Money::from_paise(50_000));
        assert!(service.parts.is_empty());
    }

    #[test]
    fn test_service_draft_rejects_bad_input() {
        let bad_vehicle = ServiceDraft::new("v-1", TYPE_ID, day(2024, 5, 2));
        assert!(bad_vehicle.submit().is_err());

        let mut negative = ServiceDraft::new(VEHICLE_ID, TYPE_ID, day(2024, 5, 2));
        negative.labor_charges = Money::from_paise(-1);
        assert!(negative.submit().is_err());

        let mut mileage = ServiceDraft::new(VEHICLE_ID, TYPE_ID, day(2024, 5, 2));
        mileage.mileage = Some(-5);
        assert!(mileage.submit().is_err());

        let mut backwards = ServiceDraft::new(VEHICLE_ID, TYPE_ID, day(2024, 5, 2));
        backwards.next_service_date = Some(day(2024, 5, 1));
        let err = backwards.submit().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: next_service_date has invalid format: must not be before the service date"
        );
    }
}
