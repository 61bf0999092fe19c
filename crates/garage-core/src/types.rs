//! # Domain Types
//!
//! Typed records for the rows the hosted backend returns, plus the joined
//! views the invoice and report code works on.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Customer ◄── Vehicle ◄── Service ──► ServiceType                      │
//! │                              │                                          │
//! │                              └──► ServicePart ──► SparePart            │
//! │                                                       ▲                 │
//! │  Sale ──► SaleItem ───────────────────────────────────┘                │
//! │                                                                         │
//! │  Every arrow is a Related<T>: Resolved(T) or Missing { id }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Typed Joins
//! The backend returns nested rows where any relation can be `null` (a
//! deleted part, a vehicle without an owner). Instead of optional chaining
//! over untyped JSON, every relation is a [`Related`] value and each consumer
//! decides explicitly what a missing relation means.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Related
// =============================================================================

/// A relation that may or may not have resolved.
///
/// ## Serialization
/// ```json
/// { "kind": "resolved", "record": { "id": "…", "part_name": "Brake Pad" } }
/// { "kind": "missing",  "record": { "id": "…" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
#[ts(export)]
pub enum Related<T> {
    /// The related row was found.
    Resolved(T),
    /// The foreign key points at a row that was not returned.
    Missing { id: String },
}

impl<T> Related<T> {
    /// Returns the related record, if resolved.
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Related::Resolved(record) => Some(record),
            Related::Missing { .. } => None,
        }
    }

    /// Returns the record or a `MissingRelation` error naming `entity`.
    pub fn require(&self, entity: &'static str) -> CoreResult<&T> {
        match self {
            Related::Resolved(record) => Ok(record),
            Related::Missing { id } => Err(CoreError::MissingRelation {
                entity,
                id: id.clone(),
            }),
        }
    }
}

// =============================================================================
// Customer & Vehicle
// =============================================================================

/// A workshop customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name printed under "Bill To".
    pub name: String,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,

    /// When the customer record was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A customer's vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vehicle {
    pub id: String,

    /// Owning customer (FK).
    pub customer_id: String,

    pub make: String,
    pub model: String,
    pub year: i32,

    /// Number plate, e.g. "MH12AB1234".
    pub registration_number: String,
}

/// A vehicle joined with its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VehicleWithOwner {
    #[serde(flatten)]
    pub vehicle: Vehicle,

    pub customer: Related<Customer>,
}

// =============================================================================
// Inventory
// =============================================================================

/// A spare part held in inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SparePart {
    pub id: String,

    /// Display name shown on invoices and reports.
    pub part_name: String,

    /// Manufacturer part number.
    pub part_number: String,

    pub brand: String,

    /// Category, e.g. "Brakes", "Filters".
    pub part_type: String,

    /// Selling price per unit.
    pub price: Money,

    /// Units on the shelf.
    pub quantity_in_stock: i64,

    /// Stock level at or below which the part should be reordered.
    pub reorder_threshold: i64,
}

impl SparePart {
    /// Checks if the part has reached its reorder threshold.
    #[inline]
    pub fn needs_reorder(&self) -> bool {
        self.quantity_in_stock <= self.reorder_threshold
    }
}

// =============================================================================
// Services
// =============================================================================

/// A kind of service the workshop offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceType {
    pub id: String,

    /// e.g. "General Service", "AC Repair".
    pub name: String,

    pub description: Option<String>,

    /// Informational list price. Not part of the invoice total.
    pub base_price: Option<Money>,

    pub estimated_duration_hours: Option<f64>,
}

/// A service performed on a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Service {
    pub id: String,
    pub vehicle_id: String,
    pub service_type_id: String,

    #[ts(as = "String")]
    pub service_date: NaiveDate,

    /// Free-form workflow status from the backend.
    #[serde(default)]
    pub status: String,

    /// Labour charged on top of the parts used.
    #[serde(default)]
    pub labor_charges: Money,

    /// Total billed for the service, as stored by the backend.
    #[serde(default)]
    pub total_cost: Money,

    /// Odometer reading in km.
    pub mileage: Option<i64>,

    /// Next service reminder date.
    #[ts(as = "Option<String>")]
    pub next_service_date: Option<NaiveDate>,

    pub notes: Option<String>,
}

/// A part consumed during a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServicePart {
    pub id: String,
    pub service_id: String,
    pub spare_part_id: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// A service part joined with its inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServicePartDetail {
    #[serde(flatten)]
    pub item: ServicePart,

    pub spare_part: Related<SparePart>,
}

/// A service joined with everything its invoice needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: Service,

    pub vehicle: Related<VehicleWithOwner>,
    pub service_type: Related<ServiceType>,

    #[serde(default)]
    pub parts: Vec<ServicePartDetail>,
}

impl ServiceDetail {
    /// The customer behind this service, when both joins resolved.
    pub fn customer(&self) -> Option<&Customer> {
        self.vehicle.resolved()?.customer.resolved()
    }
}

// =============================================================================
// Sales
// =============================================================================

/// An over-the-counter parts sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// Printed invoice number, e.g. "INV-2024-0042".
    pub invoice_number: String,

    /// Walk-in customer name (sales are not linked to customer records).
    pub customer_name: String,

    #[ts(as = "String")]
    pub sale_date: NaiveDate,

    #[serde(default)]
    pub status: String,

    /// Grand total as stored by the backend.
    pub total_amount: Money,
}

/// A line of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub spare_part_id: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// A sale item joined with its inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItemDetail {
    #[serde(flatten)]
    pub item: SaleItem,

    pub spare_part: Related<SparePart>,
}

/// A sale joined with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,

    #[serde(default)]
    pub items: Vec<SaleItemDetail>,
}

// =============================================================================
// Unit Tests
// =============================================================================
