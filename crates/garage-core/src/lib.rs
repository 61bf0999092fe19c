//! # garage-core: Pure Business Logic for Garage Ledger
//!
//! This crate turns rows from the workshop's hosted backend into invoices
//! and report summaries, and spells invoice totals out in words using the
//! Indian numbering system. Nothing in here performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Garage Ledger Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Hosted backend (REST)                          │   │
//! │  │    customers, vehicles, services, sales, spare_parts           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON rows                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               apps/invoice-cli (garage-invoice)                 │   │
//! │  │    words, invoice, report, history, invoice-number, config     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ garage-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   words   │  │   money   │  │  invoice  │  │  report   │  │   │
//! │  │   │  Rupees…  │  │   Money   │  │  Invoice  │  │  Summary  │  │   │
//! │  │   │  Only     │  │  (paise)  │  │  render   │  │  Dashboard│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`words`] - Amount in words, Indian grouping (crore, lakh, thousand)
//! - [`money`] - Money type with integer paise arithmetic
//! - [`types`] - Backend rows and their typed joins
//! - [`invoice`] - Sale and service invoices, plain-text rendering
//! - [`draft`] - Sale and service forms, invoice number generation
//! - [`report`] - Dashboard, reports and per-vehicle service history
//! - [`search`] - Search box filters
//! - [`validation`] - Input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use garage_core::words::to_words;
//!
//! assert_eq!(
//!     to_words(150_000.25).unwrap(),
//!     "One Lakh Fifty Thousand Rupees and Twenty Five Paise Only"
//! );
//! assert_eq!(to_words(0.0).unwrap(), "Zero");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod invoice;
pub mod money;
pub mod report;
pub mod search;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{generate_invoice_number, NewSale, NewService, SaleDraft, ServiceDraft};
pub use error::{AmountError, CoreError, CoreResult, ValidationError};
pub use invoice::{render_text, Invoice, ShopProfile};
pub use money::Money;
pub use report::{DashboardStats, ReportInput, ReportSummary, VehicleHistory};
pub use types::*;
pub use words::{to_words, AmountInWords, CurrencyWords};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Label shown wherever a joined record could not be resolved.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Maximum quantity of a single invoice line
///
/// ## Business Reason
/// Catches typos such as 10000 instead of 10 before they reach a printed
/// invoice.
pub const MAX_LINE_QUANTITY: i64 = 9_999;
