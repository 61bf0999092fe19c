//! # Error Types
//!
//! Domain-specific error types for garage-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  garage-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── AmountError      - Amounts that cannot be spelled or converted    │
//! │                                                                         │
//! │  invoice-cli errors (separate crate)                                   │
//! │  └── CliError         - What the operator sees on stderr               │
//! │                                                                         │
//! │  Flow: AmountError / ValidationError → CoreError → CliError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, value)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A joined relation required to build a document is missing.
    ///
    /// ## When This Occurs
    /// - A service row whose vehicle was deleted
    /// - A vehicle whose owner cannot be resolved
    #[error("{entity} not found: {id}")]
    MissingRelation { entity: &'static str, id: String },

    /// A sale draft cannot be turned into an invoice.
    #[error("Invalid invoice {number}: {reason}")]
    InvalidInvoice { number: String, reason: String },

    /// Amount error (wraps AmountError).
    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Amount Error
// =============================================================================

/// Amounts that fall outside the domain of the money conversions.
///
/// ## When This Occurs
/// ```text
/// Invoice grand total (f64 from backend)
///      │
///      ▼
/// to_words(amount)
///      │
///      ├── NaN / ±∞      → NotFinite
///      ├── amount < 0    → Negative
///      ├── amount > 2^53 → TooLarge
///      │
///      ▼
/// "One Thousand Two Hundred Thirty Four Rupees Only"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AmountError {
    /// NaN or infinite input.
    #[error("amount must be a finite number, got {0}")]
    NotFinite(f64),

    /// Negative input (refunds are never spelled out).
    #[error("amount must not be negative, got {0}")]
    Negative(f64),

    /// Integer part beyond the exactly representable range.
    #[error("amount {value} exceeds the maximum of {max}")]
    TooLarge { value: f64, max: u64 },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when row data doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
