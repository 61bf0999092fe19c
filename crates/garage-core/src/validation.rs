//! # Validation Module
//!
//! Input validation utilities for Garage Ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web forms                                                    │
//! │  └── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: garage-core (Rust)                                           │
//! │  └── THIS MODULE: rows are checked before an invoice is built          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Hosted backend                                               │
//! │  └── NOT NULL, foreign key constraints                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use garage_core::validation::{validate_amount, validate_quantity};
//!
//! assert!(validate_amount(1500.5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::{AmountError, ValidationError};
use crate::money::Money;
use crate::words::MAX_WORDS_AMOUNT;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates an amount before it is spelled out.
///
/// ## Rules
/// - Must be finite (no NaN, no infinities)
/// - Must not be negative (`-0.0` is accepted as zero)
/// - Integer part must not exceed `MAX_WORDS_AMOUNT`
///
/// ## Example
/// ```rust
/// use garage_core::validation::validate_amount;
///
/// assert!(validate_amount(0.0).is_ok());
/// assert!(validate_amount(-0.0).is_ok());
/// assert!(validate_amount(-1.0).is_err());
/// assert!(validate_amount(f64::NAN).is_err());
/// ```
pub fn validate_amount(amount: f64) -> Result<(), AmountError> {
    if !amount.is_finite() {
        return Err(AmountError::NotFinite(amount));
    }
    if amount < 0.0 {
        return Err(AmountError::Negative(amount));
    }
    if amount.floor() > MAX_WORDS_AMOUNT as f64 {
        return Err(AmountError::TooLarge {
            value: amount,
            max: MAX_WORDS_AMOUNT,
        });
    }
    Ok(())
}

/// Validates a price or charge on an invoice line.
///
/// ## Rules
/// - Must be non-negative
/// - Zero is allowed (free-of-charge parts under warranty)
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an invoice number.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
pub fn validate_invoice_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "invoice_number".to_string(),
        });
    }

    if number.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "invoice_number".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use garage_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
