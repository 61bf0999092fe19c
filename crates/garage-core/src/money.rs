//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The hosted backend hands us decimals as JSON numbers:                  │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    Every row value is rounded to paise ONCE, at the edge               │
//! │    (Money::from_amount), and all sums are exact integer math after     │
//! │    that.                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use garage_core::money::Money;
//!
//! let price = Money::from_paise(109_950); // ₹1099.50
//! let doubled = price * 2;
//! assert_eq!(doubled.paise(), 219_900);
//!
//! // Values coming from the backend are decimals
//! let total = Money::from_amount(1234.5).unwrap();
//! assert_eq!(total.to_string(), "₹1234.50");
//! ```
//!
//! ## Serialization
//! On the wire `Money` is a decimal rupee amount (`1234.5`), matching the
//! backend's numeric columns. Internally it is always whole paise.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::AmountError;
use crate::words::AmountInWords;

/// Largest rupee amount `from_amount` accepts.
///
/// Paise above 2^53 are no longer exactly representable as `f64`.
pub const MAX_MONEY_AMOUNT: u64 = (1u64 << 53) / 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde as decimal**: Rows round-trip through the backend unchanged
///
/// ## Where Money is Used
/// ```text
/// SparePart.price ──► SaleItem.unit_price ──► SaleItem.subtotal
///                                                   │
/// Service.labor_charges ───────────────────────────┤
///                                                   ▼
///                                        Invoice::grand_total()
///                                                   │
///                                                   ▼
///                                  "… Rupees and Fifty Paise Only"
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(try_from = "f64", into = "f64")]
#[ts(export)]
pub struct Money(#[ts(as = "f64")] i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use garage_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Converts a decimal rupee amount to paise.
    ///
    /// Rounds half away from zero, so `0.125` becomes 13 paise. This is the
    /// only place a float enters the money path.
    ///
    /// ## Example
    /// ```rust
    /// use garage_core::money::Money;
    ///
    /// assert_eq!(Money::from_amount(0.29).unwrap().paise(), 29);
    /// assert_eq!(Money::from_amount(-12.5).unwrap().paise(), -1250);
    /// assert!(Money::from_amount(f64::NAN).is_err());
    /// ```
    pub fn from_amount(amount: f64) -> Result<Self, AmountError> {
        if !amount.is_finite() {
            return Err(AmountError::NotFinite(amount));
        }
        if amount.abs() > MAX_MONEY_AMOUNT as f64 {
            return Err(AmountError::TooLarge {
                value: amount,
                max: MAX_MONEY_AMOUNT,
            });
        }
        Ok(Money((amount * 100.0).round() as i64))
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    ///
    /// ## Example
    /// ```rust
    /// use garage_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(1099).rupees(), 10);
    /// assert_eq!(Money::from_paise(-550).rupees(), -5);
    /// ```
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as a decimal rupee amount (for display and charts).
    #[inline]
    pub fn as_amount(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use garage_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(45_000); // ₹450.00 brake pad
    /// assert_eq!(unit_price.multiply_quantity(4).paise(), 180_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Spells the amount out for printed invoices.
    ///
    /// ## Example
    /// ```rust
    /// use garage_core::money::Money;
    ///
    /// let total = Money::from_paise(150_050);
    /// assert_eq!(
    ///     total.in_words().unwrap(),
    ///     "One Thousand Five Hundred Rupees and Fifty Paise Only"
    /// );
    /// ```
    pub fn in_words(&self) -> Result<String, AmountError> {
        AmountInWords::default().convert_money(*self)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with the rupee sign and two decimals.
///
/// ## Note
/// Digit grouping is left to the frontend.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            self.rupees().abs(),
            self.paise_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl TryFrom<f64> for Money {
    type Error = AmountError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Money::from_amount(amount)
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> Self {
        money.as_amount()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_from_amount_rounds_to_paise() {
        assert_eq!(Money::from_amount(1500.5).unwrap().paise(), 150_050);
        // 0.29 * 100 = 28.999999999999996 in binary floating point
        assert_eq!(Money::from_amount(0.29).unwrap().paise(), 29);
        assert_eq!(Money::from_amount(0.125).unwrap().paise(), 13);
        assert_eq!(Money::from_amount(-0.125).unwrap().paise(), -13);
    }

    #[test]
    fn test_from_amount_rejects_out_of_domain() {
        assert!(matches!(
            Money::from_amount(f64::NAN),
            Err(AmountError::NotFinite(_))
        ));
        assert!(Money::from_amount(f64::NEG_INFINITY).is_err());
        assert!(matches!(
            Money::from_amount(1e15),
            Err(AmountError::TooLarge { .. })
        ));
        assert!(Money::from_amount(MAX_MONEY_AMOUNT as f64).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_paise(500).to_string(), "₹5.00");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_paise(100);
        assert_eq!(c.paise(), 1400);
    }

    #[test]
    fn test_sum() {
        let items = [
            Money::from_paise(100),
            Money::from_paise(250),
            Money::from_paise(5),
        ];
        let by_ref: Money = items.iter().sum();
        let by_value: Money = items.into_iter().sum();
        assert_eq!(by_ref.paise(), 355);
        assert_eq!(by_value, by_ref);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_paise(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_serde_as_decimal() {
        let money: Money = serde_json::from_str("1234.5").unwrap();
        assert_eq!(money.paise(), 123_450);
        assert_eq!(serde_json::to_string(&money).unwrap(), "1234.5");

        let whole: Money = serde_json::from_str("700").unwrap();
        assert_eq!(whole.paise(), 70_000);
    }

    #[test]
    fn test_in_words() {
        assert_eq!(
            Money::from_paise(123_400).in_words().unwrap(),
            "One Thousand Two Hundred Thirty Four Rupees Only"
        );
        assert!(Money::from_paise(-100).in_words().is_err());
    }
}
