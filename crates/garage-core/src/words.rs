//! # Amount in Words
//!
//! Spells a rupee amount out in English words for printed invoices, using
//! the Indian numbering system.
//!
//! ## Indian Grouping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  12,34,56,789.50                                                        │
//! │   │   │  │  │   │                                                       │
//! │   │   │  │  │   └── paise (0-99)      → "and Fifty Paise"               │
//! │   │   │  │  └────── hundreds (0-999)  → "Seven Hundred Eighty Nine"     │
//! │   │   │  └───────── thousands (0-99)  → "Fifty Six Thousand"            │
//! │   │   └──────────── lakhs (0-99)      → "Thirty Four Lakh"              │
//! │   └──────────────── crores (any)      → "Twelve Crore"                  │
//! │                                                                         │
//! │  crore = 10^7   lakh = 10^5   thousand = 10^3   hundred = 10^2         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each group is spelled by the three-digit-group converter and followed by
//! its scale word. A crore count above 999 is itself spelled with Indian
//! grouping, so 1000 crore reads "One Thousand Crore".
//!
//! ## Usage
//! ```rust
//! use garage_core::words::to_words;
//!
//! assert_eq!(to_words(0.0).unwrap(), "Zero");
//! assert_eq!(
//!     to_words(1234.0).unwrap(),
//!     "One Thousand Two Hundred Thirty Four Rupees Only"
//! );
//! assert_eq!(
//!     to_words(1500.50).unwrap(),
//!     "One Thousand Five Hundred Rupees and Fifty Paise Only"
//! );
//! assert!(to_words(-1.0).is_err());
//! ```
//!
//! ## Rounding
//! The paise part is `round((amount - floor(amount)) × 100)`, rounding half
//! away from zero. A result of 100 carries into the rupees (`1.999` reads
//! "Two Rupees Only").

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::AmountError;
use crate::money::Money;
use crate::validation::validate_amount;

/// Largest integer part `to_words` accepts (2^53).
///
/// Beyond this not every integer is representable as `f64`, so the words
/// would describe a different number than the caller meant.
pub const MAX_WORDS_AMOUNT: u64 = 1 << 53;

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

const TEENS: [&str; 10] = [
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const HUNDRED: &str = "Hundred";
const CONJUNCTION: &str = "and";

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

// =============================================================================
// Labels
// =============================================================================

/// The non-numeric words of the output.
///
/// ## Default
/// ```text
/// major_unit: "Rupees"   minor_unit: "Paise"
/// qualifier:  "Only"     zero:       "Zero"
/// ```
///
/// Only the labels are configurable. The grouping rule is always Indian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CurrencyWords {
    /// Word after the integer part ("Rupees").
    pub major_unit: String,

    /// Word after the subunit part ("Paise").
    pub minor_unit: String,

    /// Trailing completeness word ("Only").
    pub qualifier: String,

    /// Returned alone for an amount of exactly zero.
    pub zero: String,
}

impl Default for CurrencyWords {
    fn default() -> Self {
        CurrencyWords {
            major_unit: "Rupees".to_string(),
            minor_unit: "Paise".to_string(),
            qualifier: "Only".to_string(),
            zero: "Zero".to_string(),
        }
    }
}

// =============================================================================
// Converter
// =============================================================================

/// Amount-to-words converter.
///
/// Holds nothing but the label words, so one value can be shared freely
/// between invoice renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountInWords {
    labels: CurrencyWords,
}

impl AmountInWords {
    /// Creates a converter with custom label words.
    pub fn new(labels: CurrencyWords) -> Self {
        AmountInWords { labels }
    }

    /// Spells a decimal rupee amount.
    ///
    /// ## Errors
    /// - [`AmountError::NotFinite`] for NaN and infinities
    /// - [`AmountError::Negative`] for amounts below zero
    /// - [`AmountError::TooLarge`] when the integer part exceeds
    ///   [`MAX_WORDS_AMOUNT`]
    ///
    /// ## Example
    /// ```rust
    /// use garage_core::words::{AmountInWords, CurrencyWords};
    ///
    /// let converter = AmountInWords::new(CurrencyWords {
    ///     major_unit: "Dollars".to_string(),
    ///     minor_unit: "Cents".to_string(),
    ///     ..CurrencyWords::default()
    /// });
    /// assert_eq!(
    ///     converter.convert(15.25).unwrap(),
    ///     "Fifteen Dollars and Twenty Five Cents Only"
    /// );
    /// ```
    pub fn convert(&self, amount: f64) -> Result<String, AmountError> {
        let (rupees, paise) = split_amount(amount)?;
        if amount == 0.0 {
            return Ok(self.zero_word());
        }
        Ok(self.spell(rupees, paise))
    }

    /// Spells an integer paise amount. No floating point is involved.
    ///
    /// ## Example
    /// ```rust
    /// use garage_core::money::Money;
    /// use garage_core::words::AmountInWords;
    ///
    /// let converter = AmountInWords::default();
    /// assert_eq!(
    ///     converter.convert_money(Money::from_paise(1_000_000_000)).unwrap(),
    ///     "One Crore Rupees Only"
    /// );
    /// ```
    pub fn convert_money(&self, money: Money) -> Result<String, AmountError> {
        if money.is_negative() {
            return Err(AmountError::Negative(money.as_amount()));
        }
        if money.is_zero() {
            return Ok(self.zero_word());
        }
        let paise = money.paise() as u64;
        Ok(self.spell(paise / 100, paise % 100))
    }

    fn zero_word(&self) -> String {
        collapse(&[self.labels.zero.as_str()])
    }

    fn spell(&self, rupees: u64, paise: u64) -> String {
        let mut words: Vec<&str> = Vec::with_capacity(24);

        push_indian(&mut words, rupees);
        words.push(&self.labels.major_unit);

        if paise > 0 {
            words.push(CONJUNCTION);
            push_group(&mut words, paise);
            words.push(&self.labels.minor_unit);
        }

        words.push(&self.labels.qualifier);
        collapse(&words)
    }
}

/// Spells a decimal rupee amount with the default labels.
///
/// See [`AmountInWords::convert`].
pub fn to_words(amount: f64) -> Result<String, AmountError> {
    AmountInWords::default().convert(amount)
}

/// Three-digit-group converter: spells `n` in `0..=999`.
///
/// Zero yields no words. Digits above the hundreds place are ignored.
///
/// ## Example
/// ```rust
/// use garage_core::words::group_to_words;
///
/// assert_eq!(group_to_words(0), Vec::<&str>::new());
/// assert_eq!(group_to_words(115), ["One", "Hundred", "Fifteen"]);
/// assert_eq!(group_to_words(990), ["Nine", "Hundred", "Ninety"]);
/// ```
pub fn group_to_words(n: u16) -> Vec<&'static str> {
    let mut words = Vec::with_capacity(4);
    push_group(&mut words, u64::from(n) % THOUSAND);
    words
}

// =============================================================================
// Internals
// =============================================================================

/// Splits a validated amount into rupees and rounded paise.
fn split_amount(amount: f64) -> Result<(u64, u64), AmountError> {
    validate_amount(amount)?;

    let integer = amount.floor();
    let mut rupees = integer as u64;
    let mut paise = ((amount - integer) * 100.0).round() as u64;
    if paise >= 100 {
        rupees += 1;
        paise = 0;
    }
    Ok((rupees, paise))
}

fn push_indian<'a>(words: &mut Vec<&'a str>, value: u64) {
    let crores = value / CRORE;
    let lakhs = (value % CRORE) / LAKH;
    let thousands = (value % LAKH) / THOUSAND;
    let hundreds = value % THOUSAND;

    if crores > 0 {
        // identical to push_group for crores below 1000
        push_indian(words, crores);
        words.push("Crore");
    }
    if lakhs > 0 {
        push_group(words, lakhs);
        words.push("Lakh");
    }
    if thousands > 0 {
        push_group(words, thousands);
        words.push("Thousand");
    }
    push_group(words, hundreds);
}

fn push_group<'a>(words: &mut Vec<&'a str>, n: u64) {
    let mut rest = n;

    if rest >= 100 {
        words.push(ONES[(rest / 100) as usize]);
        words.push(HUNDRED);
        rest %= 100;
    }

    if rest >= 20 {
        words.push(TENS[(rest / 10) as usize]);
        rest %= 10;
    } else if rest >= 10 {
        // teens are atomic
        words.push(TEENS[(rest - 10) as usize]);
        return;
    }

    if rest > 0 {
        words.push(ONES[rest as usize]);
    }
}

/// Joins words with single spaces, dropping empty labels and collapsing
/// whitespace inside multi-word labels.
fn collapse(words: &[&str]) -> String {
    words
        .iter()
        .flat_map(|w| w.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn words(amount: f64) -> String {
        to_words(amount).unwrap()
    }

    #[test]
    fn test_zero_is_special_cased() {
        assert_eq!(words(0.0), "Zero");
        assert_eq!(words(-0.0), "Zero");
        assert_eq!(
            AmountInWords::default()
                .convert_money(Money::zero())
                .unwrap(),
            "Zero"
        );
    }

    #[test]
    fn test_small_amounts() {
        // Plural unit word is kept for one rupee
        assert_eq!(words(1.0), "One Rupees Only");
        assert_eq!(words(9.0), "Nine Rupees Only");
        assert_eq!(words(15.0), "Fifteen Rupees Only");
        assert_eq!(words(20.0), "Twenty Rupees Only");
        assert_eq!(words(42.0), "Forty Two Rupees Only");
        assert_eq!(words(100.0), "One Hundred Rupees Only");
        assert_eq!(words(110.0), "One Hundred Ten Rupees Only");
        assert_eq!(words(999.0), "Nine Hundred Ninety Nine Rupees Only");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(
            words(1234.0),
            "One Thousand Two Hundred Thirty Four Rupees Only"
        );
        assert_eq!(words(1000.0), "One Thousand Rupees Only");
        assert_eq!(words(15_000.0), "Fifteen Thousand Rupees Only");
        assert_eq!(words(20_005.0), "Twenty Thousand Five Rupees Only");
    }

    #[test]
    fn test_lakh_boundary() {
        assert_eq!(
            words(99_999.0),
            "Ninety Nine Thousand Nine Hundred Ninety Nine Rupees Only"
        );
        assert_eq!(words(100_000.0), "One Lakh Rupees Only");
        assert_eq!(words(1_500_000.0), "Fifteen Lakh Rupees Only");
        assert_eq!(
            words(250_075.0),
            "Two Lakh Fifty Thousand Seventy Five Rupees Only"
        );
    }

    #[test]
    fn test_crore_boundary() {
        assert_eq!(
            words(9_999_999.0),
            "Ninety Nine Lakh Ninety Nine Thousand Nine Hundred Ninety Nine Rupees Only"
        );
        assert_eq!(words(10_000_000.0), "One Crore Rupees Only");
        assert_eq!(words(150_000_000.0), "Fifteen Crore Rupees Only");
        assert_eq!(
            words(123_456_789.0),
            "Twelve Crore Thirty Four Lakh Fifty Six Thousand Seven Hundred Eighty Nine Rupees Only"
        );
    }

    #[test]
    fn test_crore_count_above_999() {
        assert_eq!(words(1e10), "One Thousand Crore Rupees Only");
        assert_eq!(words(1e12), "One Lakh Crore Rupees Only");
        assert_eq!(
            words(99_900_000_000.0),
            "Nine Thousand Nine Hundred Ninety Crore Rupees Only"
        );
    }

    #[test]
    fn test_paise_clause() {
        assert_eq!(
            words(1500.50),
            "One Thousand Five Hundred Rupees and Fifty Paise Only"
        );
        assert_eq!(
            words(11.11),
            "Eleven Rupees and Eleven Paise Only"
        );
        assert_eq!(words(2.05), "Two Rupees and Five Paise Only");
    }

    #[test]
    fn test_fraction_only_amounts() {
        assert_eq!(words(0.5), "Rupees and Fifty Paise Only");
        // 0.29 * 100 is 28.999999999999996 before rounding
        assert_eq!(words(0.29), "Rupees and Twenty Nine Paise Only");
        // Rounds to zero paise but is not exactly zero
        assert_eq!(words(0.001), "Rupees Only");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 0.125 is exact in binary, so this is a true half
        assert_eq!(words(0.125), "Rupees and Thirteen Paise Only");
        // 1.005 is stored just below the half and rounds down
        assert_eq!(words(1.005), "One Rupees Only");
    }

    #[test]
    fn test_paise_carry_into_rupees() {
        assert_eq!(words(1.999), "Two Rupees Only");
        assert_eq!(words(99_999.996), "One Lakh Rupees Only");
    }

    #[test]
    fn test_rejects_out_of_domain() {
        assert!(matches!(to_words(-1.0), Err(AmountError::Negative(_))));
        assert!(matches!(to_words(-0.01), Err(AmountError::Negative(_))));
        assert!(matches!(to_words(f64::NAN), Err(AmountError::NotFinite(_))));
        assert!(matches!(
            to_words(f64::INFINITY),
            Err(AmountError::NotFinite(_))
        ));
        assert!(matches!(
            to_words(f64::NEG_INFINITY),
            Err(AmountError::NotFinite(_))
        ));
        assert!(matches!(
            to_words(1e17),
            Err(AmountError::TooLarge { .. })
        ));
        assert!(to_words(MAX_WORDS_AMOUNT as f64).is_ok());
        assert!(matches!(
            AmountInWords::default().convert_money(Money::from_paise(-1)),
            Err(AmountError::Negative(_))
        ));
    }

    #[test]
    fn test_same_input_same_output() {
        let converter = AmountInWords::default();
        let first = converter.convert(98_765.43).unwrap();
        for _ in 0..3 {
            assert_eq!(converter.convert(98_765.43).unwrap(), first);
        }
    }

    #[test]
    fn test_money_path_matches_float_path() {
        let converter = AmountInWords::default();
        for amount in [0.0, 0.5, 1.0, 15.0, 1234.0, 1500.5, 99_999.0, 100_000.0, 10_000_000.0, 11.11] {
            let money = Money::from_amount(amount).unwrap();
            assert_eq!(
                converter.convert_money(money).unwrap(),
                converter.convert(amount).unwrap(),
                "amount {amount}"
            );
        }
    }

    #[test]
    fn test_money_path_beyond_float_range() {
        let converter = AmountInWords::default();
        let text = converter.convert_money(Money::from_paise(i64::MAX)).unwrap();
        assert!(text.starts_with("Nine Hundred Twenty Two Crore Thirty Three Lakh"));
        assert!(text.ends_with("Rupees and Seven Paise Only"));
    }

    #[test]
    fn test_output_whitespace() {
        for amount in [0.0, 0.5, 7.0, 100.0, 1234.56, 10_000_000.0, 1e12] {
            let text = words(amount);
            assert_eq!(text, text.trim());
            assert!(!text.contains("  "), "double space in {text:?}");
        }
    }

    #[test]
    fn test_custom_labels_are_collapsed() {
        let converter = AmountInWords::new(CurrencyWords {
            major_unit: "  Indian   Rupees ".to_string(),
            minor_unit: "Paise".to_string(),
            qualifier: String::new(),
            zero: " Nil ".to_string(),
        });
        assert_eq!(converter.convert(5.0).unwrap(), "Five Indian Rupees");
        assert_eq!(converter.convert(0.0).unwrap(), "Nil");
    }

    #[test]
    fn test_group_to_words() {
        assert!(group_to_words(0).is_empty());
        assert_eq!(group_to_words(7), ["Seven"]);
        assert_eq!(group_to_words(13), ["Thirteen"]);
        assert_eq!(group_to_words(40), ["Forty"]);
        assert_eq!(group_to_words(101), ["One", "Hundred", "One"]);
        assert_eq!(group_to_words(999), ["Nine", "Hundred", "Ninety", "Nine"]);
    }

    #[test]
    fn test_labels_serialize_camel_case() {
        let json = serde_json::to_value(CurrencyWords::default()).unwrap();
        assert_eq!(json["majorUnit"], "Rupees");
        assert_eq!(json["minorUnit"], "Paise");
    }
}
