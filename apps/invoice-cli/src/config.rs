//! CLI configuration module.
//!
//! Configuration is loaded from `GARAGE_*` environment variables with
//! fallback to defaults.

use std::env;

use garage_core::{CurrencyWords, ShopProfile};
use serde::{Deserialize, Serialize};

/// Separator between contact lines in `GARAGE_SHOP_CONTACT`.
const CONTACT_SEPARATOR: char = '|';

/// Invoice CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceConfig {
    /// Letterhead printed on every invoice
    pub shop: ShopProfile,

    /// Label words used when spelling totals
    pub words: CurrencyWords,

    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl InvoiceConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    ///
    /// `load` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let shop_defaults = ShopProfile::default();
        let word_defaults = CurrencyWords::default();

        let shop = ShopProfile {
            name: non_empty(&lookup, "GARAGE_SHOP_NAME")?.unwrap_or(shop_defaults.name),

            // An empty tagline switches the line off
            tagline: match lookup("GARAGE_SHOP_TAGLINE") {
                Some(tagline) if tagline.trim().is_empty() => None,
                Some(tagline) => Some(tagline.trim().to_string()),
                None => shop_defaults.tagline,
            },

            contact_lines: match lookup("GARAGE_SHOP_CONTACT") {
                Some(raw) => raw
                    .split(CONTACT_SEPARATOR)
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect(),
                None => shop_defaults.contact_lines,
            },
        };

        let words = CurrencyWords {
            major_unit: non_empty(&lookup, "GARAGE_MAJOR_UNIT")?
                .unwrap_or(word_defaults.major_unit),
            minor_unit: non_empty(&lookup, "GARAGE_MINOR_UNIT")?
                .unwrap_or(word_defaults.minor_unit),
            qualifier: non_empty(&lookup, "GARAGE_QUALIFIER")?
                .unwrap_or(word_defaults.qualifier),
            zero: non_empty(&lookup, "GARAGE_ZERO_WORD")?.unwrap_or(word_defaults.zero),
        };

        let log_level = lookup("GARAGE_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        if !matches!(
            log_level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(ConfigError::InvalidValue("GARAGE_LOG_LEVEL".to_string()));
        }

        Ok(InvoiceConfig {
            shop,
            words,
            log_level: log_level.to_ascii_lowercase(),
        })
    }
}

/// Reads a label that may be left unset but not set to blank.
fn non_empty<F>(lookup: &F, key: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidValue(key.to_string())),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<InvoiceConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        InvoiceConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.shop, ShopProfile::default());
        assert_eq!(config.words, CurrencyWords::default());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("GARAGE_SHOP_NAME", "  Sri Ganesh Motors "),
            ("GARAGE_SHOP_TAGLINE", ""),
            ("GARAGE_SHOP_CONTACT", "MG Road, Pune | +91 98220 00000 ||"),
            ("GARAGE_MAJOR_UNIT", "Rupee"),
            ("GARAGE_LOG_LEVEL", "DEBUG"),
        ])
        .unwrap();

        assert_eq!(config.shop.name, "Sri Ganesh Motors");
        assert_eq!(config.shop.tagline, None);
        assert_eq!(
            config.shop.contact_lines,
            ["MG Road, Pune", "+91 98220 00000"]
        );
        assert_eq!(config.words.major_unit, "Rupee");
        assert_eq!(config.words.minor_unit, "Paise");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_blank_label_rejected() {
        let err = load(&[("GARAGE_QUALIFIER", "   ")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for GARAGE_QUALIFIER");
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        assert!(matches!(
            load(&[("GARAGE_LOG_LEVEL", "loud")]),
            Err(ConfigError::InvalidValue(key)) if key == "GARAGE_LOG_LEVEL"
        ));
    }
}
