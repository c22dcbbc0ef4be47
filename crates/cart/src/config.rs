//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CART_STORAGE_DIR` - Directory holding persisted records (default: `.pocket-cart`)
//! - `CART_STORAGE_KEY` - Key of the cart record (default: `cartItems`)
//! - `CART_CURRENCY` - ISO 4217 display currency (default: `USD`)

use std::path::PathBuf;

use pocket_cart_core::CurrencyCode;

use crate::error::ConfigError;
use crate::storage;

/// Default storage key for the cart record.
pub const DEFAULT_STORAGE_KEY: &str = "cartItems";

/// Default directory for file-backed storage.
pub const DEFAULT_STORAGE_DIR: &str = ".pocket-cart";

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Root directory for [`FileStorage`](crate::storage::FileStorage)
    pub storage_dir: PathBuf,
    /// Storage key the cart record is written under
    pub storage_key: String,
    /// Currency used to format totals
    pub currency: CurrencyCode,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            currency: CurrencyCode::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the storage key or currency is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the storage key or currency is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_dir = lookup("CART_STORAGE_DIR").map_or(defaults.storage_dir, PathBuf::from);

        let storage_key = lookup("CART_STORAGE_KEY").unwrap_or(defaults.storage_key);
        storage::validate_key(&storage_key).map_err(|e| {
            ConfigError::InvalidEnvVar("CART_STORAGE_KEY".to_string(), e.to_string())
        })?;

        let currency = match lookup("CART_CURRENCY") {
            Some(code) => code.parse::<CurrencyCode>().map_err(|e| {
                ConfigError::InvalidEnvVar("CART_CURRENCY".to_string(), e.to_string())
            })?,
            None => defaults.currency,
        };

        Ok(Self {
            storage_dir,
            storage_key,
            currency,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "cartItems");
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup(&[
            ("CART_STORAGE_DIR", "/tmp/carts"),
            ("CART_STORAGE_KEY", "guestCart"),
            ("CART_CURRENCY", "brl"),
        ]))
        .unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.storage_key, "guestCart");
        assert_eq!(config.currency, CurrencyCode::BRL);
    }

    #[test]
    fn test_invalid_currency() {
        let result = CartConfig::from_lookup(lookup(&[("CART_CURRENCY", "DOGE")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(name, _)) if name == "CART_CURRENCY"));
    }

    #[test]
    fn test_invalid_key() {
        let result = CartConfig::from_lookup(lookup(&[("CART_STORAGE_KEY", "../escape")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(name, _)) if name == "CART_STORAGE_KEY"));
    }
}
