//! Storefront configuration.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{CommerceError, Result};
use crate::money::Currency;

/// Settings for the cart and checkout.
///
/// Every field has a default, so an empty TOML document is a valid config.
///
/// ```toml
/// currency = "NPR"
/// cart_session_key = "cart"
/// min_phone_length = 10
/// default_country = "Nepal"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommerceConfig {
    /// Currency prices and orders are recorded in.
    pub currency: Currency,
    /// Session namespace the cart is stored under.
    pub cart_session_key: String,
    /// Minimum accepted phone number length on the checkout form.
    pub min_phone_length: usize,
    /// Country used when the checkout form leaves it blank.
    pub default_country: String,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            currency: Currency::NPR,
            cart_session_key: "cart".to_string(),
            min_phone_length: 10,
            default_country: "Nepal".to_string(),
        }
    }
}

impl CommerceConfig {
    /// Parse config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| CommerceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.cart_session_key.trim().is_empty() {
            return Err(CommerceError::Config(
                "cart_session_key must not be empty".to_string(),
            ));
        }
        if self.default_country.trim().is_empty() {
            return Err(CommerceError::Config(
                "default_country must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CommerceConfig::from_toml_str("").unwrap();
        assert_eq!(config, CommerceConfig::default());
        assert_eq!(config.currency, Currency::NPR);
        assert_eq!(config.min_phone_length, 10);
    }

    #[test]
    fn test_partial_config() {
        let config = CommerceConfig::from_toml_str(
            r#"
            currency = "USD"
            default_country = "United States"
            "#,
        )
        .unwrap();

        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.default_country, "United States");
        assert_eq!(config.cart_session_key, "cart");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            CommerceConfig::from_toml_str("min_phone_length = \"ten\""),
            Err(CommerceError::Config(_))
        ));
        assert!(matches!(
            CommerceConfig::from_toml_str("cart_session_key = \"  \""),
            Err(CommerceError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CommerceConfig::load("/nonexistent/storefront.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("storefront-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "min_phone_length = 7\n").unwrap();

        let config = CommerceConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.min_phone_length, 7);
    }
}
