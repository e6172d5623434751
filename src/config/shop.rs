//! Shop settings loading from shop.toml
//!
//! The shop's public details (name, address, phone) fill the inspection reminder
//! template; the reminder horizon and mail endpoint tune the reminder commands.
//! Every section except `[shop]` is optional and falls back to defaults.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Days ahead an inspection counts as "upcoming" when nothing is configured.
pub const DEFAULT_HORIZON_DAYS: u32 = 5;

const DEFAULT_CONFIG_PATH: &str = "shop.toml";

/// Configuration structure representing the entire shop.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct ShopConfig {
    /// Public shop details
    pub shop: ShopDetails,
    /// Reminder tuning
    #[serde(default)]
    pub reminders: ReminderConfig,
    /// Mail endpoint settings
    #[serde(default)]
    pub mail: MailConfig,
}

/// Public details of the shop
#[derive(Debug, Clone, Deserialize)]
pub struct ShopDetails {
    /// Trading name, used in mail greetings
    pub name: String,
    /// Street address printed in inspection reminders
    pub address: String,
    /// Contact phone printed in inspection reminders
    pub phone: String,
    /// Default time slot quoted in inspection reminders
    #[serde(default = "default_inspection_time")]
    pub inspection_time: String,
    /// Coupon code offered in birthday mail; the endpoint has its own default
    pub birthday_coupon: Option<String>,
}

/// Reminder tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderConfig {
    /// How many days ahead an inspection counts as upcoming (inclusive)
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

/// Mail endpoint settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailConfig {
    /// URL of the transactional mail endpoint; mail is disabled when absent
    pub endpoint: Option<String>,
}

fn default_inspection_time() -> String {
    "10:00".to_string()
}

const fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

/// Parses shop settings from TOML text.
pub fn parse_config(contents: &str) -> Result<ShopConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse shop config: {e}"),
    })
}

/// Loads shop settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ShopConfig> {
    let path_ref = path.as_ref();
    debug!("Loading shop configuration from {path_ref:?}");
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads shop settings from `SHOP_CONFIG`, or ./shop.toml when unset
pub fn load_default_config() -> Result<ShopConfig> {
    let path = std::env::var("SHOP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [shop]
            name = "Ambikes"
            address = "Rua das Flores 12, Lisboa"
            phone = "+351 210 000 000"
            inspection_time = "09:30"
            birthday_coupon = "BDAY15"

            [reminders]
            horizon_days = 7

            [mail]
            endpoint = "https://mail.example.com/send-email"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.shop.name, "Ambikes");
        assert_eq!(config.shop.inspection_time, "09:30");
        assert_eq!(config.shop.birthday_coupon.as_deref(), Some("BDAY15"));
        assert_eq!(config.reminders.horizon_days, 7);
        assert_eq!(
            config.mail.endpoint.as_deref(),
            Some("https://mail.example.com/send-email")
        );
    }

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_str = r#"
            [shop]
            name = "Ambikes"
            address = "Rua das Flores 12"
            phone = "210 000 000"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.shop.inspection_time, "10:00");
        assert!(config.shop.birthday_coupon.is_none());
        assert_eq!(config.reminders.horizon_days, DEFAULT_HORIZON_DAYS);
        assert!(config.mail.endpoint.is_none());
    }

    #[test]
    fn test_parse_missing_shop_section_fails() {
        let result = parse_config("[reminders]\nhorizon_days = 3\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
