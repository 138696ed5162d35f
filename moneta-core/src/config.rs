//! Configuration management
//!
//! Settings live in settings.json inside the data directory:
//! ```json
//! {
//!   "app": { ... },
//!   "baseCurrency": "USD",
//!   "rates": { "EUR": 0.93 }
//! }
//! ```
//! The `rates` section overrides or extends the shipped currency table.
//! A missing or malformed file falls back to defaults, never fatal.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::CurrencyTable;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    base_currency: Option<String>,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Moneta configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub base_currency: Option<String>,
    pub rate_overrides: BTreeMap<String, f64>,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the data directory
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        // Unreadable and malformed settings both fall back to defaults;
        // settings problems are never fatal.
        let raw: SettingsFile = std::fs::read_to_string(&settings_path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();

        Ok(Self {
            base_currency: raw.base_currency.clone(),
            rate_overrides: raw.rates.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory
    /// Preserves settings fields the CLI doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.base_currency = self.base_currency.clone();
        settings.rates = self.rate_overrides.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Build the currency table: shipped rates with any overrides applied
    ///
    /// Overrides must still satisfy the positive-rate invariant; an
    /// invalid override is a configuration error.
    pub fn currency_table(&self) -> Result<CurrencyTable> {
        let shipped = CurrencyTable::shipped();
        let base = self
            .base_currency
            .clone()
            .unwrap_or_else(|| shipped.base().to_string());

        let mut rates: BTreeMap<String, f64> = shipped
            .entries()
            .map(|(code, rate)| (code.to_string(), rate))
            .collect();
        for (code, rate) in &self.rate_overrides {
            rates.insert(code.clone(), *rate);
        }

        CurrencyTable::new(base, rates)
            .map_err(|e| anyhow::anyhow!("invalid rate configuration: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_settings_uses_shipped_table() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        let table = config.currency_table().unwrap();
        assert_eq!(table.base(), "USD");
        assert_eq!(table.rate("EUR"), Some(0.91));
    }

    #[test]
    fn test_rate_overrides_apply() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"rates": {"EUR": 0.93, "SEK": 10.5}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        let table = config.currency_table().unwrap();
        assert_eq!(table.rate("EUR"), Some(0.93));
        assert_eq!(table.rate("SEK"), Some(10.5));
        // Untouched shipped rates survive
        assert_eq!(table.rate("GBP"), Some(0.79));
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"rates": {"EUR": -1.0}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert!(config.currency_table().is_err());
    }

    #[test]
    fn test_malformed_settings_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ nope").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert!(config.rate_overrides.is_empty());
    }

    #[test]
    fn test_unreadable_settings_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        // A directory at the settings path makes the read itself fail
        std::fs::create_dir(dir.path().join("settings.json")).unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert!(config.rate_overrides.is_empty());
        assert_eq!(config.currency_table().unwrap().rate("EUR"), Some(0.91));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::load(dir.path()).unwrap();
        config.rate_overrides.insert("EUR".to_string(), 0.95);
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.rate_overrides.get("EUR"), Some(&0.95));
    }
}
