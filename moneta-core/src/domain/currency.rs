//! Currency table domain model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Immutable table of exchange rates relative to a base currency
///
/// Each rate is "units of this currency per 1 unit of the base". The table
/// is constructed once at startup and passed explicitly to the conversion
/// service; there is no ambient global state. Invariant: every rate > 0,
/// enforced at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyTable {
    base: String,
    rates: BTreeMap<String, f64>,
}

impl CurrencyTable {
    /// Build a table from (code, rate-to-base) pairs
    ///
    /// Codes are normalized to uppercase. Non-positive or non-finite rates
    /// are rejected.
    pub fn new(
        base: impl Into<String>,
        rates: impl IntoIterator<Item = (String, f64)>,
    ) -> Result<Self, String> {
        let base = normalize_code(&base.into());
        let mut normalized = BTreeMap::new();
        for (code, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(format!("rate for {} must be a positive number", code));
            }
            normalized.insert(normalize_code(&code), rate);
        }
        if !normalized.contains_key(&base) {
            return Err(format!("base currency {} missing from table", base));
        }
        Ok(Self { base, rates: normalized })
    }

    /// The table shipped with the application (base = USD)
    pub fn shipped() -> Self {
        let rates = [
            ("USD", 1.00),
            ("EUR", 0.91),
            ("GBP", 0.79),
            ("JPY", 148.42),
            ("AUD", 1.52),
            ("CAD", 1.35),
            ("CHF", 0.87),
            ("CNY", 7.19),
            ("INR", 83.12),
            ("NZD", 1.64),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), rate))
        .collect();

        // Compiled-in values; already satisfy the construction invariant
        Self {
            base: "USD".to_string(),
            rates,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Look up the rate-to-base for a code (case-insensitive)
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(&normalize_code(code)).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(&normalize_code(code))
    }

    /// All codes in the table, sorted
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    /// All (code, rate) entries, sorted by code
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Normalize a currency code to uppercase
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_normalization() {
        assert_eq!(normalize_code("usd"), "USD");
        assert_eq!(normalize_code(" eur "), "EUR");
    }

    #[test]
    fn test_shipped_table() {
        let table = CurrencyTable::shipped();
        assert_eq!(table.base(), "USD");
        assert_eq!(table.len(), 10);
        assert_eq!(table.rate("usd"), Some(1.0));
        assert_eq!(table.rate("JPY"), Some(148.42));
        assert!(table.rate("XXX").is_none());
    }

    #[test]
    fn test_rejects_non_positive_rates() {
        let rates = vec![("USD".to_string(), 1.0), ("BAD".to_string(), 0.0)];
        assert!(CurrencyTable::new("USD", rates).is_err());

        let rates = vec![("USD".to_string(), 1.0), ("BAD".to_string(), -1.5)];
        assert!(CurrencyTable::new("USD", rates).is_err());
    }

    #[test]
    fn test_rejects_missing_base() {
        let rates = vec![("EUR".to_string(), 0.91)];
        assert!(CurrencyTable::new("USD", rates).is_err());
    }
}
