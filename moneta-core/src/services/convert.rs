//! Conversion service - pairwise currency conversion over the rate table
//!
//! All rates are expressed relative to one base currency, so an arbitrary
//! pair converts in two steps: normalize to the base, then scale to the
//! target. Results carry full float precision; rounding to two decimals
//! is the presentation layer's concern.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{normalize_code, CurrencyTable};

/// A conversion failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
    /// Unreachable for a table that passed construction; the table is
    /// data, so the division stays guarded.
    #[error("rate table holds a zero rate for {0}")]
    DivisionByZero(String),
}

/// One fan-out result entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub currency: String,
    pub amount: f64,
}

/// Conversion service over an immutable rate table
pub struct ConversionService {
    table: Arc<CurrencyTable>,
}

impl ConversionService {
    pub fn new(table: Arc<CurrencyTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CurrencyTable {
        &self.table
    }

    /// Convert an amount between two currencies
    ///
    /// Identity conversions return the amount unchanged, so
    /// `convert(x, A, A) == x` holds exactly rather than within float
    /// tolerance.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        let from = normalize_code(from);
        let to = normalize_code(to);

        let from_rate = self
            .table
            .rate(&from)
            .ok_or_else(|| ConversionError::UnknownCurrency(from.clone()))?;
        let to_rate = self
            .table
            .rate(&to)
            .ok_or_else(|| ConversionError::UnknownCurrency(to.clone()))?;

        if from == to {
            return Ok(amount);
        }
        if from_rate == 0.0 {
            return Err(ConversionError::DivisionByZero(from));
        }

        let base_amount = amount / from_rate;
        Ok(base_amount * to_rate)
    }

    /// Convert one amount into each of the given target currencies
    ///
    /// The source currency itself is skipped and unknown targets are
    /// omitted rather than failing the batch. An unknown source is still
    /// an error: there is nothing to fan out from.
    pub fn fan_out(
        &self,
        amount: f64,
        from: &str,
        targets: &[&str],
    ) -> Result<Vec<Conversion>, ConversionError> {
        let from = normalize_code(from);
        if !self.table.contains(&from) {
            return Err(ConversionError::UnknownCurrency(from));
        }

        let mut results = Vec::new();
        for target in targets {
            let target = normalize_code(target);
            if target == from {
                continue;
            }
            if let Ok(converted) = self.convert(amount, &from, &target) {
                results.push(Conversion {
                    currency: target,
                    amount: converted,
                });
            }
        }
        Ok(results)
    }
}
