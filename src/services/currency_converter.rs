//! Conversion of base-currency amounts using an exchange-rate table.
//!
//! The converter owns its rate table. It starts empty, is filled by
//! [`CurrencyConverter::refresh`] and is read by every request through
//! [`CurrencyConverter::convert`]. Until a refresh succeeds only the base
//! currency can be served.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::models::reservation::BASE_CURRENCY;
use crate::services::exchange_rates::RateProvider;

/// Conversion failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The target currency has no entry in the rate table.
    #[error("Rates for {0} can not be found in exchange rates")]
    UnknownCurrency(String),
}

/// Converts base-currency amounts into other currencies.
#[derive(Debug)]
pub struct CurrencyConverter {
    base: String,
    rates: RwLock<HashMap<String, f64>>,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyConverter {
    /// Converter for [`BASE_CURRENCY`] with an empty rate table.
    pub fn new() -> Self {
        Self {
            base: BASE_CURRENCY.to_string(),
            rates: RwLock::new(HashMap::new()),
        }
    }

    /// Converter pre-loaded with `rates`.
    pub fn with_rates(rates: HashMap<String, f64>) -> Self {
        Self {
            base: BASE_CURRENCY.to_string(),
            rates: RwLock::new(rates),
        }
    }

    pub fn base_currency(&self) -> &str {
        &self.base
    }

    /// Replace the rate table with a fresh pull from `provider`.
    ///
    /// On failure the current table is left untouched.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error.
    pub async fn refresh(&self, provider: &dyn RateProvider) -> anyhow::Result<usize> {
        let rates = provider.fetch_rates().await?;
        let count = rates.len();

        *self.rates.write().unwrap_or_else(PoisonError::into_inner) = rates;

        Ok(count)
    }

    /// Number of currencies currently in the table.
    pub fn rate_count(&self) -> usize {
        self.rates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Convert a base-currency `amount` into `currency`.
    ///
    /// An absent currency or the base currency returns the amount unchanged.
    ///
    /// # Errors
    ///
    /// - `UnknownCurrency`: the code is not in the rate table
    pub fn convert(&self, amount: f64, currency: Option<&str>) -> Result<f64, ConversionError> {
        let currency = match currency {
            None => return Ok(amount),
            Some(code) if code == self.base => return Ok(amount),
            Some(code) => code,
        };

        let rates = self.rates.read().unwrap_or_else(PoisonError::into_inner);
        rates
            .get(currency)
            .map(|rate| amount * rate)
            .ok_or_else(|| ConversionError::UnknownCurrency(currency.to_string()))
    }
}

/// Display symbol for a currency code, `$` when unknown.
pub fn currency_symbol(currency: &str) -> &'static str {
    match currency {
        "EUR" => "€",
        "PLN" => "zł",
        _ => "$",
    }
}
