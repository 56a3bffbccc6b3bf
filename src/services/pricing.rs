//! Fee quotes: the hourly fee in the base currency, converted on request.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::AppError;
use crate::services::currency_converter::{CurrencyConverter, currency_symbol};
use crate::services::fee_calculator::compute_fee;

/// A computed fee in a specific currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub total_cost: f64,
    pub currency: String,
    pub currency_symbol: &'static str,
}

/// Compute the fee for a stay and express it in `currency` (base currency when `None`).
///
/// # Errors
///
/// - `InvalidInterval`: `end <= start`
/// - `UnknownCurrency`: `currency` has no exchange rate
pub fn quote(
    converter: &CurrencyConverter,
    start: NaiveDateTime,
    end: NaiveDateTime,
    discount_percent: Option<f64>,
    currency: Option<&str>,
) -> Result<Quote, AppError> {
    let base_cost = compute_fee(start, end, discount_percent)?;
    let total_cost = converter.convert(base_cost, currency)?;
    let currency = currency.unwrap_or(converter.base_currency()).to_string();

    Ok(Quote {
        total_cost,
        currency_symbol: currency_symbol(&currency),
        currency,
    })
}

/// Reject discounts outside `0..=100`; an absent discount is fine.
///
/// # Errors
///
/// - `InvalidRequest`: the percentage is out of range or not finite
pub fn validate_discount(discount_percent: Option<f64>) -> Result<(), AppError> {
    match discount_percent {
        Some(discount) if !(0.0..=100.0).contains(&discount) => Err(AppError::InvalidRequest(
            "discountPercentage must be between 0 and 100".to_string(),
        )),
        _ => Ok(()),
    }
}
