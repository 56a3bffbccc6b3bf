//! Fee calculation HTTP handler.
//!
//! - POST /api/calculate - Quote the fee for a stay

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    error::AppError,
    extract::AppJson,
    models::{
        parking_time::ParkingTime,
        reservation::{deserialize_blank_as_none, deserialize_percentage},
    },
    services::pricing::{self, Quote},
    state::AppState,
};

/// Request body for `POST /api/calculate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub start_date_time: ParkingTime,
    pub end_date_time: ParkingTime,

    #[serde(default, deserialize_with = "deserialize_percentage")]
    pub discount_percentage: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub currency: Option<String>,
}

/// Quote the parking fee.
///
/// # Request Body
///
/// ```json
/// {
///   "startDateTime": "2024-06-03T08:00",
///   "endDateTime": "2024-06-03T11:00",
///   "discountPercentage": "10",
///   "currency": "EUR"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{"totalCost": 2.85, "currency": "EUR", "currencySymbol": "€"}`
/// - **Error (400)**: malformed body, end not after start, or discount outside 0..=100
/// - **Error (500)**: no exchange rate for the requested currency
pub async fn calculate(
    State(state): State<AppState>,
    AppJson(request): AppJson<CalculateRequest>,
) -> Result<Json<Quote>, AppError> {
    pricing::validate_discount(request.discount_percentage)?;

    let quote = pricing::quote(
        &state.converter,
        request.start_date_time.naive(),
        request.end_date_time.naive(),
        request.discount_percentage,
        request.currency.as_deref(),
    )?;

    Ok(Json(quote))
}
