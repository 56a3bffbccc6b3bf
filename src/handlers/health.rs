//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Document store backend that answered the ping
    pub store: String,

    /// Number of currencies in the exchange-rate table
    pub exchange_rates: usize,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "store": "postgres",
///   "exchangeRates": 168,
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// An empty rate table is still healthy: only non-base conversions fail.
/// If the store is unreachable, returns the standard store error response.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state
        .store
        .ping()
        .await
        .map_err(AppError::store("checking the document store"))?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        store: state.store.backend().to_string(),
        exchange_rates: state.converter.rate_count(),
        timestamp: Utc::now(),
    }))
}
