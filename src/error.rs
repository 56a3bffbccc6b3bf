//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::currency_converter::ConversionError;
use crate::services::fee_calculator::FeeError;
use crate::store::StoreError;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The stay does not end after it starts.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("End time must be after start time.")]
    InvalidInterval,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// The requested currency is not in the exchange-rate table.
    ///
    /// Returns HTTP 500 with a generic message; the code is only logged.
    #[error("Rates for {0} can not be found in exchange rates")]
    UnknownCurrency(String),

    /// No document with the requested id.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Document not found")]
    NotFound,

    /// Document store operation failed.
    ///
    /// Returns HTTP 500. The underlying message is echoed to the client.
    #[error("Error {action}: {source}")]
    Store {
        action: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Wrap a store error with the action that was being performed,
    /// e.g. `"saving data"`.
    pub fn store(action: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { action, source }
    }
}

impl From<FeeError> for AppError {
    fn from(error: FeeError) -> Self {
        match error {
            FeeError::InvalidInterval => AppError::InvalidInterval,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<ConversionError> for AppError {
    fn from(error: ConversionError) -> Self {
        match error {
            ConversionError::UnknownCurrency(code) => AppError::UnknownCurrency(code),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// Calculation and validation errors:
/// ```json
/// { "error": "End time must be after start time." }
/// ```
///
/// Record errors:
/// ```json
/// { "message": "Error saving data", "error": "Database error: ..." }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidInterval` → 400 Bad Request
/// - `InvalidRequest` → 400 Bad Request
/// - `UnknownCurrency` → 500 Internal Server Error
/// - `NotFound` → 404 Not Found
/// - `Store` → 500 Internal Server Error
///
/// 4xx responses are logged at `warn`, 5xx at `error`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidInterval | AppError::InvalidRequest(_) => {
                tracing::warn!("Rejected request: {}", self);
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            AppError::UnknownCurrency(ref code) => {
                tracing::error!("Error fetching exchange rates: no rate for {}", code);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Error fetching exchange rates" }),
                )
            }
            AppError::NotFound => {
                tracing::warn!("Document not found");
                (
                    StatusCode::NOT_FOUND,
                    json!({ "message": "Document not found" }),
                )
            }
            AppError::Store { action, ref source } => {
                tracing::error!("Error {}: {:?}", action, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "message": format!("Error {action}"),
                        "error": source.to_string()
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
