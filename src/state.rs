//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::services::currency_converter::CurrencyConverter;
use crate::store::DocumentStore;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Document store holding reservations.
    pub store: Arc<dyn DocumentStore>,
    /// Exchange-rate table, refreshed at startup.
    pub converter: Arc<CurrencyConverter>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, converter: Arc<CurrencyConverter>) -> Self {
        Self { store, converter }
    }
}
