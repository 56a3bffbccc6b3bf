//! Parking Fee Service - Main Application Entry Point
//!
//! This is a REST API server for a parking billing form. It quotes parking fees
//! from a time interval (weekday/weekend hourly rates, optional discount and
//! currency conversion) and keeps reservation records in a document store.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Document store**: PostgreSQL JSONB via sqlx, or in-process memory
//! - **Exchange rates**: pulled once at startup over HTTP with reqwest
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Select the document store (PostgreSQL when `DATABASE_URL` is set) and run migrations
//! 3. Start the exchange-rate refresh in the background
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::services::currency_converter::CurrencyConverter;
use crate::services::exchange_rates::HttpRateProvider;
use crate::state::AppState;
use crate::store::{
    DocumentStore, memory::MemoryDocumentStore, postgres::PostgresDocumentStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url, config.database_max_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Arc::new(PostgresDocumentStore::new(pool, &config.store_collection))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, reservations are kept in memory");
            Arc::new(MemoryDocumentStore::new())
        }
    };
    tracing::info!("Document store ready ({})", store.backend());

    // Requests arriving before the refresh completes can only use the base currency
    let converter = Arc::new(CurrencyConverter::new());
    let provider = HttpRateProvider::new(
        &config.exchange_rates_url,
        config.exchange_rates_access_key.as_deref(),
        Duration::from_secs(config.exchange_rates_timeout_secs),
    )?;
    tokio::spawn({
        let converter = Arc::clone(&converter);
        async move {
            match converter.refresh(&provider).await {
                Ok(count) => tracing::info!("Loaded {} exchange rates", count),
                Err(e) => tracing::error!("Failed to load exchange rates: {:?}", e),
            }
        }
    });

    let app = routes::build_router(AppState::new(store, converter));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
