//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DATABASE_URL` (optional): PostgreSQL connection string for the document store.
///   When missing, documents are kept in process memory.
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `STORE_COLLECTION` (optional): document collection name, defaults to "reservations"
/// - `EXCHANGE_RATES_URL` (optional): rate provider endpoint
/// - `EXCHANGE_RATES_ACCESS_KEY` (optional): sent as the `access_key` query parameter
/// - `EXCHANGE_RATES_TIMEOUT_SECS` (optional): rate fetch timeout, defaults to 10
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_collection")]
    pub store_collection: String,

    #[serde(default = "default_exchange_rates_url")]
    pub exchange_rates_url: String,

    #[serde(default)]
    pub exchange_rates_access_key: Option<String>,

    #[serde(default = "default_exchange_rates_timeout")]
    pub exchange_rates_timeout_secs: u64,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

fn default_collection() -> String {
    "reservations".to_string()
}

fn default_exchange_rates_url() -> String {
    "https://api.exchangeratesapi.io/latest".to_string()
}

fn default_exchange_rates_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into expected types
    /// (e.g. a non-numeric `SERVER_PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }
}
