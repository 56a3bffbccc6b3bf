//! Exchange-rate provider client.
//!
//! Pulls the full currency → rate mapping from an HTTP endpoint shaped like
//! exchangeratesapi.io `latest`:
//!
//! ```json
//! { "success": true, "base": "USD", "rates": { "EUR": 0.92, "PLN": 3.95 } }
//! ```
//!
//! Tables quoted against another base (the public endpoint uses EUR) are
//! rebased so every rate is relative to [`BASE_CURRENCY`].

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::reservation::BASE_CURRENCY;

/// Source of a currency → rate table.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<HashMap<String, f64>>;
}

/// [`RateProvider`] backed by a plain HTTP JSON endpoint.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    client: reqwest::Client,
    url: url::Url,
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Option<String>,
    rates: Option<HashMap<String, f64>>,
}

impl HttpRateProvider {
    /// Build a provider for `endpoint`, adding `access_key` as a query parameter when set.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP client cannot be built.
    pub fn new(endpoint: &str, access_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut url = url::Url::parse(endpoint)
            .with_context(|| format!("Invalid exchange rate URL: {endpoint}"))?;
        if let Some(key) = access_key {
            url.query_pairs_mut().append_pair("access_key", key);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rates(&self) -> Result<HashMap<String, f64>> {
        tracing::debug!("Requesting exchange rates from {}", self.url.path());

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {}", e))?
            .error_for_status()
            .map_err(|e| anyhow!("Rate provider returned an error: {}", e))?;

        let data = response.json::<LatestRatesResponse>().await?;

        let rates = data
            .rates
            .ok_or_else(|| anyhow!("Rate provider response contained no rates"))?;

        match data.base {
            Some(base) if base != BASE_CURRENCY => rebase(&base, rates),
            _ => Ok(rates),
        }
    }
}

/// Re-express `rates`, quoted per unit of `base`, per unit of [`BASE_CURRENCY`].
fn rebase(base: &str, rates: HashMap<String, f64>) -> Result<HashMap<String, f64>> {
    let base_rate = rates
        .get(BASE_CURRENCY)
        .copied()
        .filter(|rate| *rate > 0.0)
        .ok_or_else(|| anyhow!("Rates based on {} carry no {} rate", base, BASE_CURRENCY))?;

    let mut rebased: HashMap<String, f64> = rates
        .into_iter()
        .map(|(code, rate)| (code, rate / base_rate))
        .collect();
    rebased
        .entry(base.to_string())
        .or_insert(1.0 / base_rate);

    Ok(rebased)
}
