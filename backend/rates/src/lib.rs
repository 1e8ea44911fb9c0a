//! USD→PHP exchange rate provider.
//!
//! The rate is a non-critical display value, so this is the one remote call
//! in the system that fails open: any network or parse failure yields the
//! fallback constant instead of an error. Every request re-fetches; there is
//! no cache.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use pondo_core::ExchangeRate;

/// Used whenever the upstream rate source is unreachable or unparseable.
pub const FALLBACK_USD_TO_PHP: f64 = 56.5;

pub struct RateProvider {
    client: Client,
    base_url: String,
}

impl RateProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://open.er-api.com/v6/latest/USD".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Always returns a rate. On upstream failure the fallback constant is
    /// substituted silently, stamped with the current time.
    pub async fn get_exchange_rates(&self) -> ExchangeRate {
        match self.fetch().await {
            Ok(rate) => rate,
            Err(e) => {
                warn!(error = %e, "rate fetch failed, using fallback {FALLBACK_USD_TO_PHP}");
                ExchangeRate {
                    usd_to_php: FALLBACK_USD_TO_PHP,
                    last_updated: Utc::now(),
                }
            }
        }
    }

    async fn fetch(&self) -> Result<ExchangeRate> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .context("rate HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("rate source returned {status}");
        }

        let body: RateResponse = response
            .json()
            .await
            .context("failed to parse rate response")?;
        let usd_to_php = body
            .rates
            .php
            .filter(|r| *r > 0.0)
            .context("rate response missing a positive PHP rate")?;

        debug!(usd_to_php, "fetched live exchange rate");
        Ok(ExchangeRate {
            usd_to_php,
            last_updated: Utc::now(),
        })
    }
}

impl Default for RateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct RateResponse {
    rates: Rates,
}

#[derive(Deserialize)]
struct Rates {
    #[serde(rename = "PHP")]
    php: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_upstream_falls_back() {
        // Nothing listens on this port; the connection is refused
        // immediately and the provider must substitute the constant.
        let provider = RateProvider::new().with_base_url("http://127.0.0.1:9/v6/latest/USD");
        let before = Utc::now();
        let rate = provider.get_exchange_rates().await;
        assert_eq!(rate.usd_to_php, FALLBACK_USD_TO_PHP);
        assert!(rate.last_updated >= before);
        assert!(rate.last_updated <= Utc::now());
    }

    #[test]
    fn parses_upstream_shape() {
        let body: RateResponse =
            serde_json::from_str(r#"{"result":"success","rates":{"USD":1,"PHP":58.21}}"#)
                .unwrap();
        assert_eq!(body.rates.php, Some(58.21));
    }
}
