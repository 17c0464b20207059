//! Exchange-rate lookup behind a trait so handlers can be tested without
//! calling the external rate provider.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum RateError {
    Unavailable(String),
    InvalidCurrency(String),
}

impl std::error::Error for RateError {}

impl fmt::Display for RateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateError::Unavailable(e) => write!(f, "RateError: Rate provider unavailable: {e}"),
            RateError::InvalidCurrency(c) => write!(f, "RateError: Invalid currency: {c}"),
        }
    }
}

#[async_trait]
pub trait RateLookup: Send + Sync {
    /// Units of `to` per one unit of `from`.
    async fn rate(&self, from: &str, to: &str) -> Result<f64, RateError>;
}

pub fn convert_cents(amount_cents: i64, rate: f64) -> i64 {
    (amount_cents as f64 * rate).round() as i64
}

#[derive(Debug, Deserialize)]
struct RateResponse {
    success: bool,
    result: Option<f64>,
}

/// Client for an exchangerate.host-compatible conversion endpoint.
pub struct ExchangeRateApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExchangeRateApi {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, RateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RateError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl RateLookup for ExchangeRateApi {
    async fn rate(&self, from: &str, to: &str) -> Result<f64, RateError> {
        // Converting an amount of 1 yields the unit rate.
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("from", from),
                ("to", to),
                ("amount", "1"),
                ("access_key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| RateError::Unavailable(e.to_string()))?;

        let body = response
            .json::<RateResponse>()
            .await
            .map_err(|e| RateError::Unavailable(e.to_string()))?;

        if !body.success {
            return Err(RateError::InvalidCurrency(format!("{from}->{to}")));
        }

        body.result
            .ok_or_else(|| RateError::Unavailable(String::from("Provider returned no result")))
    }
}

/// Fixed rates for tests and for running without a provider account.
#[derive(Default)]
pub struct MockRates {
    rates: HashMap<(String, String), f64>,
}

impl MockRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.rates.insert((from.to_owned(), to.to_owned()), rate);
        self
    }
}

#[async_trait]
impl RateLookup for MockRates {
    async fn rate(&self, from: &str, to: &str) -> Result<f64, RateError> {
        if from == to {
            return Ok(1.0);
        }

        self.rates
            .get(&(from.to_owned(), to.to_owned()))
            .copied()
            .ok_or_else(|| RateError::InvalidCurrency(format!("{from}->{to}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cents_rounds_to_nearest_cent() {
        assert_eq!(convert_cents(10_000, 1.27), 12_700);
        assert_eq!(convert_cents(333, 0.5), 167);
        assert_eq!(convert_cents(0, 1.27), 0);
    }

    #[test]
    fn test_mock_rates() {
        let rates = MockRates::new().with_rate("GBP", "USD", 1.27);

        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        assert_eq!(rt.block_on(rates.rate("GBP", "USD")).unwrap(), 1.27);
        assert_eq!(rt.block_on(rates.rate("GBP", "GBP")).unwrap(), 1.0);
        assert!(rt.block_on(rates.rate("GBP", "JPY")).is_err());
    }
}
