//! Exchange rates from ExchangeRate-API.

use std::collections::BTreeMap;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use wayfarer_core::{CurrencyCode, ExchangeRates};

use super::{LookupError, not_found_on_404};
use crate::http::{self, ClientBuildError, HttpClientConfig};

/// ExchangeRate-API v4 base URL.
pub const DEFAULT_EXCHANGE_URL: &str = "https://api.exchangerate-api.com/v4";

/// Provides current exchange-rate tables.
#[async_trait(?Send)]
pub trait RateSource {
    /// Latest rates quoted against `base`.
    async fn latest_rates(&self, base: &CurrencyCode) -> Result<ExchangeRates, LookupError>;
}

/// HTTP implementation of [`RateSource`].
#[derive(Debug, Clone)]
pub struct HttpExchangeRateClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpExchangeRateClient {
    /// Client for the public API.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(HttpClientConfig::new(DEFAULT_EXCHANGE_URL))
    }

    /// Client for a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, ClientBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    fn latest_url(&self, base: &CurrencyCode) -> String {
        format!("{}/latest/{base}", self.config.endpoint())
    }
}

#[async_trait(?Send)]
impl RateSource for HttpExchangeRateClient {
    async fn latest_rates(&self, base: &CurrencyCode) -> Result<ExchangeRates, LookupError> {
        let url = self.latest_url(base);
        debug!("fetching exchange rates from {url}");
        let request = self.client.get(&url);
        let raw: RawRates = http::fetch_json(request, &url, self.config.timeout)
            .await
            .map_err(|err| not_found_on_404(err, || format!("rates for {base}")))?;
        raw.into_rates()
    }
}

#[derive(Debug, Deserialize)]
struct RawRates {
    base: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
}

impl RawRates {
    fn into_rates(self) -> Result<ExchangeRates, LookupError> {
        let base = CurrencyCode::parse(&self.base).map_err(|err| LookupError::Invalid {
            what: "rate table base".to_owned(),
            message: err.to_string(),
        })?;
        let rates = self
            .rates
            .into_iter()
            .filter_map(|(code, rate)| match CurrencyCode::parse(&code) {
                Ok(code) => Some((code, rate)),
                Err(_) => {
                    debug!("skipping rate for unrecognised currency {code:?}");
                    None
                }
            })
            .collect();
        Ok(ExchangeRates {
            base,
            date: self.date,
            rates,
        })
    }
}
