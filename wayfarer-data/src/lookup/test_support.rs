//! In-memory lookup sources for tests.
use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use wayfarer_core::{CountryCode, CountryProfile, CurrencyCode, ExchangeRates, WeatherReport};

use super::{CountrySource, LookupError, RateSource, WeatherQuery, WeatherSource};

/// Stub [`CountrySource`] keyed by alpha-2 code.
///
/// Unknown codes yield [`LookupError::NotFound`]; a configured error
/// overrides every answer.
#[derive(Debug, Default)]
pub struct StubCountrySource {
    profiles: HashMap<String, CountryProfile>,
    error: Option<LookupError>,
    requests: RefCell<Vec<String>>,
}

impl StubCountrySource {
    /// Serve `profile` under its `alpha2` code.
    #[must_use]
    pub fn with_profile(mut self, profile: CountryProfile) -> Self {
        self.profiles
            .insert(profile.alpha2.to_ascii_uppercase(), profile);
        self
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn with_error(mut self, error: LookupError) -> Self {
        self.error = Some(error);
        self
    }

    /// Codes requested so far.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl CountrySource for StubCountrySource {
    async fn fetch_country(&self, code: &CountryCode) -> Result<CountryProfile, LookupError> {
        self.requests.borrow_mut().push(code.to_string());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        self.profiles
            .get(code.as_ref())
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                what: format!("country {code}"),
            })
    }
}

/// Stub [`RateSource`] serving a fixed table for its own base currency.
#[derive(Debug, Clone)]
pub struct StubRateSource {
    rates: ExchangeRates,
}

impl StubRateSource {
    /// Serve `rates`.
    #[must_use]
    pub const fn new(rates: ExchangeRates) -> Self {
        Self { rates }
    }
}

#[async_trait(?Send)]
impl RateSource for StubRateSource {
    async fn latest_rates(&self, base: &CurrencyCode) -> Result<ExchangeRates, LookupError> {
        if *base == self.rates.base {
            Ok(self.rates.clone())
        } else {
            Err(LookupError::NotFound {
                what: format!("rates for {base}"),
            })
        }
    }
}

/// Stub [`WeatherSource`] returning the same report for every query.
#[derive(Debug, Clone)]
pub struct StubWeatherSource {
    report: WeatherReport,
}

impl StubWeatherSource {
    /// Serve `report`.
    #[must_use]
    pub const fn new(report: WeatherReport) -> Self {
        Self { report }
    }
}

#[async_trait(?Send)]
impl WeatherSource for StubWeatherSource {
    async fn current_weather(&self, _query: &WeatherQuery) -> Result<WeatherReport, LookupError> {
        Ok(self.report.clone())
    }
}
