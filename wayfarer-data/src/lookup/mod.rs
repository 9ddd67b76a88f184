//! Reference-data lookups used to auto-fill content: country profiles,
//! exchange rates and current weather.
//!
//! Each source performs a single request per call and decodes the JSON
//! body into a `wayfarer-core` record. Nothing is cached.

mod countries;
mod exchange;
mod weather;

#[doc(hidden)]
pub mod test_support;

use thiserror::Error;

use crate::http::TransportError;

pub use countries::{CountrySource, DEFAULT_COUNTRIES_URL, HttpCountryClient};
pub use exchange::{DEFAULT_EXCHANGE_URL, HttpExchangeRateClient, RateSource};
pub use weather::{DEFAULT_WEATHER_URL, HttpWeatherClient, WeatherQuery, WeatherSource};

/// Errors raised by the lookup sources.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// The service has no record for the request.
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing record.
        what: String,
    },
    /// The request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The request or the service's answer was unusable.
    #[error("invalid {what}: {message}")]
    Invalid {
        /// Which value was rejected.
        what: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Map a 404 onto [`LookupError::NotFound`], passing other failures through.
fn not_found_on_404(error: TransportError, what: impl FnOnce() -> String) -> LookupError {
    if error.status() == Some(404) {
        LookupError::NotFound { what: what() }
    } else {
        LookupError::Transport(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(404, true)]
    #[case(500, false)]
    fn only_404_means_not_found(#[case] status: u16, #[case] not_found: bool) {
        let error = TransportError::Http {
            url: "https://a.example".to_owned(),
            status,
            message: "status".to_owned(),
        };
        let mapped = not_found_on_404(error, || "country ZZ".to_owned());
        assert_eq!(matches!(mapped, LookupError::NotFound { .. }), not_found);
    }
}
