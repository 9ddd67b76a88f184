//! Country profiles from the REST Countries API.

use std::collections::BTreeMap;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use wayfarer_core::{CountryCode, CountryProfile, CurrencyInfo, GeoPoint};

use super::{LookupError, not_found_on_404};
use crate::http::{self, ClientBuildError, HttpClientConfig};

/// REST Countries v3.1 base URL.
pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1";

/// Looks up country profiles by ISO code.
#[async_trait(?Send)]
pub trait CountrySource {
    /// Fetch the profile for `code`.
    async fn fetch_country(&self, code: &CountryCode) -> Result<CountryProfile, LookupError>;
}

/// REST Countries implementation of [`CountrySource`].
#[derive(Debug, Clone)]
pub struct HttpCountryClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpCountryClient {
    /// Client for the public API.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(HttpClientConfig::new(DEFAULT_COUNTRIES_URL))
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

    fn country_url(&self, code: &CountryCode) -> String {
        format!("{}/alpha/{code}", self.config.endpoint())
    }
}

#[async_trait(?Send)]
impl CountrySource for HttpCountryClient {
    async fn fetch_country(&self, code: &CountryCode) -> Result<CountryProfile, LookupError> {
        let url = self.country_url(code);
        debug!("fetching country profile from {url}");
        let request = self.client.get(&url);
        let countries: Vec<RawCountry> = http::fetch_json(request, &url, self.config.timeout)
            .await
            .map_err(|err| not_found_on_404(err, || format!("country {code}")))?;
        countries
            .into_iter()
            .next()
            .map(RawCountry::into_profile)
            .ok_or_else(|| LookupError::NotFound {
                what: format!("country {code}"),
            })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCountry {
    name: RawName,
    cca2: String,
    #[serde(default)]
    cca3: Option<String>,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    subregion: Option<String>,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default)]
    latlng: Vec<f64>,
    #[serde(default)]
    capital_info: Option<RawCapitalInfo>,
    #[serde(default)]
    currencies: BTreeMap<String, RawCurrency>,
    #[serde(default)]
    languages: BTreeMap<String, String>,
    #[serde(default)]
    flags: Option<RawFlags>,
    #[serde(default)]
    timezones: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    common: String,
    #[serde(default)]
    official: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCapitalInfo {
    #[serde(default)]
    latlng: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCurrency {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFlags {
    #[serde(default)]
    png: Option<String>,
}

impl RawCountry {
    fn into_profile(self) -> CountryProfile {
        CountryProfile {
            common_name: self.name.common,
            official_name: self.name.official,
            alpha2: self.cca2,
            alpha3: self.cca3,
            capital: self.capital.into_iter().next(),
            region: self.region,
            subregion: self.subregion,
            population: self.population,
            coordinates: GeoPoint::from_pair(&self.latlng),
            capital_coordinates: self
                .capital_info
                .and_then(|info| GeoPoint::from_pair(&info.latlng)),
            currencies: self
                .currencies
                .into_iter()
                .map(|(code, currency)| CurrencyInfo {
                    code,
                    name: currency.name,
                    symbol: currency.symbol,
                })
                .collect(),
            languages: self.languages,
            flag_url: self.flags.and_then(|flags| flags.png),
            timezones: self.timezones,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FRANCE: &str = r#"[{
        "name": {"common": "France", "official": "French Republic", "nativeName": {}},
        "cca2": "FR",
        "cca3": "FRA",
        "capital": ["Paris"],
        "region": "Europe",
        "subregion": "Western Europe",
        "population": 67391582,
        "latlng": [46.0, 2.0],
        "capitalInfo": {"latlng": [48.87, 2.33]},
        "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
        "languages": {"fra": "French"},
        "flags": {"png": "https://flagcdn.com/w320/fr.png", "svg": "https://flagcdn.com/fr.svg"},
        "timezones": ["UTC-10:00", "UTC+01:00"]
    }]"#;

    #[rstest]
    fn maps_rest_countries_payload() {
        let countries: Vec<RawCountry> = serde_json::from_str(FRANCE).expect("valid payload");
        let profile = countries
            .into_iter()
            .next()
            .map(RawCountry::into_profile)
            .expect("one country");
        assert_eq!(profile.common_name, "France");
        assert_eq!(profile.alpha3.as_deref(), Some("FRA"));
        assert_eq!(profile.capital.as_deref(), Some("Paris"));
        assert_eq!(profile.anchor(), GeoPoint::new(48.87, 2.33));
        assert_eq!(
            profile.currencies,
            vec![CurrencyInfo {
                code: "EUR".to_owned(),
                name: Some("Euro".to_owned()),
                symbol: Some("€".to_owned()),
            }]
        );
        assert_eq!(profile.languages.get("fra").map(String::as_str), Some("French"));
        assert_eq!(
            profile.flag_url.as_deref(),
            Some("https://flagcdn.com/w320/fr.png")
        );
    }

    #[rstest]
    fn sparse_payloads_are_accepted() {
        let countries: Vec<RawCountry> =
            serde_json::from_str(r#"[{"name": {"common": "Antarctica"}, "cca2": "AQ"}]"#)
                .expect("valid payload");
        let profile = countries
            .into_iter()
            .next()
            .map(RawCountry::into_profile)
            .expect("one country");
        assert_eq!(profile.capital, None);
        assert_eq!(profile.anchor(), None);
    }

    #[rstest]
    fn builds_alpha_url() {
        let client = HttpCountryClient::with_config(HttpClientConfig::new(
            "https://countries.example/v3.1/",
        ))
        .expect("client builds");
        let code = CountryCode::parse("jp").expect("valid");
        assert_eq!(
            client.country_url(&code),
            "https://countries.example/v3.1/alpha/JP"
        );
    }
}
