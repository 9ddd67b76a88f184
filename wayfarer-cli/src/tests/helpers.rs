//! Stub source builders shared by the CLI tests.

use crate::reference::ReferenceBuilder;
use crate::venues::{VenueSources, VenueSourcesBuilder, VenuesConfig};
use crate::CliError;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use tempfile::TempDir;
use wayfarer_core::{
    CountryProfile, CurrencyCode, ElementType, ExchangeRates, GeoPoint, OsmElement, WeatherReport,
};
use wayfarer_data::http::TransportError;
use wayfarer_data::lookup::test_support::{
    StubCountrySource, StubRateSource, StubWeatherSource,
};
use wayfarer_data::lookup::{CountrySource, RateSource, WeatherSource};
use wayfarer_data::overpass::test_support::StubOverpassSource;
use wayfarer_data::wikidata::test_support::StubImageResolver;

/// Builds fresh stub sources for every invocation.
#[derive(Debug, Clone, Default)]
pub(super) struct StubVenueSourcesBuilder {
    pub(super) country_elements: Vec<OsmElement>,
    pub(super) radius_elements: Vec<OsmElement>,
    pub(super) overpass_error: Option<TransportError>,
    pub(super) images: Vec<(String, String)>,
    pub(super) profile: Option<CountryProfile>,
}

impl VenueSourcesBuilder for StubVenueSourcesBuilder {
    fn build(&self, _config: &VenuesConfig) -> Result<VenueSources, CliError> {
        let overpass = match &self.overpass_error {
            Some(error) => StubOverpassSource::with_error(error.clone()),
            None => StubOverpassSource::with_elements(self.country_elements.clone()),
        }
        .then_elements(self.radius_elements.clone());
        let images = self
            .images
            .iter()
            .fold(StubImageResolver::default(), |resolver, (id, url)| {
                resolver.with_image(id, url)
            });
        let countries = self
            .profile
            .iter()
            .cloned()
            .fold(StubCountrySource::default(), StubCountrySource::with_profile);
        Ok(VenueSources {
            overpass: Box::new(overpass),
            images: Box::new(images),
            countries: Box::new(countries),
        })
    }
}

/// Serves canned reference data.
#[derive(Debug, Clone)]
pub(super) struct StubReferenceBuilder {
    pub(super) profile: CountryProfile,
    pub(super) rates: ExchangeRates,
    pub(super) weather: WeatherReport,
}

impl Default for StubReferenceBuilder {
    fn default() -> Self {
        Self {
            profile: sample_profile(),
            rates: sample_rates(),
            weather: WeatherReport {
                location: "Lisbon".to_owned(),
                coordinates: GeoPoint::new(38.72, -9.14),
                temperature_c: 21.5,
                ..WeatherReport::default()
            },
        }
    }
}

impl ReferenceBuilder for StubReferenceBuilder {
    fn countries(&self, _base_url: &str) -> Result<Box<dyn CountrySource>, CliError> {
        Ok(Box::new(
            StubCountrySource::default().with_profile(self.profile.clone()),
        ))
    }

    fn rates(&self, _base_url: &str) -> Result<Box<dyn RateSource>, CliError> {
        Ok(Box::new(StubRateSource::new(self.rates.clone())))
    }

    fn weather(&self, _base_url: &str, _api_key: &str) -> Result<Box<dyn WeatherSource>, CliError> {
        Ok(Box::new(StubWeatherSource::new(self.weather.clone())))
    }
}

pub(super) fn currency(code: &str) -> CurrencyCode {
    CurrencyCode::parse(code).expect("valid currency code")
}

pub(super) fn sample_rates() -> ExchangeRates {
    ExchangeRates {
        base: currency("EUR"),
        date: Some("2024-05-01".to_owned()),
        rates: BTreeMap::from([(currency("JPY"), 160.0), (currency("USD"), 1.25)]),
    }
}

pub(super) fn sample_profile() -> CountryProfile {
    CountryProfile {
        common_name: "Portugal".to_owned(),
        alpha2: "PT".to_owned(),
        capital: Some("Lisbon".to_owned()),
        capital_coordinates: GeoPoint::new(38.72, -9.13),
        ..CountryProfile::default()
    }
}

pub(super) fn restaurant(id: u64, name: &str) -> OsmElement {
    OsmElement::new(ElementType::Node, id)
        .with_position(38.71, -9.14)
        .with_tag("name", name)
}

/// Temporary directory with a UTF-8 path.
pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn read_utf8(path: &Utf8Path) -> String {
    std::fs::read_to_string(path.as_std_path()).expect("read output file")
}
