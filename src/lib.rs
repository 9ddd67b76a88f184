//! Facade crate for the Wayfarer venue and reference-data layer.
//!
//! This crate re-exports the core domain types and, behind the `remote`
//! feature, the HTTP-backed venue fetcher and lookup clients.

#![forbid(unsafe_code)]

pub use wayfarer_core::{
    ConversionError, CountryCode, CountryProfile, CurrencyCode, CurrencyInfo, ElementType,
    ExchangeRates, GeoPoint, OsmElement, OsmRef, QueryError, SearchArea, Tags, Venue, VenueKind,
    VenueLocation, VenueQuery, WeatherReport, normalise_element, normalise_elements,
};

#[cfg(feature = "remote")]
pub use wayfarer_data::{
    EnrichmentSummary, HttpClientConfig, LookupError, TransportError, VenueFetchError,
    VenueFetcher, VenueFetcherConfig, VenueReport, enrich_images,
    lookup::{
        CountrySource, HttpCountryClient, HttpExchangeRateClient, HttpWeatherClient, RateSource,
        WeatherQuery, WeatherSource,
    },
    overpass::{HttpOverpassClient, OverpassSource},
    wikidata::{HttpImageResolver, ImageResolver},
};
