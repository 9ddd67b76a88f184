//! Core domain types for the Wayfarer enrichment layer.
//!
//! Responsibilities:
//! - Model venues, raw OpenStreetMap elements and the search areas used to
//!   query them.
//! - Normalise free-form OSM tags into uniform [`Venue`] records.
//! - Build Overpass QL for country and radius searches.
//! - Provide the currency maths and country/weather records used by the
//!   platform's widgets.
//!
//! Boundaries:
//! - No I/O. HTTP adapters live in `wayfarer-data`.
//!
//! Invariants:
//! - Every [`Venue`] carries a non-empty name.
//! - Values interpolated into Overpass QL are validated first.

#![forbid(unsafe_code)]

pub mod country;
pub mod currency;
pub mod element;
pub mod location;
pub mod normalise;
pub mod query;
pub mod tags;
pub mod venue;
pub mod weather;

pub use country::{CountryProfile, CurrencyInfo};
pub use currency::{ConversionError, CurrencyCode, ExchangeRates};
pub use element::{ElementType, OsmElement};
pub use location::GeoPoint;
pub use normalise::{normalise_element, normalise_elements};
pub use query::{CountryCode, QueryError, SearchArea, VenueQuery};
pub use tags::Tags;
pub use venue::{OsmRef, ParseVenueKindError, Venue, VenueKind, VenueLocation};
pub use weather::WeatherReport;
