//! Remote data adapters for the Wayfarer enrichment layer.
//!
//! - [`overpass`]: runs Overpass QL against an interpreter.
//! - [`wikidata`]: resolves entity images over SPARQL.
//! - [`enrich`]: bounded image backfill for venue batches.
//! - [`fetcher`]: the venue pipeline tying the above together.
//! - [`lookup`]: country, exchange-rate and weather reference data.
//!
//! Every remote source sits behind an `async_trait(?Send)` trait so callers
//! and tests can substitute in-memory implementations.

#![forbid(unsafe_code)]

pub mod enrich;
pub mod fetcher;
pub mod http;
pub mod lookup;
pub mod overpass;
pub mod wikidata;

pub use enrich::{DEFAULT_IMAGE_LOOKUP_LIMIT, EnrichmentSummary, enrich_images};
pub use fetcher::{VenueFetchError, VenueFetcher, VenueFetcherConfig, VenueReport};
pub use http::{ClientBuildError, HttpClientConfig, TransportError};
pub use lookup::LookupError;
