//! Venue fetching: query, normalise, order and enrich.
//!
//! [`VenueFetcher`] ties an [`OverpassSource`] to an [`ImageResolver`]. Each
//! call issues exactly one Overpass query (two when the country fallback
//! kicks in) followed by at most `image_lookup_limit` image lookups.

use std::cmp::Ordering;

use log::{debug, info, warn};
use thiserror::Error;
use wayfarer_core::{
    CountryCode, GeoPoint, QueryError, Venue, VenueKind, VenueQuery, normalise_elements,
};

use crate::enrich::{DEFAULT_IMAGE_LOOKUP_LIMIT, EnrichmentSummary, enrich_images};
use crate::http::TransportError;
use crate::lookup::CountrySource;
use crate::overpass::OverpassSource;
use crate::wikidata::ImageResolver;

/// Server-side Overpass timeout written into each query.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 25;

/// Radius used when a country search falls back to its anchor point.
pub const DEFAULT_FALLBACK_RADIUS_M: f64 = 25_000.0;

/// Errors surfaced by [`VenueFetcher`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VenueFetchError {
    /// The search parameters were rejected before any request was sent.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// The Overpass request failed.
    #[error("Overpass query failed: {0}")]
    Overpass(#[source] TransportError),
}

/// Tuning knobs for [`VenueFetcher`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VenueFetcherConfig {
    /// Maximum Wikidata lookups per fetch; zero disables enrichment.
    pub image_lookup_limit: usize,
    /// Overpass `[timeout:N]` setting. Keep it below the HTTP client timeout.
    pub query_timeout_secs: u64,
    /// Radius for the country fallback search.
    pub fallback_radius_m: f64,
}

impl Default for VenueFetcherConfig {
    fn default() -> Self {
        Self {
            image_lookup_limit: DEFAULT_IMAGE_LOOKUP_LIMIT,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            fallback_radius_m: DEFAULT_FALLBACK_RADIUS_M,
        }
    }
}

impl VenueFetcherConfig {
    /// Set the image lookup cap.
    #[must_use]
    pub const fn with_image_lookup_limit(mut self, limit: usize) -> Self {
        self.image_lookup_limit = limit;
        self
    }

    /// Set the Overpass query timeout.
    #[must_use]
    pub const fn with_query_timeout_secs(mut self, secs: u64) -> Self {
        self.query_timeout_secs = secs;
        self
    }

    /// Set the fallback radius.
    #[must_use]
    pub const fn with_fallback_radius_m(mut self, radius_m: f64) -> Self {
        self.fallback_radius_m = radius_m;
        self
    }
}

/// Venues returned by one fetch, with how they were obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueReport {
    /// Query that produced `venues`.
    pub query: VenueQuery,
    /// Normalised venues, at most `query.limit`.
    pub venues: Vec<Venue>,
    /// Image enrichment counters.
    pub enrichment: EnrichmentSummary,
    /// Whether a country search fell back to a radius search.
    pub fallback_used: bool,
}

/// Fetches venues from Overpass and enriches them with Wikidata images.
///
/// # Examples
/// ```
/// use wayfarer_core::{ElementType, OsmElement};
/// use wayfarer_data::fetcher::VenueFetcher;
/// use wayfarer_data::overpass::test_support::StubOverpassSource;
/// use wayfarer_data::wikidata::test_support::StubImageResolver;
///
/// let overpass = StubOverpassSource::with_elements(vec![
///     OsmElement::new(ElementType::Node, 1)
///         .with_position(41.9, 12.5)
///         .with_tag("name", "Roscioli")
///         .with_tag("wikidata", "Q1"),
/// ]);
/// let images = StubImageResolver::default().with_image("Q1", "https://img.example/r.jpg");
/// let fetcher = VenueFetcher::new(overpass, images);
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let venues = runtime.block_on(fetcher.fetch_restaurants_in_country("IT", 5))?;
/// assert_eq!(venues[0].name, "Roscioli");
/// assert_eq!(venues[0].image_url.as_deref(), Some("https://img.example/r.jpg"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct VenueFetcher<O, I> {
    overpass: O,
    images: I,
    config: VenueFetcherConfig,
}

impl<O, I> VenueFetcher<O, I>
where
    O: OverpassSource,
    I: ImageResolver,
{
    /// Create a fetcher with default settings.
    pub fn new(overpass: O, images: I) -> Self {
        Self::with_config(overpass, images, VenueFetcherConfig::default())
    }

    /// Create a fetcher with explicit settings.
    pub const fn with_config(overpass: O, images: I, config: VenueFetcherConfig) -> Self {
        Self {
            overpass,
            images,
            config,
        }
    }

    /// Active settings.
    #[must_use]
    pub const fn config(&self) -> &VenueFetcherConfig {
        &self.config
    }

    /// The Overpass source queries go to.
    #[must_use]
    pub const fn overpass(&self) -> &O {
        &self.overpass
    }

    /// The resolver images come from.
    #[must_use]
    pub const fn images(&self) -> &I {
        &self.images
    }

    /// Restaurants inside the country identified by `iso_code`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid parameters or a failed Overpass query.
    pub async fn fetch_restaurants_in_country(
        &self,
        iso_code: &str,
        limit: usize,
    ) -> Result<Vec<Venue>, VenueFetchError> {
        let query = VenueQuery::in_country(VenueKind::Restaurant, iso_code, limit)?;
        self.fetch(&query).await
    }

    /// Hotels inside the country identified by `iso_code`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid parameters or a failed Overpass query.
    pub async fn fetch_hotels_in_country(
        &self,
        iso_code: &str,
        limit: usize,
    ) -> Result<Vec<Venue>, VenueFetchError> {
        let query = VenueQuery::in_country(VenueKind::Hotel, iso_code, limit)?;
        self.fetch(&query).await
    }

    /// Restaurants within `radius_m` metres of `centre`, the returned batch
    /// ordered nearest first.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid parameters or a failed Overpass query.
    pub async fn fetch_restaurants_near(
        &self,
        centre: GeoPoint,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<Venue>, VenueFetchError> {
        let query =
            VenueQuery::near(VenueKind::Restaurant, centre.lat, centre.lng, radius_m, limit)?;
        self.fetch(&query).await
    }

    /// Hotels within `radius_m` metres of `centre`, the returned batch
    /// ordered nearest first.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid parameters or a failed Overpass query.
    pub async fn fetch_hotels_near(
        &self,
        centre: GeoPoint,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<Venue>, VenueFetchError> {
        let query = VenueQuery::near(VenueKind::Hotel, centre.lat, centre.lng, radius_m, limit)?;
        self.fetch(&query).await
    }

    /// Run `query` and return its venues.
    ///
    /// # Errors
    ///
    /// Returns [`VenueFetchError::Overpass`] when the query fails.
    pub async fn fetch(&self, query: &VenueQuery) -> Result<Vec<Venue>, VenueFetchError> {
        self.fetch_report(query).await.map(|report| report.venues)
    }

    /// Run `query` and return venues with enrichment counters.
    ///
    /// Overpass returns at most `query.limit` elements, chosen in its own
    /// order, so a nearer venue left out by the server is never seen.
    /// Radius results are then reordered by distance from the centre,
    /// venues without coordinates last; country results keep the Overpass
    /// order. The batch is capped at `query.limit` before images are looked
    /// up.
    ///
    /// # Errors
    ///
    /// Returns [`VenueFetchError::Overpass`] when the query fails.
    pub async fn fetch_report(&self, query: &VenueQuery) -> Result<VenueReport, VenueFetchError> {
        let ql = query.to_overpass_ql(self.config.query_timeout_secs);
        debug!("fetching {} venues ({:?})", query.kind, query.area);
        let elements = self
            .overpass
            .run_query(&ql)
            .await
            .map_err(VenueFetchError::Overpass)?;

        let mut venues = normalise_elements(query.kind, &elements);
        if let Some(centre) = query.centre() {
            sort_by_distance(&mut venues, centre);
        }
        venues.truncate(query.limit);

        let enrichment =
            enrich_images(&mut venues, &self.images, self.config.image_lookup_limit).await;
        info!(
            "fetched {} {} venues from {} elements ({} images resolved)",
            venues.len(),
            query.kind,
            elements.len(),
            enrichment.resolved
        );
        Ok(VenueReport {
            query: query.clone(),
            venues,
            enrichment,
            fallback_used: false,
        })
    }

    /// Search a country, retrying around its anchor point when needed.
    ///
    /// The radius search runs when the country search fails or finds
    /// nothing. It is centred on the country's capital (else its centroid)
    /// as reported by `countries`. When no anchor can be found, or the
    /// radius search fails too, the country search's outcome is returned.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid parameters, or the country search's
    /// error when the fallback could not recover.
    pub async fn fetch_in_country_with_fallback<C>(
        &self,
        kind: VenueKind,
        iso_code: &str,
        limit: usize,
        countries: &C,
    ) -> Result<VenueReport, VenueFetchError>
    where
        C: CountrySource + ?Sized,
    {
        let code = CountryCode::parse(iso_code)?;
        let query = VenueQuery::in_country(kind, code.as_ref(), limit)?;
        let primary = self.fetch_report(&query).await;
        match &primary {
            Ok(report) if !report.venues.is_empty() => return primary,
            Ok(_) => warn!("no {kind} venues inside {code}; trying radius fallback"),
            Err(err) => warn!("country search for {code} failed ({err}); trying radius fallback"),
        }

        let anchor = match countries.fetch_country(&code).await {
            Ok(profile) => profile.anchor(),
            Err(err) => {
                warn!("cannot resolve an anchor point for {code}: {err}");
                None
            }
        };
        let Some(centre) = anchor else {
            return primary;
        };

        let fallback = match VenueQuery::near(
            kind,
            centre.lat,
            centre.lng,
            self.config.fallback_radius_m,
            limit,
        ) {
            Ok(fallback) => fallback,
            Err(err) => {
                warn!("cannot build radius fallback for {code}: {err}");
                return primary;
            }
        };
        match self.fetch_report(&fallback).await {
            Ok(mut report) => {
                report.fallback_used = true;
                Ok(report)
            }
            Err(err) => {
                warn!("radius fallback for {code} failed: {err}");
                primary
            }
        }
    }
}

fn sort_by_distance(venues: &mut [Venue], centre: GeoPoint) {
    venues.sort_by(|a, b| match (a.distance_to(centre), b.distance_to(centre)) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
