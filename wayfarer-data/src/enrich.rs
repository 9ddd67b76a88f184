//! Backfill venue images from Wikidata.

use futures_util::future::join_all;
use log::{debug, warn};
use wayfarer_core::Venue;

use crate::wikidata::ImageResolver;

/// Upper bound on image lookups issued for one venue batch.
pub const DEFAULT_IMAGE_LOOKUP_LIMIT: usize = 10;

/// Outcome counters for one enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrichmentSummary {
    /// Lookups issued.
    pub attempted: usize,
    /// Venues that received an image.
    pub resolved: usize,
    /// Lookups that failed and were skipped.
    pub failed: usize,
}

/// Fill `image_url` on venues that lack one but carry a Wikidata id.
///
/// Only the first `limit` eligible venues, in slice order, are looked up;
/// the lookups run concurrently. A failed lookup leaves the venue untouched
/// and never aborts the batch. Venues that already have an image are never
/// queried.
pub async fn enrich_images<R>(
    venues: &mut [Venue],
    resolver: &R,
    limit: usize,
) -> EnrichmentSummary
where
    R: ImageResolver + ?Sized,
{
    let targets: Vec<(usize, String)> = venues
        .iter()
        .enumerate()
        .filter(|(_, venue)| venue.needs_image_lookup())
        .filter_map(|(index, venue)| venue.wikidata.clone().map(|id| (index, id)))
        .take(limit)
        .collect();
    if targets.is_empty() {
        return EnrichmentSummary::default();
    }
    debug!("resolving {} Wikidata images", targets.len());

    let outcomes = join_all(targets.iter().map(|(_, id)| resolver.resolve_image(id))).await;

    let mut summary = EnrichmentSummary {
        attempted: targets.len(),
        ..EnrichmentSummary::default()
    };
    for ((index, id), outcome) in targets.iter().zip(outcomes) {
        match outcome {
            Ok(Some(url)) => {
                if let Some(venue) = venues.get_mut(*index) {
                    venue.image_url = Some(url);
                    summary.resolved += 1;
                }
            }
            Ok(None) => debug!("no Wikidata image for {id}"),
            Err(err) => {
                warn!("image lookup for {id} failed: {err}");
                summary.failed += 1;
            }
        }
    }
    summary
}
