//! Behavioural tests for Wikidata image enrichment.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use wayfarer_core::{ElementType, OsmElement, Venue, VenueKind, normalise_element};
use wayfarer_data::http::TransportError;
use wayfarer_data::wikidata::test_support::StubImageResolver;
use wayfarer_data::{DEFAULT_IMAGE_LOOKUP_LIMIT, EnrichmentSummary, enrich_images};

type VenuesCell = RefCell<Vec<Venue>>;
type ResolverCell = RefCell<StubImageResolver>;
type SummaryCell = RefCell<Option<EnrichmentSummary>>;

const Q1_IMAGE: &str = "https://commons.example/Q1.jpg";
const Q2_IMAGE: &str = "https://commons.example/Q2.jpg";

#[fixture]
fn venues() -> VenuesCell {
    RefCell::new(Vec::new())
}

#[fixture]
fn resolver() -> ResolverCell {
    RefCell::new(StubImageResolver::default())
}

#[fixture]
fn summary() -> SummaryCell {
    RefCell::new(None)
}

fn linked_venue(id: u64, image: Option<&str>) -> Venue {
    let mut element = OsmElement::new(ElementType::Node, id)
        .with_tag("name", format!("Trattoria {id}"))
        .with_tag("wikidata", format!("Q{id}"));
    if let Some(url) = image {
        element = element.with_tag("image", url);
    }
    normalise_element(VenueKind::Restaurant, &element).expect("named element")
}

fn linked_venues(count: u64) -> Vec<Venue> {
    (1..=count).map(|id| linked_venue(id, None)).collect()
}

// --- Given steps ---

#[given("a venue linked to Wikidata without an image")]
fn venue_without_image(#[from(venues)] venues: &VenuesCell) {
    *venues.borrow_mut() = linked_venues(1);
}

#[given("a venue linked to Wikidata with its own image")]
fn venue_with_image(#[from(venues)] venues: &VenuesCell) {
    *venues.borrow_mut() = vec![linked_venue(1, Some("https://own.example/front.jpg"))];
}

#[given("fifteen venues linked to Wikidata without images")]
fn fifteen_venues(#[from(venues)] venues: &VenuesCell) {
    *venues.borrow_mut() = linked_venues(15);
}

#[given("two venues linked to Wikidata without images")]
fn two_venues(#[from(venues)] venues: &VenuesCell) {
    *venues.borrow_mut() = linked_venues(2);
}

#[given("a resolver that knows its image")]
fn resolver_knows_image(#[from(resolver)] resolver: &ResolverCell) {
    *resolver.borrow_mut() = StubImageResolver::default().with_image("Q1", Q1_IMAGE);
}

#[given("a resolver that knows no images")]
fn resolver_knows_nothing(#[from(resolver)] resolver: &ResolverCell) {
    *resolver.borrow_mut() = StubImageResolver::default();
}

#[given("a resolver that fails for the first and knows the second")]
fn resolver_partially_fails(#[from(resolver)] resolver: &ResolverCell) {
    *resolver.borrow_mut() = StubImageResolver::default()
        .with_failure(
            "Q1",
            TransportError::Http {
                url: "https://query.example/sparql".to_owned(),
                status: 429,
                message: "too many requests".to_owned(),
            },
        )
        .with_image("Q2", Q2_IMAGE);
}

// --- When steps ---

#[when("images are enriched")]
fn enrich(
    #[from(venues)] venues: &VenuesCell,
    #[from(resolver)] resolver: &ResolverCell,
    #[from(summary)] summary: &SummaryCell,
) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let mut batch = venues.borrow_mut();
    let stub = resolver.borrow();
    let outcome = runtime.block_on(enrich_images(
        batch.as_mut_slice(),
        &*stub,
        DEFAULT_IMAGE_LOOKUP_LIMIT,
    ));
    *summary.borrow_mut() = Some(outcome);
}

// --- Then steps ---

#[then("the venue shows the Wikidata image")]
fn shows_wikidata_image(#[from(venues)] venues: &VenuesCell) {
    let batch = venues.borrow();
    assert_eq!(batch[0].image_url.as_deref(), Some(Q1_IMAGE));
}

#[then("no lookups were made")]
fn no_lookups(
    #[from(resolver)] resolver: &ResolverCell,
    #[from(venues)] venues: &VenuesCell,
) {
    assert!(resolver.borrow().lookups().is_empty());
    assert_eq!(
        venues.borrow()[0].image_url.as_deref(),
        Some("https://own.example/front.jpg")
    );
}

#[then("ten lookups were made")]
fn ten_lookups(#[from(resolver)] resolver: &ResolverCell) {
    let lookups = resolver.borrow().lookups();
    assert_eq!(lookups.len(), 10);
    assert_eq!(lookups.first().map(String::as_str), Some("Q1"));
    assert_eq!(lookups.last().map(String::as_str), Some("Q10"));
}

#[then("one lookup failed")]
fn one_failure(#[from(summary)] summary: &SummaryCell) {
    let counts = summary.borrow().expect("enrichment must have run");
    assert_eq!(counts.attempted, 2);
    assert_eq!(counts.failed, 1);
}

#[then("the second venue received an image")]
fn second_has_image(#[from(venues)] venues: &VenuesCell) {
    let batch = venues.borrow();
    assert_eq!(batch[0].image_url, None);
    assert_eq!(batch[1].image_url.as_deref(), Some(Q2_IMAGE));
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/image_enrichment.feature", name = $title)]
        fn $fn_name(venues: VenuesCell, resolver: ResolverCell, summary: SummaryCell) {
            let _ = (venues, resolver, summary);
        }
    };
}

register_scenario!(backfilling_missing_image, "backfilling a missing image");
register_scenario!(keeping_tag_image, "keeping an image from the tags");
register_scenario!(capping_lookups, "capping the number of lookups");
register_scenario!(surviving_failed_lookup, "surviving a failed lookup");
