//! Property-based tests for venue normalisation.
//!
//! # Invariants tested
//!
//! - **Name filter:** every named element yields exactly one venue, in order.
//! - **Address order:** parts always appear as housenumber, street, city,
//!   postcode, joined with `", "`, whatever subset is present.
//! - **Website priority:** `website` wins over `url` whenever both exist.

use proptest::prelude::*;
use wayfarer_core::tags::{ADDRESS_KEYS, assemble_address};
use wayfarer_core::{ElementType, OsmElement, Tags, VenueKind, normalise_elements};

fn part_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[A-Za-z0-9][A-Za-z0-9 ]{0,11}[A-Za-z0-9]")
}

fn element_strategy() -> impl Strategy<Value = (u64, Option<String>)> {
    (1_u64..1_000_000, proptest::option::of("[A-Za-z][A-Za-z ]{0,15}[a-z]"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: address parts keep their fixed order and absent parts vanish.
    #[test]
    fn address_assembly_is_order_stable(
        parts in proptest::collection::vec(part_strategy(), ADDRESS_KEYS.len()),
    ) {
        let tags: Tags = ADDRESS_KEYS
            .iter()
            .zip(&parts)
            .filter_map(|(key, part)| part.as_ref().map(|value| ((*key).to_owned(), value.clone())))
            .collect();
        let expected: Vec<&str> = parts.iter().flatten().map(String::as_str).collect();

        let assembled = assemble_address(&tags);
        if expected.is_empty() {
            prop_assert_eq!(assembled, None);
        } else {
            prop_assert_eq!(assembled, Some(expected.join(", ")));
        }
    }

    /// Property: the venue count equals the number of named elements.
    #[test]
    fn named_elements_map_one_to_one(
        specs in proptest::collection::vec(element_strategy(), 0..40),
    ) {
        let elements: Vec<OsmElement> = specs
            .iter()
            .map(|(id, name)| {
                let element = OsmElement::new(ElementType::Node, *id).with_position(10.0, 10.0);
                match name {
                    Some(name) => element.with_tag("name", name.clone()),
                    None => element,
                }
            })
            .collect();
        let expected: Vec<&str> = specs
            .iter()
            .filter_map(|(_, name)| name.as_deref())
            .collect();

        let venues = normalise_elements(VenueKind::Restaurant, &elements);
        let names: Vec<&str> = venues.iter().map(|venue| venue.name.as_str()).collect();
        prop_assert_eq!(names, expected);
    }

    /// Property: `website` always beats `url`.
    #[test]
    fn website_tag_has_priority(
        website in "https://[a-z]{1,8}\\.example",
        url in "https://[a-z]{1,8}\\.example",
    ) {
        let element = OsmElement::new(ElementType::Node, 1)
            .with_tag("name", "Venue")
            .with_tag("url", url)
            .with_tag("website", website.clone());
        let venues = normalise_elements(VenueKind::Hotel, [&element]);
        prop_assert_eq!(venues.len(), 1);
        prop_assert_eq!(venues.first().and_then(|venue| venue.website.clone()), Some(website));
    }
}
