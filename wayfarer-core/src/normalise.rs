//! Map raw OSM elements onto [`Venue`] records.

use crate::element::OsmElement;
use crate::tags::{self, PHONE_KEYS, WEBSITE_KEYS};
use crate::venue::{OsmRef, Venue, VenueKind, VenueLocation};

/// Normalise a single element, dropping it when it has no name.
///
/// # Examples
/// ```
/// use wayfarer_core::{normalise_element, ElementType, OsmElement, VenueKind};
///
/// let element = OsmElement::new(ElementType::Node, 1)
///     .with_position(48.85, 2.35)
///     .with_tag("name", "Le Procope")
///     .with_tag("addr:street", "Rue de l'Ancienne Comédie")
///     .with_tag("addr:housenumber", "13");
/// let venue = normalise_element(VenueKind::Restaurant, &element).expect("named");
/// assert_eq!(venue.name, "Le Procope");
/// assert_eq!(
///     venue.location.address.as_deref(),
///     Some("13, Rue de l'Ancienne Comédie"),
/// );
///
/// let unnamed = OsmElement::new(ElementType::Node, 2);
/// assert!(normalise_element(VenueKind::Restaurant, &unnamed).is_none());
/// ```
#[must_use]
pub fn normalise_element(kind: VenueKind, element: &OsmElement) -> Option<Venue> {
    let element_tags = &element.tags;
    let name = tags::tag(element_tags, "name")?;
    let owned = |value: &str| value.to_owned();

    Some(Venue {
        name: name.to_owned(),
        kind,
        osm: OsmRef {
            element_type: element.element_type,
            id: element.id,
        },
        image_url: tags::direct_image(element_tags),
        website: tags::first_tag(element_tags, &WEBSITE_KEYS).map(owned),
        description: tags::tag(element_tags, "description").map(owned),
        location: VenueLocation {
            coordinates: element.position(),
            address: tags::assemble_address(element_tags),
            city: tags::tag(element_tags, "addr:city").map(owned),
        },
        rating: tags::tag(element_tags, "stars").and_then(tags::parse_stars),
        phone: tags::first_tag(element_tags, &PHONE_KEYS).map(owned),
        cuisine: tags::tag(element_tags, "cuisine").map(owned),
        wikidata: tags::wikidata_id(element_tags).map(owned),
    })
}

/// Normalise a batch of elements, preserving their order.
///
/// Elements without a name are skipped; every named element yields exactly
/// one venue.
pub fn normalise_elements<'a, I>(kind: VenueKind, elements: I) -> Vec<Venue>
where
    I: IntoIterator<Item = &'a OsmElement>,
{
    elements
        .into_iter()
        .filter_map(|element| normalise_element(kind, element))
        .collect()
}
