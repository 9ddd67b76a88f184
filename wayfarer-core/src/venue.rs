//! Uniform venue records produced from OSM data.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::element::ElementType;
use crate::location::GeoPoint;

/// The category of venue being searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VenueKind {
    /// `amenity=restaurant`.
    Restaurant,
    /// `tourism=hotel`.
    Hotel,
}

impl VenueKind {
    /// The OSM tag key and value selecting this kind.
    ///
    /// # Examples
    /// ```
    /// use wayfarer_core::VenueKind;
    ///
    /// assert_eq!(VenueKind::Hotel.osm_tag(), ("tourism", "hotel"));
    /// ```
    #[must_use]
    pub const fn osm_tag(self) -> (&'static str, &'static str) {
        match self {
            Self::Restaurant => ("amenity", "restaurant"),
            Self::Hotel => ("tourism", "hotel"),
        }
    }

    /// Lower-case name used on the command line and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Hotel => "hotel",
        }
    }
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown venue kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown venue kind {0:?} (expected \"restaurant\" or \"hotel\")")]
pub struct ParseVenueKindError(pub String);

impl FromStr for VenueKind {
    type Err = ParseVenueKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "restaurant" | "restaurants" => Ok(Self::Restaurant),
            "hotel" | "hotels" => Ok(Self::Hotel),
            _ => Err(ParseVenueKindError(value.to_owned())),
        }
    }
}

/// Pointer back to the source OSM element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsmRef {
    /// Element kind.
    pub element_type: ElementType,
    /// Element id.
    pub id: u64,
}

impl fmt::Display for OsmRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.element_type, self.id)
    }
}

/// Where a venue is.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VenueLocation {
    /// Position, when the element carried one.
    pub coordinates: Option<GeoPoint>,
    /// Address assembled from `addr:*` tags.
    pub address: Option<String>,
    /// `addr:city`.
    pub city: Option<String>,
}

/// A restaurant or hotel normalised from an OSM element.
///
/// Venues exist for the duration of a single request; callers persist them
/// elsewhere if needed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Venue {
    /// Display name, never empty.
    pub name: String,
    /// Category the venue was fetched as.
    pub kind: VenueKind,
    /// Source element.
    pub osm: OsmRef,
    /// Image URL from tags or Wikidata enrichment.
    pub image_url: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Position and address.
    pub location: VenueLocation,
    /// Star rating, when classified.
    pub rating: Option<f32>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// `cuisine` tag, mostly for restaurants.
    pub cuisine: Option<String>,
    /// Wikidata entity id, e.g. `Q12345`.
    pub wikidata: Option<String>,
}

impl Venue {
    /// Whether this venue should be enriched with a Wikidata image.
    #[must_use]
    pub const fn needs_image_lookup(&self) -> bool {
        self.image_url.is_none() && self.wikidata.is_some()
    }

    /// Distance in metres from `centre`, if the venue has coordinates.
    #[must_use]
    pub fn distance_to(&self, centre: GeoPoint) -> Option<f64> {
        self.location
            .coordinates
            .map(|position| position.distance_m(centre))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn venue() -> Venue {
        Venue {
            name: "Chez Janou".to_owned(),
            kind: VenueKind::Restaurant,
            osm: OsmRef {
                element_type: ElementType::Node,
                id: 42,
            },
            image_url: None,
            website: None,
            description: None,
            location: VenueLocation::default(),
            rating: None,
            phone: None,
            cuisine: None,
            wikidata: Some("Q1".to_owned()),
        }
    }

    #[rstest]
    #[case("restaurant", VenueKind::Restaurant)]
    #[case("Hotels", VenueKind::Hotel)]
    #[case(" hotel ", VenueKind::Hotel)]
    fn parses_kinds(#[case] raw: &str, #[case] expected: VenueKind) {
        assert_eq!(raw.parse::<VenueKind>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_kind() {
        assert!("museum".parse::<VenueKind>().is_err());
    }

    #[rstest]
    fn lookup_needed_only_without_image(mut venue: Venue) {
        assert!(venue.needs_image_lookup());
        venue.image_url = Some("https://img.example/x.jpg".to_owned());
        assert!(!venue.needs_image_lookup());
        venue.image_url = None;
        venue.wikidata = None;
        assert!(!venue.needs_image_lookup());
    }

    #[rstest]
    fn distance_requires_coordinates(mut venue: Venue) {
        let centre = GeoPoint::new(43.3, 5.4).expect("valid");
        assert_eq!(venue.distance_to(centre), None);
        venue.location.coordinates = Some(centre);
        assert_eq!(venue.distance_to(centre), Some(0.0));
    }

    #[rstest]
    fn osm_ref_displays_as_path() {
        let osm = OsmRef {
            element_type: ElementType::Way,
            id: 99,
        };
        assert_eq!(osm.to_string(), "way/99");
    }
}
