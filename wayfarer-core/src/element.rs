//! Raw OpenStreetMap elements as returned by Overpass.

use std::fmt;

use crate::location::GeoPoint;
use crate::tags::Tags;

/// OSM element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ElementType {
    /// A single point.
    #[default]
    Node,
    /// An ordered list of nodes.
    Way,
    /// A group of members.
    Relation,
}

impl ElementType {
    /// The Overpass QL statement name for this element kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }

    /// All element kinds in query order.
    pub const ALL: [Self; 3] = [Self::Node, Self::Way, Self::Relation];
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node, way or relation with its free-form tags.
///
/// Nodes carry `lat`/`lon` directly; ways and relations carry a `center`
/// when the query asks for `out center`.
///
/// # Examples
/// ```
/// use wayfarer_core::{ElementType, GeoPoint, OsmElement};
///
/// let element = OsmElement::new(ElementType::Way, 7)
///     .with_center(GeoPoint::new(45.0, 5.0).expect("valid"))
///     .with_tag("name", "Le Bouchon");
/// assert_eq!(element.position(), GeoPoint::new(45.0, 5.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OsmElement {
    /// Element kind.
    pub element_type: ElementType,
    /// OSM identifier, unique per element kind.
    pub id: u64,
    /// Latitude for nodes.
    pub lat: Option<f64>,
    /// Longitude for nodes.
    pub lon: Option<f64>,
    /// Centroid for ways and relations.
    pub center: Option<GeoPoint>,
    /// Free-form tags.
    pub tags: Tags,
}

impl OsmElement {
    /// Create an untagged element without a position.
    #[must_use]
    pub fn new(element_type: ElementType, id: u64) -> Self {
        Self {
            element_type,
            id,
            ..Self::default()
        }
    }

    /// Set the node position.
    #[must_use]
    pub fn with_position(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Set the centroid.
    #[must_use]
    pub fn with_center(mut self, center: GeoPoint) -> Self {
        self.center = Some(center);
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Best available position: the node coordinate, else the centroid.
    #[must_use]
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).or(self.center),
            _ => self.center,
        }
    }
}
