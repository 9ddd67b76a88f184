//! WGS84 positions shared by venues, search areas and country profiles.

use geo::{Coord, Distance, Haversine, Point};

/// A validated latitude/longitude pair in degrees.
///
/// # Examples
/// ```
/// use wayfarer_core::GeoPoint;
///
/// let paris = GeoPoint::new(48.8566, 2.3522).expect("valid coordinate");
/// assert_eq!(paris.lat, 48.8566);
/// assert!(GeoPoint::new(91.0, 0.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    /// Latitude in degrees, `-90..=90`.
    pub lat: f64,
    /// Longitude in degrees, `-180..=180`.
    pub lng: f64,
}

impl GeoPoint {
    /// Construct a point, returning `None` when either axis is non-finite or
    /// out of range.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }

    /// Build a point from a `[lat, lng]` pair as returned by REST Countries.
    #[must_use]
    pub fn from_pair(pair: &[f64]) -> Option<Self> {
        match pair {
            [lat, lng] => Self::new(*lat, *lng),
            _ => None,
        }
    }

    /// Convert to a `geo` coordinate (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }

    /// Great-circle distance to `other` in metres.
    #[must_use]
    pub fn distance_m(self, other: Self) -> f64 {
        Haversine.distance(Point::from(self.to_coord()), Point::from(other.to_coord()))
    }
}

impl TryFrom<Coord<f64>> for GeoPoint {
    type Error = Coord<f64>;

    fn try_from(coord: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(coord.y, coord.x).ok_or(coord)
    }
}
