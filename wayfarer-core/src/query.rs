//! Venue search areas and Overpass QL construction.
//!
//! Country searches resolve the admin-level-2 boundary for an ISO 3166-1
//! code; radius searches use `around:` filters and act as the fallback when
//! the boundary lookup fails or is too coarse.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::element::ElementType;
use crate::location::GeoPoint;
use crate::venue::VenueKind;

/// Errors returned when building a [`VenueQuery`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The country code is not two ASCII letters.
    #[error("invalid ISO 3166-1 alpha-2 country code {code:?}")]
    InvalidCountryCode {
        /// Code as supplied.
        code: String,
    },
    /// A limit of zero would never return anything.
    #[error("venue limit must be at least 1")]
    ZeroLimit,
    /// The radius is not a positive, finite number of metres.
    #[error("search radius must be a positive number of metres, got {radius_m}")]
    InvalidRadius {
        /// Radius as supplied.
        radius_m: f64,
    },
    /// The centre is outside WGS84 bounds.
    #[error("coordinate ({lat}, {lng}) is out of range")]
    InvalidCoordinate {
        /// Latitude as supplied.
        lat: f64,
        /// Longitude as supplied.
        lng: f64,
    },
}

/// An upper-cased ISO 3166-1 alpha-2 code.
///
/// # Examples
/// ```
/// use wayfarer_core::CountryCode;
///
/// let code: CountryCode = "fr".parse().expect("valid code");
/// assert_eq!(code.as_ref(), "FR");
/// assert!("FRA".parse::<CountryCode>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

impl CountryCode {
    /// Validate and normalise a country code.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidCountryCode`] unless the trimmed input is
    /// exactly two ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.len() == 2 && trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(QueryError::InvalidCountryCode {
                code: raw.to_owned(),
            })
        }
    }

    /// Consume the wrapper and return the inner [`String`].
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for CountryCode {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where to look for venues.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchArea {
    /// Inside a country's administrative boundary.
    Country(CountryCode),
    /// Within `radius_m` metres of `centre`.
    Radius {
        /// Search centre.
        centre: GeoPoint,
        /// Radius in metres.
        radius_m: f64,
    },
}

/// A validated venue search.
///
/// # Examples
/// ```
/// use wayfarer_core::{VenueKind, VenueQuery};
///
/// let query = VenueQuery::in_country(VenueKind::Restaurant, "it", 20)?;
/// let ql = query.to_overpass_ql(25);
/// assert!(ql.contains(r#"area["ISO3166-1"="IT"][admin_level=2]"#));
/// assert!(ql.ends_with("out center 20;\n"));
/// # Ok::<(), wayfarer_core::QueryError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VenueQuery {
    /// Venue category.
    pub kind: VenueKind,
    /// Search area.
    pub area: SearchArea,
    /// Maximum number of elements requested.
    pub limit: usize,
}

const AREA_SET: &str = "searchArea";

impl VenueQuery {
    /// Search a country by ISO code.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed codes or a zero limit.
    pub fn in_country(kind: VenueKind, iso_code: &str, limit: usize) -> Result<Self, QueryError> {
        let code = CountryCode::parse(iso_code)?;
        Self::build(kind, SearchArea::Country(code), limit)
    }

    /// Search within `radius_m` metres of (`lat`, `lng`).
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range coordinates, a non-positive radius
    /// or a zero limit.
    pub fn near(
        kind: VenueKind,
        lat: f64,
        lng: f64,
        radius_m: f64,
        limit: usize,
    ) -> Result<Self, QueryError> {
        let centre = GeoPoint::new(lat, lng).ok_or(QueryError::InvalidCoordinate { lat, lng })?;
        if !(radius_m.is_finite() && radius_m > 0.0) {
            return Err(QueryError::InvalidRadius { radius_m });
        }
        Self::build(kind, SearchArea::Radius { centre, radius_m }, limit)
    }

    fn build(kind: VenueKind, area: SearchArea, limit: usize) -> Result<Self, QueryError> {
        if limit == 0 {
            return Err(QueryError::ZeroLimit);
        }
        Ok(Self { kind, area, limit })
    }

    /// The centre of a radius search.
    #[must_use]
    pub const fn centre(&self) -> Option<GeoPoint> {
        match &self.area {
            SearchArea::Radius { centre, .. } => Some(*centre),
            SearchArea::Country(_) => None,
        }
    }

    /// Render the query as Overpass QL with JSON output and centroids.
    #[must_use]
    pub fn to_overpass_ql(&self, timeout_secs: u64) -> String {
        let (key, value) = self.kind.osm_tag();
        let (preamble, filter) = match &self.area {
            SearchArea::Country(code) => (
                format!("area[\"ISO3166-1\"=\"{code}\"][admin_level=2]->.{AREA_SET};\n"),
                format!("(area.{AREA_SET})"),
            ),
            SearchArea::Radius { centre, radius_m } => (
                String::new(),
                format!("(around:{radius_m},{},{})", centre.lat, centre.lng),
            ),
        };

        let statements: String = ElementType::ALL
            .iter()
            .map(|element| format!("  {element}[\"{key}\"=\"{value}\"]{filter};\n"))
            .collect();

        format!(
            "[out:json][timeout:{timeout_secs}];\n{preamble}(\n{statements});\nout center {};\n",
            self.limit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("F")]
    #[case("FRA")]
    #[case("F1")]
    #[case("\"]")]
    fn rejects_bad_country_codes(#[case] code: &str) {
        assert!(matches!(
            CountryCode::parse(code),
            Err(QueryError::InvalidCountryCode { .. })
        ));
    }

    #[rstest]
    fn country_query_matches_expected_ql() {
        let query = VenueQuery::in_country(VenueKind::Restaurant, " fr ", 50).expect("valid");
        let expected = "[out:json][timeout:25];\n\
            area[\"ISO3166-1\"=\"FR\"][admin_level=2]->.searchArea;\n\
            (\n  \
            node[\"amenity\"=\"restaurant\"](area.searchArea);\n  \
            way[\"amenity\"=\"restaurant\"](area.searchArea);\n  \
            relation[\"amenity\"=\"restaurant\"](area.searchArea);\n\
            );\n\
            out center 50;\n";
        assert_eq!(query.to_overpass_ql(25), expected);
    }

    #[rstest]
    fn radius_query_uses_around_filter() {
        let query = VenueQuery::near(VenueKind::Hotel, 48.8566, 2.3522, 5000.0, 10).expect("valid");
        let ql = query.to_overpass_ql(60);
        assert!(ql.starts_with("[out:json][timeout:60];\n(\n"));
        assert!(ql.contains("  node[\"tourism\"=\"hotel\"](around:5000,48.8566,2.3522);\n"));
        assert!(ql.contains("  way[\"tourism\"=\"hotel\"](around:5000,48.8566,2.3522);\n"));
        assert!(!ql.contains("area"));
        assert!(ql.ends_with("out center 10;\n"));
        assert_eq!(query.centre(), GeoPoint::new(48.8566, 2.3522));
    }

    #[rstest]
    fn zero_limit_is_rejected() {
        assert_eq!(
            VenueQuery::in_country(VenueKind::Hotel, "DE", 0),
            Err(QueryError::ZeroLimit)
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(-10.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn invalid_radius_is_rejected(#[case] radius_m: f64) {
        assert!(matches!(
            VenueQuery::near(VenueKind::Hotel, 0.0, 0.0, radius_m, 5),
            Err(QueryError::InvalidRadius { .. })
        ));
    }

    #[rstest]
    fn invalid_centre_is_rejected() {
        assert!(matches!(
            VenueQuery::near(VenueKind::Hotel, 95.0, 0.0, 100.0, 5),
            Err(QueryError::InvalidCoordinate { .. })
        ));
    }
}
