//! Country profiles used to auto-fill content forms and anchor radius
//! searches.

use std::collections::BTreeMap;

use crate::location::GeoPoint;

/// A currency a country uses.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrencyInfo {
    /// ISO 4217 code as published by the source.
    pub code: String,
    /// English name, e.g. `Euro`.
    pub name: Option<String>,
    /// Display symbol, e.g. `€`.
    pub symbol: Option<String>,
}

/// Reference data about one country.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountryProfile {
    /// Common English name.
    pub common_name: String,
    /// Official English name.
    pub official_name: Option<String>,
    /// ISO 3166-1 alpha-2 code.
    pub alpha2: String,
    /// ISO 3166-1 alpha-3 code.
    pub alpha3: Option<String>,
    /// First listed capital.
    pub capital: Option<String>,
    /// Continent-level region.
    pub region: Option<String>,
    /// Sub-region.
    pub subregion: Option<String>,
    /// Population estimate.
    pub population: Option<u64>,
    /// Approximate country centroid.
    pub coordinates: Option<GeoPoint>,
    /// Capital city position.
    pub capital_coordinates: Option<GeoPoint>,
    /// Currencies in use.
    pub currencies: Vec<CurrencyInfo>,
    /// Spoken languages keyed by ISO 639-3 code.
    pub languages: BTreeMap<String, String>,
    /// PNG flag URL.
    pub flag_url: Option<String>,
    /// UTC offsets such as `UTC+01:00`.
    pub timezones: Vec<String>,
}

impl CountryProfile {
    /// Point to centre a radius search on: the capital, else the centroid.
    ///
    /// # Examples
    /// ```
    /// use wayfarer_core::{CountryProfile, GeoPoint};
    ///
    /// let profile = CountryProfile {
    ///     coordinates: GeoPoint::new(46.0, 2.0),
    ///     capital_coordinates: GeoPoint::new(48.87, 2.33),
    ///     ..CountryProfile::default()
    /// };
    /// assert_eq!(profile.anchor(), GeoPoint::new(48.87, 2.33));
    /// ```
    #[must_use]
    pub fn anchor(&self) -> Option<GeoPoint> {
        self.capital_coordinates.or(self.coordinates)
    }
}
