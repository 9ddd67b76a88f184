//! Current-conditions weather records.

/// Current weather at a place, in metric units.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeatherReport {
    /// Place name reported by the provider.
    pub location: String,
    /// Position the report applies to.
    pub coordinates: Option<crate::GeoPoint>,
    /// Air temperature in °C.
    pub temperature_c: f64,
    /// Perceived temperature in °C.
    pub feels_like_c: Option<f64>,
    /// Relative humidity in percent.
    pub humidity_pct: Option<u8>,
    /// Wind speed in m/s.
    pub wind_speed_ms: Option<f64>,
    /// Short condition group, e.g. `Rain`.
    pub summary: Option<String>,
    /// Longer description, e.g. `light rain`.
    pub description: Option<String>,
    /// Condition icon URL.
    pub icon_url: Option<String>,
}
