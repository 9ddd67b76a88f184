//! Current weather from OpenWeatherMap.

use std::fmt;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;
use wayfarer_core::{GeoPoint, WeatherReport};

use super::{LookupError, not_found_on_404};
use crate::http::{self, ClientBuildError, HttpClientConfig, TransportError, redact_url};

/// OpenWeatherMap current-weather endpoint.
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const ICON_BASE: &str = "https://openweathermap.org/img/wn";

/// Where to report the weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    /// A city name, optionally qualified as `City,CC`.
    City(String),
    /// A position.
    Coordinates(GeoPoint),
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City(city) => f.write_str(city),
            Self::Coordinates(point) => write!(f, "({}, {})", point.lat, point.lng),
        }
    }
}

/// Provides current conditions.
#[async_trait(?Send)]
pub trait WeatherSource {
    /// Current weather for `query`.
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherReport, LookupError>;
}

/// OpenWeatherMap implementation of [`WeatherSource`].
///
/// The API key is sent as the `appid` parameter and masked in every error
/// and log line.
#[derive(Clone)]
pub struct HttpWeatherClient {
    client: Client,
    config: HttpClientConfig,
    api_key: String,
}

impl fmt::Debug for HttpWeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpWeatherClient")
            .field("config", &self.config)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl HttpWeatherClient {
    /// Client for the public API.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpClientConfig::new(DEFAULT_WEATHER_URL), api_key)
    }

    /// Client for a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn with_config(
        config: HttpClientConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, ClientBuildError> {
        let client = config.build_client()?;
        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    fn weather_url(&self, query: &WeatherQuery) -> Result<Url, LookupError> {
        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::City(city) => {
                let city = city.trim();
                if city.is_empty() {
                    return Err(LookupError::Invalid {
                        what: "city".to_owned(),
                        message: "must not be empty".to_owned(),
                    });
                }
                vec![("q", city.to_owned())]
            }
            WeatherQuery::Coordinates(point) => vec![
                ("lat", point.lat.to_string()),
                ("lon", point.lng.to_string()),
            ],
        };
        params.push(("units", "metric".to_owned()));
        params.push(("appid", self.api_key.clone()));
        Url::parse_with_params(self.config.endpoint(), &params).map_err(|err| {
            LookupError::Transport(TransportError::Network {
                url: self.config.endpoint().to_owned(),
                message: err.to_string(),
            })
        })
    }
}

#[async_trait(?Send)]
impl WeatherSource for HttpWeatherClient {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherReport, LookupError> {
        let url = self.weather_url(query)?;
        let display = redact_url(&url);
        debug!("fetching weather from {display}");
        let request = self.client.get(url);
        let raw: RawWeather = http::fetch_json(request, &display, self.config.timeout)
            .await
            .map_err(|err| not_found_on_404(err, || format!("weather for {query}")))?;
        Ok(raw.into_report())
    }
}

#[derive(Debug, Deserialize)]
struct RawWeather {
    #[serde(default)]
    name: String,
    #[serde(default)]
    coord: Option<RawCoord>,
    #[serde(default)]
    weather: Vec<RawCondition>,
    main: RawMain,
    #[serde(default)]
    wind: Option<RawWind>,
}

#[derive(Debug, Deserialize)]
struct RawCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    #[serde(default)]
    main: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawWind {
    #[serde(default)]
    speed: Option<f64>,
}

impl RawWeather {
    fn into_report(self) -> WeatherReport {
        let condition = self.weather.into_iter().next();
        let (summary, description, icon) = condition.map_or((None, None, None), |condition| {
            (condition.main, condition.description, condition.icon)
        });
        WeatherReport {
            location: self.name,
            coordinates: self
                .coord
                .and_then(|coord| GeoPoint::new(coord.lat, coord.lon)),
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            wind_speed_ms: self.wind.and_then(|wind| wind.speed),
            summary,
            description,
            icon_url: icon.map(|icon| format!("{ICON_BASE}/{icon}@2x.png")),
        }
    }
}
