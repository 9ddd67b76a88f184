//! Reference-data commands: `country`, `convert` and `weather`.

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use wayfarer_core::{CountryCode, CurrencyCode, GeoPoint};
use wayfarer_data::HttpClientConfig;
use wayfarer_data::lookup::{
    CountrySource, DEFAULT_COUNTRIES_URL, DEFAULT_EXCHANGE_URL, DEFAULT_WEATHER_URL,
    HttpCountryClient, HttpExchangeRateClient, HttpWeatherClient, RateSource, WeatherQuery,
    WeatherSource,
};

use crate::output::emit_json;
use crate::{
    ARG_CONVERT_AMOUNT, ARG_CONVERT_FROM, ARG_CONVERT_TO, ARG_COUNTRIES_URL, ARG_COUNTRY_CODE,
    ARG_RATES_URL, ARG_WEATHER_API_KEY, ARG_WEATHER_CITY, ARG_WEATHER_LAT, ARG_WEATHER_LNG,
    ARG_WEATHER_URL, CliError, ENV_CONVERT_AMOUNT, ENV_CONVERT_FROM, ENV_CONVERT_TO,
    ENV_COUNTRY_CODE, ENV_WEATHER_API_KEY, ENV_WEATHER_CITY, ENV_WEATHER_LNG, block_on,
};

/// CLI arguments for the `country` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "country", about = "Show a country profile from REST Countries")]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct CountryArgs {
    /// ISO 3166-1 alpha-2 code, e.g. `FR`.
    #[arg(value_name = ARG_COUNTRY_CODE)]
    #[serde(default)]
    pub(crate) code: Option<String>,
    /// REST Countries base URL.
    #[arg(long = ARG_COUNTRIES_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) countries_url: Option<String>,
}

/// CLI arguments for the `convert` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "convert",
    about = "Convert an amount between currencies at the latest rate"
)]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct ConvertArgs {
    /// Amount to convert.
    #[arg(value_name = ARG_CONVERT_AMOUNT, allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) amount: Option<f64>,
    /// Source currency, e.g. `EUR`.
    #[arg(value_name = ARG_CONVERT_FROM)]
    #[serde(default)]
    pub(crate) from: Option<String>,
    /// Target currency, e.g. `JPY`.
    #[arg(value_name = ARG_CONVERT_TO)]
    #[serde(default)]
    pub(crate) to: Option<String>,
    /// Exchange-rate API base URL.
    #[arg(long = ARG_RATES_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) rates_url: Option<String>,
}

/// CLI arguments for the `weather` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "weather",
    about = "Show current weather for a city or position",
    long_about = "Query OpenWeatherMap for current conditions. Pass either \
                 --city or both --lat and --lng. The API key is best \
                 supplied through the environment or a configuration file."
)]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct WeatherArgs {
    /// City name, optionally qualified as `City,CC`.
    #[arg(long = ARG_WEATHER_CITY, value_name = "name")]
    #[serde(default)]
    pub(crate) city: Option<String>,
    /// Latitude.
    #[arg(long = ARG_WEATHER_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude.
    #[arg(long = ARG_WEATHER_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// OpenWeatherMap API key.
    #[arg(long = ARG_WEATHER_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Weather endpoint.
    #[arg(long = ARG_WEATHER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) weather_url: Option<String>,
}

/// Resolved `country` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CountryConfig {
    pub(crate) code: CountryCode,
    pub(crate) countries_url: String,
}

/// Resolved `convert` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConvertConfig {
    pub(crate) amount: f64,
    pub(crate) from: CurrencyCode,
    pub(crate) to: CurrencyCode,
    pub(crate) rates_url: String,
}

/// Resolved `weather` configuration.
#[derive(Clone, PartialEq)]
pub(crate) struct WeatherConfig {
    pub(crate) query: WeatherQuery,
    pub(crate) api_key: String,
    pub(crate) weather_url: String,
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("query", &self.query)
            .field("api_key", &"<redacted>")
            .field("weather_url", &self.weather_url)
            .finish()
    }
}

impl TryFrom<CountryArgs> for CountryConfig {
    type Error = CliError;

    fn try_from(args: CountryArgs) -> Result<Self, Self::Error> {
        let raw = args.code.ok_or(CliError::MissingArgument {
            field: ARG_COUNTRY_CODE,
            env: ENV_COUNTRY_CODE,
        })?;
        let code = CountryCode::parse(&raw).map_err(|err| CliError::InvalidArgument {
            field: ARG_COUNTRY_CODE,
            message: err.to_string(),
        })?;
        Ok(Self {
            code,
            countries_url: args
                .countries_url
                .unwrap_or_else(|| DEFAULT_COUNTRIES_URL.to_owned()),
        })
    }
}

impl TryFrom<ConvertArgs> for ConvertConfig {
    type Error = CliError;

    fn try_from(args: ConvertArgs) -> Result<Self, Self::Error> {
        let amount = args.amount.ok_or(CliError::MissingArgument {
            field: ARG_CONVERT_AMOUNT,
            env: ENV_CONVERT_AMOUNT,
        })?;
        let from = currency(args.from, ARG_CONVERT_FROM, ENV_CONVERT_FROM)?;
        let to = currency(args.to, ARG_CONVERT_TO, ENV_CONVERT_TO)?;
        Ok(Self {
            amount,
            from,
            to,
            rates_url: args
                .rates_url
                .unwrap_or_else(|| DEFAULT_EXCHANGE_URL.to_owned()),
        })
    }
}

fn currency(
    raw: Option<String>,
    field: &'static str,
    env: &'static str,
) -> Result<CurrencyCode, CliError> {
    let value = raw.ok_or(CliError::MissingArgument { field, env })?;
    CurrencyCode::parse(&value).map_err(|err| CliError::InvalidArgument {
        field,
        message: err.to_string(),
    })
}

impl TryFrom<WeatherArgs> for WeatherConfig {
    type Error = CliError;

    fn try_from(args: WeatherArgs) -> Result<Self, Self::Error> {
        let api_key = args.api_key.ok_or(CliError::MissingArgument {
            field: ARG_WEATHER_API_KEY,
            env: ENV_WEATHER_API_KEY,
        })?;
        let query = match (args.city, args.lat, args.lng) {
            (Some(_), Some(_), _) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_WEATHER_CITY,
                    second: ARG_WEATHER_LAT,
                });
            }
            (Some(_), None, Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_WEATHER_CITY,
                    second: ARG_WEATHER_LNG,
                });
            }
            (Some(city), None, None) => WeatherQuery::City(city),
            (None, Some(lat), Some(lng)) => {
                let point = GeoPoint::new(lat, lng).ok_or_else(|| CliError::InvalidArgument {
                    field: ARG_WEATHER_LAT,
                    message: format!("({lat}, {lng}) is not a valid coordinate"),
                })?;
                WeatherQuery::Coordinates(point)
            }
            (None, Some(_), None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_WEATHER_LNG,
                    env: ENV_WEATHER_LNG,
                });
            }
            (None, None, _) => {
                return Err(CliError::MissingArgument {
                    field: ARG_WEATHER_CITY,
                    env: ENV_WEATHER_CITY,
                });
            }
        };
        Ok(Self {
            query,
            api_key,
            weather_url: args
                .weather_url
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_owned()),
        })
    }
}

/// Builds the lookup clients for reference-data commands.
pub(crate) trait ReferenceBuilder {
    fn countries(&self, base_url: &str) -> Result<Box<dyn CountrySource>, CliError>;
    fn rates(&self, base_url: &str) -> Result<Box<dyn RateSource>, CliError>;
    fn weather(&self, base_url: &str, api_key: &str) -> Result<Box<dyn WeatherSource>, CliError>;
}

pub(crate) struct DefaultReferenceBuilder;

impl ReferenceBuilder for DefaultReferenceBuilder {
    fn countries(&self, base_url: &str) -> Result<Box<dyn CountrySource>, CliError> {
        let client = HttpCountryClient::with_config(HttpClientConfig::new(base_url))?;
        Ok(Box::new(client))
    }

    fn rates(&self, base_url: &str) -> Result<Box<dyn RateSource>, CliError> {
        let client = HttpExchangeRateClient::with_config(HttpClientConfig::new(base_url))?;
        Ok(Box::new(client))
    }

    fn weather(&self, base_url: &str, api_key: &str) -> Result<Box<dyn WeatherSource>, CliError> {
        let client = HttpWeatherClient::with_config(HttpClientConfig::new(base_url), api_key)?;
        Ok(Box::new(client))
    }
}

/// Output of the `convert` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ConversionOutput {
    pub(crate) amount: f64,
    pub(crate) from: CurrencyCode,
    pub(crate) to: CurrencyCode,
    pub(crate) converted: f64,
    pub(crate) rate_date: Option<String>,
}

pub(crate) fn run_country_with(
    args: CountryArgs,
    builder: &dyn ReferenceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = CountryConfig::try_from(merged)?;
    let source = builder.countries(&config.countries_url)?;
    let profile = block_on(source.fetch_country(&config.code))??;
    emit_json(writer, None, &profile)
}

pub(crate) fn run_convert_with(
    args: ConvertArgs,
    builder: &dyn ReferenceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ConvertConfig::try_from(merged)?;
    let output = execute_convert(&config, builder)?;
    emit_json(writer, None, &output)
}

pub(crate) fn execute_convert(
    config: &ConvertConfig,
    builder: &dyn ReferenceBuilder,
) -> Result<ConversionOutput, CliError> {
    let source = builder.rates(&config.rates_url)?;
    let rates = block_on(source.latest_rates(&config.from))??;
    let converted = rates.convert(config.amount, &config.from, &config.to)?;
    Ok(ConversionOutput {
        amount: config.amount,
        from: config.from.clone(),
        to: config.to.clone(),
        converted,
        rate_date: rates.date,
    })
}

pub(crate) fn run_weather_with(
    args: WeatherArgs,
    builder: &dyn ReferenceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = WeatherConfig::try_from(merged)?;
    let source = builder.weather(&config.weather_url, &config.api_key)?;
    let report = block_on(source.current_weather(&config.query))??;
    emit_json(writer, None, &report)
}
