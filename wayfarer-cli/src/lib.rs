//! Command-line interface for Wayfarer's venue and reference-data lookups.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use std::future::Future;

mod error;
mod output;
mod reference;
mod venues;

pub use error::CliError;

use reference::{ConvertArgs, CountryArgs, DefaultReferenceBuilder, WeatherArgs};
use venues::{DefaultVenueSourcesBuilder, VenuesArgs};

pub(crate) const ARG_VENUES_KIND: &str = "kind";
pub(crate) const ARG_VENUES_COUNTRY: &str = "country";
pub(crate) const ARG_VENUES_LAT: &str = "lat";
pub(crate) const ARG_VENUES_LNG: &str = "lng";
pub(crate) const ARG_VENUES_RADIUS: &str = "radius";
pub(crate) const ARG_VENUES_LIMIT: &str = "limit";
pub(crate) const ARG_VENUES_IMAGE_LIMIT: &str = "image-limit";
pub(crate) const ARG_VENUES_FALLBACK: &str = "fallback";
pub(crate) const ARG_VENUES_OVERPASS_URL: &str = "overpass-url";
pub(crate) const ARG_VENUES_OUTPUT: &str = "output";
pub(crate) const ENV_VENUES_KIND: &str = "WAYFARER_CMDS_VENUES_KIND";
pub(crate) const ENV_VENUES_COUNTRY: &str = "WAYFARER_CMDS_VENUES_COUNTRY";
pub(crate) const ENV_VENUES_LAT: &str = "WAYFARER_CMDS_VENUES_LAT";
pub(crate) const ENV_VENUES_LNG: &str = "WAYFARER_CMDS_VENUES_LNG";

pub(crate) const ARG_COUNTRY_CODE: &str = "code";
pub(crate) const ENV_COUNTRY_CODE: &str = "WAYFARER_CMDS_COUNTRY_CODE";
pub(crate) const ARG_COUNTRIES_URL: &str = "countries-url";

pub(crate) const ARG_CONVERT_AMOUNT: &str = "amount";
pub(crate) const ARG_CONVERT_FROM: &str = "from";
pub(crate) const ARG_CONVERT_TO: &str = "to";
pub(crate) const ENV_CONVERT_AMOUNT: &str = "WAYFARER_CMDS_CONVERT_AMOUNT";
pub(crate) const ENV_CONVERT_FROM: &str = "WAYFARER_CMDS_CONVERT_FROM";
pub(crate) const ENV_CONVERT_TO: &str = "WAYFARER_CMDS_CONVERT_TO";
pub(crate) const ARG_RATES_URL: &str = "rates-url";

pub(crate) const ARG_WEATHER_CITY: &str = "city";
pub(crate) const ARG_WEATHER_LAT: &str = "lat";
pub(crate) const ARG_WEATHER_LNG: &str = "lng";
pub(crate) const ARG_WEATHER_API_KEY: &str = "api-key";
pub(crate) const ARG_WEATHER_URL: &str = "weather-url";
pub(crate) const ENV_WEATHER_CITY: &str = "WAYFARER_CMDS_WEATHER_CITY";
pub(crate) const ENV_WEATHER_LNG: &str = "WAYFARER_CMDS_WEATHER_LNG";
pub(crate) const ENV_WEATHER_API_KEY: &str = "WAYFARER_CMDS_WEATHER_API_KEY";

/// Run the Wayfarer CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Venues(args) => {
            venues::run_venues_with(args, &DefaultVenueSourcesBuilder, &mut stdout)
        }
        Command::Country(args) => {
            reference::run_country_with(args, &DefaultReferenceBuilder, &mut stdout)
        }
        Command::Convert(args) => {
            reference::run_convert_with(args, &DefaultReferenceBuilder, &mut stdout)
        }
        Command::Weather(args) => {
            reference::run_weather_with(args, &DefaultReferenceBuilder, &mut stdout)
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wayfarer",
    about = "Venue discovery and reference-data lookups for travel content",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch restaurants or hotels from OpenStreetMap.
    Venues(VenuesArgs),
    /// Show a country profile.
    Country(CountryArgs),
    /// Convert an amount between currencies.
    Convert(ConvertArgs),
    /// Show current weather for a city or position.
    Weather(WeatherArgs),
}

/// Drive `future` to completion on a single-threaded runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests;
