//! Venues command implementation for the Wayfarer CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use wayfarer_core::{SearchArea, Venue, VenueKind, VenueQuery};
use wayfarer_data::lookup::{CountrySource, HttpCountryClient};
use wayfarer_data::overpass::{DEFAULT_OVERPASS_URL, HttpOverpassClient, OverpassSource};
use wayfarer_data::wikidata::{HttpImageResolver, ImageResolver};
use wayfarer_data::{
    DEFAULT_IMAGE_LOOKUP_LIMIT, HttpClientConfig, VenueFetcher, VenueFetcherConfig, VenueReport,
};

use crate::output::emit_json;
use crate::{
    ARG_VENUES_COUNTRY, ARG_VENUES_FALLBACK, ARG_VENUES_IMAGE_LIMIT, ARG_VENUES_KIND,
    ARG_VENUES_LAT, ARG_VENUES_LIMIT, ARG_VENUES_LNG, ARG_VENUES_OUTPUT, ARG_VENUES_OVERPASS_URL,
    ARG_VENUES_RADIUS, CliError, ENV_VENUES_COUNTRY, ENV_VENUES_KIND, ENV_VENUES_LAT,
    ENV_VENUES_LNG, block_on,
};

pub(crate) const DEFAULT_VENUE_LIMIT: usize = 20;
pub(crate) const DEFAULT_RADIUS_M: f64 = 5_000.0;

/// CLI arguments for the `venues` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "venues",
    long_about = "Query OpenStreetMap through the Overpass API for restaurants \
                 or hotels inside a country or around a position, then fill \
                 missing images from Wikidata. Settings can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Fetch restaurants or hotels from OpenStreetMap"
)]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct VenuesArgs {
    /// Venue kind: `restaurant` or `hotel`.
    #[arg(long = ARG_VENUES_KIND, value_name = "kind")]
    #[serde(default)]
    pub(crate) kind: Option<String>,
    /// ISO 3166-1 alpha-2 country code to search within.
    #[arg(long = ARG_VENUES_COUNTRY, value_name = "code")]
    #[serde(default)]
    pub(crate) country: Option<String>,
    /// Latitude of the search centre.
    #[arg(long = ARG_VENUES_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the search centre.
    #[arg(long = ARG_VENUES_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Search radius in metres (default 5000).
    #[arg(long = ARG_VENUES_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Maximum number of venues (default 20).
    #[arg(long = ARG_VENUES_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Maximum Wikidata image lookups; 0 disables enrichment (default 10).
    #[arg(long = ARG_VENUES_IMAGE_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) image_limit: Option<usize>,
    /// Retry around the capital when a country search fails or is empty.
    #[arg(long = ARG_VENUES_FALLBACK)]
    #[serde(default)]
    pub(crate) fallback: bool,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_VENUES_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Write the JSON result to this file instead of stdout.
    #[arg(long = ARG_VENUES_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl VenuesArgs {
    pub(crate) fn into_config(self) -> Result<VenuesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        VenuesConfig::try_from(merged)
    }
}

/// Resolved `venues` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VenuesConfig {
    /// Validated search.
    pub(crate) query: VenueQuery,
    /// Wikidata lookup cap.
    pub(crate) image_limit: usize,
    /// Whether country searches may fall back to a radius search.
    pub(crate) fallback: bool,
    /// Overpass endpoint.
    pub(crate) overpass_url: String,
    /// Output file, stdout when absent.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<VenuesArgs> for VenuesConfig {
    type Error = CliError;

    fn try_from(args: VenuesArgs) -> Result<Self, Self::Error> {
        let raw_kind = args.kind.ok_or(CliError::MissingArgument {
            field: ARG_VENUES_KIND,
            env: ENV_VENUES_KIND,
        })?;
        let kind = raw_kind
            .parse::<VenueKind>()
            .map_err(|err| CliError::InvalidArgument {
                field: ARG_VENUES_KIND,
                message: err.to_string(),
            })?;
        let limit = args.limit.unwrap_or(DEFAULT_VENUE_LIMIT);

        let query = match (args.country, args.lat, args.lng) {
            (Some(_), Some(_), _) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_VENUES_COUNTRY,
                    second: ARG_VENUES_LAT,
                });
            }
            (Some(_), None, Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_VENUES_COUNTRY,
                    second: ARG_VENUES_LNG,
                });
            }
            (Some(country), None, None) => VenueQuery::in_country(kind, &country, limit)?,
            (None, Some(lat), Some(lng)) => {
                if args.fallback {
                    return Err(CliError::ConflictingArguments {
                        first: ARG_VENUES_FALLBACK,
                        second: ARG_VENUES_LAT,
                    });
                }
                let radius = args.radius.unwrap_or(DEFAULT_RADIUS_M);
                VenueQuery::near(kind, lat, lng, radius, limit)?
            }
            (None, Some(_), None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_VENUES_LNG,
                    env: ENV_VENUES_LNG,
                });
            }
            (None, None, Some(_)) => {
                return Err(CliError::MissingArgument {
                    field: ARG_VENUES_LAT,
                    env: ENV_VENUES_LAT,
                });
            }
            (None, None, None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_VENUES_COUNTRY,
                    env: ENV_VENUES_COUNTRY,
                });
            }
        };

        Ok(Self {
            query,
            image_limit: args.image_limit.unwrap_or(DEFAULT_IMAGE_LOOKUP_LIMIT),
            fallback: args.fallback,
            overpass_url: args
                .overpass_url
                .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_owned()),
            output: args.output,
        })
    }
}

/// Remote sources used by one `venues` invocation.
pub(crate) struct VenueSources {
    pub(crate) overpass: Box<dyn OverpassSource>,
    pub(crate) images: Box<dyn ImageResolver>,
    pub(crate) countries: Box<dyn CountrySource>,
}

/// Builds the remote sources for the current `venues` invocation.
pub(crate) trait VenueSourcesBuilder {
    fn build(&self, config: &VenuesConfig) -> Result<VenueSources, CliError>;
}

pub(crate) struct DefaultVenueSourcesBuilder;

impl VenueSourcesBuilder for DefaultVenueSourcesBuilder {
    fn build(&self, config: &VenuesConfig) -> Result<VenueSources, CliError> {
        let overpass = HttpOverpassClient::with_config(HttpClientConfig::new(
            config.overpass_url.clone(),
        ))?;
        Ok(VenueSources {
            overpass: Box::new(overpass),
            images: Box::new(HttpImageResolver::new()?),
            countries: Box::new(HttpCountryClient::new()?),
        })
    }
}

pub(crate) fn run_venues_with(
    args: VenuesArgs,
    builder: &dyn VenueSourcesBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_venues(&config, builder)?;
    write_venues(writer, &config, &report.venues)
}

pub(crate) fn execute_venues(
    config: &VenuesConfig,
    builder: &dyn VenueSourcesBuilder,
) -> Result<VenueReport, CliError> {
    let sources = builder.build(config)?;
    let fetcher = VenueFetcher::with_config(
        sources.overpass,
        sources.images,
        VenueFetcherConfig::default().with_image_lookup_limit(config.image_limit),
    );
    let query = &config.query;
    let report = match (&query.area, config.fallback) {
        (SearchArea::Country(code), true) => block_on(
            fetcher.fetch_in_country_with_fallback(
                query.kind,
                code.as_ref(),
                query.limit,
                sources.countries.as_ref(),
            ),
        )??,
        _ => block_on(fetcher.fetch_report(query))??,
    };
    if report.fallback_used {
        info!("country search returned nothing; used the radius fallback");
    }
    Ok(report)
}

fn write_venues(
    writer: &mut dyn Write,
    config: &VenuesConfig,
    venues: &[Venue],
) -> Result<(), CliError> {
    emit_json(writer, config.output.as_deref(), venues)
}
