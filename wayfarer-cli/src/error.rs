//! Error types emitted by the Wayfarer CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use wayfarer_core::{ConversionError, QueryError};
use wayfarer_data::{ClientBuildError, LookupError, VenueFetchError};

/// Errors emitted by the Wayfarer CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Two options that cannot be combined were both set.
    #[error("--{first} cannot be combined with --{second}")]
    ConflictingArguments {
        first: &'static str,
        second: &'static str,
    },
    /// An option value could not be interpreted.
    #[error("invalid --{field}: {message}")]
    InvalidArgument {
        field: &'static str,
        message: String,
    },
    /// The venue search parameters were rejected.
    #[error("invalid venue search: {0}")]
    InvalidQuery(#[from] QueryError),
    /// An HTTP client could not be constructed.
    #[error(transparent)]
    BuildClient(#[from] ClientBuildError),
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Fetching venues failed.
    #[error("failed to fetch venues: {0}")]
    FetchVenues(#[from] VenueFetchError),
    /// A reference-data lookup failed.
    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),
    /// Currency conversion failed.
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConversionError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output to the terminal failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Writing command output to a file failed.
    #[error("failed to write output to {path:?}: {source}")]
    WriteOutputFile {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
