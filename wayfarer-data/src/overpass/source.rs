use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use wayfarer_core::OsmElement;

use super::response::decode_elements;
use crate::http::{self, ClientBuildError, HttpClientConfig, TransportError};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Executes Overpass QL scripts.
#[async_trait(?Send)]
pub trait OverpassSource {
    /// Run `query` and return every element in the response.
    async fn run_query(&self, query: &str) -> Result<Vec<OsmElement>, TransportError>;
}

#[async_trait(?Send)]
impl<T: OverpassSource + ?Sized> OverpassSource for Box<T> {
    async fn run_query(&self, query: &str) -> Result<Vec<OsmElement>, TransportError> {
        (**self).run_query(query).await
    }
}

/// HTTP implementation of [`OverpassSource`].
///
/// The script is sent as the `data` field of a form-encoded POST, which
/// avoids URL length limits on large area queries.
#[derive(Debug, Clone)]
pub struct HttpOverpassClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpOverpassClient {
    /// Client for the public interpreter with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(HttpClientConfig::new(DEFAULT_OVERPASS_URL))
    }

    /// Client for an arbitrary interpreter endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, ClientBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl OverpassSource for HttpOverpassClient {
    async fn run_query(&self, query: &str) -> Result<Vec<OsmElement>, TransportError> {
        let url = self.config.endpoint();
        debug!("posting {} byte Overpass query to {url}", query.len());
        let request = self.client.post(url).form(&[("data", query)]);
        let response = http::send(request, url, self.config.timeout).await?;
        let mut body = http::read_body(response, url, self.config.timeout).await?;
        let elements = decode_elements(&mut body, url)?;
        debug!("Overpass returned {} elements", elements.len());
        Ok(elements)
    }
}
