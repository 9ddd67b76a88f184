use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use reqwest::header::ACCEPT;
use url::Url;

use super::sparql::{SparqlResponse, image_query};
use crate::http::{self, ClientBuildError, HttpClientConfig, TransportError};

/// Public Wikidata Query Service endpoint.
pub const DEFAULT_SPARQL_URL: &str = "https://query.wikidata.org/sparql";

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Resolves a Wikidata entity to an image URL.
#[async_trait(?Send)]
pub trait ImageResolver {
    /// Look up the image of entity `id`.
    ///
    /// Returns `Ok(None)` when the entity has no image or `id` is not a valid
    /// entity id.
    async fn resolve_image(&self, id: &str) -> Result<Option<String>, TransportError>;
}

#[async_trait(?Send)]
impl<T: ImageResolver + ?Sized> ImageResolver for Box<T> {
    async fn resolve_image(&self, id: &str) -> Result<Option<String>, TransportError> {
        (**self).resolve_image(id).await
    }
}

/// SPARQL-backed [`ImageResolver`].
#[derive(Debug, Clone)]
pub struct HttpImageResolver {
    client: Client,
    config: HttpClientConfig,
}

impl HttpImageResolver {
    /// Resolver for the public query service.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(HttpClientConfig::new(DEFAULT_SPARQL_URL))
    }

    /// Resolver for a custom SPARQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, ClientBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    /// The configuration this resolver was built from.
    #[must_use]
    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn query_url(&self, query: &str) -> Result<Url, TransportError> {
        Url::parse_with_params(
            self.config.endpoint(),
            &[("query", query), ("format", "json")],
        )
        .map_err(|err| TransportError::Network {
            url: self.config.endpoint().to_owned(),
            message: err.to_string(),
        })
    }
}

#[async_trait(?Send)]
impl ImageResolver for HttpImageResolver {
    async fn resolve_image(&self, id: &str) -> Result<Option<String>, TransportError> {
        let Some(query) = image_query(id) else {
            debug!("not querying Wikidata for malformed id {id:?}");
            return Ok(None);
        };
        let url = self.query_url(&query)?;
        let display = self.config.endpoint();
        let request = self.client.get(url).header(ACCEPT, SPARQL_RESULTS_JSON);
        let response: SparqlResponse =
            http::fetch_json(request, display, self.config.timeout).await?;
        Ok(response.into_image())
    }
}
