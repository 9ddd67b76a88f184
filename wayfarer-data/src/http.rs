//! Shared HTTP plumbing for the remote sources.
//!
//! Every adapter in this crate issues a single request per call and decodes
//! the JSON body; none of them retry. Errors carry the request URL with
//! credentials masked.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Default user agent for outgoing requests.
pub const DEFAULT_USER_AGENT: &str = "wayfarer/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Query parameters whose values never appear in logs or errors.
const SENSITIVE_PARAMS: [&str; 3] = ["appid", "api_key", "key"];
const REDACTED: &str = "REDACTED";

/// Transport-level errors encountered while talking to a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL, credentials masked.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL, credentials masked.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The connection failed or the body could not be read.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL, credentials masked.
        url: String,
        /// Underlying error description.
        message: String,
    },
    /// The body was not the expected JSON document.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Request URL, credentials masked.
        url: String,
        /// Parser error description.
        message: String,
    },
    /// The service answered successfully but reported an error in the body.
    #[error("{url} reported an error: {message}")]
    Service {
        /// Request URL, credentials masked.
        url: String,
        /// Message reported by the service.
        message: String,
    },
}

impl TransportError {
    /// HTTP status for [`TransportError::Http`] failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error returned when an HTTP client cannot be constructed.
#[derive(Debug, Error)]
#[error("failed to build HTTP client for {base_url}: {source}")]
pub struct ClientBuildError {
    /// Endpoint the client was configured for.
    pub base_url: String,
    /// Underlying builder failure.
    #[source]
    pub source: reqwest::Error,
}

/// Connection settings shared by every remote source.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use wayfarer_data::http::HttpClientConfig;
///
/// let config = HttpClientConfig::new("https://overpass.example/api/interpreter/")
///     .with_timeout(Duration::from_secs(90))
///     .with_user_agent("travel-cms/2.0");
/// assert_eq!(config.endpoint(), "https://overpass.example/api/interpreter");
/// assert_eq!(config.timeout, Duration::from_secs(90));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Service endpoint or base URL.
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpClientConfig {
    /// Create a configuration for `base_url` with default timeout and agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The base URL without trailing slashes.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Build a `reqwest` client honouring the timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error when the TLS backend cannot be initialised.
    pub fn build_client(&self) -> Result<Client, ClientBuildError> {
        Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(|source| ClientBuildError {
                base_url: self.base_url.clone(),
                source,
            })
    }
}

/// Mask credential query parameters in `url`.
///
/// # Examples
/// ```
/// use url::Url;
/// use wayfarer_data::http::redact_url;
///
/// let url = Url::parse("https://api.example/weather?q=Oslo&appid=secret").expect("valid");
/// assert_eq!(
///     redact_url(&url),
///     "https://api.example/weather?q=Oslo&appid=REDACTED",
/// );
/// ```
#[must_use]
pub fn redact_url(url: &Url) -> String {
    if !url
        .query_pairs()
        .any(|(key, _)| SENSITIVE_PARAMS.contains(&key.as_ref()))
    {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let shown = if SENSITIVE_PARAMS.contains(&key.as_ref()) {
                REDACTED.to_owned()
            } else {
                value.into_owned()
            };
            (key.into_owned(), shown)
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Send `request`, treating non-success statuses as errors.
///
/// `display_url` is what errors report; pass a redacted form when the real
/// URL carries credentials.
pub(crate) async fn send(
    request: RequestBuilder,
    display_url: &str,
    timeout: Duration,
) -> Result<Response, TransportError> {
    request
        .send()
        .await
        .map_err(|err| convert_reqwest_error(err, display_url, timeout))?
        .error_for_status()
        .map_err(|err| convert_reqwest_error(err, display_url, timeout))
}

/// Read the full response body.
pub(crate) async fn read_body(
    response: Response,
    display_url: &str,
    timeout: Duration,
) -> Result<Vec<u8>, TransportError> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|err| convert_reqwest_error(err, display_url, timeout))
}

/// Decode a JSON body with `serde_json`.
pub(crate) fn decode_json<T: DeserializeOwned>(
    body: &[u8],
    display_url: &str,
) -> Result<T, TransportError> {
    serde_json::from_slice(body).map_err(|err| TransportError::Decode {
        url: display_url.to_owned(),
        message: err.to_string(),
    })
}

/// Send a request and decode its JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    display_url: &str,
    timeout: Duration,
) -> Result<T, TransportError> {
    let response = send(request, display_url, timeout).await?;
    let body = read_body(response, display_url, timeout).await?;
    decode_json(&body, display_url)
}

/// Convert a `reqwest` error, dropping its embedded URL so credentials in
/// the query string never leak into messages.
pub(crate) fn convert_reqwest_error(
    error: reqwest::Error,
    display_url: &str,
    timeout: Duration,
) -> TransportError {
    let error = error.without_url();
    if error.is_timeout() {
        return TransportError::Timeout {
            url: display_url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return TransportError::Http {
            url: display_url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    if error.is_decode() {
        return TransportError::Decode {
            url: display_url.to_owned(),
            message: error.to_string(),
        };
    }

    TransportError::Network {
        url: display_url.to_owned(),
        message: error.to_string(),
    }
}
