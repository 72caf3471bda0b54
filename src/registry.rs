use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::domain::{BusinessId, BusinessIdError, Config, RegistryRecord};

mod http;
pub use http::HttpFetch;

/// A response as seen by the registry client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

/// The capability to issue an HTTP GET request.
///
/// Implementations return any response the server produced, whatever its
/// status. Only failures to obtain a response at all are errors.
pub trait Fetch {
    /// Fetches `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url)
    }
}

/// A failure to obtain a response from the registry.
#[derive(Debug, thiserror::Error)]
#[error("request failed: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Creates a transport error with the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self {
            message: "no response from the registry".to_string(),
            source: Some(Box::new(error)),
        }
    }
}

/// Errors that can occur when looking up a business.
///
/// A business which does not exist is not an error; see
/// [`RegistryLookup::find`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The business id is not valid. No request was made.
    #[error(transparent)]
    InvalidId(#[from] BusinessIdError),

    /// The registry could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The registry answered with an unexpected HTTP status.
    #[error("registry returned HTTP {status} for {url}")]
    Status {
        /// The status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// The registry's answer could not be interpreted.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse {
        /// The requested URL.
        url: String,
        /// What was wrong with the response.
        reason: String,
    },
}

#[derive(Deserialize)]
struct ResponseBody {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

/// Looks up businesses from the registry by business id.
///
/// The HTTP transport is injected, so that any [`Fetch`] implementation can
/// be used in place of [`HttpFetch`].
#[derive(Debug, Clone)]
pub struct RegistryLookup<F = HttpFetch> {
    fetch: F,
    base_url: String,
}

impl RegistryLookup<HttpFetch> {
    /// Creates a lookup using the configured endpoint and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let fetch = HttpFetch::new(config.timeout())?;
        Ok(Self::new(fetch, config.base_url()))
    }
}

impl<F: Fetch> RegistryLookup<F> {
    /// Creates a lookup which sends requests below `base_url` through `fetch`.
    pub fn new(fetch: F, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { fetch, base_url }
    }

    /// Returns the URL of the registry entry for a business id.
    #[must_use]
    pub fn url_for(&self, id: &BusinessId) -> String {
        format!("{}/{id}", self.base_url)
    }

    /// Finds the business with the given id.
    ///
    /// The id is validated and normalized before any request is made. Returns
    /// `Ok(None)` if the registry has no such business.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid, if the registry cannot be
    /// reached, or if its answer is neither a record nor "not found".
    #[instrument(level = "debug", skip(self))]
    pub fn find(&self, raw_id: &str) -> Result<Option<RegistryRecord>, Error> {
        let id = BusinessId::normalize(raw_id)?;
        self.find_by_id(&id)
    }

    /// Finds the business with an already validated id.
    ///
    /// # Errors
    ///
    /// See [`Self::find`].
    pub fn find_by_id(&self, id: &BusinessId) -> Result<Option<RegistryRecord>, Error> {
        let url = self.url_for(id);
        tracing::debug!("Fetching {url}");

        let response = self.fetch.get(&url)?;
        tracing::debug!(status = response.status, "Registry responded");

        match response.status {
            404 => {
                tracing::debug!("No registry entry for {id}");
                return Ok(None);
            }
            200..=299 => {}
            status => return Err(Error::Status { status, url }),
        }

        let record = parse_body(&response.body).map_err(|reason| {
            tracing::warn!("Malformed registry response for {id}: {reason}");
            Error::MalformedResponse {
                url: url.clone(),
                reason,
            }
        })?;

        let Some(record) = record else {
            tracing::debug!("Empty result set for {id}");
            return Ok(None);
        };
        tracing::info!("Found {id}: {}", record.name);
        Ok(Some(record))
    }
}

// A missing, null or empty `results` array means the business was not found.
fn parse_body(body: &str) -> Result<Option<RegistryRecord>, String> {
    let value: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }

    let body = ResponseBody::deserialize(value).map_err(|e| e.to_string())?;
    let Some(first) = body.results.and_then(|results| results.into_iter().next()) else {
        return Ok(None);
    };

    RegistryRecord::from_value(first)
        .map(Some)
        .map_err(|e| e.to_string())
}
