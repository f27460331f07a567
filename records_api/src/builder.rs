//!
//! ```rust,ignore
//! // 1. Using the builder with explicit configuration
//! let api = RecordsApi::builder()
//!     .base_url("http://localhost:3001/api")
//!     .token_store(Arc::new(MemoryTokenStore::new()))
//!     .timeout(30)
//!     .build()?;
//!
//! // 2. Using the environment variable RECORDS_API_URL
//! let api = RecordsApi::builder()
//!     .from_env()
//!     .build()?;
//! ```
use crate::token_store::{MemoryTokenStore, TokenStore};
use crate::{RecordsApi, DEFAULT_API_URL};
use log::debug;
use reqwest::Client;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error type for `RecordsApiBuilder` operations
#[derive(Error, Debug)]
pub enum RecordsApiBuilderError {
    #[error("URL parsing error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("HTTP client initialization error: {0}")]
    ClientInitError(String),

    #[error("Timeout must be positive")]
    InvalidTimeout,
}

/// Names of the environment variables understood by [`RecordsApiBuilder::from_env`]
pub struct RecordsEnvVars;

impl RecordsEnvVars {
    pub const API_URL: &'static str = "RECORDS_API_URL";
}

/// Builder for creating `RecordsApi` instances with flexible configuration options
#[derive(Default)]
pub struct RecordsApiBuilder {
    base_url: Option<String>,
    token_store: Option<Arc<dyn TokenStore>>,
    timeout: Option<Duration>,
}

impl RecordsApiBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base url, i.e. `http://localhost:3001/api`
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Where the bearer token is read from on every request.
    /// Defaults to a [`MemoryTokenStore`]
    #[must_use]
    pub fn token_store(mut self, token_store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(token_store);
        self
    }

    /// Sets a request timeout in seconds
    #[must_use]
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    /// Overrides the base url with `RECORDS_API_URL` when that variable is set
    #[must_use]
    pub fn from_env(self) -> Self {
        match env::var(RecordsEnvVars::API_URL) {
            Ok(url) if !url.trim().is_empty() => self.base_url(url),
            _ => self,
        }
    }

    /// Builds a `RecordsApi` instance with the configured parameters
    ///
    /// # Errors
    /// Fails if the base url does not parse, the timeout is zero or the HTTP client can not
    /// be created.
    pub fn build(self) -> Result<RecordsApi, RecordsApiBuilderError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base = RecordsApi::parse_base(&base_url).map_err(|e| match e {
            crate::ApiError::InvalidUrl(e) => RecordsApiBuilderError::UrlParseError(e),
            other => RecordsApiBuilderError::ClientInitError(other.to_string()),
        })?;

        let mut client_builder = Client::builder();
        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(RecordsApiBuilderError::InvalidTimeout);
            }
            client_builder = client_builder.timeout(timeout);
        }
        let client = client_builder
            .build()
            .map_err(|e| RecordsApiBuilderError::ClientInitError(e.to_string()))?;

        let api = RecordsApi {
            base,
            token_store: self
                .token_store
                .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
            client,
        };
        debug!("Created Records client: {:?}", api);

        Ok(api)
    }
}

impl RecordsApi {
    /// Create a `RecordsApi` builder
    #[must_use]
    pub fn builder() -> RecordsApiBuilder {
        RecordsApiBuilder::new()
    }
}
