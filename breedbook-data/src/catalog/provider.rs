//! HTTP-backed [`CatalogSource`] for the cat breed catalogue.

use std::time::Duration;

use breedbook_core::{CatalogPage, CatalogSource, FetchError, Limit};
use log::debug;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::page::parse_page;

/// Error type for [`HttpCatalogSource`] construction failures.
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Public catalogue endpoint.
pub const DEFAULT_BASE_URL: &str = "https://catfact.ninja";

/// Default user agent for catalogue requests.
pub const DEFAULT_USER_AGENT: &str = "breedbook/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpCatalogSource`].
#[derive(Debug, Clone)]
pub struct HttpCatalogSourceConfig {
    /// Base URL of the catalogue, without the `/breeds` path.
    pub base_url: String,
    /// Connect and total request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpCatalogSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpCatalogSourceConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
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
}

/// Catalogue source fetching breed pages over HTTP.
///
/// The synchronous [`CatalogSource`] trait is implemented by blocking on an
/// owned current-thread Tokio runtime. When called from inside a
/// multi-threaded runtime the caller's handle is used through
/// [`tokio::task::block_in_place`] instead. Calling from inside a
/// current-thread runtime is not supported and panics.
///
/// No retries are attempted; every failure surfaces as a [`FetchError`].
pub struct HttpCatalogSource {
    client: Client,
    config: HttpCatalogSourceConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpCatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogSource")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpCatalogSource {
    /// Create a source for `base_url` with default timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceBuildError> {
        Self::with_config(HttpCatalogSourceConfig::new(base_url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpCatalogSourceConfig) -> Result<Self, SourceBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(SourceBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SourceBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// The configuration this source was built with.
    #[must_use]
    pub fn config(&self) -> &HttpCatalogSourceConfig {
        &self.config
    }

    /// Build the page URL: `{base_url}/breeds?limit={page_size}`.
    fn build_page_url(&self, page_size: Limit) -> String {
        format!(
            "{}/breeds?limit={page_size}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn fetch_page_async(&self, page_size: Limit) -> Result<CatalogPage, FetchError> {
        let url = self.build_page_url(page_size);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        parse_page(&body)
    }

    /// Convert a reqwest error to a [`FetchError`].
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> FetchError {
        if error.is_timeout() {
            return FetchError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return FetchError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return FetchError::parse(error);
        }

        FetchError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch_page(&self, page_size: Limit) -> Result<CatalogPage, FetchError> {
        let future = self.fetch_page_async(page_size);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
