use thiserror::Error;

/// Errors from [`crate::catalog::CatalogSource::fetch_page`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request could not be sent or the connection dropped.
    #[error("network error fetching {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The catalogue answered with a non-success status.
    #[error("catalogue returned HTTP {status} for {url}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// The response body was not a valid catalogue page.
    ///
    /// A record missing any of its five fields lands here.
    #[error("malformed catalogue page: {message}")]
    Parse {
        /// Parser error description.
        message: String,
    },
}

impl FetchError {
    /// Build a [`FetchError::Parse`] from any displayable error.
    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}
