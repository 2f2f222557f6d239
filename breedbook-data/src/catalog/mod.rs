//! HTTP access to the public cat breed catalogue.
//!
//! [`HttpCatalogSource`] implements [`breedbook_core::CatalogSource`] by
//! issuing a single `GET {base_url}/breeds?limit={page_size}` request and
//! decoding the JSON page. The trait is synchronous; the source blocks on an
//! owned Tokio runtime internally.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use breedbook_core::{CatalogSource, Limit};
//! use breedbook_data::catalog::{HttpCatalogSource, HttpCatalogSourceConfig};
//!
//! let config = HttpCatalogSourceConfig::new("https://catfact.ninja")
//!     .with_timeout(Duration::from_secs(10));
//! let source = HttpCatalogSource::with_config(config)?;
//!
//! let page = source.fetch_page(Limit::new(25))?;
//! println!("fetched {} breeds", page.data.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod page;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use page::parse_page;
pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpCatalogSource, HttpCatalogSourceConfig,
    SourceBuildError,
};
