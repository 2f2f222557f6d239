//! Fetch breed records from an external catalogue.
//!
//! The [`CatalogSource`] trait abstracts the retrieval of one page of
//! [`BreedRecord`](crate::BreedRecord) values. It is synchronous so the core
//! crate stays embeddable; HTTP implementations live in `breedbook-data` and
//! bridge to async clients internally.
//!
//! Fetch failures are reported as [`FetchError`] and are never retried here.

mod error;
mod source;

pub use error::FetchError;
pub use source::{CatalogPage, CatalogSource};
