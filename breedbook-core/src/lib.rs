//! Core domain types for the breedbook catalogue.
//!
//! The crate owns the entity model (countries and the breeds they own), the
//! [`EntityStore`] seam, and the reconciliation pass that merges a fetched
//! batch of [`BreedRecord`] values into a store without creating duplicate
//! breeds or countries. Network and file I/O live in `breedbook-data`; this
//! crate only consumes them through the [`CatalogSource`] trait.

#![forbid(unsafe_code)]

pub mod catalog;
mod entity;
pub mod export;
pub mod ingest;
mod limit;
mod record;
pub mod reconcile;
pub mod store;
#[doc(hidden)]
pub mod test_support;

pub use catalog::{CatalogPage, CatalogSource, FetchError};
pub use entity::{Breed, BreedId, CommitSummary, Country, CountryId, NewBreed, PendingCountry};
pub use export::Exporter;
pub use ingest::{IngestError, ingest};
pub use limit::{ArgumentError, Limit};
pub use record::BreedRecord;
pub use reconcile::{ReconcilePlan, ReconcileReport, Reconciler};
pub use store::{EntityStore, MemoryStore, StoreError};

#[cfg(feature = "store-sqlite")]
pub use store::SqliteEntityStore;
