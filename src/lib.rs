//! Facade crate for the breedbook catalogue mirror.
//!
//! This crate re-exports the core domain types, the reconciliation pass, and
//! the store seam. The SQLite-backed store is exposed behind the
//! `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use breedbook_core::{
    ArgumentError, Breed, BreedId, BreedRecord, CatalogPage, CatalogSource, CommitSummary,
    Country, CountryId, EntityStore, Exporter, FetchError, IngestError, Limit, MemoryStore,
    NewBreed, PendingCountry, ReconcilePlan, ReconcileReport, Reconciler, StoreError, ingest,
};

#[cfg(feature = "store-sqlite")]
pub use breedbook_core::SqliteEntityStore;
