//! Network and file adapters for the breedbook catalogue.
//!
//! Responsibilities:
//! - Fetch catalogue pages over HTTP ([`catalog`]).
//! - Write exported records to timestamped JSON files ([`export`]).
//!
//! Boundaries:
//! - Do not encode reconciliation rules (live in `breedbook-core`).
//! - Keep blocking I/O off async executors.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod export;

pub use catalog::{HttpCatalogSource, HttpCatalogSourceConfig, SourceBuildError};
pub use export::{ExportWriteError, export_file_name, write_export};
