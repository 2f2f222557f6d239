//! Error types emitted by the breedbook CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use breedbook_core::{ArgumentError, IngestError, StoreError};
use breedbook_data::{ExportWriteError, SourceBuildError};
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the breedbook CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A size argument was negative or too large.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
    /// The database's parent directory could not be created.
    #[error("failed to prepare database directory for {path:?}: {source}")]
    PrepareDatabase {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The entity store could not be opened or queried.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Constructing the catalogue source failed.
    #[error("failed to build catalogue source for {base_url:?}: {source}")]
    BuildCatalogSource {
        base_url: String,
        #[source]
        source: SourceBuildError,
    },
    /// Fetching or reconciling the catalogue page failed.
    #[error("ingest failed: {0}")]
    Ingest(#[from] IngestError),
    /// Writing the export file failed.
    #[error(transparent)]
    WriteExport(#[from] ExportWriteError),
    /// Writing command output failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
