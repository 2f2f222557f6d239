//! `sync` command: ingest one page and export in a single run.

use std::io::Write;

use breedbook_core::Limit;
use camino::Utf8PathBuf;
use chrono::NaiveDateTime;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::export::{ExportConfig, export_from, resolve_output_dir};
use crate::ingest::{IngestConfig, execute_ingest, write_report};
use crate::{
    ARG_BASE_URL, ARG_DATABASE, ARG_LIMIT, ARG_OUTPUT_DIR, ARG_PAGE_SIZE, ARG_TIMEOUT_SECS,
    CatalogSourceBuilder, CliError, ENV_SYNC_LIMIT, ENV_SYNC_PAGE_SIZE, SourceSettings,
    open_store, resolve_database,
};

/// CLI arguments for the `sync` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fetch the first catalogue page into the database, then \
                 export up to --limit breeds. Both sizes are validated \
                 before any I/O.",
    about = "Ingest one page, then export"
)]
#[ortho_config(prefix = "BREEDBOOK")]
pub(crate) struct SyncArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Catalogue base URL.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// HTTP timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Number of records to request.
    #[arg(long = ARG_PAGE_SIZE, value_name = "count", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) page_size: Option<i64>,
    /// Maximum number of breeds to export.
    #[arg(long = ARG_LIMIT, value_name = "count", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) limit: Option<i64>,
    /// Directory receiving the export file.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
}

/// Resolved `sync` configuration: an ingest followed by an export against
/// the same database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyncConfig {
    pub(crate) ingest: IngestConfig,
    pub(crate) export: ExportConfig,
}

impl TryFrom<SyncArgs> for SyncConfig {
    type Error = CliError;

    fn try_from(args: SyncArgs) -> Result<Self, Self::Error> {
        let page_size = args.page_size.ok_or(CliError::MissingArgument {
            field: ARG_PAGE_SIZE,
            env: ENV_SYNC_PAGE_SIZE,
        })?;
        let limit = args.limit.ok_or(CliError::MissingArgument {
            field: ARG_LIMIT,
            env: ENV_SYNC_LIMIT,
        })?;
        let database = resolve_database(args.database);
        Ok(Self {
            ingest: IngestConfig {
                database: database.clone(),
                source: SourceSettings::resolve(args.base_url, args.timeout_secs),
                page_size: Limit::from_signed(ARG_PAGE_SIZE, page_size)?,
            },
            export: ExportConfig {
                database,
                limit: Limit::from_signed(ARG_LIMIT, limit)?,
                output_dir: resolve_output_dir(args.output_dir),
            },
        })
    }
}

pub(crate) fn run_sync_with(
    args: SyncArgs,
    builder: &dyn CatalogSourceBuilder,
    now: NaiveDateTime,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = SyncConfig::try_from(merged)?;
    let report = execute_ingest(&config.ingest, builder)?;
    write_report(writer, &report)?;
    // A zero page size skips ingest entirely, so the database may not exist yet.
    let store = open_store(&config.export.database)?;
    export_from(&store, &config.export, now, writer)
}
