//! `ingest` command: fetch one catalogue page into the database.

use std::io::Write;

use breedbook_core::{Limit, ReconcileReport, ingest};
use camino::Utf8PathBuf;
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BASE_URL, ARG_DATABASE, ARG_PAGE_SIZE, ARG_TIMEOUT_SECS, CatalogSourceBuilder, CliError,
    ENV_INGEST_PAGE_SIZE, SourceSettings, open_store, resolve_database, write_line,
};

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fetch the first page of the breed catalogue and merge it \
                 into the database. Breeds already stored are skipped; \
                 countries are created as needed. Values can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Fetch one catalogue page into the database"
)]
#[ortho_config(prefix = "BREEDBOOK")]
pub(crate) struct IngestArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Catalogue base URL (e.g. "https://catfact.ninja").
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
}

impl IngestArgs {
    pub(crate) fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Resolved `ingest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IngestConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) source: SourceSettings,
    pub(crate) page_size: Limit,
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let raw = args.page_size.ok_or(CliError::MissingArgument {
            field: ARG_PAGE_SIZE,
            env: ENV_INGEST_PAGE_SIZE,
        })?;
        Ok(Self {
            database: resolve_database(args.database),
            source: SourceSettings::resolve(args.base_url, args.timeout_secs),
            page_size: Limit::from_signed(ARG_PAGE_SIZE, raw)?,
        })
    }
}

pub(crate) fn run_ingest_with(
    args: IngestArgs,
    builder: &dyn CatalogSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_ingest(&config, builder)?;
    write_report(writer, &report)
}

pub(crate) fn execute_ingest(
    config: &IngestConfig,
    builder: &dyn CatalogSourceBuilder,
) -> Result<ReconcileReport, CliError> {
    if config.page_size.is_zero() {
        debug!("page size is zero; skipping catalogue source and database");
        return Ok(ReconcileReport::default());
    }
    let source = builder.build(&config.source)?;
    let mut store = open_store(&config.database)?;
    Ok(ingest(&*source, &mut store, config.page_size)?)
}

pub(crate) fn write_report(
    writer: &mut dyn Write,
    report: &ReconcileReport,
) -> Result<(), CliError> {
    write_line(
        writer,
        &format!(
            "ingested {} record(s): {} new country(ies), {} new breed(s), {} duplicate(s) skipped",
            report.records,
            report.countries_created,
            report.breeds_created,
            report.duplicates_skipped
        ),
    )
}
