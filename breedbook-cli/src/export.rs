//! `export` command: write stored breeds to a timestamped JSON file.

use std::io::Write;

use breedbook_core::{Exporter, Limit, SqliteEntityStore};
use breedbook_data::write_export;
use camino::Utf8PathBuf;
use chrono::NaiveDateTime;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_LIMIT, ARG_OUTPUT_DIR, CliError, ENV_EXPORT_LIMIT, open_store_read_only,
    resolve_database, write_line,
};

/// CLI arguments for the `export` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read up to --limit breeds in insertion order and write \
                 them as a JSON array to DDMMYYYYhhmmss.json in the output \
                 directory.",
    about = "Export stored breeds to JSON"
)]
#[ortho_config(prefix = "BREEDBOOK")]
pub(crate) struct ExportArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Maximum number of breeds to export.
    #[arg(long = ARG_LIMIT, value_name = "count", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) limit: Option<i64>,
    /// Directory receiving the export file.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
}

impl ExportArgs {
    pub(crate) fn into_config(self) -> Result<ExportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExportConfig::try_from(merged)
    }
}

/// Resolved `export` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) limit: Limit,
    pub(crate) output_dir: Utf8PathBuf,
}

impl TryFrom<ExportArgs> for ExportConfig {
    type Error = CliError;

    fn try_from(args: ExportArgs) -> Result<Self, Self::Error> {
        let raw = args.limit.ok_or(CliError::MissingArgument {
            field: ARG_LIMIT,
            env: ENV_EXPORT_LIMIT,
        })?;
        Ok(Self {
            database: resolve_database(args.database),
            limit: Limit::from_signed(ARG_LIMIT, raw)?,
            output_dir: resolve_output_dir(args.output_dir),
        })
    }
}

pub(crate) fn resolve_output_dir(output_dir: Option<Utf8PathBuf>) -> Utf8PathBuf {
    output_dir.unwrap_or_else(|| Utf8PathBuf::from("."))
}

pub(crate) fn run_export_with(
    args: ExportArgs,
    now: NaiveDateTime,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_export(&config, now, writer)
}

pub(crate) fn execute_export(
    config: &ExportConfig,
    now: NaiveDateTime,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let store = open_store_read_only(&config.database)?;
    export_from(&store, config, now, writer)
}

/// Export from an already opened store, ignoring `config.database`.
pub(crate) fn export_from(
    store: &SqliteEntityStore,
    config: &ExportConfig,
    now: NaiveDateTime,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let records = Exporter::new(store).export(config.limit)?;
    let path = write_export(&config.output_dir, &records, now)?;
    write_line(
        writer,
        &format!("exported {} record(s) to {path}", records.len()),
    )
}
