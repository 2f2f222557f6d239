//! Command-line interface for the breedbook catalogue.
#![forbid(unsafe_code)]

use std::io::Write;
use std::time::Duration;

use breedbook_core::{CatalogSource, SqliteEntityStore};
use breedbook_data::{HttpCatalogSource, HttpCatalogSourceConfig};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use log::debug;

mod count;
mod error;
mod export;
mod ingest;
mod sync;

pub use error::CliError;

use count::CountArgs;
use export::ExportArgs;
use ingest::IngestArgs;
use sync::SyncArgs;

const ARG_DATABASE: &str = "database";
const ARG_BASE_URL: &str = "base-url";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_PAGE_SIZE: &str = "page-size";
const ARG_LIMIT: &str = "limit";
const ARG_OUTPUT_DIR: &str = "output-dir";
const ARG_COUNTRY: &str = "country";
const ENV_INGEST_PAGE_SIZE: &str = "BREEDBOOK_CMDS_INGEST_PAGE_SIZE";
const ENV_EXPORT_LIMIT: &str = "BREEDBOOK_CMDS_EXPORT_LIMIT";
const ENV_COUNT_COUNTRY: &str = "BREEDBOOK_CMDS_COUNT_COUNTRY";
const ENV_SYNC_PAGE_SIZE: &str = "BREEDBOOK_CMDS_SYNC_PAGE_SIZE";
const ENV_SYNC_LIMIT: &str = "BREEDBOOK_CMDS_SYNC_LIMIT";

/// Database file used when `--database` is not given.
pub const DEFAULT_DATABASE: &str = "breedbook.db";

/// Run the breedbook CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    let builder = HttpCatalogSourceBuilder;
    match cli.command {
        Command::Ingest(args) => ingest::run_ingest_with(args, &builder, &mut stdout),
        Command::Export(args) => export::run_export_with(args, local_now(), &mut stdout),
        Command::Count(args) => count::run_count_with(args, &mut stdout),
        Command::Sync(args) => sync::run_sync_with(args, &builder, local_now(), &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "breedbook",
    about = "Mirror the public cat breed catalogue into a local database",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch one catalogue page and merge it into the database.
    Ingest(IngestArgs),
    /// Write stored breeds to a timestamped JSON file.
    Export(ExportArgs),
    /// Print how many breeds a country owns.
    Count(CountArgs),
    /// Ingest one page, then export.
    Sync(SyncArgs),
}

/// Where and how to reach the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceSettings {
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
}

impl SourceSettings {
    fn resolve(base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        let defaults = HttpCatalogSourceConfig::default();
        Self {
            base_url: base_url.unwrap_or(defaults.base_url),
            timeout: timeout_secs.map_or(defaults.timeout, Duration::from_secs),
        }
    }
}

/// Builds the catalogue source for the current invocation.
pub(crate) trait CatalogSourceBuilder {
    fn build(&self, settings: &SourceSettings) -> Result<Box<dyn CatalogSource>, CliError>;
}

struct HttpCatalogSourceBuilder;

impl CatalogSourceBuilder for HttpCatalogSourceBuilder {
    fn build(&self, settings: &SourceSettings) -> Result<Box<dyn CatalogSource>, CliError> {
        let config =
            HttpCatalogSourceConfig::new(settings.base_url.clone()).with_timeout(settings.timeout);
        let source = HttpCatalogSource::with_config(config).map_err(|source| {
            CliError::BuildCatalogSource {
                base_url: settings.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(source))
    }
}

fn resolve_database(database: Option<Utf8PathBuf>) -> Utf8PathBuf {
    database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE))
}

/// Open the SQLite store at `path`, creating its directory when missing.
fn open_store(path: &Utf8Path) -> Result<SqliteEntityStore, CliError> {
    debug!("opening breed database at {path}");
    breedbook_fs::ensure_parent_dir(path).map_err(|source| CliError::PrepareDatabase {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SqliteEntityStore::open(path)?)
}

/// Open the SQLite store at `path` for a command that only reads it.
///
/// Neither the directory nor the database file is created.
fn open_store_read_only(path: &Utf8Path) -> Result<SqliteEntityStore, CliError> {
    debug!("opening breed database at {path} read-only");
    Ok(SqliteEntityStore::open_read_only(path)?)
}

fn write_line(writer: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writeln!(writer, "{line}").map_err(CliError::WriteOutput)
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[cfg(test)]
mod tests;
