//! `count` command: report how many breeds a country owns.

use std::io::Write;

use breedbook_core::EntityStore;
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_COUNTRY, ARG_DATABASE, CliError, ENV_COUNT_COUNTRY, open_store_read_only,
    resolve_database, write_line,
};

/// CLI arguments for the `count` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Count the breeds owned by a country")]
#[ortho_config(prefix = "BREEDBOOK")]
pub(crate) struct CountArgs {
    /// Exact, case-sensitive country name.
    #[arg(value_name = "country")]
    #[serde(default)]
    pub(crate) country: Option<String>,
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// Resolved `count` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CountConfig {
    pub(crate) country: String,
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<CountArgs> for CountConfig {
    type Error = CliError;

    fn try_from(args: CountArgs) -> Result<Self, Self::Error> {
        let country = args.country.ok_or(CliError::MissingArgument {
            field: ARG_COUNTRY,
            env: ENV_COUNT_COUNTRY,
        })?;
        Ok(Self {
            country,
            database: resolve_database(args.database),
        })
    }
}

pub(crate) fn run_count_with(args: CountArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = CountConfig::try_from(merged)?;
    let store = open_store_read_only(&config.database)?;
    let count = store.count_breeds(&config.country)?;
    write_line(writer, &count.to_string())
}
