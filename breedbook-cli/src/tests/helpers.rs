//! Test doubles and workspace helpers for CLI tests.

use super::*;
use breedbook_core::test_support::StubCatalogSource;
use breedbook_core::{BreedRecord, FetchError};
use chrono::NaiveDate;
use std::cell::RefCell;
use tempfile::TempDir;

/// Catalogue source builder serving canned records and recording the
/// settings it was asked to build with.
#[derive(Debug, Default)]
pub(super) struct StubSourceBuilder {
    records: Vec<BreedRecord>,
    error: Option<FetchError>,
    seen: RefCell<Vec<SourceSettings>>,
}

impl StubSourceBuilder {
    pub(super) fn with_records(records: Vec<BreedRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub(super) fn with_error(error: FetchError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub(super) fn seen(&self) -> Vec<SourceSettings> {
        self.seen.borrow().clone()
    }
}

impl CatalogSourceBuilder for StubSourceBuilder {
    fn build(&self, settings: &SourceSettings) -> Result<Box<dyn CatalogSource>, CliError> {
        self.seen.borrow_mut().push(settings.clone());
        let source = match &self.error {
            Some(error) => StubCatalogSource::with_error(error.clone()),
            None => StubCatalogSource::with_records(self.records.clone()),
        };
        Ok(Box::new(source))
    }
}

/// Temporary directory holding the database and export output.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("data/breeds.db")
    }

    pub(super) fn output_dir(&self) -> Utf8PathBuf {
        self.root.join("exports")
    }
}

pub(super) fn sample_records() -> Vec<BreedRecord> {
    vec![
        BreedRecord::new("Sphynx", "Canada", "Mutation", "Hairless", "All"),
        BreedRecord::new("Sphynx", "USA", "Mutation", "Hairless", "All"),
        BreedRecord::new("Maine Coon", "USA", "Natural", "Long", "All"),
    ]
}

pub(super) fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 5)
        .and_then(|date| date.and_hms_opt(14, 30, 12))
        .expect("valid timestamp")
}
