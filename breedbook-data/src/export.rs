//! Write exported records to timestamped JSON files.
//!
//! File names encode the local time of the export as `DDMMYYYYHHMMSS.json`,
//! for example `05062024143012.json` for 14:30:12 on 5 June 2024. Two exports
//! within the same second target the same file and the later one wins.

use std::io;

use breedbook_core::BreedRecord;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;
use log::info;
use thiserror::Error;

/// `strftime` pattern for export file stems.
pub const EXPORT_FILE_STEM_FORMAT: &str = "%d%m%Y%H%M%S";

/// Errors raised while writing an export file.
#[derive(Debug, Error)]
pub enum ExportWriteError {
    /// Records could not be encoded as JSON.
    #[error("failed to encode export: {0}")]
    Encode(#[from] serde_json::Error),
    /// The file or its directory could not be written.
    #[error("failed to write export to {path}: {source}")]
    Io {
        /// Target path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// File name for an export taken at `timestamp`.
///
/// # Examples
/// ```
/// use breedbook_data::export::export_file_name;
/// use chrono::NaiveDate;
///
/// let at = NaiveDate::from_ymd_opt(2024, 6, 5)
///     .and_then(|date| date.and_hms_opt(14, 30, 12))
///     .expect("valid timestamp");
/// assert_eq!(export_file_name(at), "05062024143012.json");
/// ```
#[must_use]
pub fn export_file_name(timestamp: NaiveDateTime) -> String {
    format!("{}.json", timestamp.format(EXPORT_FILE_STEM_FORMAT))
}

/// Encode `records` as a JSON array of objects keyed `breed`, `country`,
/// `origin`, `coat` and `pattern`.
pub fn encode_records(records: &[BreedRecord]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(records)
}

/// Write `records` into `dir` under the file name for `timestamp`, creating
/// `dir` when missing. Returns the path written.
pub fn write_export(
    dir: &Utf8Path,
    records: &[BreedRecord],
    timestamp: NaiveDateTime,
) -> Result<Utf8PathBuf, ExportWriteError> {
    let path = dir.join(export_file_name(timestamp));
    let bytes = encode_records(records)?;
    breedbook_fs::write_file(&path, &bytes).map_err(|source| ExportWriteError::Io {
        path: path.clone(),
        source,
    })?;
    info!("wrote {} record(s) to {path}", records.len());
    Ok(path)
}
