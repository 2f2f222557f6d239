//! Fetch one catalogue page and reconcile it into a store.

use log::{info, warn};
use thiserror::Error;

use crate::{CatalogSource, EntityStore, FetchError, Limit, ReconcileReport, Reconciler, StoreError};

/// Errors from [`ingest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// The catalogue could not be fetched or parsed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The store failed during lookup or commit.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetch the first page of at most `page_size` records from `source` and
/// reconcile it into `store`.
///
/// Only the first page is ingested. A zero page size returns an empty report
/// without contacting the source. Any failure aborts the run with nothing
/// from the page persisted.
///
/// # Examples
/// ```
/// use breedbook_core::{BreedRecord, EntityStore, Limit, MemoryStore, ingest};
/// use breedbook_core::test_support::StubCatalogSource;
///
/// let source = StubCatalogSource::with_records(vec![
///     BreedRecord::new("Chartreux", "France", "Natural", "Short", "Solid"),
/// ]);
/// let mut store = MemoryStore::default();
///
/// let report = ingest(&source, &mut store, Limit::new(5))?;
/// assert_eq!(report.breeds_created, 1);
/// assert_eq!(store.count_breeds("France")?, 1);
/// # Ok::<(), breedbook_core::IngestError>(())
/// ```
pub fn ingest<C, S>(
    source: &C,
    store: &mut S,
    page_size: Limit,
) -> Result<ReconcileReport, IngestError>
where
    C: CatalogSource + ?Sized,
    S: EntityStore + ?Sized,
{
    if page_size.is_zero() {
        info!("page size is zero; skipping fetch");
        return Ok(ReconcileReport::default());
    }

    let page = source.fetch_page(page_size)?;
    info!("fetched {} record(s) (page size {page_size})", page.data.len());
    if page.is_truncated() {
        warn!(
            "catalogue reports {} record(s) in total; only the first page is ingested",
            page.total.unwrap_or_default()
        );
    }

    Ok(Reconciler::new(store).reconcile(&page.data)?)
}
