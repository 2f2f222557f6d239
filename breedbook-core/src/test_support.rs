//! Doubles for the store and catalogue seams, used by unit, doc and
//! behaviour tests across the workspace.

use std::cell::Cell;
use std::collections::BTreeSet;

use crate::{
    Breed, BreedRecord, CatalogPage, CatalogSource, CommitSummary, Country, EntityStore,
    FetchError, Limit, PendingCountry, StoreError,
};

fn unavailable(operation: &'static str) -> StoreError {
    StoreError::Unavailable {
        operation,
        message: "simulated outage".into(),
    }
}

/// Store wrapper whose commits always fail with [`StoreError::Unavailable`].
///
/// Lookups and reads pass through to the wrapped store unless switched off
/// with [`UnavailableStore::failing_lookups`] or
/// [`UnavailableStore::failing_reads`].
#[derive(Debug, Default)]
pub struct UnavailableStore<S> {
    inner: S,
    lookups_fail: bool,
    reads_fail: bool,
}

impl<S> UnavailableStore<S> {
    /// Wrap `inner`.
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            lookups_fail: false,
            reads_fail: false,
        }
    }

    /// Make name lookups fail as well.
    #[must_use]
    pub fn failing_lookups(mut self) -> Self {
        self.lookups_fail = true;
        self
    }

    /// Make reads and counts fail as well.
    #[must_use]
    pub fn failing_reads(mut self) -> Self {
        self.reads_fail = true;
        self
    }

    /// The wrapped store.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the store.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EntityStore> EntityStore for UnavailableStore<S> {
    fn find_countries_by_name(&self, names: &BTreeSet<&str>) -> Result<Vec<Country>, StoreError> {
        if self.lookups_fail {
            return Err(unavailable("find countries"));
        }
        self.inner.find_countries_by_name(names)
    }

    fn find_breeds_by_name(&self, names: &BTreeSet<&str>) -> Result<Vec<Breed>, StoreError> {
        if self.lookups_fail {
            return Err(unavailable("find breeds"));
        }
        self.inner.find_breeds_by_name(names)
    }

    fn commit(&mut self, _countries: &[PendingCountry]) -> Result<CommitSummary, StoreError> {
        Err(unavailable("commit"))
    }

    fn read_breeds(&self, limit: Limit) -> Result<Vec<Breed>, StoreError> {
        if self.reads_fail {
            return Err(unavailable("read breeds"));
        }
        self.inner.read_breeds(limit)
    }

    fn count_breeds(&self, country: &str) -> Result<u64, StoreError> {
        if self.reads_fail {
            return Err(unavailable("count breeds"));
        }
        self.inner.count_breeds(country)
    }

    fn breeds_in_country(&self, country: &str) -> Result<Vec<Breed>, StoreError> {
        if self.reads_fail {
            return Err(unavailable("breeds in country"));
        }
        self.inner.breeds_in_country(country)
    }
}

/// Deterministic [`CatalogSource`] serving a fixed record list or error.
///
/// Honours the requested page size by truncating its records, and counts
/// how often it was asked.
#[derive(Debug)]
pub struct StubCatalogSource {
    outcome: Result<Vec<BreedRecord>, FetchError>,
    total: Option<u64>,
    calls: Cell<usize>,
    last_page_size: Cell<Option<Limit>>,
}

impl StubCatalogSource {
    /// Serve `records`.
    pub fn with_records(records: Vec<BreedRecord>) -> Self {
        Self {
            outcome: Ok(records),
            total: None,
            calls: Cell::new(0),
            last_page_size: Cell::new(None),
        }
    }

    /// Fail every fetch with `error`.
    pub fn with_error(error: FetchError) -> Self {
        Self {
            outcome: Err(error),
            total: None,
            calls: Cell::new(0),
            last_page_size: Cell::new(None),
        }
    }

    /// Report `total` as the catalogue-wide record count.
    #[must_use]
    pub fn reporting_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Number of fetches served so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Page size passed to the most recent fetch.
    pub fn last_page_size(&self) -> Option<Limit> {
        self.last_page_size.get()
    }
}

impl CatalogSource for StubCatalogSource {
    fn fetch_page(&self, page_size: Limit) -> Result<CatalogPage, FetchError> {
        self.calls.set(self.calls.get() + 1);
        self.last_page_size.set(Some(page_size));
        let records = self.outcome.as_ref().map_err(Clone::clone)?;
        let mut page =
            CatalogPage::from_records(records.iter().take(page_size.get()).cloned().collect());
        page.total = self.total;
        Ok(page)
    }
}
