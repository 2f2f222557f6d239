//! Read stored breeds back out in catalogue record form.

use log::debug;

use crate::{BreedRecord, EntityStore, Limit, StoreError};

/// Reads up to a bounded number of breeds from a store.
///
/// # Examples
/// ```
/// use breedbook_core::{BreedRecord, Exporter, Limit, MemoryStore, Reconciler};
///
/// let mut store = MemoryStore::default();
/// let batch = [BreedRecord::new("Sphynx", "Canada", "Mutation", "Hairless", "All")];
/// Reconciler::new(&mut store).reconcile(&batch)?;
///
/// let records = Exporter::new(&store).export(Limit::new(10))?;
/// assert_eq!(records, batch);
/// # Ok::<(), breedbook_core::StoreError>(())
/// ```
#[derive(Debug)]
pub struct Exporter<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> Exporter<'a, S> {
    /// Borrow `store` for export.
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Return at most `limit` records in the store's insertion order.
    ///
    /// Each record's `country` is the name of the breed's owning country.
    /// A zero limit returns an empty list without touching the store.
    pub fn export(&self, limit: Limit) -> Result<Vec<BreedRecord>, StoreError> {
        if limit.is_zero() {
            return Ok(Vec::new());
        }
        let breeds = self.store.read_breeds(limit)?;
        debug!("exporting {} of at most {limit} breed(s)", breeds.len());
        Ok(breeds.into_iter().map(crate::Breed::into_record).collect())
    }
}
