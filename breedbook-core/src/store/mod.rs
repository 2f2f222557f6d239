//! Keyed storage for countries and breeds.
//!
//! The [`EntityStore`] trait is the only way the reconciler and exporter
//! touch persisted state. Implementations enforce name uniqueness for both
//! entity kinds themselves; callers never have to re-check it.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{Breed, CommitSummary, Country, Limit, NewBreed, PendingCountry};

mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteEntityStore;

/// Errors raised when the backing medium cannot serve a query or commit.
///
/// Both variants are fatal to the current run. A failed commit never leaves
/// any part of its batch visible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The medium could not be reached or failed while executing.
    #[error("storage unavailable during {operation}: {message}")]
    Unavailable {
        /// Store operation that failed.
        operation: &'static str,
        /// Description reported by the medium.
        message: String,
    },
    /// The medium refused a write because it would break a name-uniqueness
    /// or country-reference constraint.
    #[error("storage rejected {operation}: {message}")]
    Rejected {
        /// Store operation that failed.
        operation: &'static str,
        /// Description of the violated constraint.
        message: String,
    },
}

/// Persistent storage for [`Country`] and [`Breed`] entities.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeSet;
/// use breedbook_core::{EntityStore, Limit, MemoryStore, NewBreed, PendingCountry};
///
/// let mut store = MemoryStore::default();
/// let mut canada = PendingCountry::new("Canada");
/// canada.breeds.push(NewBreed {
///     name: "Sphynx".into(),
///     origin: "Mutation".into(),
///     coat: "Hairless".into(),
///     pattern: "All".into(),
///     sequence: 0,
/// });
/// store.commit(&[canada])?;
///
/// let found = store.find_countries_by_name(&BTreeSet::from(["Canada"]))?;
/// assert_eq!(found.len(), 1);
/// assert_eq!(store.count_breeds("Canada")?, 1);
/// assert_eq!(store.read_breeds(Limit::new(10))?.len(), 1);
/// # Ok::<(), breedbook_core::StoreError>(())
/// ```
pub trait EntityStore {
    /// Return the stored countries whose name is in `names`.
    ///
    /// Names that match nothing are ignored; an empty result is not an error.
    fn find_countries_by_name(&self, names: &BTreeSet<&str>) -> Result<Vec<Country>, StoreError>;

    /// Return the stored breeds whose name is in `names`.
    fn find_breeds_by_name(&self, names: &BTreeSet<&str>) -> Result<Vec<Breed>, StoreError>;

    /// Persist `countries` and every breed they carry as one atomic unit.
    ///
    /// Entries with an `id` must refer to stored countries; entries without
    /// one are created first, in slice order. Breeds are then inserted in
    /// ascending [`NewBreed::sequence`] across all entries, so reads return
    /// them in arrival order. Either every row becomes visible or none does.
    fn commit(&mut self, countries: &[PendingCountry]) -> Result<CommitSummary, StoreError>;

    /// Return up to `limit` breeds in insertion order, each with its country
    /// resolved.
    fn read_breeds(&self, limit: Limit) -> Result<Vec<Breed>, StoreError>;

    /// Count the breeds owned by the country called `country`.
    ///
    /// Returns zero when the country does not exist.
    fn count_breeds(&self, country: &str) -> Result<u64, StoreError>;

    /// Return every breed owned by the country called `country`, in insertion
    /// order.
    fn breeds_in_country(&self, country: &str) -> Result<Vec<Breed>, StoreError>;
}

/// Pair each pending breed with its country's resolved id, in arrival order.
///
/// `country_ids` holds one id per entry of `countries`, in the same order.
pub(crate) fn breeds_in_arrival_order<'a, T: Copy>(
    countries: &'a [PendingCountry],
    country_ids: &[T],
) -> Vec<(T, &'a NewBreed)> {
    let mut breeds: Vec<_> = countries
        .iter()
        .zip(country_ids)
        .flat_map(|(country, &id)| country.breeds.iter().map(move |breed| (id, breed)))
        .collect();
    breeds.sort_by_key(|(_, breed)| breed.sequence);
    breeds
}

impl<S: EntityStore + ?Sized> EntityStore for Box<S> {
    fn find_countries_by_name(&self, names: &BTreeSet<&str>) -> Result<Vec<Country>, StoreError> {
        (**self).find_countries_by_name(names)
    }

    fn find_breeds_by_name(&self, names: &BTreeSet<&str>) -> Result<Vec<Breed>, StoreError> {
        (**self).find_breeds_by_name(names)
    }

    fn commit(&mut self, countries: &[PendingCountry]) -> Result<CommitSummary, StoreError> {
        (**self).commit(countries)
    }

    fn read_breeds(&self, limit: Limit) -> Result<Vec<Breed>, StoreError> {
        (**self).read_breeds(limit)
    }

    fn count_breeds(&self, country: &str) -> Result<u64, StoreError> {
        (**self).count_breeds(country)
    }

    fn breeds_in_country(&self, country: &str) -> Result<Vec<Breed>, StoreError> {
        (**self).breeds_in_country(country)
    }
}
