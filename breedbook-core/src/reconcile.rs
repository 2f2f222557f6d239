//! Merge a fetched batch into an [`EntityStore`] without duplicating
//! breeds or countries.
//!
//! Reconciliation runs in two halves. [`ReconcilePlan::build`] is a pure
//! function over the batch and the stored entities it names; it decides
//! which countries to create and which breeds to attach where.
//! [`Reconciler::reconcile`] performs the two store lookups, builds the plan
//! and hands it to the store as a single commit.
//!
//! Rules, applied to records in batch order:
//!
//! - a record whose breed name is already known (stored, or introduced by an
//!   earlier record of the same batch) is skipped; the first occurrence wins
//!   and later attribute differences are ignored;
//! - otherwise the record's country is resolved by exact name, creating at
//!   most one new country per distinct unseen name;
//! - the new breed is appended to that country's pending breed list, so it
//!   never exists without an owner, and tagged with its batch position so
//!   the store assigns ids in arrival order.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, info, warn};

use crate::{
    Breed, BreedRecord, Country, CountryId, EntityStore, NewBreed, PendingCountry, StoreError,
};

/// Outcome of reconciling one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records in the batch.
    pub records: usize,
    /// Countries created by the commit.
    pub countries_created: usize,
    /// Breeds created by the commit.
    pub breeds_created: usize,
    /// Records skipped because their breed name was already known.
    pub duplicates_skipped: usize,
}

impl ReconcileReport {
    /// Whether the batch changed nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.countries_created == 0 && self.breeds_created == 0
    }
}

/// What a country name resolves to during a pass.
#[derive(Debug, Clone, Copy)]
struct KnownCountry {
    /// Store identifier; `None` for countries introduced by this batch.
    id: Option<CountryId>,
    /// Position in the plan's touched list once the country gains a breed.
    slot: Option<usize>,
}

/// Working sets for one pass: known names seeded from the store and grown
/// as the batch introduces new entities.
#[derive(Debug, Default)]
struct WorkingSet {
    countries: HashMap<String, KnownCountry>,
    breeds: HashSet<String>,
    touched: Vec<PendingCountry>,
    countries_created: usize,
}

impl WorkingSet {
    fn seeded<'a, B>(countries: Vec<Country>, breed_names: B) -> Self
    where
        B: IntoIterator<Item = &'a str>,
    {
        Self {
            countries: countries
                .into_iter()
                .map(|country| {
                    (
                        country.name,
                        KnownCountry {
                            id: Some(country.id),
                            slot: None,
                        },
                    )
                })
                .collect(),
            breeds: breed_names.into_iter().map(str::to_owned).collect(),
            touched: Vec::new(),
            countries_created: 0,
        }
    }

    /// Returns `false` when the breed name was already known.
    fn claim_breed(&mut self, name: &str) -> bool {
        if self.breeds.contains(name) {
            return false;
        }
        self.breeds.insert(name.to_owned());
        true
    }

    /// Return the touched-list slot for `name`, synthesising the country on
    /// first sight.
    fn country_slot(&mut self, name: &str) -> usize {
        if !self.countries.contains_key(name) {
            debug!("synthesising country {name:?}");
            self.countries_created += 1;
        }
        let slot = self.touched.len();
        let known = self
            .countries
            .entry(name.to_owned())
            .or_insert(KnownCountry {
                id: None,
                slot: None,
            });
        if let Some(existing) = known.slot {
            return existing;
        }
        known.slot = Some(slot);
        self.touched.push(PendingCountry {
            id: known.id,
            name: name.to_owned(),
            breeds: Vec::new(),
        });
        slot
    }

    fn attach(&mut self, record: &BreedRecord, sequence: usize) {
        let slot = self.country_slot(&record.country);
        if let Some(country) = self.touched.get_mut(slot) {
            country
                .breeds
                .push(NewBreed::from_record(record, sequence));
        }
    }
}

/// The delta a batch contributes to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    countries: Vec<PendingCountry>,
    report: ReconcileReport,
}

impl ReconcilePlan {
    /// Compute the delta for `batch` given the stored countries and breeds
    /// that share names with it.
    ///
    /// # Examples
    /// ```
    /// use breedbook_core::{BreedRecord, ReconcilePlan};
    ///
    /// let batch = [
    ///     BreedRecord::new("Sphynx", "Canada", "Canada", "hairless", "none"),
    ///     BreedRecord::new("Sphynx", "USA", "Canada", "hairless", "none"),
    /// ];
    /// let plan = ReconcilePlan::build(&batch, Vec::new(), &[]);
    ///
    /// assert_eq!(plan.countries().len(), 1);
    /// assert_eq!(plan.countries()[0].name, "Canada");
    /// assert_eq!(plan.report().duplicates_skipped, 1);
    /// ```
    #[must_use]
    pub fn build(
        batch: &[BreedRecord],
        existing_countries: Vec<Country>,
        existing_breeds: &[Breed],
    ) -> Self {
        let mut working = WorkingSet::seeded(
            existing_countries,
            existing_breeds.iter().map(|breed| breed.name.as_str()),
        );
        let mut duplicates_skipped = 0;

        for (sequence, record) in batch.iter().enumerate() {
            if !working.claim_breed(&record.breed) {
                debug!("skipping duplicate breed {:?}", record.breed);
                duplicates_skipped += 1;
                continue;
            }
            working.attach(record, sequence);
        }

        let breeds_created = working
            .touched
            .iter()
            .map(|country| country.breeds.len())
            .sum();
        Self {
            report: ReconcileReport {
                records: batch.len(),
                countries_created: working.countries_created,
                breeds_created,
                duplicates_skipped,
            },
            countries: working.touched,
        }
    }

    /// Countries to hand to the store, in the order the batch first
    /// attached a breed to them.
    #[must_use]
    pub fn countries(&self) -> &[PendingCountry] {
        &self.countries
    }

    /// Counts describing the plan.
    #[must_use]
    pub const fn report(&self) -> ReconcileReport {
        self.report
    }

    /// Whether committing the plan would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Reconciles batches against a borrowed store.
///
/// # Examples
/// ```
/// use breedbook_core::{BreedRecord, EntityStore, MemoryStore, Reconciler};
///
/// let mut store = MemoryStore::default();
/// let batch = [BreedRecord::new("Maine Coon", "USA", "Natural", "Long", "All")];
///
/// Reconciler::new(&mut store).reconcile(&batch)?;
/// let again = Reconciler::new(&mut store).reconcile(&batch)?;
///
/// assert!(again.is_noop());
/// assert_eq!(store.count_breeds("USA")?, 1);
/// # Ok::<(), breedbook_core::StoreError>(())
/// ```
#[derive(Debug)]
pub struct Reconciler<'a, S: ?Sized> {
    store: &'a mut S,
}

impl<'a, S: EntityStore + ?Sized> Reconciler<'a, S> {
    /// Borrow `store` for reconciliation.
    #[must_use]
    pub const fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Merge `batch` into the store.
    ///
    /// Performs one country lookup, one breed lookup and at most one commit.
    /// An empty batch, or one made only of known breeds, commits nothing.
    /// On a store failure nothing from the batch is persisted.
    pub fn reconcile(&mut self, batch: &[BreedRecord]) -> Result<ReconcileReport, StoreError> {
        if batch.is_empty() {
            debug!("empty batch, nothing to reconcile");
            return Ok(ReconcileReport::default());
        }

        let country_names: BTreeSet<&str> =
            batch.iter().map(|record| record.country.as_str()).collect();
        let breed_names: BTreeSet<&str> =
            batch.iter().map(|record| record.breed.as_str()).collect();

        let existing_countries = self.store.find_countries_by_name(&country_names)?;
        let existing_breeds = self.store.find_breeds_by_name(&breed_names)?;

        let plan = ReconcilePlan::build(batch, existing_countries, &existing_breeds);
        let report = plan.report();
        if plan.is_empty() {
            warn!(
                "all {} record(s) in the batch name known breeds; nothing to commit",
                report.records
            );
            return Ok(report);
        }

        let summary = self.store.commit(plan.countries())?;
        info!(
            "reconciled {} record(s): {} new country(ies), {} new breed(s), {} duplicate(s) skipped",
            report.records,
            summary.countries_created,
            summary.breeds_created,
            report.duplicates_skipped
        );
        Ok(report)
    }
}
