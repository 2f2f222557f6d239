//! Property-based tests for reconciliation and export.
//!
//! Batches are drawn from a small pool of breed and country names so that
//! duplicates within and across batches are common.
//!
//! # Invariants tested
//!
//! - **Uniqueness:** no two stored breeds or countries share a name.
//! - **Idempotence:** reconciling a batch twice equals reconciling it once.
//! - **Linkage:** every breed appears in its own country's breed list.
//! - **Atomicity:** a failed commit leaves earlier state untouched.
//! - **Export bound:** export never returns more than its limit.
//! - **Arrival order:** a fresh store exports first occurrences in batch
//!   order.

use std::collections::HashSet;

use breedbook_core::{
    BreedRecord, EntityStore, Exporter, Limit, MemoryStore, Reconciler, SqliteEntityStore,
    test_support::UnavailableStore,
};
use proptest::prelude::*;

const BREEDS: &[&str] = &[
    "Abyssinian",
    "Bengal",
    "Chartreux",
    "Korat",
    "Maine Coon",
    "Ragdoll",
    "Siamese",
    "Sphynx",
];
const COUNTRIES: &[&str] = &["Canada", "Ethiopia", "France", "Thailand", "USA"];
const COATS: &[&str] = &["Short", "Long", "Hairless"];

fn record_strategy() -> impl Strategy<Value = BreedRecord> {
    (
        prop::sample::select(BREEDS),
        prop::sample::select(COUNTRIES),
        prop::sample::select(COATS),
    )
        .prop_map(|(breed, country, coat)| {
            BreedRecord::new(breed, country, "Natural", coat, "Solid")
        })
}

fn batch_strategy() -> impl Strategy<Value = Vec<BreedRecord>> {
    prop::collection::vec(record_strategy(), 0..12)
}

fn snapshot(store: &impl EntityStore) -> Vec<BreedRecord> {
    Exporter::new(store)
        .export(Limit::new(usize::MAX))
        .expect("export snapshot")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn names_stay_unique(batches in prop::collection::vec(batch_strategy(), 1..4)) {
        let mut store = SqliteEntityStore::open_in_memory().expect("open store");
        for batch in &batches {
            Reconciler::new(&mut store).reconcile(batch).expect("reconcile");
        }

        let breeds = store.read_breeds(Limit::new(usize::MAX)).expect("read");
        let names: HashSet<_> = breeds.iter().map(|b| b.name.as_str()).collect();
        prop_assert_eq!(names.len(), breeds.len());

        let countries: Vec<_> = store
            .find_countries_by_name(&COUNTRIES.iter().copied().collect())
            .expect("lookup");
        let country_names: HashSet<_> = countries.iter().map(|c| c.name.as_str()).collect();
        prop_assert_eq!(country_names.len(), countries.len());
    }

    #[test]
    fn reconciling_twice_equals_once(
        seed in batch_strategy(),
        batch in batch_strategy(),
    ) {
        let mut once = MemoryStore::default();
        Reconciler::new(&mut once).reconcile(&seed).expect("seed");
        let mut twice = once.clone();

        Reconciler::new(&mut once).reconcile(&batch).expect("once");
        Reconciler::new(&mut twice).reconcile(&batch).expect("first");
        let report = Reconciler::new(&mut twice).reconcile(&batch).expect("second");

        prop_assert!(report.is_noop());
        prop_assert_eq!(snapshot(&once), snapshot(&twice));
        prop_assert_eq!(once.country_count(), twice.country_count());
    }

    #[test]
    fn breeds_are_listed_by_their_country(batch in batch_strategy()) {
        let mut store = SqliteEntityStore::open_in_memory().expect("open store");
        Reconciler::new(&mut store).reconcile(&batch).expect("reconcile");

        for breed in store.read_breeds(Limit::new(usize::MAX)).expect("read") {
            let siblings = store
                .breeds_in_country(&breed.country.name)
                .expect("country breeds");
            prop_assert!(siblings.iter().any(|b| b.id == breed.id));
        }
    }

    #[test]
    fn failed_commit_changes_nothing(
        seed in batch_strategy(),
        batch in batch_strategy(),
    ) {
        let mut store = MemoryStore::default();
        Reconciler::new(&mut store).reconcile(&seed).expect("seed");
        let before = snapshot(&store);

        let mut failing = UnavailableStore::new(store);
        let outcome = Reconciler::new(&mut failing).reconcile(&batch);
        let store = failing.into_inner();

        // Batches with nothing new never reach the commit.
        if outcome.is_ok() {
            prop_assert!(outcome.expect("checked").is_noop());
        }
        prop_assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn export_follows_arrival_order(batch in batch_strategy()) {
        let mut store = SqliteEntityStore::open_in_memory().expect("open store");
        Reconciler::new(&mut store).reconcile(&batch).expect("reconcile");

        let mut seen = HashSet::new();
        let expected: Vec<_> = batch
            .iter()
            .filter(|record| seen.insert(record.breed.as_str()))
            .cloned()
            .collect();
        prop_assert_eq!(snapshot(&store), expected);
    }

    #[test]
    fn export_respects_limit(batch in batch_strategy(), limit in 0_usize..16) {
        let mut store = MemoryStore::default();
        Reconciler::new(&mut store).reconcile(&batch).expect("reconcile");

        let records = Exporter::new(&store).export(Limit::new(limit)).expect("export");
        prop_assert!(records.len() <= limit);
        prop_assert_eq!(records.len(), limit.min(store.breed_count()));
    }
}
