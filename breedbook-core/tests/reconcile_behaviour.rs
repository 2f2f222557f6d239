//! Behavioural tests for [`Reconciler`] against the SQLite store.

use std::cell::RefCell;
use std::collections::BTreeSet;

use breedbook_core::{
    BreedRecord, EntityStore, Limit, ReconcileReport, Reconciler, SqliteEntityStore, StoreError,
    test_support::UnavailableStore,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Store under test; either a healthy SQLite store or one whose commits fail.
enum TestStore {
    Healthy(SqliteEntityStore),
    Failing(UnavailableStore<SqliteEntityStore>),
}

impl TestStore {
    fn as_store(&self) -> &dyn EntityStore {
        match self {
            Self::Healthy(store) => store,
            Self::Failing(store) => store,
        }
    }

    fn as_store_mut(&mut self) -> &mut dyn EntityStore {
        match self {
            Self::Healthy(store) => store,
            Self::Failing(store) => store,
        }
    }
}

#[derive(Default)]
struct ReconcileWorld {
    store: RefCell<Option<TestStore>>,
    outcome: RefCell<Option<Result<ReconcileReport, StoreError>>>,
}

impl ReconcileWorld {
    fn reconcile(&self, batch: &[BreedRecord]) {
        let mut guard = self.store.borrow_mut();
        let store = guard.as_mut().expect("store should be initialised");
        let outcome = Reconciler::new(store.as_store_mut()).reconcile(batch);
        self.outcome.replace(Some(outcome));
    }

    fn with_store<T>(&self, f: impl FnOnce(&dyn EntityStore) -> T) -> T {
        let guard = self.store.borrow();
        let store = guard.as_ref().expect("store should be initialised");
        f(store.as_store())
    }

    fn breeds_named(&self, name: &str) -> usize {
        self.with_store(|store| {
            store
                .find_breeds_by_name(&BTreeSet::from([name]))
                .expect("breed lookup")
                .len()
        })
    }

    fn countries_named(&self, name: &str) -> usize {
        self.with_store(|store| {
            store
                .find_countries_by_name(&BTreeSet::from([name]))
                .expect("country lookup")
                .len()
        })
    }
}

#[fixture]
fn world() -> ReconcileWorld {
    ReconcileWorld::default()
}

fn sphynx(country: &str) -> BreedRecord {
    BreedRecord::new("Sphynx", country, "Canada", "hairless", "none")
}

fn maine_coon() -> BreedRecord {
    BreedRecord::new("Maine Coon", "USA", "Natural", "Long", "All")
}

#[given("an empty SQLite store")]
fn empty_store(world: &ReconcileWorld) {
    let store = SqliteEntityStore::open_in_memory().expect("open in-memory store");
    world.store.replace(Some(TestStore::Healthy(store)));
}

#[given("a store whose commits fail")]
fn failing_store(world: &ReconcileWorld) {
    let store = SqliteEntityStore::open_in_memory().expect("open in-memory store");
    world
        .store
        .replace(Some(TestStore::Failing(UnavailableStore::new(store))));
}

#[when("I reconcile Sphynx listed under Canada and then under USA")]
fn reconcile_sphynx(world: &ReconcileWorld) {
    world.reconcile(&[sphynx("Canada"), sphynx("USA")]);
}

#[when("I reconcile a batch with Maine Coon under USA")]
fn reconcile_maine_coon(world: &ReconcileWorld) {
    world.reconcile(&[maine_coon()]);
}

#[then("exactly one breed named Sphynx exists")]
fn one_sphynx(world: &ReconcileWorld) {
    assert_eq!(world.breeds_named("Sphynx"), 1);
}

#[then("Sphynx belongs to Canada")]
fn sphynx_in_canada(world: &ReconcileWorld) {
    let owner = world.with_store(|store| {
        store
            .find_breeds_by_name(&BTreeSet::from(["Sphynx"]))
            .expect("breed lookup")
            .into_iter()
            .map(|breed| breed.country.name)
            .collect::<Vec<_>>()
    });
    assert_eq!(owner, ["Canada"]);
}

#[then("the country USA does not exist")]
fn no_usa(world: &ReconcileWorld) {
    assert_eq!(world.countries_named("USA"), 0);
}

#[then("Canada has 1 breed")]
fn canada_count(world: &ReconcileWorld) {
    let count = world.with_store(|store| store.count_breeds("Canada").expect("count"));
    assert_eq!(count, 1);
}

#[then("France has 0 breeds")]
fn france_count(world: &ReconcileWorld) {
    let count = world.with_store(|store| store.count_breeds("France").expect("count"));
    assert_eq!(count, 0);
}

#[then("exactly one breed named Maine Coon exists")]
fn one_maine_coon(world: &ReconcileWorld) {
    assert_eq!(world.breeds_named("Maine Coon"), 1);
}

#[then("exactly one country named USA exists")]
fn one_usa(world: &ReconcileWorld) {
    assert_eq!(world.countries_named("USA"), 1);
}

#[then("the reconciliation fails with a storage error")]
fn storage_error(world: &ReconcileWorld) {
    let outcome = world.outcome.borrow();
    let result = outcome.as_ref().expect("reconciliation should have run");
    assert!(matches!(result, Err(StoreError::Unavailable { .. })));
}

#[then("the store holds no breeds")]
fn no_breeds(world: &ReconcileWorld) {
    let breeds = world.with_store(|store| store.read_breeds(Limit::new(10)).expect("read"));
    assert!(breeds.is_empty());
    assert_eq!(world.countries_named("USA"), 0);
}

#[scenario(path = "tests/features/reconcile.feature", index = 0)]
fn first_occurrence_wins(world: ReconcileWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/reconcile.feature", index = 1)]
fn counting_breeds(world: ReconcileWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/reconcile.feature", index = 2)]
fn re_ingestion_is_idempotent(world: ReconcileWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/reconcile.feature", index = 3)]
fn failed_commit_is_atomic(world: ReconcileWorld) {
    let _ = world;
}
