//! In-process [`EntityStore`] used for tests and dry runs.

use std::collections::BTreeSet;

use super::{EntityStore, StoreError, breeds_in_arrival_order};
use crate::{Breed, BreedId, CommitSummary, Country, CountryId, Limit, PendingCountry};

/// Breed row as held by [`MemoryStore`]; the country is a reference by id.
#[derive(Debug, Clone)]
struct BreedRow {
    id: BreedId,
    name: String,
    origin: String,
    coat: String,
    pattern: String,
    country: CountryId,
}

/// Vector-backed store that enforces the same constraints as the SQLite
/// store.
///
/// Commits are applied to a staged copy and swapped in only on success, so a
/// rejected batch leaves the store untouched. Lookups are linear scans and
/// are only meant for small datasets.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    countries: Vec<Country>,
    breeds: Vec<BreedRow>,
    last_id: i64,
}

impl MemoryStore {
    /// Number of stored countries.
    #[must_use]
    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    /// Number of stored breeds.
    #[must_use]
    pub fn breed_count(&self) -> usize {
        self.breeds.len()
    }

    /// Delete the country called `name` together with every breed it owns.
    ///
    /// Returns the number of breeds removed, or `None` when no such country
    /// exists.
    pub fn remove_country(&mut self, name: &str) -> Option<usize> {
        let position = self.countries.iter().position(|c| c.name == name)?;
        let country = self.countries.remove(position);
        let before = self.breeds.len();
        self.breeds.retain(|breed| breed.country != country.id);
        Some(before - self.breeds.len())
    }

    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.iter().find(|country| country.id == id)
    }

    fn resolve(&self, row: &BreedRow) -> Result<Breed, StoreError> {
        let country = self
            .country(row.country)
            .ok_or_else(|| StoreError::Unavailable {
                operation: "resolve breed country",
                message: format!("{} references missing {}", row.id, row.country),
            })?;
        Ok(Breed {
            id: row.id,
            name: row.name.clone(),
            origin: row.origin.clone(),
            coat: row.coat.clone(),
            pattern: row.pattern.clone(),
            country: country.clone(),
        })
    }

    fn resolve_all<'a, I>(&self, rows: I) -> Result<Vec<Breed>, StoreError>
    where
        I: IntoIterator<Item = &'a BreedRow>,
    {
        rows.into_iter().map(|row| self.resolve(row)).collect()
    }

    fn apply(&mut self, countries: &[PendingCountry]) -> Result<CommitSummary, StoreError> {
        let mut summary = CommitSummary::default();
        let mut country_ids = Vec::with_capacity(countries.len());
        for pending in countries {
            let country_id = match pending.id {
                Some(id) => {
                    if self.country(id).is_none() {
                        return Err(StoreError::Rejected {
                            operation: "attach breeds",
                            message: format!("{id} does not exist"),
                        });
                    }
                    id
                }
                None => {
                    if self.countries.iter().any(|c| c.name == pending.name) {
                        return Err(StoreError::Rejected {
                            operation: "insert country",
                            message: format!("country name {:?} is already taken", pending.name),
                        });
                    }
                    let id = CountryId(self.next_id());
                    self.countries.push(Country {
                        id,
                        name: pending.name.clone(),
                    });
                    summary.countries_created += 1;
                    id
                }
            };
            country_ids.push(country_id);
        }

        for (country_id, breed) in breeds_in_arrival_order(countries, &country_ids) {
            if self.breeds.iter().any(|row| row.name == breed.name) {
                return Err(StoreError::Rejected {
                    operation: "insert breed",
                    message: format!("breed name {:?} is already taken", breed.name),
                });
            }
            let id = BreedId(self.next_id());
            self.breeds.push(BreedRow {
                id,
                name: breed.name.clone(),
                origin: breed.origin.clone(),
                coat: breed.coat.clone(),
                pattern: breed.pattern.clone(),
                country: country_id,
            });
            summary.breeds_created += 1;
        }
        Ok(summary)
    }
}

impl EntityStore for MemoryStore {
    fn find_countries_by_name(&self, names: &BTreeSet<&str>) -> Result<Vec<Country>, StoreError> {
        Ok(self
            .countries
            .iter()
            .filter(|country| names.contains(country.name.as_str()))
            .cloned()
            .collect())
    }

    fn find_breeds_by_name(&self, names: &BTreeSet<&str>) -> Result<Vec<Breed>, StoreError> {
        self.resolve_all(
            self.breeds
                .iter()
                .filter(|row| names.contains(row.name.as_str())),
        )
    }

    fn commit(&mut self, countries: &[PendingCountry]) -> Result<CommitSummary, StoreError> {
        let mut staged = self.clone();
        let summary = staged.apply(countries)?;
        *self = staged;
        Ok(summary)
    }

    fn read_breeds(&self, limit: Limit) -> Result<Vec<Breed>, StoreError> {
        self.resolve_all(self.breeds.iter().take(limit.get()))
    }

    fn count_breeds(&self, country: &str) -> Result<u64, StoreError> {
        let Some(id) = self
            .countries
            .iter()
            .find(|c| c.name == country)
            .map(|c| c.id)
        else {
            return Ok(0);
        };
        let count = self.breeds.iter().filter(|row| row.country == id).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    fn breeds_in_country(&self, country: &str) -> Result<Vec<Breed>, StoreError> {
        let Some(id) = self
            .countries
            .iter()
            .find(|c| c.name == country)
            .map(|c| c.id)
        else {
            return Ok(Vec::new());
        };
        self.resolve_all(self.breeds.iter().filter(|row| row.country == id))
    }
}
