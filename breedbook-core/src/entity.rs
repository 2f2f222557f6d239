//! Persisted entities and the pending changes handed to a store on commit.
//!
//! A [`Country`] owns its breeds. Stored [`Breed`] values carry a resolved
//! copy of their country's identity rather than a second collection, so the
//! relationship has exactly one owning direction.

use std::fmt;

use crate::BreedRecord;

/// Store-assigned identifier of a [`Country`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountryId(pub i64);

/// Store-assigned identifier of a [`Breed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BreedId(pub i64);

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "country#{}", self.0)
    }
}

impl fmt::Display for BreedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "breed#{}", self.0)
    }
}

/// A persisted country, identified by its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Country {
    /// Identifier assigned by the store.
    pub id: CountryId,
    /// Unique, case-sensitive name.
    pub name: String,
}

/// A persisted breed together with the country that owns it.
///
/// # Examples
/// ```
/// use breedbook_core::{Breed, BreedId, Country, CountryId};
///
/// let breed = Breed {
///     id: BreedId(1),
///     name: "Sphynx".into(),
///     origin: "Mutation".into(),
///     coat: "Hairless".into(),
///     pattern: "All".into(),
///     country: Country { id: CountryId(1), name: "Canada".into() },
/// };
///
/// let record = breed.into_record();
/// assert_eq!(record.country, "Canada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Breed {
    /// Identifier assigned by the store.
    pub id: BreedId,
    /// Unique name across all countries.
    pub name: String,
    /// Origin description.
    pub origin: String,
    /// Coat description.
    pub coat: String,
    /// Coat pattern description.
    pub pattern: String,
    /// Owning country, resolved at read time.
    pub country: Country,
}

impl Breed {
    /// Flatten the breed into the catalogue record shape.
    pub fn into_record(self) -> BreedRecord {
        BreedRecord {
            breed: self.name,
            country: self.country.name,
            origin: self.origin,
            coat: self.coat,
            pattern: self.pattern,
        }
    }
}

/// A breed that has not been persisted yet.
///
/// It has no country field: a `NewBreed` only ever exists inside the
/// [`PendingCountry`] it will be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewBreed {
    /// Unique name across all countries.
    pub name: String,
    /// Origin description.
    pub origin: String,
    /// Coat description.
    pub coat: String,
    /// Coat pattern description.
    pub pattern: String,
    /// Arrival order within the batch. A commit inserts breeds in ascending
    /// `sequence` across all of its countries; ties keep slice order.
    pub sequence: usize,
}

impl NewBreed {
    /// Build the breed for `record`, the `sequence`-th record of its batch.
    #[must_use]
    pub fn from_record(record: &BreedRecord, sequence: usize) -> Self {
        Self {
            name: record.breed.clone(),
            origin: record.origin.clone(),
            coat: record.coat.clone(),
            pattern: record.pattern.clone(),
            sequence,
        }
    }
}

impl From<&BreedRecord> for NewBreed {
    fn from(record: &BreedRecord) -> Self {
        Self::from_record(record, 0)
    }
}

/// A country touched by a reconciliation pass, with the breeds to attach.
///
/// `id` is `Some` when the country already exists in the store and `None`
/// when the store must create it as part of the same commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCountry {
    /// Identifier of the stored country, if it already exists.
    pub id: Option<CountryId>,
    /// Unique country name.
    pub name: String,
    /// Breeds to create under this country.
    pub breeds: Vec<NewBreed>,
}

impl PendingCountry {
    /// A country that does not exist in the store yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            breeds: Vec::new(),
        }
    }

    /// A stored country that is about to gain breeds.
    pub fn existing(country: &Country) -> Self {
        Self {
            id: Some(country.id),
            name: country.name.clone(),
            breeds: Vec::new(),
        }
    }

    /// Whether committing this entry creates a country row.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// Counts of rows created by a successful commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Country rows inserted.
    pub countries_created: usize,
    /// Breed rows inserted.
    pub breeds_created: usize,
}
