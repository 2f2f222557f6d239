//! Flat breed records as they arrive from the catalogue and leave in exports.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single catalogue entry.
///
/// The same shape is used for ingestion (one element of the endpoint's
/// `data` array) and for export, so a snapshot can be fed back in unchanged.
///
/// # Examples
/// ```
/// use breedbook_core::BreedRecord;
///
/// let record = BreedRecord::new("Sphynx", "Canada", "Canada", "hairless", "none");
/// assert_eq!(record.breed, "Sphynx");
/// assert_eq!(record.country, "Canada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BreedRecord {
    /// Breed name; unique across the whole store.
    pub breed: String,
    /// Name of the country the breed is filed under.
    pub country: String,
    /// Free-form origin description.
    pub origin: String,
    /// Coat description.
    pub coat: String,
    /// Coat pattern description.
    pub pattern: String,
}

impl BreedRecord {
    /// Construct a record from its five fields.
    pub fn new(
        breed: impl Into<String>,
        country: impl Into<String>,
        origin: impl Into<String>,
        coat: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            breed: breed.into(),
            country: country.into(),
            origin: origin.into(),
            coat: coat.into(),
            pattern: pattern.into(),
        }
    }
}
