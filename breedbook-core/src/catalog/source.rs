//! Catalogue source trait and the page shape it returns.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BreedRecord, Limit};

use super::error::FetchError;

/// One page of catalogue results.
///
/// Only `data` is required. The paging fields are informational; a source
/// may omit them and ingestion never follows further pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogPage {
    /// Records on this page, in catalogue order.
    pub data: Vec<BreedRecord>,
    /// One-based index of this page.
    #[cfg_attr(feature = "serde", serde(default))]
    pub current_page: Option<u32>,
    /// Index of the final page.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_page: Option<u32>,
    /// Page size the catalogue applied.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient_u32::deserialize")
    )]
    pub per_page: Option<u32>,
    /// Records available across all pages.
    #[cfg_attr(feature = "serde", serde(default))]
    pub total: Option<u64>,
}

impl CatalogPage {
    /// A page carrying only records.
    #[must_use]
    pub fn from_records(data: Vec<BreedRecord>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Whether the catalogue reported more records than this page holds.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.total
            .and_then(|total| usize::try_from(total).ok())
            .is_some_and(|total| total > self.data.len())
    }
}

/// Some catalogues encode `per_page` as a string; accept either form.
#[cfg(feature = "serde")]
mod lenient_u32 {
    use serde::{Deserialize, Deserializer, de::Error as _};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(value)) => Ok(Some(value)),
            Some(Raw::Text(text)) => text.trim().parse().map(Some).map_err(D::Error::custom),
        }
    }
}

/// Fetch a single page of breed records.
///
/// # Examples
///
/// ```rust
/// use breedbook_core::{BreedRecord, CatalogPage, CatalogSource, FetchError, Limit};
///
/// struct FixedSource(Vec<BreedRecord>);
///
/// impl CatalogSource for FixedSource {
///     fn fetch_page(&self, page_size: Limit) -> Result<CatalogPage, FetchError> {
///         let data = self.0.iter().take(page_size.get()).cloned().collect();
///         Ok(CatalogPage::from_records(data))
///     }
/// }
///
/// let source = FixedSource(vec![BreedRecord::new("Korat", "Thailand", "Natural", "Short", "Solid")]);
/// let page = source.fetch_page(Limit::new(5))?;
/// assert_eq!(page.data.len(), 1);
/// # Ok::<(), FetchError>(())
/// ```
pub trait CatalogSource {
    /// Return the first page of at most `page_size` records.
    ///
    /// Sources may return fewer records than requested. Callers never invoke
    /// this with a zero page size.
    fn fetch_page(&self, page_size: Limit) -> Result<CatalogPage, FetchError>;
}

impl<C: CatalogSource + ?Sized> CatalogSource for &C {
    fn fetch_page(&self, page_size: Limit) -> Result<CatalogPage, FetchError> {
        (**self).fetch_page(page_size)
    }
}

impl<C: CatalogSource + ?Sized> CatalogSource for Box<C> {
    fn fetch_page(&self, page_size: Limit) -> Result<CatalogPage, FetchError> {
        (**self).fetch_page(page_size)
    }
}
