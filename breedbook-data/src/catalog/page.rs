//! Decoding of catalogue response bodies.

use breedbook_core::{CatalogPage, FetchError};

/// Decode a catalogue response body into a [`CatalogPage`].
///
/// The body must be a JSON object with a `data` array whose entries carry
/// `breed`, `country`, `origin`, `coat` and `pattern` strings. Paging fields
/// are optional.
///
/// # Examples
/// ```
/// use breedbook_data::catalog::parse_page;
///
/// let page = parse_page(r#"{"data": [{"breed": "Korat", "country": "Thailand",
///     "origin": "Natural", "coat": "Short", "pattern": "Solid"}]}"#)?;
/// assert_eq!(page.data[0].breed, "Korat");
/// # Ok::<(), breedbook_core::FetchError>(())
/// ```
pub fn parse_page(body: &str) -> Result<CatalogPage, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::Parse {
            message: "empty response body".to_owned(),
        });
    }
    serde_json::from_str(body).map_err(FetchError::parse)
}
