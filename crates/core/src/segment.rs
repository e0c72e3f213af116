//! Splitting an outline document into separator-delimited blocks.

use crate::error::{Error, Result};

/// Split `document` on every exact, case-sensitive occurrence of
/// `separator`, trimming each piece and dropping the empty ones.
///
/// Returns [`Error::NoContent`] when nothing is left, e.g. for blank input
/// or input made only of separators.
pub fn segment<'a>(document: &'a str, separator: &str) -> Result<Vec<&'a str>> {
    let blocks: Vec<&str> = if separator.is_empty() {
        vec![document.trim()]
    } else {
        document.split(separator).map(str::trim).collect()
    };

    let blocks: Vec<&str> = blocks.into_iter().filter(|b| !b.is_empty()).collect();

    if blocks.is_empty() {
        return Err(Error::NoContent);
    }

    log::debug!("Segmented outline into {} blocks", blocks.len());
    Ok(blocks)
}
