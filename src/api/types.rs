//! Type definitions for the Confluence API module.

use crate::error::AppError;

/// One page of an offset-paginated listing, already mapped to domain types.
#[derive(Debug, Clone)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    /// Offset the server reported for this page.
    pub start: usize,
    /// Whether the server advertised a `_links.next` page.
    pub has_more: bool,
}

/// Result of a pagination run.
///
/// A failing page stops the run; whatever was fetched before it is kept
/// next to the error so callers can choose to degrade instead of failing.
#[derive(Debug)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
    pub interrupted_by: Option<AppError>,
}

impl<T> PaginationResult<T> {
    /// All items, or the error that interrupted the run.
    pub fn into_complete(self) -> Result<Vec<T>, AppError> {
        match self.interrupted_by {
            Some(err) => Err(err),
            None => Ok(self.items),
        }
    }

    /// Items fetched before the run stopped, logging the interruption.
    pub fn into_partial(self, what: &str) -> Vec<T> {
        if let Some(err) = &self.interrupted_by {
            log::warn!(
                "Listing {} stopped after {} item(s): {}",
                what,
                self.items.len(),
                err
            );
        }
        self.items
    }
}
