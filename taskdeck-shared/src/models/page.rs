/// Pagination envelope
///
/// A `Page<T>` is a bounded slice of a larger ordered collection plus the
/// total-count metadata a client needs to iterate: `totalElements` and
/// `totalPages` (field names are camelCase on the wire).
///
/// # Example
///
/// ```
/// use taskdeck_shared::models::page::Page;
///
/// let page = Page::new(vec!["a", "b"], 2, 0, 3);
/// assert_eq!(page.total_elements, 2);
/// assert_eq!(page.total_pages, 1);
/// assert_eq!(page.content.len(), 2);
/// ```

use serde::{Deserialize, Serialize};

/// One page of results with total-count metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The records on this page, in store order
    pub content: Vec<T>,

    /// Total number of matching records across all pages
    pub total_elements: i64,

    /// Total number of pages at the requested size
    pub total_pages: i64,

    /// Zero-based page number that was requested
    pub number: i64,

    /// Requested page size
    pub size: i64,
}

impl<T> Page<T> {
    /// Builds a page from a slice of content and the overall total
    ///
    /// `total_pages` is `ceil(total_elements / size)`; a non-positive size is
    /// treated as 1 so the arithmetic never divides by zero.
    pub fn new(content: Vec<T>, total_elements: i64, number: i64, size: i64) -> Self {
        let effective_size = size.max(1);
        let total_pages = (total_elements + effective_size - 1) / effective_size;

        Self {
            content,
            total_elements,
            total_pages,
            number,
            size,
        }
    }
}
