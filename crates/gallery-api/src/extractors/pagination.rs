//! Pagination query parameters.

use serde::Deserialize;

use gallery_core::types::pagination::PageRequest;

/// Query-string pagination parameters (`?page=2&page_size=20`).
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PaginationParams {
    /// Converts to a clamped [`PageRequest`].
    pub fn to_page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.page_size.unwrap_or(defaults.page_size),
        )
    }
}
