//! Pagination error types

/// Errors from pagination mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// Page sizes must be positive.
    #[error("Invalid page size {0}")]
    InvalidPageSize(usize),

    /// The requested page is outside `1..=page_count`.
    #[error("Page {page} out of range (1..={page_count})")]
    OutOfRange { page: usize, page_count: usize },
}
