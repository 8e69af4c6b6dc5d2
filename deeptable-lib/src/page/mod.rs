//! Page windowing over the filtered and sorted rows.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::error::PageError;

/// Maximum number of page buttons offered at once.
pub const MAX_PAGE_BUTTONS: usize = 5;

/// Inclusive index bounds of the rows on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub first_index: usize,
    pub last_index: usize,
}

impl PageWindow {
    /// Computes the window for a 1-based page.
    ///
    /// Returns `None` when the page holds no rows, which is always the case
    /// for an empty sequence.
    pub fn compute(total_rows: usize, page_size: usize, page: usize) -> Option<Self> {
        if total_rows == 0 || page_size == 0 || page == 0 {
            return None;
        }
        let first_index = (page - 1).checked_mul(page_size)?;
        if first_index >= total_rows {
            return None;
        }
        let last_index = (first_index.saturating_add(page_size) - 1).min(total_rows - 1);
        Some(Self {
            first_index,
            last_index,
        })
    }

    /// Returns the window as a half-open range.
    pub fn range(&self) -> Range<usize> {
        self.first_index..self.last_index + 1
    }

    /// Returns the number of rows in the window.
    pub fn len(&self) -> usize {
        self.last_index - self.first_index + 1
    }

    /// Always `false`: empty windows are represented by `None`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Human-facing "first-last of total" line.
///
/// `first` and `last` are 1-based; all three are zero for an empty sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} of {}", self.first, self.last, self.total)
    }
}

/// Returns the page numbers to offer as buttons.
///
/// At most [`MAX_PAGE_BUTTONS`] consecutive pages centered on `current_page`,
/// shifted to stay within `1..=page_count`.
pub fn page_numbers(page_count: usize, current_page: usize) -> Vec<usize> {
    if page_count <= MAX_PAGE_BUTTONS {
        return (1..=page_count).collect();
    }
    let half = MAX_PAGE_BUTTONS / 2;
    let current = current_page.clamp(1, page_count);
    let start = current
        .saturating_sub(half)
        .max(1)
        .min(page_count - MAX_PAGE_BUTTONS + 1);
    (start..start + MAX_PAGE_BUTTONS).collect()
}

/// Pagination state: page size, current page and the row count it applies to.
///
/// The current page never points past the last page: whenever the row count
/// or page size changes so that it would, it falls back to page 1.
///
/// # Example
///
/// ```
/// use deeptable_lib::page::Paginator;
///
/// let mut pages = Paginator::new(10).unwrap();
/// pages.set_total_rows(43);
/// pages.go_to(5).unwrap();
///
/// assert_eq!(pages.summary().to_string(), "41-43 of 43");
///
/// pages.set_total_rows(5);
/// assert_eq!(pages.current_page(), 1);
/// assert_eq!(pages.page_numbers(), vec![1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
    total_rows: usize,
}

impl Paginator {
    /// Creates a paginator on page 1 of an empty sequence.
    pub fn new(page_size: usize) -> Result<Self, PageError> {
        if page_size == 0 {
            return Err(PageError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            current_page: 1,
            total_rows: 0,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The 1-based current page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Number of pages; zero for an empty sequence.
    pub fn page_count(&self) -> usize {
        self.total_rows.div_ceil(self.page_size)
    }

    /// Updates the row count, returning to page 1 if the current page no
    /// longer exists.
    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
        if self.current_page > self.page_count().max(1) {
            log::debug!(
                "[page] page {} past the end of {} rows, back to page 1",
                self.current_page,
                total_rows
            );
            self.current_page = 1;
        }
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PageError> {
        if page_size == 0 {
            return Err(PageError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.current_page = 1;
        Ok(())
    }

    /// Jumps to a 1-based page.
    pub fn go_to(&mut self, page: usize) -> Result<(), PageError> {
        let page_count = self.page_count();
        if page == 0 || page > page_count.max(1) {
            return Err(PageError::OutOfRange { page, page_count });
        }
        self.current_page = page;
        Ok(())
    }

    /// Returns to page 1.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count()
    }

    /// Moves one page back. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Moves one page forward. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    pub fn first_page(&mut self) {
        self.current_page = 1;
    }

    pub fn last_page(&mut self) {
        self.current_page = self.page_count().max(1);
    }

    /// The rows shown on the current page.
    pub fn window(&self) -> Option<PageWindow> {
        PageWindow::compute(self.total_rows, self.page_size, self.current_page)
    }

    /// The "first-last of total" line for the current page.
    pub fn summary(&self) -> PageSummary {
        match self.window() {
            Some(window) => PageSummary {
                first: window.first_index + 1,
                last: window.last_index + 1,
                total: self.total_rows,
            },
            None => PageSummary {
                first: 0,
                last: 0,
                total: self.total_rows,
            },
        }
    }

    /// The page buttons to offer around the current page.
    pub fn page_numbers(&self) -> Vec<usize> {
        page_numbers(self.page_count(), self.current_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds() {
        assert_eq!(
            PageWindow::compute(43, 10, 1),
            Some(PageWindow { first_index: 0, last_index: 9 })
        );
        assert_eq!(
            PageWindow::compute(43, 10, 5),
            Some(PageWindow { first_index: 40, last_index: 42 })
        );
        assert_eq!(PageWindow::compute(43, 10, 6), None);
        assert_eq!(PageWindow::compute(0, 10, 1), None);
    }

    #[test]
    fn test_window_range() {
        let window = PageWindow::compute(12, 5, 3).unwrap();
        assert_eq!(window.range(), 10..12);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_page_numbers_sliding() {
        assert_eq!(page_numbers(0, 1), Vec::<usize>::new());
        assert_eq!(page_numbers(3, 2), vec![1, 2, 3]);
        assert_eq!(page_numbers(10, 1), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_numbers(10, 2), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_numbers(10, 6), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_numbers(10, 9), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_numbers(10, 10), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_empty_sequence() {
        let pages = Paginator::new(10).unwrap();
        assert_eq!(pages.page_count(), 0);
        assert_eq!(pages.window(), None);
        assert_eq!(pages.summary().to_string(), "0-0 of 0");
        assert!(pages.page_numbers().is_empty());
        assert!(!pages.has_next());
    }

    #[test]
    fn test_shrinking_total_resets_page() {
        let mut pages = Paginator::new(10).unwrap();
        pages.set_total_rows(43);
        pages.go_to(4).unwrap();

        pages.set_total_rows(35);
        assert_eq!(pages.current_page(), 4);

        pages.set_total_rows(25);
        assert_eq!(pages.current_page(), 1);
        assert_eq!(pages.summary().to_string(), "1-10 of 25");
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut pages = Paginator::new(5).unwrap();
        pages.set_total_rows(43);
        pages.go_to(3).unwrap();

        pages.set_page_size(25).unwrap();
        assert_eq!(pages.current_page(), 1);
        assert_eq!(pages.page_count(), 2);
        assert_eq!(pages.set_page_size(0), Err(PageError::InvalidPageSize(0)));
    }

    #[test]
    fn test_go_to_out_of_range() {
        let mut pages = Paginator::new(10).unwrap();
        pages.set_total_rows(20);

        assert_eq!(
            pages.go_to(3),
            Err(PageError::OutOfRange { page: 3, page_count: 2 })
        );
        assert!(pages.go_to(0).is_err());
        assert_eq!(pages.current_page(), 1);
    }

    #[test]
    fn test_navigation() {
        let mut pages = Paginator::new(10).unwrap();
        pages.set_total_rows(25);

        assert!(!pages.previous_page());
        assert!(pages.next_page());
        assert!(pages.next_page());
        assert!(!pages.next_page());
        assert_eq!(pages.current_page(), 3);
        pages.first_page();
        assert_eq!(pages.current_page(), 1);
        pages.last_page();
        assert_eq!(pages.current_page(), 3);
    }
}
