//! Explicit view state.

use crate::error::PageError;
use crate::filter::FilterState;
use crate::filter::SearchState;
use crate::model::Schema;
use crate::page::Paginator;
use crate::selection::SelectionSet;
use crate::sort::SortState;

/// Everything the user has changed about a view.
///
/// Replaced wholesale when a new dataset is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Filter constraints per filter column.
    pub filters: FilterState,
    /// Search fragments per search column.
    pub search: SearchState,
    /// Active sort, if any.
    pub sort: Option<SortState>,
    /// Page size and current page.
    pub pages: Paginator,
    /// Selected rows.
    pub selection: SelectionSet,
}

impl ViewState {
    /// Creates the initial state for a schema: no constraints, unsorted,
    /// page 1, nothing selected.
    pub fn new(schema: &Schema, page_size: usize) -> Result<Self, PageError> {
        Ok(Self {
            filters: FilterState::for_schema(schema),
            search: SearchState::for_schema(schema),
            sort: None,
            pages: Paginator::new(page_size)?,
            selection: SelectionSet::new(),
        })
    }
}
