//! Serializable picture of a view for a presentation layer.

use serde::Serialize;

use crate::action::ActionKind;
use crate::model::CellAlign;
use crate::model::ColumnTreatment;
use crate::model::Row;
use crate::page::PageSummary;
use crate::sort::SortIndicator;

/// Header of one visible column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderSnapshot {
    pub id: String,
    pub label: String,
    pub align: CellAlign,
    pub sortable: bool,
    pub highlighted: bool,
    pub treatment: ColumnTreatment,
    pub sort: SortIndicator,
}

/// One row of the current page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSnapshot {
    /// Position in the filtered and sorted sequence.
    pub index: usize,
    pub selected: bool,
    /// Display text per visible column, in header order.
    pub cells: Vec<String>,
    pub row: Row,
}

/// Everything needed to render the current page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub headers: Vec<HeaderSnapshot>,
    pub rows: Vec<RowSnapshot>,
    pub summary: PageSummary,
    pub current_page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub page_numbers: Vec<usize>,
    pub has_previous: bool,
    pub has_next: bool,
    /// The current page is non-empty and entirely selected.
    pub all_selected: bool,
    pub selected_count: usize,
    pub available_actions: Vec<ActionKind>,
    /// A delegated action is still pending.
    pub loading: bool,
    /// Message of the last failed delegated action.
    pub error: Option<String>,
}
