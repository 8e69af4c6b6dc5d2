//! View composition.
//!
//! [`TableView`] owns the source rows, the schema and the [`ViewState`], and
//! derives the rows to display: filter, then sort, then the page window, then
//! selection lookups. Every mutation goes through [`TableView::dispatch`] and
//! runs to completion before the next one.
//!
//! # Example
//!
//! ```
//! use deeptable_lib::config::ViewConfig;
//! use deeptable_lib::model::{Column, Row, Schema, SemanticType};
//! use deeptable_lib::view::TableView;
//!
//! let schema = Schema::new(vec![
//!     Column::new("name", "Name", SemanticType::String).searchable(),
//!     Column::new("country", "Country", SemanticType::String).filterable(),
//! ])
//! .unwrap();
//! let rows = vec![
//!     Row::new().set("name", "Beagle").set("country", "England"),
//!     Row::new().set("name", "Boxer").set("country", "Germany"),
//! ];
//!
//! let mut view = TableView::new(schema, rows, ViewConfig::default()).unwrap();
//! view.set_filter("country", "Germany").unwrap();
//!
//! assert_eq!(view.visible_rows().len(), 1);
//! assert_eq!(view.summary().to_string(), "1-1 of 1");
//! ```

mod snapshot;
mod state;

pub use snapshot::*;
pub use state::ViewState;

use std::future::Future;
use std::ops::Range;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::sync::Arc;

use crate::action::ActionDispatcher;
use crate::action::ActionKind;
use crate::action::ActionRequest;
use crate::action::ActionStatus;
use crate::action::RowActions;
use crate::config::ViewConfig;
use crate::error::ActionError;
use crate::error::SchemaError;
use crate::error::ViewError;
use crate::error::ViewFault;
use crate::error::extract_panic_message;
use crate::filter;
use crate::filter::FilterOption;
use crate::filter::FilterValue;
use crate::format;
use crate::model::Column;
use crate::model::ColumnTreatment;
use crate::model::Row;
use crate::model::Schema;
use crate::page::PageSummary;
use crate::selection::SelectionSet;
use crate::sort;
use crate::sort::SortState;

/// A user mutation of the view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    /// Set the constraint of a filter column. `FilterValue::Any` removes it.
    SetFilter { column: String, value: FilterValue },
    /// Reset every filter column to `FilterValue::Any`.
    ClearFilters,
    /// Set the fragment of a search column. An empty fragment removes it.
    SetSearch { column: String, text: String },
    /// Empty every search fragment.
    ClearSearch,
    /// Header click: ascending first, then flip.
    ToggleSort(String),
    SetSort(SortState),
    ClearSort,
    GoToPage(usize),
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    SetPageSize(usize),
    /// Select or deselect one row.
    ToggleRow { row: Row, selected: bool },
    /// Select every row of the current page.
    SelectVisible,
    /// Deselect every row of the current page.
    DeselectVisible,
    ClearSelection,
}

/// A table view over an in-memory dataset.
///
/// The source rows are never modified; filtering and sorting produce fresh
/// sequences. Faults inside a composition step are caught, logged and kept
/// in [`last_fault`](Self::last_fault) while the last good rows stay on
/// display. Only delegated action failures are reported to the user.
#[derive(Debug)]
pub struct TableView {
    schema: Schema,
    rows: Vec<Row>,
    config: ViewConfig,
    state: ViewState,
    /// Filtered and sorted rows from the last successful composition.
    derived: Vec<Row>,
    fault: Option<ViewFault>,
    actions: ActionDispatcher,
}

impl TableView {
    /// Creates a view and composes its first page.
    pub fn new(schema: Schema, rows: Vec<Row>, config: ViewConfig) -> Result<Self, ViewError> {
        config.validate()?;
        let state = ViewState::new(&schema, config.page_size)?;
        let actions = ActionDispatcher::new(config.actions);
        let mut view = Self {
            schema,
            rows,
            config,
            state,
            derived: Vec::new(),
            fault: None,
            actions,
        };
        view.recompute();
        Ok(view)
    }

    /// Sets the host handler for delegated row actions (builder pattern).
    pub fn with_action_handler(mut self, handler: Arc<dyn RowActions>) -> Self {
        self.actions = self.actions.clone().with_handler(handler);
        self
    }

    // =========================================================================
    // Dataset
    // =========================================================================

    /// Replaces schema and rows, resetting every piece of view state.
    pub fn load(&mut self, schema: Schema, rows: Vec<Row>) -> Result<(), ViewError> {
        let state = ViewState::new(&schema, self.config.page_size)?;
        log::debug!(
            "[view] loading {} rows over {} columns",
            rows.len(),
            schema.len()
        );
        self.schema = schema;
        self.rows = rows;
        self.state = state;
        self.recompute();
        Ok(())
    }

    /// Replaces the rows under the same schema.
    ///
    /// Filters, search and sort are kept. Selected rows whose content no
    /// longer occurs are dropped; the others stay selected even though they
    /// are new instances. The view returns to page 1.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        let dropped = self.state.selection.retain_present(&self.rows);
        if dropped > 0 {
            log::debug!("[view] dropped {} selected rows no longer present", dropped);
        }
        self.state.pages.reset();
        self.recompute();
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Applies a mutation and recomputes what it affects.
    ///
    /// A rejected mutation is logged and leaves the view unchanged.
    pub fn dispatch(&mut self, action: ViewAction) -> Result<(), ViewError> {
        let description = format!("{:?}", action);
        let result = self.apply(action);
        if let Err(err) = &result {
            log::warn!("[view] ignoring {}: {}", description, err);
        }
        result
    }

    fn apply(&mut self, action: ViewAction) -> Result<(), ViewError> {
        match action {
            ViewAction::SetFilter { column, value } => {
                self.require_treatment(&column, ColumnTreatment::Filter, "filtering")?;
                self.state.filters.set(column, value);
                self.narrowing_changed();
            }
            ViewAction::ClearFilters => {
                self.state.filters.clear();
                self.narrowing_changed();
            }
            ViewAction::SetSearch { column, text } => {
                self.require_treatment(&column, ColumnTreatment::Search, "searching")?;
                self.state.search.set(column, text);
                self.narrowing_changed();
            }
            ViewAction::ClearSearch => {
                self.state.search.clear();
                self.narrowing_changed();
            }
            ViewAction::ToggleSort(column) => {
                self.require_sortable(&column)?;
                self.state.sort = Some(SortState::toggled(self.state.sort.as_ref(), &column));
                self.recompute();
            }
            ViewAction::SetSort(sort) => {
                self.require_sortable(&sort.column)?;
                self.state.sort = Some(sort);
                self.recompute();
            }
            ViewAction::ClearSort => {
                self.state.sort = None;
                self.recompute();
            }
            ViewAction::GoToPage(page) => self.state.pages.go_to(page)?,
            ViewAction::NextPage => {
                self.state.pages.next_page();
            }
            ViewAction::PreviousPage => {
                self.state.pages.previous_page();
            }
            ViewAction::FirstPage => self.state.pages.first_page(),
            ViewAction::LastPage => self.state.pages.last_page(),
            ViewAction::SetPageSize(size) => self.state.pages.set_page_size(size)?,
            ViewAction::ToggleRow { row, selected } => {
                self.require_selectable()?;
                self.state.selection.toggle(&row, selected);
            }
            ViewAction::SelectVisible => {
                self.require_selectable()?;
                let range = self.visible_range();
                self.state.selection.select_all(&self.derived[range]);
            }
            ViewAction::DeselectVisible => {
                self.require_selectable()?;
                let range = self.visible_range();
                self.state.selection.deselect_all(&self.derived[range]);
            }
            ViewAction::ClearSelection => {
                self.require_selectable()?;
                self.state.selection.clear();
            }
        }
        Ok(())
    }

    pub fn set_filter(
        &mut self,
        column: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Result<(), ViewError> {
        self.dispatch(ViewAction::SetFilter {
            column: column.into(),
            value: value.into(),
        })
    }

    /// Parses a raw drop-down option and sets it as the column's filter.
    pub fn set_filter_option(&mut self, column: &str, raw: &str) -> Result<(), ViewError> {
        let semantic_type = self.schema.require(column)?.semantic_type;
        self.set_filter(column, FilterValue::parse(semantic_type, raw))
    }

    pub fn clear_filters(&mut self) -> Result<(), ViewError> {
        self.dispatch(ViewAction::ClearFilters)
    }

    pub fn set_search(
        &mut self,
        column: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), ViewError> {
        self.dispatch(ViewAction::SetSearch {
            column: column.into(),
            text: text.into(),
        })
    }

    pub fn toggle_sort(&mut self, column: impl Into<String>) -> Result<(), ViewError> {
        self.dispatch(ViewAction::ToggleSort(column.into()))
    }

    pub fn set_sort(&mut self, sort: SortState) -> Result<(), ViewError> {
        self.dispatch(ViewAction::SetSort(sort))
    }

    pub fn go_to_page(&mut self, page: usize) -> Result<(), ViewError> {
        self.dispatch(ViewAction::GoToPage(page))
    }

    pub fn next_page(&mut self) -> Result<(), ViewError> {
        self.dispatch(ViewAction::NextPage)
    }

    pub fn previous_page(&mut self) -> Result<(), ViewError> {
        self.dispatch(ViewAction::PreviousPage)
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), ViewError> {
        self.dispatch(ViewAction::SetPageSize(size))
    }

    pub fn toggle_row(&mut self, row: &Row, selected: bool) -> Result<(), ViewError> {
        self.dispatch(ViewAction::ToggleRow {
            row: row.clone(),
            selected,
        })
    }

    pub fn select_visible(&mut self) -> Result<(), ViewError> {
        self.dispatch(ViewAction::SelectVisible)
    }

    pub fn deselect_visible(&mut self) -> Result<(), ViewError> {
        self.dispatch(ViewAction::DeselectVisible)
    }

    pub fn clear_selection(&mut self) -> Result<(), ViewError> {
        self.dispatch(ViewAction::ClearSelection)
    }

    // =========================================================================
    // Delegated actions
    // =========================================================================

    /// Returns `true` if the action is enabled and the handler supports it.
    pub fn is_action_available(&self, kind: ActionKind) -> bool {
        self.actions.is_available(kind)
    }

    /// Starts a delegated action.
    ///
    /// The returned future does not borrow the view, so the view keeps
    /// accepting mutations while the action is pending.
    pub fn run_action(
        &self,
        request: ActionRequest,
    ) -> impl Future<Output = Result<(), ActionError>> + Send + 'static {
        let dispatcher = self.actions.clone();
        let schema = self.schema.clone();
        async move { dispatcher.run(request, &schema).await }
    }

    /// Runs the last failed delegated action again.
    pub fn retry_action(
        &self,
    ) -> impl Future<Output = Option<Result<(), ActionError>>> + Send + 'static {
        let dispatcher = self.actions.clone();
        let schema = self.schema.clone();
        async move { dispatcher.retry(&schema).await }
    }

    /// Dismisses the last delegated action failure.
    pub fn dismiss_error(&self) {
        self.actions.status().dismiss();
    }

    pub fn action_status(&self) -> &ActionStatus {
        self.actions.status()
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The source rows, as supplied.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// All rows passing the filters, in sort order.
    pub fn derived_rows(&self) -> &[Row] {
        &self.derived
    }

    /// The rows of the current page, or every derived row when pagination
    /// is disabled.
    pub fn visible_rows(&self) -> &[Row] {
        &self.derived[self.visible_range()]
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.state.selection
    }

    pub fn is_selected(&self, row: &Row) -> bool {
        self.state.selection.contains(row)
    }

    /// The current page is non-empty and every row on it is selected.
    pub fn all_visible_selected(&self) -> bool {
        self.state.selection.all_selected(self.visible_rows())
    }

    /// The fault of the last composition, if it failed.
    pub fn last_fault(&self) -> Option<&ViewFault> {
        self.fault.as_ref()
    }

    pub fn summary(&self) -> PageSummary {
        if self.config.pagination {
            return self.state.pages.summary();
        }
        let total = self.derived.len();
        PageSummary {
            first: usize::from(total > 0),
            last: total,
            total,
        }
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        if self.config.pagination {
            return self.state.pages.page_numbers();
        }
        if self.derived.is_empty() { Vec::new() } else { vec![1] }
    }

    /// The choices offered by a filter column's drop-down, taken from the
    /// source rows.
    pub fn filter_options(&self, column: &str) -> Result<Vec<FilterOption>, SchemaError> {
        let column = self.require_treatment(column, ColumnTreatment::Filter, "filtering")?;
        Ok(filter::filter_options(column, &self.rows))
    }

    /// Captures the current page for rendering.
    pub fn snapshot(&self) -> ViewSnapshot {
        let columns: Vec<&Column> = self.schema.visible_columns().collect();
        let sort = self.state.sort.as_ref();

        let headers = columns
            .iter()
            .map(|column| HeaderSnapshot {
                id: column.id.clone(),
                label: column.label.clone(),
                align: column.align,
                sortable: column.sortable,
                highlighted: column.highlighted,
                treatment: column.treatment(),
                sort: SortState::indicator(sort, &column.id),
            })
            .collect();

        let range = self.visible_range();
        let first_index = range.start;
        let rows = self.derived[range]
            .iter()
            .enumerate()
            .map(|(offset, row)| RowSnapshot {
                index: first_index + offset,
                selected: self.is_selected(row),
                cells: columns
                    .iter()
                    .map(|column| format::display(column.semantic_type, row.get(&column.id)))
                    .collect(),
                row: row.clone(),
            })
            .collect();

        let (current_page, page_count, page_size) = if self.config.pagination {
            let pages = &self.state.pages;
            (pages.current_page(), pages.page_count(), pages.page_size())
        } else {
            (1, usize::from(!self.derived.is_empty()), self.derived.len())
        };
        let status = self.actions.status();

        ViewSnapshot {
            headers,
            rows,
            summary: self.summary(),
            current_page,
            page_count,
            page_size,
            page_numbers: self.page_numbers(),
            has_previous: self.config.pagination && self.state.pages.has_previous(),
            has_next: self.config.pagination && self.state.pages.has_next(),
            all_selected: self.all_visible_selected(),
            selected_count: self.state.selection.len(),
            available_actions: [
                ActionKind::Add,
                ActionKind::Edit,
                ActionKind::Delete,
                ActionKind::View,
            ]
            .into_iter()
            .filter(|kind| self.actions.is_available(*kind))
            .collect(),
            loading: status.is_busy(),
            error: status.error_message(),
        }
    }

    // =========================================================================
    // Composition
    // =========================================================================

    fn narrowing_changed(&mut self) {
        self.state.pages.reset();
        self.recompute();
    }

    fn recompute(&mut self) {
        match self.compose() {
            Ok(rows) => {
                self.derived = rows;
                self.fault = None;
            }
            Err(fault) => {
                log::error!("[view] {}; keeping the last good rows", fault);
                self.fault = Some(fault);
            }
        }
        self.state.pages.set_total_rows(self.derived.len());
    }

    fn compose(&self) -> Result<Vec<Row>, ViewFault> {
        let state = &self.state;
        let filtered = run_step("filter", || {
            filter::apply_all(&self.schema, &self.rows, &state.filters, &state.search)
        })?;
        let sorted = match &state.sort {
            Some(sort) => run_step("sort", || sort::sort_rows(&self.schema, &filtered, sort))?,
            None => filtered,
        };
        log::debug!(
            "[view] composed {} of {} rows",
            sorted.len(),
            self.rows.len()
        );
        Ok(sorted)
    }

    fn visible_range(&self) -> Range<usize> {
        let len = self.derived.len();
        if !self.config.pagination {
            return 0..len;
        }
        match self.state.pages.window() {
            Some(window) => {
                let range = window.range();
                range.start.min(len)..range.end.min(len)
            }
            None => 0..0,
        }
    }

    fn require_treatment(
        &self,
        column: &str,
        treatment: ColumnTreatment,
        operation: &'static str,
    ) -> Result<&Column, SchemaError> {
        let found = self.schema.require(column)?;
        if found.treatment() != treatment {
            return Err(SchemaError::unsupported(column, operation));
        }
        Ok(found)
    }

    fn require_sortable(&self, column: &str) -> Result<(), SchemaError> {
        if !self.schema.require(column)?.sortable {
            return Err(SchemaError::unsupported(column, "sorting"));
        }
        Ok(())
    }

    fn require_selectable(&self) -> Result<(), ViewError> {
        if !self.config.selectable {
            return Err(ViewError::SelectionDisabled);
        }
        Ok(())
    }
}

/// Runs one composition step, turning a panic into a [`ViewFault`].
fn run_step<T>(step: &'static str, f: impl FnOnce() -> T) -> Result<T, ViewFault> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|panic| ViewFault {
        step,
        message: extract_panic_message(&panic),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SemanticType;
    use crate::sort::SortIndicator;

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("name", "Name", SemanticType::String).searchable(),
            Column::new("country", "Country", SemanticType::String).filterable(),
            Column::new("max_age", "Max Age", SemanticType::Integer),
            Column::new("secret", "Secret", SemanticType::String).hidden(),
            Column::new("notes", "Notes", SemanticType::String).unsortable(),
        ])
        .unwrap()
    }

    fn rows(count: usize) -> Vec<Row> {
        (0..count)
            .map(|i| {
                Row::new()
                    .set("name", format!("dog {i}"))
                    .set("country", if i % 2 == 0 { "Germany" } else { "France" })
                    .set("max_age", i as i64)
            })
            .collect()
    }

    fn view(count: usize) -> TableView {
        let config = ViewConfig::default().with_page_size(5).with_selectable(true);
        TableView::new(schema(), rows(count), config).unwrap()
    }

    #[test]
    fn test_run_step_catches_panics() {
        let fault = run_step("sort", || -> Vec<Row> { panic!("bad cell") }).unwrap_err();
        assert_eq!(fault.step, "sort");
        assert_eq!(fault.message, "bad cell");
        assert_eq!(run_step("filter", || 3), Ok(3));
    }

    #[test]
    fn test_filter_resets_to_first_page() {
        let mut view = view(20);
        view.go_to_page(3).unwrap();

        view.set_filter("country", "Germany").unwrap();
        assert_eq!(view.state().pages.current_page(), 1);
        assert_eq!(view.summary().to_string(), "1-5 of 10");
    }

    #[test]
    fn test_sort_keeps_page() {
        let mut view = view(20);
        view.go_to_page(2).unwrap();

        view.toggle_sort("max_age").unwrap();
        view.toggle_sort("max_age").unwrap();
        assert_eq!(view.state().pages.current_page(), 2);
        assert_eq!(view.visible_rows()[0].get_int("max_age").unwrap(), Some(14));
    }

    #[test]
    fn test_rejected_mutations_leave_view_unchanged() {
        let mut view = view(8);
        let before = view.state().clone();

        assert_eq!(
            view.set_filter("name", "dog 1"),
            Err(ViewError::Schema(SchemaError::unsupported("name", "filtering")))
        );
        assert_eq!(
            view.set_search("missing", "x"),
            Err(ViewError::Schema(SchemaError::UnknownColumn("missing".to_string())))
        );
        assert_eq!(
            view.toggle_sort("notes"),
            Err(ViewError::Schema(SchemaError::unsupported("notes", "sorting")))
        );
        assert!(view.go_to_page(9).is_err());
        assert!(view.set_page_size(0).is_err());
        assert_eq!(view.state(), &before);
    }

    #[test]
    fn test_selection_disabled() {
        let mut view = TableView::new(schema(), rows(3), ViewConfig::default()).unwrap();
        assert_eq!(view.select_visible(), Err(ViewError::SelectionDisabled));
    }

    #[test]
    fn test_pagination_disabled_shows_everything() {
        let config = ViewConfig::default().with_page_size(5).with_pagination(false);
        let view = TableView::new(schema(), rows(12), config).unwrap();

        assert_eq!(view.visible_rows().len(), 12);
        assert_eq!(view.summary().to_string(), "1-12 of 12");
        assert_eq!(view.page_numbers(), vec![1]);
    }

    #[test]
    fn test_snapshot_headers_and_cells() {
        let mut view = view(3);
        view.toggle_sort("max_age").unwrap();
        view.toggle_row(&rows(3)[0], true).unwrap();

        let snapshot = view.snapshot();
        let ids: Vec<&str> = snapshot.headers.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["name", "country", "max_age", "notes"]);
        assert_eq!(snapshot.headers[2].sort, SortIndicator::Asc);
        assert_eq!(snapshot.headers[0].sort, SortIndicator::None);

        assert_eq!(snapshot.rows[0].cells, vec!["dog 0", "Germany", "0", "—"]);
        assert!(snapshot.rows[0].selected);
        assert!(!snapshot.rows[1].selected);
        assert_eq!(snapshot.selected_count, 1);
        assert!(!snapshot.all_selected);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.error, None);
    }

    #[test]
    fn test_load_resets_state() {
        let mut view = view(12);
        view.set_filter("country", "France").unwrap();
        view.toggle_sort("name").unwrap();
        view.select_visible().unwrap();

        view.load(schema(), rows(4)).unwrap();
        assert!(!view.state().filters.is_active());
        assert_eq!(view.state().sort, None);
        assert!(view.selection().is_empty());
        assert_eq!(view.summary().to_string(), "1-4 of 4");
    }

    #[test]
    fn test_filter_options_from_source_rows() {
        let mut view = view(4);
        view.set_filter("country", "France").unwrap();

        let labels: Vec<String> = view
            .filter_options("country")
            .unwrap()
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["France", "Germany"]);
        assert!(view.filter_options("name").is_err());
    }
}
