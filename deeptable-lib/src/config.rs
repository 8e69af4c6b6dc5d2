//! Runtime configuration of a table view

use serde::Deserialize;
use serde::Serialize;

use crate::action::ActionKind;
use crate::error::PageError;

/// Which delegated row actions are offered.
///
/// An enabled action still needs a handler that supports it before it can run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionFlags {
    pub add: bool,
    pub edit: bool,
    pub delete: bool,
    pub view: bool,
}

impl ActionFlags {
    /// Creates flags with every action enabled.
    pub fn all() -> Self {
        Self {
            add: true,
            edit: true,
            delete: true,
            view: true,
        }
    }

    /// Returns `true` if the given action is enabled.
    pub fn is_enabled(&self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::Add => self.add,
            ActionKind::Edit => self.edit,
            ActionKind::Delete => self.delete,
            ActionKind::View => self.view,
        }
    }
}

/// Configuration of a table view.
///
/// Deserializes from JSON with every field optional.
///
/// # Example
///
/// ```
/// use deeptable_lib::config::{ActionFlags, ViewConfig};
///
/// let config = ViewConfig::default()
///     .with_page_size(25)
///     .with_selectable(true)
///     .with_actions(ActionFlags::all());
///
/// let parsed: ViewConfig = serde_json::from_str(r#"{"page_size": 5}"#).unwrap();
/// assert!(parsed.pagination);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Page sizes offered to the user.
    ///
    /// Default: 5, 10, 25
    pub page_size_options: Vec<usize>,

    /// When disabled, every filtered row is shown on a single page.
    ///
    /// Default: true
    pub pagination: bool,

    /// Whether rows can be selected.
    ///
    /// Default: false
    pub selectable: bool,

    /// Whether the header row is shown.
    ///
    /// Default: true
    pub display_header: bool,

    /// Compact row height.
    ///
    /// Default: true
    pub dense: bool,

    /// Delegated row actions.
    ///
    /// Default: none enabled
    pub actions: ActionFlags,
}

/// Page sizes offered when none are configured.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            pagination: true,
            selectable: false,
            display_header: true,
            dense: true,
            actions: ActionFlags::default(),
        }
    }
}

impl ViewConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the page sizes offered to the user.
    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    /// Enables or disables pagination.
    pub fn with_pagination(mut self, enabled: bool) -> Self {
        self.pagination = enabled;
        self
    }

    /// Enables or disables row selection.
    pub fn with_selectable(mut self, enabled: bool) -> Self {
        self.selectable = enabled;
        self
    }

    /// Shows or hides the header row.
    pub fn with_display_header(mut self, enabled: bool) -> Self {
        self.display_header = enabled;
        self
    }

    /// Sets the compact row height.
    pub fn with_dense(mut self, enabled: bool) -> Self {
        self.dense = enabled;
        self
    }

    /// Sets the enabled row actions.
    pub fn with_actions(mut self, actions: ActionFlags) -> Self {
        self.actions = actions;
        self
    }

    /// Checks that the configured page sizes are usable.
    pub fn validate(&self) -> Result<(), PageError> {
        if self.page_size == 0 {
            return Err(PageError::InvalidPageSize(0));
        }
        if self.page_size_options.contains(&0) {
            return Err(PageError::InvalidPageSize(0));
        }
        Ok(())
    }
}
