//! Row selection keyed by structural equality.
//!
//! Rows carry no identity, so the selection stores row values and tests
//! membership with [`rows_equal`]. A row rebuilt from the same data is
//! recognised as already selected.

mod equality;

pub use equality::*;

use serde::Serialize;

use crate::model::Row;

/// Selected rows, free of structural duplicates.
///
/// Every membership test, insertion and removal goes through [`rows_equal`],
/// so the set never holds two equal rows. Lookups are linear scans.
///
/// # Example
///
/// ```
/// use deeptable_lib::model::Row;
/// use deeptable_lib::selection::SelectionSet;
///
/// let mut selection = SelectionSet::new();
/// selection.insert(Row::new().set("name", "Beagle"));
///
/// // A separately built row with the same content is the same row.
/// assert!(selection.contains(&Row::new().set("name", "Beagle")));
/// assert!(!selection.insert(Row::new().set("name", "Beagle")));
/// assert_eq!(selection.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    rows: Vec<Row>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a row is selected.
    pub fn contains(&self, row: &Row) -> bool {
        self.position(row).is_some()
    }

    /// Adds a row. Returns true if the selection changed.
    pub fn insert(&mut self, row: Row) -> bool {
        if self.contains(&row) {
            return false;
        }
        self.rows.push(row);
        true
    }

    /// Removes a row. Returns true if the selection changed.
    pub fn remove(&mut self, row: &Row) -> bool {
        match self.position(row) {
            Some(index) => {
                self.rows.remove(index);
                true
            }
            None => false,
        }
    }

    /// Sets the membership of a row. Returns true if the selection changed.
    pub fn toggle(&mut self, row: &Row, selected: bool) -> bool {
        if selected {
            self.insert(row.clone())
        } else {
            self.remove(row)
        }
    }

    /// Selects every given row.
    pub fn select_all<'a>(&mut self, rows: impl IntoIterator<Item = &'a Row>) {
        for row in rows {
            self.insert(row.clone());
        }
    }

    /// Deselects every given row.
    pub fn deselect_all<'a>(&mut self, rows: impl IntoIterator<Item = &'a Row>) {
        for row in rows {
            self.remove(row);
        }
    }

    /// Drops selected rows that no longer occur in `rows`.
    ///
    /// Returns the number of rows dropped.
    pub fn retain_present(&mut self, rows: &[Row]) -> usize {
        let before = self.rows.len();
        self.rows
            .retain(|selected| rows.iter().any(|row| rows_equal(selected, row)));
        before - self.rows.len()
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates the selected rows in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Returns true if `rows` is non-empty and every row in it is selected.
    pub fn all_selected(&self, rows: &[Row]) -> bool {
        !rows.is_empty() && rows.iter().all(|row| self.contains(row))
    }

    fn position(&self, row: &Row) -> Option<usize> {
        self.rows.iter().position(|selected| rows_equal(selected, row))
    }
}
