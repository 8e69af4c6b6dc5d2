//! Single-column sorting.

mod collate;
mod compare;

pub use collate::natural_cmp;
pub use compare::*;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;
use crate::model::Schema;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9, false before true).
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Per-column sort marker shown in a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortIndicator {
    Asc,
    Desc,
    #[default]
    None,
}

/// The active sort: one column, one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    /// Creates an ascending sort on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Computes the sort that follows a click on `column`'s header.
    ///
    /// A new column starts ascending; clicking the sorted column flips it.
    pub fn toggled(current: Option<&SortState>, column: &str) -> SortState {
        match current {
            Some(state) if state.column == column => SortState {
                column: state.column.clone(),
                direction: state.direction.flipped(),
            },
            _ => SortState::asc(column),
        }
    }

    /// Returns the header marker for `column` under this sort.
    pub fn indicator(state: Option<&SortState>, column: &str) -> SortIndicator {
        match state {
            Some(s) if s.column == column => match s.direction {
                SortDirection::Asc => SortIndicator::Asc,
                SortDirection::Desc => SortIndicator::Desc,
            },
            _ => SortIndicator::None,
        }
    }
}

/// Returns a sorted copy of `rows`.
///
/// The sort is stable. Direction applies to orderable cells only: cells that
/// cannot be coerced to the column's type follow them in their original order,
/// and null or absent cells always come last.
pub fn sort_rows(schema: &Schema, rows: &[Row], state: &SortState) -> Vec<Row> {
    let Some(column) = schema.column(&state.column) else {
        log::warn!("[sort] ignoring sort on unknown column '{}'", state.column);
        return rows.to_vec();
    };

    let mut keyed = Vec::with_capacity(rows.len());
    let mut faulty = Vec::new();
    let mut empty = Vec::new();
    for row in rows {
        match row.value(&column.id) {
            None => empty.push(row.clone()),
            Some(value) => match Comparator::key(column, value) {
                Ok(key) => keyed.push((key, row.clone())),
                Err(err) => {
                    log::warn!("[sort] {}", err);
                    faulty.push(row.clone());
                }
            },
        }
    }

    keyed.sort_by(|(a, _), (b, _)| match state.direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => b.cmp(a),
    });

    log::debug!(
        "[sort] '{}' {:?}: {} ordered, {} unorderable, {} empty",
        column.id,
        state.direction,
        keyed.len(),
        faulty.len(),
        empty.len()
    );

    keyed
        .into_iter()
        .map(|(_, row)| row)
        .chain(faulty)
        .chain(empty)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use crate::model::SemanticType;
    use crate::model::Value;

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("name", "Name", SemanticType::String),
            Column::new("age", "Age", SemanticType::Integer),
        ])
        .unwrap()
    }

    fn names(rows: &[Row]) -> Vec<&str> {
        rows.iter()
            .map(|r| r.get_string("name").unwrap().unwrap_or("-"))
            .collect()
    }

    #[test]
    fn test_toggle_cycle() {
        let first = SortState::toggled(None, "age");
        assert_eq!(first, SortState::asc("age"));

        let second = SortState::toggled(Some(&first), "age");
        assert_eq!(second, SortState::desc("age"));

        let third = SortState::toggled(Some(&second), "age");
        assert_eq!(third, SortState::asc("age"));

        let other = SortState::toggled(Some(&second), "name");
        assert_eq!(other, SortState::asc("name"));
    }

    #[test]
    fn test_indicator() {
        let state = SortState::desc("age");
        assert_eq!(SortState::indicator(Some(&state), "age"), SortIndicator::Desc);
        assert_eq!(SortState::indicator(Some(&state), "name"), SortIndicator::None);
        assert_eq!(SortState::indicator(None, "age"), SortIndicator::None);
    }

    #[test]
    fn test_nulls_last_in_both_directions() {
        let rows = vec![
            Row::new().set("name", "a").set("age", Value::Null),
            Row::new().set("name", "b").set("age", 5),
            Row::new().set("name", "c"),
            Row::new().set("name", "d").set("age", 2),
        ];
        let schema = schema();

        let asc = sort_rows(&schema, &rows, &SortState::asc("age"));
        assert_eq!(names(&asc), vec!["d", "b", "a", "c"]);

        let desc = sort_rows(&schema, &rows, &SortState::desc("age"));
        assert_eq!(names(&desc), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_stable_for_ties() {
        let rows = vec![
            Row::new().set("name", "first").set("age", 3),
            Row::new().set("name", "second").set("age", 3),
            Row::new().set("name", "third").set("age", 1),
        ];
        let sorted = sort_rows(&schema(), &rows, &SortState::asc("age"));
        assert_eq!(names(&sorted), vec!["third", "first", "second"]);
    }

    #[test]
    fn test_unorderable_cells_after_ordered() {
        let rows = vec![
            Row::new().set("name", "x").set("age", "n/a"),
            Row::new().set("name", "y").set("age", 9),
            Row::new().set("name", "z").set("age", 1),
        ];
        let sorted = sort_rows(&schema(), &rows, &SortState::desc("age"));
        assert_eq!(names(&sorted), vec!["y", "z", "x"]);
    }

    #[test]
    fn test_source_untouched() {
        let rows = vec![
            Row::new().set("name", "b"),
            Row::new().set("name", "a"),
        ];
        let sorted = sort_rows(&schema(), &rows, &SortState::asc("name"));
        assert_eq!(names(&sorted), vec!["a", "b"]);
        assert_eq!(names(&rows), vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_column_keeps_order() {
        let rows = vec![
            Row::new().set("name", "b"),
            Row::new().set("name", "a"),
        ];
        let sorted = sort_rows(&schema(), &rows, &SortState::asc("missing"));
        assert_eq!(names(&sorted), vec!["b", "a"]);
    }
}
