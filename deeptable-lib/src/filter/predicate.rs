//! Row predicates.

use super::FilterState;
use super::FilterValue;
use super::SearchState;
use crate::model::Column;
use crate::model::ColumnTreatment;
use crate::model::Row;
use crate::model::Schema;
use crate::model::SemanticType;
use crate::model::Value;

/// Returns `true` if a cell satisfies an exact-match constraint.
///
/// - `Any` matches everything.
/// - `Null` matches cells holding no value of the column's type: for booleans
///   anything that is not strictly `true`/`false`, for integers anything that
///   does not coerce to an integer, otherwise null or absent cells.
/// - Concrete booleans and integers require strict equality after coercion;
///   a null or absent cell never matches them.
/// - Everything else compares as text.
pub fn matches_filter(column: &Column, cell: Option<&Value>, constraint: &FilterValue) -> bool {
    let cell = cell.filter(|v| !v.is_null());
    match (column.semantic_type, constraint) {
        (_, FilterValue::Any) => true,
        (SemanticType::Boolean, FilterValue::Null) => cell.and_then(Value::as_bool).is_none(),
        (SemanticType::Boolean, FilterValue::Bool(b)) => cell.and_then(Value::as_bool) == Some(*b),
        (SemanticType::Integer, FilterValue::Null) => cell.and_then(Value::as_integer).is_none(),
        (SemanticType::Integer, FilterValue::Int(n)) => cell.and_then(Value::as_integer) == Some(*n),
        (_, FilterValue::Null) => cell.is_none(),
        (_, concrete) => match (cell, concrete.as_text()) {
            (Some(value), Some(text)) => value.to_text() == text,
            _ => false,
        },
    }
}

/// Returns `true` if a cell contains `fragment`, ignoring case.
///
/// `fragment` must already be lowercase. Null and absent cells contain nothing.
pub fn matches_search(cell: Option<&Value>, fragment: &str) -> bool {
    match cell {
        Some(value) => value.to_text().to_lowercase().contains(fragment),
        None => false,
    }
}

/// Returns the rows passing every active filter and search constraint.
///
/// Constraints compose with AND. Filter constraints only apply to columns
/// whose treatment is [`ColumnTreatment::Filter`], search fragments only to
/// [`ColumnTreatment::Search`] columns; constraints on any other column are
/// ignored. Relative order is preserved and `rows` is not modified.
pub fn apply_all(schema: &Schema, rows: &[Row], filters: &FilterState, search: &SearchState) -> Vec<Row> {
    let filter_checks: Vec<(&Column, &FilterValue)> = filters
        .active()
        .filter_map(|(id, value)| {
            let column = schema.column(id)?;
            (column.treatment() == ColumnTreatment::Filter).then_some((column, value))
        })
        .collect();

    let search_checks: Vec<(&Column, String)> = search
        .active()
        .filter_map(|(id, text)| {
            let column = schema.column(id)?;
            (column.treatment() == ColumnTreatment::Search).then(|| (column, text.to_lowercase()))
        })
        .collect();

    if filter_checks.is_empty() && search_checks.is_empty() {
        return rows.to_vec();
    }

    let passing: Vec<Row> = rows
        .iter()
        .filter(|row| {
            filter_checks
                .iter()
                .all(|(column, value)| matches_filter(column, row.get(&column.id), value))
                && search_checks
                    .iter()
                    .all(|(column, fragment)| matches_search(row.value(&column.id), fragment))
        })
        .cloned()
        .collect();

    log::debug!(
        "[filter] {} filters, {} searches: {} of {} rows pass",
        filter_checks.len(),
        search_checks.len(),
        passing.len(),
        rows.len()
    );
    passing
}
