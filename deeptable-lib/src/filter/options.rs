//! Choices offered by a filter drop-down.

use std::collections::BTreeSet;

use serde::Serialize;

use super::FilterValue;
use crate::model::Column;
use crate::model::Row;
use crate::model::SemanticType;
use crate::model::Value;

/// Label of the bucket for cells without a value of the column's type.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One selectable filter choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: FilterValue,
    pub label: String,
}

impl FilterOption {
    fn new(value: FilterValue, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }

    fn unknown() -> Self {
        Self::new(FilterValue::Null, UNKNOWN_LABEL)
    }
}

/// Lists the filter choices for a column, derived from the source rows.
///
/// - Boolean: Yes and No, plus Unknown when some cell is not strictly a boolean.
/// - Integer: the distinct integers in ascending order, plus Unknown when some
///   cell does not coerce to an integer.
/// - Anything else: the distinct non-null cell texts in lexical order, plus
///   Unknown when some cell is null or absent.
///
/// The [`FilterValue::Any`] choice is implicit and not listed.
pub fn filter_options(column: &Column, rows: &[Row]) -> Vec<FilterOption> {
    let mut cells = rows.iter().map(|row| row.value(&column.id));

    match column.semantic_type {
        SemanticType::Boolean => {
            let mut options = vec![
                FilterOption::new(FilterValue::Bool(true), "Yes"),
                FilterOption::new(FilterValue::Bool(false), "No"),
            ];
            if cells.any(|cell| cell.and_then(Value::as_bool).is_none()) {
                options.push(FilterOption::unknown());
            }
            options
        }
        SemanticType::Integer => {
            let mut integers = BTreeSet::new();
            let mut has_unknown = false;
            for cell in cells {
                match cell.and_then(Value::as_integer) {
                    Some(n) => {
                        integers.insert(n);
                    }
                    None => has_unknown = true,
                }
            }
            let mut options: Vec<FilterOption> = integers
                .into_iter()
                .map(|n| FilterOption::new(FilterValue::Int(n), n.to_string()))
                .collect();
            if has_unknown {
                options.push(FilterOption::unknown());
            }
            options
        }
        _ => {
            let mut texts = BTreeSet::new();
            let mut has_unknown = false;
            for cell in cells {
                match cell {
                    Some(value) => {
                        texts.insert(value.to_text());
                    }
                    None => has_unknown = true,
                }
            }
            let mut options: Vec<FilterOption> = texts
                .into_iter()
                .map(|text| FilterOption::new(FilterValue::Text(text.clone()), text))
                .collect();
            if has_unknown {
                options.push(FilterOption::unknown());
            }
            options
        }
    }
}
