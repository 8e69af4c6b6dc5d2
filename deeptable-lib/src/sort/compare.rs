//! Type-aware cell comparison.

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::NaiveDate;

use super::natural_cmp;
use crate::error::CompareError;
use crate::model::Column;
use crate::model::Schema;
use crate::model::SemanticType;
use crate::model::Value;

/// The orderable projection of a non-null cell.
///
/// Within one column every key has the same variant, chosen by the column's
/// semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Bool(bool),
    Text(String),
    /// Arrays order by length, then by their first element as text.
    Array { len: usize, first: String },
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Bool(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Array { .. } => 3,
        }
    }
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => natural_cmp(a, b),
            (
                SortKey::Array { len: a_len, first: a_first },
                SortKey::Array { len: b_len, first: b_first },
            ) => a_len
                .cmp(b_len)
                .then_with(|| natural_cmp(a_first, b_first)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Returns the instant of a temporal cell in epoch milliseconds.
///
/// Seconds timestamps are scaled by 1000 so that cells from seconds and
/// milliseconds columns describing the same instant compare equal. Date cells
/// also accept RFC 3339 and `YYYY-MM-DD` strings.
///
/// Returns `None` for non-temporal types and for cells that do not coerce.
pub fn instant_millis(semantic_type: SemanticType, value: &Value) -> Option<f64> {
    match semantic_type {
        SemanticType::TimestampSeconds => value.as_number().map(|s| s * 1000.0),
        SemanticType::TimestampMillis => value.as_number(),
        SemanticType::Date => value.as_number().or_else(|| {
            let text = value.as_str()?.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Some(dt.timestamp_millis() as f64);
            }
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
            Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis() as f64)
        }),
        _ => None,
    }
}

/// Orders cells of a schema's columns.
///
/// Dispatches on the column's [`SemanticType`]. Null and absent cells sort
/// after everything else. Cells that cannot be coerced to the column's type
/// compare equal to anything; the fault is logged and never surfaced.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use deeptable_lib::model::{Column, Schema, SemanticType, Value};
/// use deeptable_lib::sort::Comparator;
///
/// let schema = Schema::new(vec![Column::new("age", "Age", SemanticType::Integer)]).unwrap();
/// let comparator = Comparator::new(&schema);
///
/// let ord = comparator.compare("age", Some(&Value::from(3)), Some(&Value::from(12)));
/// assert_eq!(ord, Ordering::Less);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Comparator<'a> {
    schema: &'a Schema,
}

impl<'a> Comparator<'a> {
    /// Creates a comparator over the given schema.
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Compares two cells of the given column.
    ///
    /// Unknown columns compare everything as equal.
    pub fn compare(&self, column_id: &str, a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let Some(column) = self.schema.column(column_id) else {
            log::debug!("[sort] compare on unknown column '{}'", column_id);
            return Ordering::Equal;
        };

        let a = a.filter(|v| !v.is_null());
        let b = b.filter(|v| !v.is_null());
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => match (Self::key(column, a), Self::key(column, b)) {
                (Ok(ka), Ok(kb)) => ka.cmp(&kb),
                (Err(err), _) | (_, Err(err)) => {
                    log::warn!("[sort] {}", err);
                    Ordering::Equal
                }
            },
        }
    }

    /// Projects a non-null cell onto its sort key.
    pub fn key(column: &Column, value: &Value) -> Result<SortKey, CompareError> {
        let fault = || CompareError {
            column: column.id.clone(),
            semantic_type: column.semantic_type,
            found: value.type_name(),
        };

        match column.semantic_type {
            SemanticType::String | SemanticType::Guid | SemanticType::Variant => {
                Ok(SortKey::Text(value.to_text()))
            }
            SemanticType::Integer | SemanticType::Float => {
                value.as_number().map(SortKey::Number).ok_or_else(fault)
            }
            SemanticType::TimestampSeconds | SemanticType::TimestampMillis | SemanticType::Date => {
                instant_millis(column.semantic_type, value)
                    .map(SortKey::Number)
                    .ok_or_else(fault)
            }
            SemanticType::Boolean => value.as_bool().map(SortKey::Bool).ok_or_else(fault),
            SemanticType::StringArray => Ok(match value {
                Value::Array(items) => SortKey::Array {
                    len: items.len(),
                    first: items.first().map(Value::to_text).unwrap_or_default(),
                },
                other => SortKey::Array {
                    len: 1,
                    first: other.to_text(),
                },
            }),
        }
    }
}
