//! Dynamic table row

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::Value;
use crate::error::FieldError;

/// A single record of the table.
///
/// Rows hold cell values keyed by column id. A column id that is not present
/// at all is *absent*, which is distinct from a present `Value::Null`. Rows
/// carry no identity: two rows with the same content are the same row as far
/// as selection is concerned (see [`crate::selection`]).
///
/// # Example
///
/// ```
/// use deeptable_lib::model::Row;
///
/// let row = Row::new()
///     .set("name", "Golden Retriever")
///     .set("max_age", 12);
///
/// assert_eq!(row.get_string("name").unwrap(), Some("Golden Retriever"));
/// assert!(row.get("country").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    /// Creates a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the cell value, or `None` when absent.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Returns the cell value with `Null` folded into absence.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.fields.get(column).filter(|v| !v.is_null())
    }

    /// Returns `true` if the row contains the given column.
    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a cell value (builder pattern).
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Inserts a cell value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Removes a cell and returns its value.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.fields.remove(column)
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if the column is absent or holds the wrong type.
    // Return Ok(None) only if the column exists and is Value::Null.
    // =========================================================================

    /// Gets a string cell value.
    pub fn get_string(&self, column: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(column) {
            None => Err(FieldError::missing(column)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(column, "string", other.type_name())),
        }
    }

    /// Gets a boolean cell value.
    pub fn get_bool(&self, column: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(column) {
            None => Err(FieldError::missing(column)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(column, "bool", other.type_name())),
        }
    }

    /// Gets an integer cell value.
    pub fn get_int(&self, column: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(column) {
            None => Err(FieldError::missing(column)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(column, "int", other.type_name())),
        }
    }

    /// Gets a float cell value.
    pub fn get_float(&self, column: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(column) {
            None => Err(FieldError::missing(column)),
            Some(Value::Null) => Ok(None),
            Some(Value::Float(f)) => Ok(Some(*f)),
            Some(Value::Int(n)) => Ok(Some(*n as f64)), // Allow widening
            Some(other) => Err(FieldError::type_mismatch(column, "float", other.type_name())),
        }
    }

    /// Gets an array cell value.
    pub fn get_array(&self, column: &str) -> Result<Option<&[Value]>, FieldError> {
        match self.fields.get(column) {
            None => Err(FieldError::missing(column)),
            Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items.as_slice())),
            Some(other) => Err(FieldError::type_mismatch(column, "array", other.type_name())),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<BTreeMap<String, Value>> for Row {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}
