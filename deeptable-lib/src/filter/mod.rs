//! Exact-match filters and substring search.

mod options;
mod predicate;

pub use options::*;
pub use predicate::*;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Schema;
use crate::model::SemanticType;

/// Raw option text that selects [`FilterValue::Any`].
pub const NO_FILTER: &str = "__NO_FILTER__";

/// A filter constraint for one column.
///
/// `Any` is the "no constraint" sentinel. It is its own variant, so it can
/// never be confused with a legitimate `Null`, `false` or `0` constraint.
///
/// # Example
///
/// ```
/// use deeptable_lib::filter::FilterValue;
/// use deeptable_lib::model::SemanticType;
///
/// assert_eq!(FilterValue::parse(SemanticType::Boolean, "false"), FilterValue::Bool(false));
/// assert_eq!(FilterValue::parse(SemanticType::Boolean, "null"), FilterValue::Null);
/// assert_eq!(FilterValue::parse(SemanticType::Integer, "__NO_FILTER__"), FilterValue::Any);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FilterValue {
    /// No constraint: every row passes.
    #[default]
    Any,
    /// Matches cells that hold no value of the column's type.
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FilterValue {
    /// Parses a filter option chosen by a user for a column of the given type.
    ///
    /// `"null"` selects the Unknown bucket. For booleans anything other than
    /// `"true"`/`"false"` also selects it.
    pub fn parse(semantic_type: SemanticType, raw: &str) -> Self {
        if raw == NO_FILTER {
            return FilterValue::Any;
        }
        if raw == "null" {
            return FilterValue::Null;
        }
        match semantic_type {
            SemanticType::Boolean => match raw {
                "true" => FilterValue::Bool(true),
                "false" => FilterValue::Bool(false),
                _ => FilterValue::Null,
            },
            SemanticType::Integer => match raw.trim().parse::<i64>() {
                Ok(n) => FilterValue::Int(n),
                Err(_) => FilterValue::Text(raw.to_string()),
            },
            _ => FilterValue::Text(raw.to_string()),
        }
    }

    /// Returns `true` unless this is the [`Any`](Self::Any) sentinel.
    pub fn is_active(&self) -> bool {
        !matches!(self, FilterValue::Any)
    }

    /// Returns the option text that [`parse`](Self::parse) maps back to this value.
    pub fn option_key(&self) -> String {
        match self {
            FilterValue::Any => NO_FILTER.to_string(),
            FilterValue::Null => "null".to_string(),
            FilterValue::Bool(b) => b.to_string(),
            FilterValue::Int(n) => n.to_string(),
            FilterValue::Text(t) => t.clone(),
        }
    }

    /// Returns the constraint rendered as cell text, if it is concrete.
    pub(crate) fn as_text(&self) -> Option<String> {
        match self {
            FilterValue::Any | FilterValue::Null => None,
            FilterValue::Bool(b) => Some(b.to_string()),
            FilterValue::Int(n) => Some(n.to_string()),
            FilterValue::Text(t) => Some(t.clone()),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Int(v as i64)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

/// Filter constraints keyed by column id.
///
/// Columns without an entry behave as [`FilterValue::Any`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    /// Creates a state with `Any` for every filter column of the schema.
    pub fn for_schema(schema: &Schema) -> Self {
        Self {
            values: schema
                .filter_columns()
                .map(|c| (c.id.clone(), FilterValue::Any))
                .collect(),
        }
    }

    /// Returns the constraint for a column.
    pub fn get(&self, column: &str) -> &FilterValue {
        static ANY: FilterValue = FilterValue::Any;
        self.values.get(column).unwrap_or(&ANY)
    }

    /// Sets the constraint for a column.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<FilterValue>) {
        self.values.insert(column.into(), value.into());
    }

    /// Sets the constraint (builder pattern).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Resets a column to `Any`.
    pub fn reset(&mut self, column: &str) {
        if let Some(value) = self.values.get_mut(column) {
            *value = FilterValue::Any;
        }
    }

    /// Resets every column to `Any`.
    pub fn clear(&mut self) {
        self.values.values_mut().for_each(|v| *v = FilterValue::Any);
    }

    /// Iterates the constraints that are not `Any`.
    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values
            .iter()
            .filter(|(_, v)| v.is_active())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if any constraint is set.
    pub fn is_active(&self) -> bool {
        self.active().next().is_some()
    }
}

/// Search fragments keyed by column id.
///
/// An empty (or whitespace-only) fragment imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    values: BTreeMap<String, String>,
}

impl SearchState {
    /// Creates a state with an empty fragment for every search column.
    pub fn for_schema(schema: &Schema) -> Self {
        Self {
            values: schema
                .search_columns()
                .map(|c| (c.id.clone(), String::new()))
                .collect(),
        }
    }

    /// Returns the fragment for a column.
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    /// Sets the fragment for a column.
    pub fn set(&mut self, column: impl Into<String>, text: impl Into<String>) {
        self.values.insert(column.into(), text.into());
    }

    /// Sets the fragment (builder pattern).
    pub fn with(mut self, column: impl Into<String>, text: impl Into<String>) -> Self {
        self.set(column, text);
        self
    }

    /// Empties every fragment.
    pub fn clear(&mut self) {
        self.values.values_mut().for_each(String::clear);
    }

    /// Iterates the fragments that constrain rows.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if any fragment is set.
    pub fn is_active(&self) -> bool {
        self.active().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("name", "Name", SemanticType::String).searchable(),
            Column::new("country", "Country", SemanticType::String).filterable(),
            Column::new("is_dangerous", "Is Dangerous", SemanticType::Boolean).filterable(),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_options() {
        assert_eq!(FilterValue::parse(SemanticType::Integer, "12"), FilterValue::Int(12));
        assert_eq!(FilterValue::parse(SemanticType::Integer, "null"), FilterValue::Null);
        assert_eq!(FilterValue::parse(SemanticType::Boolean, "maybe"), FilterValue::Null);
        assert_eq!(FilterValue::parse(SemanticType::String, "Germany"), FilterValue::from("Germany"));
        assert_eq!(FilterValue::parse(SemanticType::String, NO_FILTER), FilterValue::Any);
    }

    #[test]
    fn test_option_key_round_trip() {
        for value in [
            FilterValue::Any,
            FilterValue::Null,
            FilterValue::Bool(false),
            FilterValue::Int(0),
        ] {
            let ty = match value {
                FilterValue::Bool(_) => SemanticType::Boolean,
                _ => SemanticType::Integer,
            };
            assert_eq!(FilterValue::parse(ty, &value.option_key()), value);
        }
    }

    #[test]
    fn test_state_initialised_from_schema() {
        let filters = FilterState::for_schema(&schema());
        let search = SearchState::for_schema(&schema());

        assert_eq!(filters.get("country"), &FilterValue::Any);
        assert_eq!(filters.get("is_dangerous"), &FilterValue::Any);
        assert!(!filters.is_active());
        assert_eq!(search.get("name"), "");
        assert!(!search.is_active());
    }

    #[test]
    fn test_reset_and_clear() {
        let mut filters = FilterState::for_schema(&schema())
            .with("country", "Germany")
            .with("is_dangerous", FilterValue::Null);
        assert_eq!(filters.active().count(), 2);

        filters.reset("country");
        assert_eq!(filters.get("country"), &FilterValue::Any);
        assert_eq!(filters.active().count(), 1);

        filters.clear();
        assert!(!filters.is_active());
    }

    #[test]
    fn test_whitespace_search_is_inactive() {
        let search = SearchState::default().with("name", "   ");
        assert!(!search.is_active());
    }
}
