//! Column schema types

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use super::Value;
use crate::error::SchemaError;

/// The domain-level interpretation of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticType {
    #[serde(rename = "Boolean")]
    Boolean,
    #[serde(rename = "Integer")]
    Integer,
    #[serde(rename = "Float")]
    Float,
    #[serde(rename = "String")]
    String,
    /// Unix timestamp in seconds.
    #[serde(rename = "Timestamp in Seconds")]
    TimestampSeconds,
    /// Unix timestamp in milliseconds.
    #[serde(rename = "Timestamp in Milliseconds")]
    TimestampMillis,
    /// Calendar date stored as epoch milliseconds.
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "Universally unique identifier")]
    Guid,
    #[serde(rename = "String Array")]
    StringArray,
    /// Arbitrary nested structure.
    #[serde(rename = "Variant")]
    Variant,
}

impl SemanticType {
    /// Returns `true` for the types that support exact-match filtering.
    pub fn is_filterable(self) -> bool {
        matches!(
            self,
            SemanticType::String | SemanticType::Integer | SemanticType::Boolean
        )
    }

    /// Returns `true` for the timestamp and date types.
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            SemanticType::TimestampSeconds | SemanticType::TimestampMillis | SemanticType::Date
        )
    }
}

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// How a column takes part in row narrowing.
///
/// Filtering and searching are mutually exclusive per column; the treatment is
/// fixed when the schema is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnTreatment {
    /// Exact-match filter drop-down.
    Filter,
    /// Case-insensitive substring search field.
    Search,
    /// Neither.
    Plain,
}

/// Descriptor of one table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Key into each row.
    pub id: String,

    /// Header label.
    pub label: String,

    /// How cell values are interpreted.
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,

    #[serde(default)]
    pub align: CellAlign,

    /// Whether clicking the header sorts by this column.
    #[serde(
        rename = "notOrder",
        default = "default_sortable",
        with = "negated",
        skip_serializing_if = "is_true"
    )]
    pub sortable: bool,

    #[serde(rename = "canFilter", default)]
    pub filterable: bool,

    #[serde(rename = "canSearch", default)]
    pub searchable: bool,

    #[serde(rename = "invisible", default)]
    pub hidden: bool,

    #[serde(rename = "highlight", default)]
    pub highlighted: bool,

    /// Designated key column.
    #[serde(default)]
    pub is_key: bool,

    /// Whether an add/edit form must supply this column.
    #[serde(default)]
    pub is_mandatory: bool,

    /// Value used by add forms when nothing is entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

fn default_sortable() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// Serializes a `bool` field through its negation (`sortable` <-> `notOrder`).
mod negated {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(!*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        bool::deserialize(deserializer).map(|b| !b)
    }
}

impl Column {
    /// Creates a sortable, visible column with no filter or search treatment.
    pub fn new(id: impl Into<String>, label: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            semantic_type,
            align: CellAlign::default(),
            sortable: true,
            filterable: false,
            searchable: false,
            hidden: false,
            highlighted: false,
            is_key: false,
            is_mandatory: false,
            default: None,
        }
    }

    /// Marks the column as filterable.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Marks the column as searchable.
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Disables sorting on this column.
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Hides the column from display, filters and search.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Marks the column as the key column.
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    /// Sets the cell alignment.
    pub fn align(mut self, align: CellAlign) -> Self {
        self.align = align;
        self
    }

    /// Resolves how this column takes part in filtering and searching.
    ///
    /// A column flagged both filterable and searchable gets neither.
    pub fn treatment(&self) -> ColumnTreatment {
        if self.hidden {
            return ColumnTreatment::Plain;
        }
        match (self.filterable, self.searchable) {
            (true, false) if self.semantic_type.is_filterable() => ColumnTreatment::Filter,
            (false, true) => ColumnTreatment::Search,
            _ => ColumnTreatment::Plain,
        }
    }
}

/// An ordered, read-only collection of column descriptors.
///
/// Column ids are unique within a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Creates a schema, rejecting duplicate column ids.
    pub fn new(columns: Vec<Column>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.id.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// Returns all columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Finds a column by id.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Finds a column by id, failing with [`SchemaError::UnknownColumn`].
    pub fn require(&self, id: &str) -> Result<&Column, SchemaError> {
        self.column(id)
            .ok_or_else(|| SchemaError::UnknownColumn(id.to_string()))
    }

    /// Returns the columns that are displayed.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    /// Returns the columns that get an exact-match filter.
    pub fn filter_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.treatment() == ColumnTreatment::Filter)
    }

    /// Returns the columns that get a search field.
    pub fn search_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.treatment() == ColumnTreatment::Search)
    }

    /// Returns the designated key column, if any.
    pub fn key_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_key)
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl TryFrom<Vec<Column>> for Schema {
    type Error = SchemaError;

    fn try_from(columns: Vec<Column>) -> Result<Self, Self::Error> {
        Schema::new(columns)
    }
}

impl From<Schema> for Vec<Column> {
    fn from(schema: Schema) -> Self {
        schema.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_treatment_is_exclusive() {
        let filter = Column::new("country", "Country", SemanticType::String).filterable();
        let search = Column::new("name", "Name", SemanticType::String).searchable();
        let both = Column::new("id", "ID", SemanticType::String)
            .filterable()
            .searchable();
        let float = Column::new("height", "Height", SemanticType::Float).filterable();
        let hidden = Column::new("secret", "Secret", SemanticType::String)
            .filterable()
            .hidden();

        assert_eq!(filter.treatment(), ColumnTreatment::Filter);
        assert_eq!(search.treatment(), ColumnTreatment::Search);
        assert_eq!(both.treatment(), ColumnTreatment::Plain);
        assert_eq!(float.treatment(), ColumnTreatment::Plain);
        assert_eq!(hidden.treatment(), ColumnTreatment::Plain);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Schema::new(vec![
            Column::new("id", "ID", SemanticType::String),
            Column::new("id", "Other", SemanticType::Integer),
        ]);
        assert!(matches!(result, Err(SchemaError::DuplicateColumn(id)) if id == "id"));
    }

    #[test]
    fn test_deserialize_descriptor() {
        let json = r#"[
            {"id": "id", "label": "ID", "type": "String", "isKey": true, "highlight": true},
            {"id": "max_age", "label": "Max Age", "type": "Integer", "align": "right", "canFilter": true},
            {"id": "registered", "label": "Registered", "type": "Timestamp in Seconds", "notOrder": true}
        ]"#;
        let schema: Schema = serde_json::from_str(json).unwrap();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.key_column().map(|c| c.id.as_str()), Some("id"));
        let age = schema.column("max_age").unwrap();
        assert_eq!(age.align, CellAlign::Right);
        assert!(age.sortable);
        assert_eq!(schema.filter_columns().count(), 1);
        let registered = schema.column("registered").unwrap();
        assert_eq!(registered.semantic_type, SemanticType::TimestampSeconds);
        assert!(!registered.sortable);
    }

    #[test]
    fn test_deserialize_duplicate_fails() {
        let json = r#"[
            {"id": "a", "label": "A", "type": "String"},
            {"id": "a", "label": "A", "type": "String"}
        ]"#;
        assert!(serde_json::from_str::<Schema>(json).is_err());
    }
}
