//! Shared dataset for integration tests.

#![allow(dead_code)]

use deeptable_lib::ViewConfig;
use deeptable_lib::model::Column;
use deeptable_lib::model::Row;
use deeptable_lib::model::Schema;
use deeptable_lib::model::SemanticType;
use deeptable_lib::model::Value;
use deeptable_lib::view::TableView;

pub const COUNTRIES: [&str; 4] = ["Scotland", "Canada", "England", "France"];

/// Dog breeds table: name is searched, country, max age and danger are
/// filtered, the two timestamps carry the same instants in different units.
pub fn schema() -> Schema {
    Schema::new(vec![
        Column::new("name", "Name", SemanticType::String).searchable(),
        Column::new("country", "Country", SemanticType::String).filterable(),
        Column::new("max_age", "Max Age", SemanticType::Integer).filterable(),
        Column::new("is_dangerous", "Is Dangerous", SemanticType::Boolean).filterable(),
        Column::new("registered_s", "Registered", SemanticType::TimestampSeconds),
        Column::new("registered_ms", "Registered (ms)", SemanticType::TimestampMillis),
        Column::new("traits", "Traits", SemanticType::Variant),
    ])
    .unwrap()
}

/// 43 rows; exactly 5 of them (every ninth) come from Germany.
///
/// `is_dangerous` cycles through true, false, null and absent.
pub fn dogs() -> Vec<Row> {
    (0..43).map(dog).collect()
}

pub fn dog(i: usize) -> Row {
    let country = if i % 9 == 0 {
        "Germany"
    } else {
        COUNTRIES[i % COUNTRIES.len()]
    };
    let registered = 1_640_995_200i64 + (i as i64 % 7) * 86_400;

    let mut row = Row::new()
        .set("name", format!("breed {i:02}"))
        .set("country", country)
        .set("max_age", (i % 15 + 5) as i64)
        .set("registered_s", registered)
        .set("registered_ms", registered * 1000)
        .set("traits", vec![format!("trait {}", i % 3)]);
    match i % 4 {
        0 => row.insert("is_dangerous", true),
        1 => row.insert("is_dangerous", false),
        2 => row.insert("is_dangerous", Value::Null),
        _ => {}
    }
    row
}

pub fn view(page_size: usize) -> TableView {
    let config = ViewConfig::default()
        .with_page_size(page_size)
        .with_selectable(true);
    TableView::new(schema(), dogs(), config).unwrap()
}

pub fn names(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .map(|row| row.get_string("name").unwrap().unwrap_or("-").to_string())
        .collect()
}
