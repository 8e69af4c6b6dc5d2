//! Cell display text.
//!
//! Formatting is fixed to a single convention: day-first short dates with a
//! 24-hour clock, rendered in UTC.

use chrono::DateTime;

use crate::model::SemanticType;
use crate::model::Value;
use crate::sort::instant_millis;

/// Text shown for null or absent cells.
pub const EMPTY_CELL: &str = "—";

const DATE_TIME_FORMAT: &str = "%d.%m.%y, %H:%M";
const VARIANT_PREVIEW_ITEMS: usize = 2;
const VARIANT_PREVIEW_CHARS: usize = 30;

/// Renders a cell for display under its column's semantic type.
///
/// ```
/// use deeptable_lib::format::display;
/// use deeptable_lib::model::{SemanticType, Value};
///
/// let ts = Value::from(1_640_995_200);
/// assert_eq!(display(SemanticType::TimestampSeconds, Some(&ts)), "01.01.22, 00:00");
/// assert_eq!(display(SemanticType::Boolean, Some(&Value::from("1"))), "Yes");
/// assert_eq!(display(SemanticType::Integer, None), "—");
/// ```
pub fn display(semantic_type: SemanticType, value: Option<&Value>) -> String {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return EMPTY_CELL.to_string();
    };

    match semantic_type {
        SemanticType::Boolean => {
            let text = if is_truthy(value) { "Yes" } else { "No" };
            text.to_string()
        }
        SemanticType::TimestampSeconds | SemanticType::TimestampMillis | SemanticType::Date => {
            instant_millis(semantic_type, value)
                .and_then(format_instant)
                .unwrap_or_else(|| value.to_text())
        }
        SemanticType::Variant => variant_summary(value),
        _ => value.to_text(),
    }
}

/// Boolean cells display as checked for `true`, `"true"`, `1` and `"1"`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(n) => *n == 1,
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

fn format_instant(millis: f64) -> Option<String> {
    let instant = DateTime::from_timestamp_millis(millis.round() as i64)?;
    Some(instant.format(DATE_TIME_FORMAT).to_string())
}

fn variant_summary(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let preview = items
                .iter()
                .take(VARIANT_PREVIEW_ITEMS)
                .map(to_json)
                .collect::<Vec<_>>()
                .join(", ");
            let more = if items.len() > VARIANT_PREVIEW_ITEMS { "..." } else { "" };
            format!("Array ({}) [{}{}]", items.len(), preview, more)
        }
        Value::Object(_) => {
            let json = to_json(value);
            if json.chars().count() > VARIANT_PREVIEW_CHARS {
                let head: String = json.chars().take(VARIANT_PREVIEW_CHARS).collect();
                format!("{head}...")
            } else {
                json
            }
        }
        other => other.to_text(),
    }
}

fn to_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_text())
}
