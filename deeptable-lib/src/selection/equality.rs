//! Deep structural equality over cell values and rows.

use crate::model::Row;
use crate::model::Value;

/// Compares two values structurally.
///
/// Objects are equal when they have the same key set and equal values under
/// every key. Arrays are compared element by element, in order. An integer
/// equals a float holding the same number. `NaN` equals itself so that the
/// relation stays reflexive.
pub fn structural_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => floats_eq(*x, *y),
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => {
            floats_eq(*x as f64, *y)
        }
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structural_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| structural_eq(x, y)))
        }
        _ => false,
    }
}

/// Compares two rows structurally.
///
/// An absent column differs from a column holding `Null`.
pub fn rows_equal(a: &Row, b: &Row) -> bool {
    let (a, b) = (a.fields(), b.fields());
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, x)| b.get(key).is_some_and(|y| structural_eq(x, y)))
}

fn floats_eq(x: f64, y: f64) -> bool {
    x == y || (x.is_nan() && y.is_nan())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn dog() -> Row {
        Row::new()
            .set("name", "Beagle")
            .set("tags", vec!["small", "loud"])
            .set("max_age", 15)
            .set("owner", Value::Null)
    }

    #[test]
    fn test_independent_copies_are_equal() {
        assert!(rows_equal(&dog(), &dog()));
    }

    #[test]
    fn test_int_equals_float() {
        assert!(structural_eq(&Value::from(15), &Value::from(15.0)));
        assert!(!structural_eq(&Value::from(15), &Value::from(15.5)));
        assert!(!structural_eq(&Value::from(1), &Value::from(true)));
        assert!(!structural_eq(&Value::from(1), &Value::from("1")));
    }

    #[test]
    fn test_arrays_are_order_sensitive() {
        let a = Value::from(vec!["small", "loud"]);
        let b = Value::from(vec!["loud", "small"]);
        assert!(!structural_eq(&a, &b));
        assert!(!structural_eq(&a, &Value::from(vec!["small"])));
    }

    #[test]
    fn test_nested_objects() {
        let mut inner = BTreeMap::new();
        inner.insert("city".to_string(), Value::from("Bonn"));
        let mut other = inner.clone();

        assert!(structural_eq(&Value::from(inner.clone()), &Value::from(other.clone())));

        other.insert("zip".to_string(), Value::Null);
        assert!(!structural_eq(&Value::from(inner), &Value::from(other)));
    }

    #[test]
    fn test_absent_differs_from_null() {
        let mut without_owner = dog();
        without_owner.remove("owner");
        assert!(!rows_equal(&dog(), &without_owner));
    }

    #[test]
    fn test_nan_is_reflexive() {
        assert!(structural_eq(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));
    }
}
