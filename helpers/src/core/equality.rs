//! Structural equality between dynamic values.

use crate::core::value::Value;

/// True if both values have the same variant and equal children.
///
/// Declared types are not compared, only runtime values. `Null` equals only
/// `Null`; a missing key is the caller's concern and never reaches here.
/// Objects and maps must have exactly the same key set.
pub fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Collection(a), Value::Collection(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b)
                    .all(|(left, right)| equals(&left.value, &right.value))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, field)| {
                    b.get(key)
                        .is_some_and(|other| equals(&field.value, &other.value))
                })
        }
        (Value::Map { entries: a, .. }, Value::Map { entries: b, .. }) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, value)| b.get(key).is_some_and(|other| equals(value, other)))
        }
        _ => false,
    }
}
