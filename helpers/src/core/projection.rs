//! Projection of objects and maps onto an allowed key set.

use crate::core::error::{FunctionError, FunctionResult};
use crate::core::key_set::KeySet;
use crate::core::value::{Typed, Value};

/// Build an object holding only the keys of `source` that are in `allowed`.
///
/// Object fields keep their declared types; map entries take the map's
/// element type. Allowed keys missing from `source` are ignored.
pub fn project(
    source: &Value,
    allowed: &KeySet,
    operation: &'static str,
) -> FunctionResult<Value> {
    match source {
        Value::Object(fields) => Value::build_object(
            fields
                .iter()
                .filter(|(key, _)| allowed.contains(key))
                .map(|(key, field)| (key.clone(), field.clone())),
        ),
        Value::Map {
            element_type,
            entries,
        } => Value::build_object(
            entries
                .iter()
                .filter(|(key, _)| allowed.contains(key))
                .map(|(key, value)| {
                    (key.clone(), Typed::new(element_type.clone(), value.clone()))
                }),
        ),
        other => Err(FunctionError::UnsupportedValueType {
            operation,
            found: other.kind(),
        }),
    }
}
