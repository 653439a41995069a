//! Conditional single-key writes on objects.

use std::fmt;
use std::str::FromStr;

use crate::core::error::{FunctionError, FunctionResult};
use crate::core::value::{Typed, Value};

/// When a write to an object key is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Always write; inserts missing keys.
    WriteAll,
    /// Write only over an existing key.
    WriteValue,
    /// Write only over an existing key whose value is null or `""`.
    WriteSafe,
}

impl WritePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            WritePolicy::WriteAll => "write_all",
            WritePolicy::WriteValue => "write_value",
            WritePolicy::WriteSafe => "write_safe",
        }
    }
}

impl FromStr for WritePolicy {
    type Err = FunctionError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.to_ascii_lowercase().as_str() {
            "write_all" => Ok(WritePolicy::WriteAll),
            "write_value" => Ok(WritePolicy::WriteValue),
            "write_safe" => Ok(WritePolicy::WriteSafe),
            _ => Err(FunctionError::InvalidPolicy(token.to_string())),
        }
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether `policy` applies a write given the key's current value
/// (`None` when the key is absent).
pub fn should_write(policy: WritePolicy, current: Option<&Value>) -> bool {
    match policy {
        WritePolicy::WriteAll => true,
        WritePolicy::WriteValue => current.is_some(),
        WritePolicy::WriteSafe => current.is_some_and(Value::is_blank),
    }
}

/// Set `key` to `value` in `object` if `policy` allows it.
///
/// The written key takes `value`'s declared type. When the write does not
/// apply, an equal copy of `object` is returned.
pub fn set_value(
    object: &Value,
    key: &str,
    value: Typed,
    policy: WritePolicy,
) -> FunctionResult<Value> {
    let Value::Object(fields) = object else {
        return Err(FunctionError::UnsupportedValueType {
            operation: "object_set_value",
            found: object.kind(),
        });
    };

    let current = fields.get(key).map(|field| &field.value);
    if !should_write(policy, current) {
        return Ok(object.clone());
    }

    let mut updated = fields.clone();
    updated.insert(key.to_string(), value);
    Ok(Value::Object(updated))
}
