//! Test-only builders for dynamic values.

use std::collections::HashMap;

use crate::core::key_set::KeySet;
use crate::core::value::{Type, Typed, Value};
use crate::io::env::EnvLookup;

/// String scalar with its inferred type.
pub fn text(value: &str) -> Typed {
    Typed::inferred(Value::from(value))
}

/// Integer scalar with its inferred type.
pub fn num(value: i64) -> Typed {
    Typed::inferred(Value::from(value))
}

/// Bool scalar with its inferred type.
pub fn b(value: bool) -> Typed {
    Typed::inferred(Value::from(value))
}

/// Object built from `(key, child)` pairs.
pub fn object(fields: Vec<(&str, Typed)>) -> Value {
    Value::build_object(
        fields
            .into_iter()
            .map(|(key, field)| (key.to_string(), field)),
    )
    .expect("test object keys are unique")
}

/// Object used as a child, typed by its own fields.
pub fn field(fields: Vec<(&str, Typed)>) -> Typed {
    Typed::inferred(object(fields))
}

/// Collection whose type is assembled from its elements.
pub fn tuple(elements: Vec<Typed>) -> Value {
    Value::build_collection(elements)
}

/// Map of strings.
pub fn string_map(entries: Vec<(&str, &str)>) -> Value {
    Value::build_map(
        Type::String,
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), text(value))),
    )
    .expect("string map entries are strings")
}

pub fn keys(names: &[&str]) -> KeySet {
    names.iter().copied().collect()
}

/// In-memory environment for lookup tests.
#[derive(Debug, Clone, Default)]
pub struct FakeEnv(HashMap<String, String>);

impl FakeEnv {
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvLookup for FakeEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}
