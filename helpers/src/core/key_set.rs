//! Key sets and key-presence checks for objects and maps.

use std::collections::BTreeSet;

use crate::core::error::{FunctionError, FunctionResult};
use crate::core::value::Value;

/// Unordered set of unique string keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet(BTreeSet<String>);

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    /// Returns false if the key was already present.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.0.insert(key.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for KeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// How many required keys must be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMatch {
    /// Every required key.
    #[default]
    All,
    /// At least one required key.
    Any,
}

impl KeyMatch {
    /// `strict = true` means every key must be present.
    pub fn from_strict(strict: bool) -> Self {
        if strict { KeyMatch::All } else { KeyMatch::Any }
    }
}

/// Keys present in both sets.
pub fn intersect(a: &KeySet, b: &KeySet) -> KeySet {
    a.iter().filter(|key| b.contains(key)).collect()
}

/// Keys of an object (its attribute names) or of a map (its entry keys).
pub fn object_keys(value: &Value, operation: &'static str) -> FunctionResult<KeySet> {
    match value {
        Value::Object(fields) => Ok(fields.keys().map(String::as_str).collect()),
        Value::Map { entries, .. } => Ok(entries.keys().map(String::as_str).collect()),
        other => Err(FunctionError::UnsupportedValueType {
            operation,
            found: other.kind(),
        }),
    }
}

/// Check `required` against `object_keys` under `mode`.
///
/// An empty `required` set is always `false` in both modes.
pub fn contains_keys(object_keys: &KeySet, required: &KeySet, mode: KeyMatch) -> bool {
    if required.is_empty() {
        return false;
    }
    let hit = intersect(object_keys, required);
    match mode {
        KeyMatch::All => hit.len() == required.len(),
        KeyMatch::Any => !hit.is_empty(),
    }
}
