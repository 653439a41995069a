//! Registered helper functions.
//!
//! Each entry point takes already-decoded arguments, delegates to [`crate::core`]
//! (or to an [`EnvLookup`] for the `os_*` functions), and returns the result
//! value. The catalog describes every function the way a host would list
//! them: name, summary, and parameters in call order.

use tracing::debug;

use crate::core::collection_filter::filter_collection;
use crate::core::error::FunctionResult;
use crate::core::key_set::{KeyMatch, KeySet, contains_keys, object_keys};
use crate::core::mutation::{WritePolicy, set_value, should_write};
use crate::core::projection::project;
use crate::core::value::{Typed, Value};
use crate::io::env::EnvLookup;

/// Description of one function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Null is an accepted argument.
    pub nullable: bool,
    /// Optional trailing argument.
    pub variadic: bool,
}

/// Description of one registered function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub summary: &'static str,
    pub params: &'static [ParamSpec],
}

const fn param(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        description,
        nullable: false,
        variadic: false,
    }
}

const fn nullable(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        nullable: true,
        ..param(name, description)
    }
}

const fn variadic(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        variadic: true,
        ..param(name, description)
    }
}

const CATALOG: &[FunctionSpec] = &[
    FunctionSpec {
        name: "collection_filter",
        summary: "Filter a collection of values using a simple comparison.",
        params: &[
            param("collection", "The collection to filter; elements must share a type"),
            param("key", "Dot-joined key to compare; empty compares whole elements"),
            nullable("value", "The value used to compare against"),
        ],
    },
    FunctionSpec {
        name: "object_contains_keys",
        summary: "Check if an object or map contains a target set of keys.",
        params: &[
            param("object", "The object or map to check for keys"),
            param("keys", "Set of keys to check for in the object"),
            variadic(
                "strict",
                "When true (default), all keys must be present; when false, at least one",
            ),
        ],
    },
    FunctionSpec {
        name: "object_filter_keys",
        summary: "Filter object keys based on a set of target keys.",
        params: &[
            param("object", "The object or map to filter keys from"),
            param("keys", "Set of keys to keep in the filtered object"),
        ],
    },
    FunctionSpec {
        name: "object_set_value",
        summary: "Set a value in an object or create a new key with the value.",
        params: &[
            param("object", "The object to set the value in"),
            param("key", "The key to set the value in"),
            nullable("value", "The value to set in the key"),
            param("operation", "One of write_all, write_value, write_safe"),
        ],
    },
    FunctionSpec {
        name: "os_check_env",
        summary: "Check if an environment variable is set.",
        params: &[
            param("name", "The name of the environment variable to check"),
            variadic(
                "strict",
                "When true (default), the variable cannot have an empty value",
            ),
        ],
    },
    FunctionSpec {
        name: "os_get_env",
        summary: "Get an environment variable, or a fallback when it is not set.",
        params: &[
            param("name", "The name of the environment variable to get"),
            variadic("fallback", "The value to use if the variable is not set"),
        ],
    },
];

/// Every registered function, in registration order.
pub fn catalog() -> &'static [FunctionSpec] {
    CATALOG
}

pub fn find(name: &str) -> Option<&'static FunctionSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

/// `collection_filter(collection, key, value)`.
pub fn collection_filter(
    collection: &Value,
    key: &str,
    value: Option<&Value>,
) -> FunctionResult<Value> {
    let result = filter_collection(collection, key, value)?;
    if let (Value::Collection(input), Value::Collection(matched)) = (collection, &result) {
        debug!(
            key,
            elements = input.len(),
            matched = matched.len(),
            "collection_filter"
        );
    }
    Ok(result)
}

/// `object_contains_keys(object, keys, strict?)`.
pub fn object_contains_keys(
    object: &Value,
    keys: &KeySet,
    mode: KeyMatch,
) -> FunctionResult<bool> {
    let present = object_keys(object, "object_contains_keys")?;
    let found = contains_keys(&present, keys, mode);
    debug!(
        required = keys.len(),
        present = present.len(),
        ?mode,
        found,
        "object_contains_keys"
    );
    Ok(found)
}

/// `object_filter_keys(object, keys)`.
pub fn object_filter_keys(object: &Value, keys: &KeySet) -> FunctionResult<Value> {
    let result = project(object, keys, "object_filter_keys")?;
    if let Value::Object(fields) = &result {
        debug!(allowed = keys.len(), kept = fields.len(), "object_filter_keys");
    }
    Ok(result)
}

/// `object_set_value(object, key, value, operation)`.
///
/// The operation token is parsed here; unknown tokens are rejected before
/// the object is inspected.
pub fn object_set_value(
    object: &Value,
    key: &str,
    value: Typed,
    operation: &str,
) -> FunctionResult<Value> {
    let policy: WritePolicy = operation.parse()?;
    if let Value::Object(fields) = object {
        let applied = should_write(policy, fields.get(key).map(|field| &field.value));
        debug!(key, %policy, applied, "object_set_value");
    }
    set_value(object, key, value, policy)
}

/// `os_check_env(name, strict?)`.
///
/// False when the variable is unset, or when `strict` and it is empty.
pub fn os_check_env(env: &dyn EnvLookup, name: &str, strict: bool) -> bool {
    let set = match env.lookup(name) {
        None => false,
        Some(value) => !(strict && value.is_empty()),
    };
    debug!(name, strict, set, "os_check_env");
    set
}

/// `os_get_env(name, fallback?)`.
///
/// A set variable wins even when empty. Without a fallback an unset
/// variable reads as `""`.
pub fn os_get_env(env: &dyn EnvLookup, name: &str, fallback: Option<&str>) -> String {
    match env.lookup(name) {
        Some(value) => value,
        None => {
            debug!(name, has_fallback = fallback.is_some(), "os_get_env: variable unset");
            fallback.unwrap_or_default().to_string()
        }
    }
}
