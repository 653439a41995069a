//! Dot-joined path flattening of nested objects.

use std::collections::BTreeMap;

use crate::core::value::Value;

/// Flat view from dot-joined path to leaf value. Never holds an object.
pub type FlattenedView<'a> = BTreeMap<String, &'a Value>;

/// Flatten `fields`, descending only into `Object` values.
///
/// Maps, collections, and scalars are kept under their own key, so a map
/// nested inside an object is not descended into. An empty nested object
/// contributes no entries.
pub fn flatten<'a, I>(fields: I) -> FlattenedView<'a>
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut view = FlattenedView::new();
    for (key, value) in fields {
        insert_flattened(&mut view, key.to_string(), value);
    }
    view
}

fn insert_flattened<'a>(view: &mut FlattenedView<'a>, path: String, value: &'a Value) {
    match value {
        Value::Object(nested) => {
            for (name, field) in nested {
                insert_flattened(view, format!("{path}.{name}"), &field.value);
            }
        }
        leaf => {
            view.insert(path, leaf);
        }
    }
}

/// Flatten the fields of an object or the entries of a map.
///
/// Returns `None` for every other variant.
pub fn flatten_keyed(value: &Value) -> Option<FlattenedView<'_>> {
    match value {
        Value::Object(fields) => Some(flatten(
            fields.iter().map(|(key, field)| (key.as_str(), &field.value)),
        )),
        Value::Map { entries, .. } => Some(flatten(
            entries.iter().map(|(key, value)| (key.as_str(), value)),
        )),
        _ => None,
    }
}
