//! Element-wise filtering of collections by value or nested path.

use crate::core::equality::equals;
use crate::core::error::{FunctionError, FunctionResult};
use crate::core::flatten::flatten_keyed;
use crate::core::homogeneity::ensure_homogeneous;
use crate::core::value::{Typed, Value};

/// Keep the elements of `collection` whose value at `path` equals `target`.
///
/// - An empty `path` compares each element itself.
/// - Otherwise object and map elements are flattened and `path` is looked
///   up as a dot-joined key; elements without that key are skipped. Other
///   elements have no keys and are compared whole.
/// - A `None` target is compared as `Null`.
///
/// Matches keep their original order and declared types. Homogeneity is
/// checked before any element is compared.
pub fn filter_collection(
    collection: &Value,
    path: &str,
    target: Option<&Value>,
) -> FunctionResult<Value> {
    let Value::Collection(elements) = collection else {
        return Err(FunctionError::type_conversion(format!(
            "expected a collection, got {}",
            collection.kind()
        )));
    };
    ensure_homogeneous(elements)?;

    let null = Value::Null;
    let target = target.unwrap_or(&null);
    let matched: Vec<Typed> = elements
        .iter()
        .filter(|element| {
            resolve_path(&element.value, path).is_some_and(|value| equals(value, target))
        })
        .cloned()
        .collect();
    Ok(Value::build_collection(matched))
}

/// Value of one element at a dot-joined `path`, or `None` when a keyed
/// element has no such path.
fn resolve_path<'a>(element: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(element);
    }
    match flatten_keyed(element) {
        Some(view) => view.get(path).copied(),
        None => Some(element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Type;
    use crate::test_support::{b, field, num, object, string_map, text, tuple};

    fn sample_objects() -> Value {
        tuple(vec![
            field(vec![
                ("key1", text("value1")),
                ("key2", b(true)),
                ("key3", num(3)),
                ("key4", Typed::inferred(Value::Null)),
            ]),
            field(vec![
                ("key1", text("value2")),
                ("key2", b(false)),
                ("key3", num(0)),
                ("key4", field(vec![])),
            ]),
            field(vec![
                ("key1", text("value3")),
                ("key2", b(true)),
                ("key3", num(5)),
                ("key4", Typed::inferred(Value::Null)),
            ]),
            field(vec![
                ("key1", text("value4")),
                ("key2", b(false)),
                ("key3", num(1)),
                ("key4", field(vec![("key5", text("value5")), ("key6", b(true))])),
            ]),
        ])
    }

    fn key1_values(result: &Value) -> Vec<String> {
        let Value::Collection(elements) = result else {
            panic!("expected collection");
        };
        elements
            .iter()
            .map(|element| match &element.value {
                Value::Object(fields) => match &fields["key1"].value {
                    Value::String(text) => text.clone(),
                    other => panic!("unexpected key1 {other:?}"),
                },
                other => panic!("unexpected element {other:?}"),
            })
            .collect()
    }

    #[test]
    fn filters_objects_by_top_level_key() {
        let source = tuple(vec![
            field(vec![("k", text("a")), ("v", num(1))]),
            field(vec![("k", text("b")), ("v", num(1))]),
            field(vec![("k", text("c")), ("v", num(2))]),
        ]);
        let result = filter_collection(&source, "v", Some(&Value::from(1_i64))).expect("filter");
        let expected = tuple(vec![
            field(vec![("k", text("a")), ("v", num(1))]),
            field(vec![("k", text("b")), ("v", num(1))]),
        ]);
        assert_eq!(result, expected);
    }

    #[test]
    fn filters_by_nested_path() {
        let source = tuple(vec![
            field(vec![("a", field(vec![("b", text("x"))]))]),
            field(vec![("a", field(vec![("b", text("y"))]))]),
        ]);
        let result = filter_collection(&source, "a.b", Some(&Value::from("y"))).expect("filter");
        assert_eq!(
            result,
            tuple(vec![field(vec![("a", field(vec![("b", text("y"))]))])])
        );
    }

    #[test]
    fn filters_by_bool_and_number() {
        let source = sample_objects();
        let by_bool = filter_collection(&source, "key2", Some(&Value::from(true))).expect("bool");
        assert_eq!(key1_values(&by_bool), vec!["value1", "value3"]);
        let by_number = filter_collection(&source, "key3", Some(&Value::from(5_i64))).expect("num");
        assert_eq!(key1_values(&by_number), vec!["value3"]);
    }

    #[test]
    fn null_target_matches_only_null_values() {
        let source = sample_objects();
        let result = filter_collection(&source, "key4", None).expect("filter");
        // value2 has an empty object and value4 flattens key4 away entirely.
        assert_eq!(key1_values(&result), vec!["value1", "value3"]);
    }

    #[test]
    fn nested_path_matches_inside_flattened_object() {
        let source = sample_objects();
        let result =
            filter_collection(&source, "key4.key5", Some(&Value::from("value5"))).expect("filter");
        assert_eq!(key1_values(&result), vec!["value4"]);
    }

    #[test]
    fn missing_path_skips_element_without_error() {
        let source = sample_objects();
        let result =
            filter_collection(&source, "no.such.key", Some(&Value::Null)).expect("filter");
        assert_eq!(result, tuple(vec![]));
    }

    #[test]
    fn no_match_returns_empty_collection() {
        let source = sample_objects();
        let result =
            filter_collection(&source, "key1", Some(&Value::from("new_value"))).expect("filter");
        assert_eq!(result, tuple(vec![]));
    }

    #[test]
    fn empty_path_compares_scalar_elements() {
        let source = tuple(vec![text("value1"), text("value2"), text("value3"), text("value1")]);
        let result = filter_collection(&source, "", Some(&Value::from("value1"))).expect("filter");
        assert_eq!(result, tuple(vec![text("value1"), text("value1")]));

        let numbers = tuple(vec![num(5), num(8), num(3), num(5)]);
        let result = filter_collection(&numbers, "", Some(&Value::from(3_i64))).expect("filter");
        assert_eq!(result, tuple(vec![num(3)]));
    }

    #[test]
    fn empty_path_compares_whole_objects() {
        let source = tuple(vec![
            field(vec![("a", num(1))]),
            field(vec![("a", num(2))]),
        ]);
        let target = object(vec![("a", num(2))]);
        let result = filter_collection(&source, "", Some(&target)).expect("filter");
        assert_eq!(result, tuple(vec![field(vec![("a", num(2))])]));
    }

    #[test]
    fn result_is_an_ordered_subsequence() {
        let source = tuple(vec![num(1), num(2), num(1), num(3), num(1)]);
        let result = filter_collection(&source, "", Some(&Value::from(1_i64))).expect("filter");
        assert_eq!(result, tuple(vec![num(1), num(1), num(1)]));
    }

    #[test]
    fn matched_elements_keep_declared_types() {
        let declared = Typed::new(
            Type::Object([("k".to_string(), Type::String)].into_iter().collect()),
            object(vec![("k", Typed::new(Type::String, Value::Null))]),
        );
        let source = Value::build_collection(vec![declared.clone()]);
        let result = filter_collection(&source, "k", None).expect("filter");
        assert_eq!(result, Value::build_collection(vec![declared]));
    }

    #[test]
    fn map_elements_resolve_top_level_keys() {
        let source = Value::build_collection(vec![
            Typed::inferred(string_map(vec![("env", "prod")])),
            Typed::inferred(string_map(vec![("env", "dev")])),
        ]);
        let result = filter_collection(&source, "env", Some(&Value::from("dev"))).expect("filter");
        assert_eq!(
            result,
            Value::build_collection(vec![Typed::inferred(string_map(vec![("env", "dev")]))])
        );
    }

    #[test]
    fn heterogeneous_collection_is_rejected_before_comparing() {
        let source = tuple(vec![text("a"), num(1)]);
        let err = filter_collection(&source, "", Some(&Value::from("a"))).expect_err("mixed");
        assert!(matches!(
            err,
            FunctionError::HeterogeneousCollection { index: 1, .. }
        ));
    }

    #[test]
    fn path_on_scalar_elements_compares_whole_element() {
        let source = tuple(vec![text("a"), text("b"), text("a")]);
        let result = filter_collection(&source, "k", Some(&Value::from("a"))).expect("filter");
        assert_eq!(result, tuple(vec![text("a"), text("a")]));
    }

    #[test]
    fn path_on_nested_collections_compares_whole_element() {
        let inner = Typed::inferred(tuple(vec![num(1)]));
        let other = Typed::inferred(tuple(vec![num(2)]));
        let source = tuple(vec![inner.clone(), other]);
        let result = filter_collection(&source, "k", Some(&tuple(vec![num(1)]))).expect("filter");
        assert_eq!(result, tuple(vec![inner]));
    }

    #[test]
    fn non_collection_input_is_a_conversion_error() {
        let err = filter_collection(&Value::from("a"), "", None).expect_err("scalar");
        assert_eq!(
            err,
            FunctionError::type_conversion("expected a collection, got string")
        );
    }
}
