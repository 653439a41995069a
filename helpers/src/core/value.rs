//! Dynamic values and their declared types.
//!
//! Every composite child carries its declared [`Type`] next to its runtime
//! [`Value`], so results rebuilt from a subset of children stay well-typed.
//! Object fields and map entries are kept in key order, which makes every
//! traversal and every serialized result deterministic.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::error::{FunctionError, FunctionResult};

/// Declared type of a dynamic value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// No concrete type. Untyped nulls carry this.
    Dynamic,
    Bool,
    Number,
    String,
    /// Element types of a collection, by position.
    Collection(Vec<Type>),
    /// Attribute types of an object, by key.
    Object(BTreeMap<String, Type>),
    /// Element type shared by every entry of a map.
    Map(Box<Type>),
}

impl Type {
    /// True if both types have the same top-level shape.
    ///
    /// `Dynamic` is compatible with everything. Nested attribute and element
    /// types are not compared: two objects with different attributes are
    /// still compatible.
    pub fn is_compatible(&self, other: &Type) -> bool {
        matches!(self, Type::Dynamic)
            || matches!(other, Type::Dynamic)
            || std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Dynamic => f.write_str("dynamic"),
            Type::Bool => f.write_str("bool"),
            Type::Number => f.write_str("number"),
            Type::String => f.write_str("string"),
            Type::Collection(elements) => {
                f.write_str("tuple([")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("])")
            }
            Type::Object(attrs) => {
                f.write_str("object({")?;
                for (index, (key, ty)) in attrs.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {ty}")?;
                }
                f.write_str("})")
            }
            Type::Map(element) => write!(f, "map({element})"),
        }
    }
}

/// A JSON number compared by exact decimal value.
///
/// The source text is kept as written, so integers beyond 2^53 and long
/// decimals never pass through `f64`. `1`, `1.0` and `1e0` are equal;
/// `0.1` and `0.10000000000000001` are not.
#[derive(Debug, Clone)]
pub struct Number(serde_json::Number);

impl Number {
    /// Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(Self)
    }

    pub fn as_json(&self) -> &serde_json::Number {
        &self.0
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        let (left, right) = (self.0.to_string(), other.0.to_string());
        match (Decimal::parse(&left), Decimal::parse(&right)) {
            (Some(a), Some(b)) => a == b,
            _ => left == right,
        }
    }
}

/// Canonical `±digits × 10^exponent` form of a JSON number.
///
/// `digits` has no leading or trailing zeros; zero has no digits and is
/// never negative.
#[derive(Debug, PartialEq, Eq)]
struct Decimal {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl Decimal {
    /// `None` when the exponent overflows `i64`.
    fn parse(text: &str) -> Option<Self> {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(at) => (&unsigned[..at], unsigned[at + 1..].parse::<i64>().ok()?),
            None => (unsigned, 0),
        };
        let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let joined = format!("{int}{frac}");
        let significant = joined.trim_start_matches('0');
        let digits = significant.trim_end_matches('0');
        if digits.is_empty() {
            return Some(Self {
                negative: false,
                digits: String::new(),
                exponent: 0,
            });
        }
        let frac_len = i64::try_from(frac.len()).ok()?;
        let trailing = i64::try_from(significant.len() - digits.len()).ok()?;
        Some(Self {
            negative,
            digits: digits.to_string(),
            exponent: exponent.checked_sub(frac_len)?.checked_add(trailing)?,
        })
    }
}

impl From<serde_json::Number> for Number {
    fn from(value: serde_json::Number) -> Self {
        Self(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self(value.into())
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Runtime value of a dynamic tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Ordered elements, each with its own declared type.
    Collection(Vec<Typed>),
    /// Keyed fields, each with its own declared type.
    Object(BTreeMap<String, Typed>),
    /// Keyed entries sharing one element type.
    Map {
        element_type: Type,
        entries: BTreeMap<String, Value>,
    },
}

/// A value paired with its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct Typed {
    pub ty: Type,
    pub value: Value,
}

impl Typed {
    pub fn new(ty: Type, value: Value) -> Self {
        Self { ty, value }
    }

    /// Pair `value` with the type it reports for itself.
    pub fn inferred(value: Value) -> Self {
        Self {
            ty: value.type_of(),
            value,
        }
    }
}

/// Variant tag of a [`Value`], used in error messages and shape checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Collection,
    Object,
    Map,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Collection => "collection",
            Kind::Object => "object",
            Kind::Map => "map",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a child inside its composite parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    Index(usize),
    Name(&'a str),
}

/// Borrowed view of one child of a composite value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Child<'a> {
    pub key: Key<'a>,
    pub ty: &'a Type,
    pub value: &'a Value,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Collection(_) => Kind::Collection,
            Value::Object(_) => Kind::Object,
            Value::Map { .. } => Kind::Map,
        }
    }

    /// Type this value reports for itself. Composite types are assembled
    /// from the declared types of their children.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Null => Type::Dynamic,
            Value::Bool(_) => Type::Bool,
            Value::Number(_) => Type::Number,
            Value::String(_) => Type::String,
            Value::Collection(elements) => {
                Type::Collection(elements.iter().map(|element| element.ty.clone()).collect())
            }
            Value::Object(fields) => Type::Object(
                fields
                    .iter()
                    .map(|(key, field)| (key.clone(), field.ty.clone()))
                    .collect(),
            ),
            Value::Map { element_type, .. } => Type::Map(Box::new(element_type.clone())),
        }
    }

    /// Children of a composite value in order: collection elements by index,
    /// object fields and map entries by key.
    pub fn children(&self) -> FunctionResult<Vec<Child<'_>>> {
        match self {
            Value::Collection(elements) => Ok(elements
                .iter()
                .enumerate()
                .map(|(index, element)| Child {
                    key: Key::Index(index),
                    ty: &element.ty,
                    value: &element.value,
                })
                .collect()),
            Value::Object(fields) => Ok(fields
                .iter()
                .map(|(key, field)| Child {
                    key: Key::Name(key),
                    ty: &field.ty,
                    value: &field.value,
                })
                .collect()),
            Value::Map {
                element_type,
                entries,
            } => Ok(entries
                .iter()
                .map(|(key, value)| Child {
                    key: Key::Name(key),
                    ty: element_type,
                    value,
                })
                .collect()),
            scalar => Err(FunctionError::NotComposite(scalar.kind())),
        }
    }

    /// True for `Null` and for the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(text) => text.is_empty(),
            _ => false,
        }
    }

    pub fn build_collection(elements: impl IntoIterator<Item = Typed>) -> Value {
        Value::Collection(elements.into_iter().collect())
    }

    /// Build an object from `(key, child)` pairs.
    ///
    /// A key may repeat only with the same declared type; the last value wins.
    pub fn build_object(
        fields: impl IntoIterator<Item = (String, Typed)>,
    ) -> FunctionResult<Value> {
        let mut built: BTreeMap<String, Typed> = BTreeMap::new();
        for (key, field) in fields {
            if let Some(previous) = built.get(&key) {
                if previous.ty != field.ty {
                    return Err(FunctionError::TypeMismatch {
                        key,
                        expected: previous.ty.clone(),
                        found: field.ty,
                    });
                }
            }
            built.insert(key, field);
        }
        Ok(Value::Object(built))
    }

    /// Build a map whose entries all have `element_type`.
    ///
    /// Untyped nulls are accepted for any element type.
    pub fn build_map(
        element_type: Type,
        entries: impl IntoIterator<Item = (String, Typed)>,
    ) -> FunctionResult<Value> {
        let mut built = BTreeMap::new();
        for (key, entry) in entries {
            let untyped_null = entry.ty == Type::Dynamic && entry.value == Value::Null;
            if entry.ty != element_type && !untyped_null {
                return Err(FunctionError::TypeMismatch {
                    key,
                    expected: element_type,
                    found: entry.ty,
                });
            }
            built.insert(key, entry.value);
        }
        Ok(Value::Map {
            element_type,
            entries: built,
        })
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{field, num, object, text, tuple};

    #[test]
    fn type_of_object_uses_declared_field_types() {
        let value = object(vec![
            ("name", text("x")),
            ("missing", Typed::new(Type::String, Value::Null)),
        ]);
        let Type::Object(attrs) = value.type_of() else {
            panic!("expected object type");
        };
        assert_eq!(attrs.get("name"), Some(&Type::String));
        assert_eq!(attrs.get("missing"), Some(&Type::String));
    }

    #[test]
    fn children_of_scalar_is_not_composite() {
        let err = Value::from("x").children().expect_err("scalar has no children");
        assert_eq!(err, FunctionError::NotComposite(Kind::String));
    }

    #[test]
    fn children_of_map_share_element_type() {
        let map = Value::build_map(
            Type::Number,
            vec![("a".to_string(), num(1)), ("b".to_string(), num(2))],
        )
        .expect("map");
        let children = map.children().expect("children");
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|child| child.ty == &Type::Number));
        assert_eq!(children[0].key, Key::Name("a"));
    }

    #[test]
    fn children_of_collection_are_indexed_in_order() {
        let collection = tuple(vec![text("a"), num(1)]);
        let keys: Vec<Key<'_>> = collection
            .children()
            .expect("children")
            .iter()
            .map(|child| child.key)
            .collect();
        assert_eq!(keys, vec![Key::Index(0), Key::Index(1)]);
    }

    #[test]
    fn build_map_rejects_conflicting_entry_type() {
        let err = Value::build_map(
            Type::Number,
            vec![("a".to_string(), num(1)), ("b".to_string(), text("x"))],
        )
        .expect_err("mixed map");
        assert_eq!(
            err,
            FunctionError::TypeMismatch {
                key: "b".to_string(),
                expected: Type::Number,
                found: Type::String,
            }
        );
    }

    #[test]
    fn build_map_accepts_untyped_null() {
        let map = Value::build_map(
            Type::String,
            vec![("a".to_string(), Typed::inferred(Value::Null))],
        )
        .expect("map");
        assert_eq!(map.type_of(), Type::Map(Box::new(Type::String)));
    }

    #[test]
    fn build_object_rejects_repeated_key_with_new_type() {
        let err = Value::build_object(vec![
            ("a".to_string(), num(1)),
            ("a".to_string(), text("x")),
        ])
        .expect_err("conflict");
        assert!(matches!(err, FunctionError::TypeMismatch { ref key, .. } if key == "a"));
    }

    #[test]
    fn numbers_compare_exactly_across_representations() {
        let int = Number::from(3_i64);
        let float = Number::from_f64(3.0).expect("finite");
        let near = Number::from_f64(3.000_000_000_1).expect("finite");
        assert_eq!(int, float);
        assert_ne!(int, near);
        assert_ne!(Number::from(-1_i64), Number::from(u64::MAX));
    }

    fn parsed(text: &str) -> Number {
        serde_json::from_str::<serde_json::Number>(text)
            .expect("number")
            .into()
    }

    #[test]
    fn numbers_keep_precision_beyond_f64() {
        assert_ne!(parsed("9007199254740993"), parsed("9007199254740992.0"));
        assert_ne!(parsed("0.1"), parsed("0.10000000000000001"));
        assert_ne!(parsed("18446744073709551616"), parsed("18446744073709551617"));
        assert_eq!(parsed("9007199254740993"), parsed("9007199254740993.000"));
    }

    #[test]
    fn numbers_compare_across_exponent_forms() {
        assert_eq!(parsed("1e2"), parsed("100"));
        assert_eq!(parsed("1.50"), parsed("15E-1"));
        assert_eq!(parsed("-0"), parsed("0.0"));
        assert_ne!(parsed("-2"), parsed("2"));
        assert_ne!(parsed("0.001"), parsed("0.01"));
    }

    #[test]
    fn compatibility_checks_top_level_shape_only() {
        let small = object(vec![("a", num(1))]).type_of();
        let large = object(vec![("b", text("x")), ("c", field(vec![]))]).type_of();
        assert!(small.is_compatible(&large));
        assert!(Type::Dynamic.is_compatible(&Type::String));
        assert!(!Type::String.is_compatible(&Type::Number));
    }

    #[test]
    fn blank_covers_null_and_empty_string_only() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(!Value::from(" ").is_blank());
        assert!(!Value::from(0_i64).is_blank());
    }
}
