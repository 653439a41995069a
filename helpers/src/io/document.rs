//! JSON encoding of dynamic values.
//!
//! Plain JSON decodes by inference: arrays become collections and objects
//! become objects, each child typed by its own value. Typed input is an
//! explicit envelope `{"value": ..., "type": ...}` read with
//! [`parse_typed_document`]; it is the only way to express maps and typed
//! nulls. Plain input is never sniffed for envelopes, so an object that
//! happens to have `value` and `type` keys stays an object.
//!
//! Type syntax: `"dynamic"`, `"bool"`, `"number"`, `"string"`,
//! `["tuple", [T, ...]]`, `["object", {"key": T}]`, `["map", T]`.

use std::collections::BTreeMap;

use serde_json::{Value as Json, json};

use crate::core::error::{FunctionError, FunctionResult};
use crate::core::value::{Type, Typed, Value};

static JSON_NULL: Json = Json::Null;

/// Rejected input document. Distinct from [`FunctionError`]: bad input is
/// never reported as a function failure.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("parse json value")]
    Json(#[from] serde_json::Error),
    #[error("typed value must be an object with exactly \"value\" and \"type\" keys")]
    NotEnvelope,
    #[error("decode typed value")]
    Decode(#[source] FunctionError),
}

/// Parse plain JSON text into an inferred value.
pub fn parse_document(text: &str) -> Result<Typed, DocumentError> {
    let json: Json = serde_json::from_str(text)?;
    Ok(infer(&json))
}

/// Parse JSON text holding a typed envelope.
pub fn parse_typed_document(text: &str) -> Result<Typed, DocumentError> {
    let json: Json = serde_json::from_str(text)?;
    decode_envelope(&json)
}

/// Decode a `{"value": ..., "type": ...}` envelope.
pub fn decode_envelope(json: &Json) -> Result<Typed, DocumentError> {
    let (value, ty) = as_envelope(json).ok_or(DocumentError::NotEnvelope)?;
    let ty = parse_type(ty).map_err(DocumentError::Decode)?;
    decode_as(value, &ty).map_err(DocumentError::Decode)
}

fn as_envelope(json: &Json) -> Option<(&Json, &Json)> {
    let fields = json.as_object()?;
    if fields.len() != 2 {
        return None;
    }
    Some((fields.get("value")?, fields.get("type")?))
}

/// Decode plain JSON, typing every node by its own value.
pub fn infer(json: &Json) -> Typed {
    let value = match json {
        Json::Null => Value::Null,
        Json::Bool(flag) => Value::Bool(*flag),
        Json::Number(number) => Value::Number(number.clone().into()),
        Json::String(text) => Value::String(text.clone()),
        Json::Array(items) => Value::build_collection(items.iter().map(infer)),
        Json::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, field)| (key.clone(), infer(field)))
                .collect(),
        ),
    };
    Typed::inferred(value)
}

/// Decode `json` as a value of type `ty`.
///
/// `null` fits every type. A `dynamic` slot keeps its declared type and
/// infers only the value. Object attributes missing from `json` decode as
/// null; attributes not declared in `ty` are rejected.
pub fn decode_as(json: &Json, ty: &Type) -> FunctionResult<Typed> {
    let value = match (ty, json) {
        (Type::Dynamic, _) => infer(json).value,
        (_, Json::Null) => Value::Null,
        (Type::Bool, Json::Bool(flag)) => Value::Bool(*flag),
        (Type::Number, Json::Number(number)) => Value::Number(number.clone().into()),
        (Type::String, Json::String(text)) => Value::String(text.clone()),
        (Type::Collection(types), Json::Array(items)) if types.len() == items.len() => {
            let elements = types
                .iter()
                .zip(items)
                .map(|(element_type, item)| decode_as(item, element_type))
                .collect::<FunctionResult<Vec<_>>>()?;
            Value::build_collection(elements)
        }
        (Type::Object(attrs), Json::Object(fields)) => {
            if let Some(extra) = fields.keys().find(|key| !attrs.contains_key(*key)) {
                return Err(FunctionError::type_conversion(format!(
                    "unexpected attribute '{extra}' for {ty}"
                )));
            }
            let decoded = attrs
                .iter()
                .map(|(key, attr_type)| {
                    let field = fields.get(key).unwrap_or(&JSON_NULL);
                    Ok((key.clone(), decode_as(field, attr_type)?))
                })
                .collect::<FunctionResult<Vec<_>>>()?;
            Value::build_object(decoded)?
        }
        (Type::Map(element_type), Json::Object(entries)) => {
            let decoded = entries
                .iter()
                .map(|(key, entry)| {
                    let entry = decode_as(entry, element_type)?;
                    Ok((key.clone(), Typed::new((**element_type).clone(), entry.value)))
                })
                .collect::<FunctionResult<Vec<_>>>()?;
            Value::build_map((**element_type).clone(), decoded)?
        }
        _ => {
            return Err(FunctionError::type_conversion(format!(
                "cannot convert {} to {ty}",
                json_kind(json)
            )));
        }
    };
    Ok(Typed::new(ty.clone(), value))
}

/// Parse the JSON type syntax.
pub fn parse_type(json: &Json) -> FunctionResult<Type> {
    let invalid = || FunctionError::type_conversion(format!("invalid type expression {json}"));
    match json {
        Json::String(name) => match name.as_str() {
            "dynamic" => Ok(Type::Dynamic),
            "bool" => Ok(Type::Bool),
            "number" => Ok(Type::Number),
            "string" => Ok(Type::String),
            _ => Err(invalid()),
        },
        Json::Array(parts) => match parts.as_slice() {
            [Json::String(tag), inner] => match (tag.as_str(), inner) {
                ("tuple", Json::Array(items)) => Ok(Type::Collection(
                    items.iter().map(parse_type).collect::<FunctionResult<_>>()?,
                )),
                ("object", Json::Object(attrs)) => Ok(Type::Object(
                    attrs
                        .iter()
                        .map(|(key, attr)| Ok((key.clone(), parse_type(attr)?)))
                        .collect::<FunctionResult<BTreeMap<_, _>>>()?,
                )),
                ("map", element) => Ok(Type::Map(Box::new(parse_type(element)?))),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

/// Plain JSON for `value`. Declared types are dropped.
pub fn encode(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(flag) => Json::Bool(*flag),
        Value::Number(number) => Json::Number(number.as_json().clone()),
        Value::String(text) => Json::String(text.clone()),
        Value::Collection(elements) => {
            Json::Array(elements.iter().map(|element| encode(&element.value)).collect())
        }
        Value::Object(fields) => Json::Object(
            fields
                .iter()
                .map(|(key, field)| (key.clone(), encode(&field.value)))
                .collect(),
        ),
        Value::Map { entries, .. } => Json::Object(
            entries
                .iter()
                .map(|(key, entry)| (key.clone(), encode(entry)))
                .collect(),
        ),
    }
}

pub fn encode_type(ty: &Type) -> Json {
    match ty {
        Type::Dynamic => json!("dynamic"),
        Type::Bool => json!("bool"),
        Type::Number => json!("number"),
        Type::String => json!("string"),
        Type::Collection(elements) => {
            json!(["tuple", elements.iter().map(encode_type).collect::<Vec<_>>()])
        }
        Type::Object(attrs) => {
            let attrs: serde_json::Map<String, Json> = attrs
                .iter()
                .map(|(key, attr)| (key.clone(), encode_type(attr)))
                .collect();
            json!(["object", attrs])
        }
        Type::Map(element) => json!(["map", encode_type(element)]),
    }
}

/// Typed envelope for `typed`, decodable with [`decode_envelope`].
pub fn encode_typed(typed: &Typed) -> Json {
    json!({
        "value": encode(&typed.value),
        "type": encode_type(&typed.ty),
    })
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
