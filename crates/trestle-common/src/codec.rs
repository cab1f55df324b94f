//! Native <-> encoded value conversions and shape-directed decoding.
//!
//! This module provides bidirectional conversion between native Rust values
//! and the [`Value`] tree that crosses the bridge, plus validation of an
//! encoded value against a declared [`Shape`].
//!
//! - Encoding ([`to_value`]) is total for any acyclic value representable in
//!   the closed union: composites are encoded field-by-field and
//!   element-by-element.
//! - Decoding ([`from_value`], [`decode`]) is strict: the runtime variant
//!   must match what the target requires. There is no implicit
//!   stringification and no lossy numeric narrowing.
//!
//! # Conversion Rules
//!
//! - All numerics travel as a uniform `Number`; decoding into an integer
//!   target requires the number to be finite, integral and within `i64`
//!   range.
//! - A record travels as a `Map` of its named fields. Decoding a record
//!   ignores unknown extra keys (forward-compatible) and fails on missing
//!   required fields.
//! - `Text` decodes only from `Text`.

use crate::protocol::error::{BridgeError, Result};
use crate::value::{is_exact_i64, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Declared expected kind for a decoded value.
///
/// A `Shape` is supplied by the caller wherever an encoded value is turned
/// back into something typed: positional call arguments, callback argument
/// lists and record fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Null,
    Bool,
    /// Integral `Number`, range-checked against `i64`.
    Int,
    Float,
    Text,
    List(Box<Shape>),
    Map(Box<Shape>),
    /// Structured record: named fields, each with its own expected kind.
    Record(Vec<Field>),
}

/// A named record field and its expected kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub shape: Shape,
}

impl Shape {
    pub fn list(element: Shape) -> Self {
        Shape::List(Box::new(element))
    }

    pub fn map(element: Shape) -> Self {
        Shape::Map(Box::new(element))
    }

    pub fn record<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Shape)>,
        S: Into<String>,
    {
        Shape::Record(
            fields
                .into_iter()
                .map(|(name, shape)| Field { name: name.into(), shape })
                .collect(),
        )
    }

    /// Short name of the expected kind, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Null => "null",
            Shape::Bool => "bool",
            Shape::Int => "integer",
            Shape::Float => "number",
            Shape::Text => "text",
            Shape::List(_) => "list",
            Shape::Map(_) => "map",
            Shape::Record(_) => "record",
        }
    }
}

/// Encode any serializable native value into the closed [`Value`] union.
///
/// Encoding never fails for values within the union's closure; the error
/// path only covers serializer misuse (e.g. a map with non-string keys).
pub fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    let json = serde_json::to_value(value)?;
    json_to_value(json)
}

/// Decode an encoded value into a typed native value.
///
/// Field rules follow the record contract: unknown keys in the source are
/// ignored, missing required fields and variant mismatches are a
/// [`BridgeError::TypeMismatch`].
pub fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T> {
    let json = value_to_json(value)?;
    serde_json::from_value(json).map_err(|e| BridgeError::TypeMismatch(e.to_string()))
}

/// Validate an encoded value against a declared shape, returning it.
///
/// The returned value is identical to the input; this is the decode half of
/// the round-trip contract `decode(encode(v, k), k) == v`.
pub fn decode(value: &Value, shape: &Shape) -> Result<Value> {
    check(value, shape)?;
    Ok(value.clone())
}

/// Validate an encoded value against a declared shape.
pub fn check(value: &Value, shape: &Shape) -> Result<()> {
    match (shape, value) {
        (Shape::Null, Value::Null) => Ok(()),
        (Shape::Bool, Value::Bool(_)) => Ok(()),
        (Shape::Int, Value::Number(n)) => {
            if is_exact_i64(*n) {
                Ok(())
            } else {
                Err(BridgeError::TypeMismatch(format!(
                    "number {} is not representable as an integer",
                    n
                )))
            }
        }
        (Shape::Float, Value::Number(_)) => Ok(()),
        (Shape::Text, Value::Text(_)) => Ok(()),
        (Shape::List(element), Value::List(items)) => {
            for (index, item) in items.iter().enumerate() {
                check(item, element).map_err(|e| at_context(e, &format!("element {}", index)))?;
            }
            Ok(())
        }
        (Shape::Map(element), Value::Map(entries)) => {
            for (key, entry) in entries {
                check(entry, element).map_err(|e| at_context(e, &format!("key {:?}", key)))?;
            }
            Ok(())
        }
        (Shape::Record(fields), Value::Map(entries)) => {
            // Unknown extra keys are ignored; every declared field must be present.
            for field in fields {
                let entry = entries.get(&field.name).ok_or_else(|| {
                    BridgeError::TypeMismatch(format!("missing record field {:?}", field.name))
                })?;
                check(entry, &field.shape)
                    .map_err(|e| at_context(e, &format!("field {:?}", field.name)))?;
            }
            Ok(())
        }
        (expected, found) => Err(BridgeError::TypeMismatch(format!(
            "expected {}, found {}",
            expected.name(),
            found.kind()
        ))),
    }
}

fn at_context(err: BridgeError, context: &str) -> BridgeError {
    match err {
        BridgeError::TypeMismatch(msg) => {
            BridgeError::TypeMismatch(format!("{}: {}", context, msg))
        }
        other => other,
    }
}

/// Convert a `serde_json::Value` tree into the bridge value model.
///
/// This is the boundary where all numerics collapse into the uniform
/// `Number` representation.
pub fn json_to_value(json: JsonValue) -> Result<Value> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(b)),
        JsonValue::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| BridgeError::TypeMismatch("number out of range".into())),
        JsonValue::String(s) => Ok(Value::Text(s)),
        JsonValue::Array(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                converted.push(json_to_value(item)?);
            }
            Ok(Value::List(converted))
        }
        JsonValue::Object(entries) => {
            let mut converted = BTreeMap::new();
            for (key, entry) in entries {
                converted.insert(key, json_to_value(entry)?);
            }
            Ok(Value::Map(converted))
        }
    }
}

/// Convert a bridge value back into a `serde_json::Value` tree.
///
/// Integral numbers are emitted as JSON integers so that typed extraction
/// into integer targets succeeds; non-finite numbers are not representable
/// on the wire.
pub fn value_to_json(value: &Value) -> Result<JsonValue> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Number(n) => {
            if is_exact_i64(*n) {
                Ok(JsonValue::Number((*n as i64).into()))
            } else {
                serde_json::Number::from_f64(*n)
                    .map(JsonValue::Number)
                    .ok_or_else(|| {
                        BridgeError::TypeMismatch(format!("number {} is not finite", n))
                    })
            }
        }
        Value::Text(s) => Ok(JsonValue::String(s.clone())),
        Value::List(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                converted.push(value_to_json(item)?);
            }
            Ok(JsonValue::Array(converted))
        }
        Value::Map(entries) => {
            let mut converted = serde_json::Map::new();
            for (key, entry) in entries {
                converted.insert(key.clone(), value_to_json(entry)?);
            }
            Ok(JsonValue::Object(converted))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Message {
        #[serde(rename = "intField")]
        int_field: i64,
        #[serde(rename = "stringField")]
        string_field: String,
    }

    fn message_shape() -> Shape {
        Shape::record([("intField", Shape::Int), ("stringField", Shape::Text)])
    }

    #[test]
    fn test_to_value_encodes_records_as_maps() {
        let message = Message { int_field: 42, string_field: "This is a string".into() };
        let value = to_value(&message).unwrap();

        let map = value.as_map().expect("record should encode as a map");
        assert_eq!(map.get("intField"), Some(&Value::Number(42.0)));
        assert_eq!(map.get("stringField"), Some(&Value::Text("This is a string".into())));
    }

    #[test]
    fn test_typed_round_trip() {
        let message = Message { int_field: 6, string_field: "int param is 6".into() };

        let encoded = to_value(&message).unwrap();
        let decoded: Message = from_value(&encoded).unwrap();

        assert_eq!(message, decoded);
    }

    #[test]
    fn test_decode_round_trip_for_every_kind() {
        let cases = vec![
            (Value::Null, Shape::Null),
            (Value::Bool(true), Shape::Bool),
            (Value::Number(777.0), Shape::Int),
            (Value::Number(2.5), Shape::Float),
            (Value::Text("hello".into()), Shape::Text),
            (
                to_value(&json!(["one", "two", "three"])).unwrap(),
                Shape::list(Shape::Text),
            ),
            (
                to_value(&json!({"one": 1, "two": 2, "three": 3})).unwrap(),
                Shape::map(Shape::Int),
            ),
            (
                to_value(&json!({"intField": 42, "stringField": "This is a string"})).unwrap(),
                message_shape(),
            ),
        ];

        for (value, shape) in cases {
            let decoded = decode(&value, &shape).unwrap();
            assert_eq!(decoded, value, "round trip failed for shape {:?}", shape);
        }
    }

    #[test]
    fn test_decode_rejects_variant_mismatch() {
        let list = to_value(&json!(["one"])).unwrap();
        let err = decode(&list, &Shape::map(Shape::Text)).unwrap_err();
        assert!(matches!(err, BridgeError::TypeMismatch(_)), "got {:?}", err);

        let err = decode(&Value::Number(1.0), &Shape::Text).unwrap_err();
        assert!(matches!(err, BridgeError::TypeMismatch(_)), "got {:?}", err);
    }

    #[test]
    fn test_decode_int_rejects_non_integral_number() {
        let err = decode(&Value::Number(1.5), &Shape::Int).unwrap_err();
        assert!(matches!(err, BridgeError::TypeMismatch(_)), "got {:?}", err);
    }

    #[test]
    fn test_decode_int_rejects_out_of_range_number() {
        let err = decode(&Value::Number(1e19), &Shape::Int).unwrap_err();
        assert!(matches!(err, BridgeError::TypeMismatch(_)), "got {:?}", err);
    }

    #[test]
    fn test_decode_text_has_no_implicit_stringification() {
        let err = decode(&Value::Bool(true), &Shape::Text).unwrap_err();
        assert!(matches!(err, BridgeError::TypeMismatch(_)), "got {:?}", err);
    }

    #[test]
    fn test_decode_record_rejects_missing_field() {
        let value = to_value(&json!({"intField": 42})).unwrap();
        let err = decode(&value, &message_shape()).unwrap_err();
        match err {
            BridgeError::TypeMismatch(msg) => assert!(msg.contains("stringField"), "{}", msg),
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_record_ignores_unknown_keys() {
        let value = to_value(&json!({
            "intField": 42,
            "stringField": "This is a string",
            "extraField": [1, 2, 3]
        }))
        .unwrap();

        decode(&value, &message_shape()).unwrap();
    }

    #[test]
    fn test_decode_list_reports_offending_element() {
        let value = to_value(&json!(["one", 2, "three"])).unwrap();
        let err = decode(&value, &Shape::list(Shape::Text)).unwrap_err();
        match err {
            BridgeError::TypeMismatch(msg) => assert!(msg.contains("element 1"), "{}", msg),
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_map_validates_element_kind() {
        let value = to_value(&json!({"one": 1, "two": "2"})).unwrap();
        let err = decode(&value, &Shape::map(Shape::Int)).unwrap_err();
        assert!(matches!(err, BridgeError::TypeMismatch(_)), "got {:?}", err);
    }

    #[test]
    fn test_from_value_extracts_integer_targets() {
        let n: i64 = from_value(&Value::Number(777.0)).unwrap();
        assert_eq!(n, 777);

        let err = from_value::<i64>(&Value::Number(1.5)).unwrap_err();
        assert!(matches!(err, BridgeError::TypeMismatch(_)), "got {:?}", err);
    }

    #[test]
    fn test_json_conversions_are_inverse() {
        let json = json!({
            "nested": {
                "array": [1, 2, 3, "four", null],
                "boolean": true,
                "number": 42.5,
                "string": "test"
            },
            "null_value": null
        });

        let value = json_to_value(json.clone()).unwrap();
        let back = value_to_json(&value).unwrap();

        assert_eq!(json, back);
    }
}
