//! Encoded value model for the bridge wire format.
//!
//! [`Value`] is the closed, recursive representation of everything that can
//! cross the native/script boundary. The wire format is a tree: composite
//! values are encoded field-by-field and element-by-element, so value graphs
//! must be acyclic.
//!
//! # Type Mapping
//!
//! | Variant | Wire representation |
//! |---------|---------------------|
//! | `Null` | null |
//! | `Bool` | boolean |
//! | `Number` | number (all numerics, uniform f64) |
//! | `Text` | string |
//! | `List` | array (order significant) |
//! | `Map` | object (keys unique, order not significant) |
//!
//! A structured record has no variant of its own: it is encoded as a `Map`
//! of its named fields, and only becomes a record again when decoded against
//! a caller-supplied shape (see [`crate::codec`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value that can cross the native/script boundary.
///
/// All numeric primitives are represented uniformly as `f64`; callers declare
/// the native numeric type they expect at decode time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Short name of the runtime variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer view of a `Number`.
    ///
    /// Returns `None` when the value is not a `Number`, is not integral, or
    /// falls outside the `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) if is_exact_i64(*n) => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

/// True when `n` is finite, integral and exactly representable as `i64`.
pub(crate) fn is_exact_i64(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Bool(true).kind(), "bool");
        assert_eq!(Value::Number(1.0).kind(), "number");
        assert_eq!(Value::Text("x".into()).kind(), "text");
        assert_eq!(Value::List(vec![]).kind(), "list");
        assert_eq!(Value::Map(BTreeMap::new()).kind(), "map");
    }

    #[test]
    fn test_as_i64_requires_integral_number() {
        assert_eq!(Value::Number(42.0).as_i64(), Some(42));
        assert_eq!(Value::Number(-7.0).as_i64(), Some(-7));
        assert_eq!(Value::Number(1.5).as_i64(), None);
        assert_eq!(Value::Number(f64::NAN).as_i64(), None);
        assert_eq!(Value::Number(1e19).as_i64(), None);
        assert_eq!(Value::Text("42".into()).as_i64(), None);
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i64), Value::Number(42.0));
        assert_eq!(Value::from(2.5f64), Value::Number(2.5));
        assert_eq!(Value::from("hello"), Value::Text("hello".into()));
        assert_eq!(
            Value::from(vec![Value::from(1i64)]),
            Value::List(vec![Value::Number(1.0)])
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let mut entries = BTreeMap::new();
        entries.insert("flag".to_string(), Value::Bool(false));
        entries.insert(
            "items".to_string(),
            Value::List(vec![Value::Number(1.0), Value::Text("two".into()), Value::Null]),
        );
        let value = Value::Map(entries);

        let serialized = serde_json::to_string(&value).unwrap();
        let deserialized: Value = serde_json::from_str(&serialized).unwrap();

        assert_eq!(value, deserialized);
    }

    #[test]
    fn test_integer_json_deserializes_as_number() {
        let value: Value = serde_json::from_str("42").unwrap();
        assert_eq!(value, Value::Number(42.0));
    }

    #[test]
    fn test_map_equality_ignores_insertion_order() {
        let mut a = BTreeMap::new();
        a.insert("one".to_string(), Value::Number(1.0));
        a.insert("two".to_string(), Value::Number(2.0));

        let mut b = BTreeMap::new();
        b.insert("two".to_string(), Value::Number(2.0));
        b.insert("one".to_string(), Value::Number(1.0));

        assert_eq!(Value::Map(a), Value::Map(b));
    }
}
