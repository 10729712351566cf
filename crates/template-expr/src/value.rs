/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Runtime values and their container shapes.
//!
//! A [`Value`] is what a context binds names to and what expression parts
//! produce. Accessors never match on `Value` directly to decide whether an
//! operation applies; they ask for its [`Shape`] once and dispatch on that.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed value available to expressions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or null value.
    Null,

    /// A boolean value.
    Bool(bool),

    /// A signed integer.
    Int(i64),

    /// A floating point number.
    Float(f64),

    /// A string value.
    String(String),

    /// An ordered, indexable sequence.
    List(Vec<Value>),

    /// An unordered collection. Sized, but not indexable.
    Set(Vec<Value>),

    /// A map of string keys to values.
    Map(BTreeMap<String, Value>),
}

/// The container shape of a value, as seen by the accessors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// Supports size, index, and random selection.
    Sequence(&'a [Value]),
    /// Supports size only.
    Set(&'a [Value]),
    /// Supports size and key lookup.
    Mapping(&'a BTreeMap<String, Value>),
    /// No container semantics.
    Scalar,
}

impl Shape<'_> {
    /// Number of elements, if the shape has a size.
    pub fn len(&self) -> Option<usize> {
        match self {
            Shape::Sequence(items) | Shape::Set(items) => Some(items.len()),
            Shape::Mapping(entries) => Some(entries.len()),
            Shape::Scalar => None,
        }
    }
}

impl Value {
    /// Detect the container shape of this value.
    pub fn shape(&self) -> Shape<'_> {
        match self {
            Value::List(items) => Shape::Sequence(items),
            Value::Set(items) => Shape::Set(items),
            Value::Map(entries) => Shape::Mapping(entries),
            _ => Shape::Scalar,
        }
    }

    /// Element at `position` if this value is a sequence.
    pub fn element(&self, position: usize) -> Option<&Value> {
        match self.shape() {
            Shape::Sequence(items) => items.get(position),
            _ => None,
        }
    }

    /// Value bound to `key` if this value is a mapping.
    pub fn entry(&self, key: &str) -> Option<&Value> {
        match self.shape() {
            Shape::Mapping(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Build a list value from anything convertible to values.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a map value from key/value pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Default text representation, used when a value is spliced into a
/// larger template.
///
/// - String: as-is
/// - Bool, Int, Float: their usual form
/// - Null: `null`
/// - List, Set: `[a, b, c]`
/// - Map: `{key=value, ...}` in key order
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::List(items) | Value::Set(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
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

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Float(u as f64)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    // Not representable as a primitive; keep the digits
                    Value::String(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::list(items),
            serde_json::Value::Object(entries) => Value::map(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_detection() {
        assert!(matches!(Value::list(["a"]).shape(), Shape::Sequence(_)));
        assert!(matches!(Value::Set(vec![]).shape(), Shape::Set(_)));
        assert!(matches!(
            Value::map([("k", "v")]).shape(),
            Shape::Mapping(_)
        ));
        assert_eq!(Value::from("text").shape(), Shape::Scalar);
        assert_eq!(Value::Int(3).shape(), Shape::Scalar);
        assert_eq!(Value::Null.shape(), Shape::Scalar);
    }

    #[test]
    fn test_shape_len() {
        assert_eq!(Value::list(["a", "b", "c"]).shape().len(), Some(3));
        assert_eq!(
            Value::Set(vec![Value::Int(1), Value::Int(2)]).shape().len(),
            Some(2)
        );
        assert_eq!(Value::map([("k", "v")]).shape().len(), Some(1));
        assert_eq!(Value::from("abc").shape().len(), None);
    }

    #[test]
    fn test_element_and_entry() {
        let list = Value::list(["a", "b"]);
        assert_eq!(list.element(1), Some(&Value::from("b")));
        assert_eq!(list.element(2), None);
        assert_eq!(list.entry("a"), None);

        let set = Value::Set(vec![Value::from("a")]);
        assert_eq!(set.element(0), None);

        let map = Value::map([("k", "v")]);
        assert_eq!(map.entry("k"), Some(&Value::from("v")));
        assert_eq!(map.entry("missing"), None);
        assert_eq!(map.element(0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::list(["a", "b"]).to_string(), "[a, b]");
        assert_eq!(Value::list(Vec::<Value>::new()).to_string(), "[]");
        assert_eq!(
            Value::map([("b", Value::Int(2)), ("a", Value::Int(1))]).to_string(),
            "{a=1, b=2}"
        );
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({
            "name": "Ada",
            "age": 36,
            "ratio": 0.5,
            "tags": ["x", "y"],
            "nothing": null,
        });

        let value = Value::from(json);
        assert_eq!(value.entry("name"), Some(&Value::from("Ada")));
        assert_eq!(value.entry("age"), Some(&Value::Int(36)));
        assert_eq!(value.entry("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(value.entry("tags"), Some(&Value::list(["x", "y"])));
        assert_eq!(value.entry("nothing"), Some(&Value::Null));
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from(serde_json::json!(-3)), Value::Int(-3));
        assert_eq!(
            Value::from(serde_json::json!(u64::MAX)),
            Value::Float(u64::MAX as f64)
        );
        let value = Value::from(serde_json::json!(1.5e300));
        assert!(matches!(value, Value::Float(f) if f == 1.5e300));
    }

    #[test]
    fn test_serialize_untagged() {
        let value = Value::map([
            ("n", Value::Int(1)),
            ("s", Value::list(["a"])),
            ("z", Value::Null),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"n":1,"s":["a"],"z":null}"#);
    }
}
