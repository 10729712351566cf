/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluation contexts.
//!
//! Expressions only ever ask a context for a value by exact name. How the
//! bindings get there is up to the caller; [`ValueContext`] is the stock
//! implementation, and plain `HashMap`/`BTreeMap` bindings work as well.

use crate::value::Value;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Name lookup consumed by expression evaluation.
///
/// Absence is not an error at this layer. It only becomes one when an
/// expression part requires the value to exist.
pub trait Context {
    /// Look up a value by exact name.
    fn get(&self, name: &str) -> Option<&Value>;
}

impl<C: Context + ?Sized> Context for &C {
    fn get(&self, name: &str) -> Option<&Value> {
        (**self).get(name)
    }
}

impl<S: std::hash::BuildHasher> Context for HashMap<String, Value, S> {
    fn get(&self, name: &str) -> Option<&Value> {
        HashMap::get(self, name)
    }
}

impl Context for BTreeMap<String, Value> {
    fn get(&self, name: &str) -> Option<&Value> {
        BTreeMap::get(self, name)
    }
}

/// Errors building a context from external data.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The top-level data was not an object.
    #[error("Context data must be an object, found: {found}")]
    NotAnObject { found: String },

    /// The data could not be converted to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A context containing variable bindings, with optional parent scope.
#[derive(Debug, Clone, Default)]
pub struct ValueContext {
    /// Variable bindings at this level.
    variables: HashMap<String, Value>,

    /// Enclosing scope consulted when a name is not bound here.
    parent: Option<Box<ValueContext>>,
}

impl ValueContext {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove a variable from this level, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.variables.remove(key)
    }

    /// Create a child context; names not bound in the child resolve
    /// through this one.
    pub fn child(&self) -> ValueContext {
        ValueContext {
            variables: HashMap::new(),
            parent: Some(Box::new(self.clone())),
        }
    }

    /// Number of bindings at this level (parents excluded).
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether this level has no bindings.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Build a context from a JSON object. Each top-level field becomes
    /// a binding.
    pub fn from_json(json: serde_json::Value) -> Result<Self, ContextError> {
        match json {
            serde_json::Value::Object(entries) => Ok(Self {
                variables: entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
                parent: None,
            }),
            other => Err(ContextError::NotAnObject {
                found: other.to_string(),
            }),
        }
    }

    /// Build a context from any serializable struct or map.
    pub fn from_serialize<S: Serialize>(data: &S) -> Result<Self, ContextError> {
        Self::from_json(serde_json::to_value(data)?)
    }
}

impl Context for ValueContext {
    fn get(&self, name: &str) -> Option<&Value> {
        self.variables
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.get(name)))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            parent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut ctx = ValueContext::new();
        ctx.insert("name", "Alice");
        assert_eq!(ctx.get("name"), Some(&Value::from("Alice")));
        assert_eq!(ctx.get("missing"), None);
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_context_scoping() {
        let parent = ValueContext::new().with("x", "parent_x").with("y", "parent_y");

        let mut child = parent.child();
        child.insert("x", "child_x");

        // Child shadows parent for 'x'
        assert_eq!(child.get("x"), Some(&Value::from("child_x")));
        // Child inherits 'y' from parent
        assert_eq!(child.get("y"), Some(&Value::from("parent_y")));
        // Parent unchanged
        assert_eq!(parent.get("x"), Some(&Value::from("parent_x")));
        assert_eq!(child.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut ctx = ValueContext::new().with("a", 1);
        assert_eq!(ctx.remove("a"), Some(Value::Int(1)));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_from_json_object() {
        let ctx = ValueContext::from_json(serde_json::json!({
            "user": { "name": "Bob" },
            "count": 2,
        }))
        .unwrap();

        assert_eq!(ctx.get("count"), Some(&Value::Int(2)));
        assert_eq!(
            ctx.get("user").and_then(|u| u.entry("name")),
            Some(&Value::from("Bob"))
        );
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = ValueContext::from_json(serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, ContextError::NotAnObject { .. }));
        assert_eq!(
            err.to_string(),
            "Context data must be an object, found: [1,2]"
        );
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Order {
            id: u32,
            items: Vec<&'static str>,
        }

        let ctx = ValueContext::from_serialize(&Order {
            id: 7,
            items: vec!["apple", "pear"],
        })
        .unwrap();

        assert_eq!(ctx.get("id"), Some(&Value::Int(7)));
        assert_eq!(ctx.get("items"), Some(&Value::list(["apple", "pear"])));
    }

    #[test]
    fn test_map_contexts() {
        let mut hash = HashMap::new();
        hash.insert("k".to_string(), Value::from("h"));
        assert_eq!(Context::get(&hash, "k"), Some(&Value::from("h")));

        let mut tree = BTreeMap::new();
        tree.insert("k".to_string(), Value::from("t"));
        assert_eq!(Context::get(&tree, "k"), Some(&Value::from("t")));
    }

    #[test]
    fn test_collect() {
        let ctx: ValueContext = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(ctx.get("b"), Some(&Value::Int(2)));
    }
}
