/*
 * part.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Expression parts.
//!
//! A compiled template is a flat list of parts. Static parts hold literal
//! text; every dynamic part is a linear accessor chain rooted at a single
//! [`Part::Attribute`]. Parts are immutable once built and can be evaluated
//! any number of times, from any number of threads.

use crate::cast::FromValue;
use crate::context::Context;
use crate::error::{EvalError, EvalResult};
use crate::value::{Shape, Value};
use std::borrow::Cow;
use std::fmt;

/// How an index accessor obtains its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSpec {
    /// An integer literal, e.g. `list(2)`.
    Literal(i64),
    /// The name of a context attribute holding the index, e.g. `list(i)`.
    Attribute(String),
}

impl IndexSpec {
    /// Classify an index token. Tokens that parse as integers are literals;
    /// anything else names an attribute.
    pub fn from_token(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(index) => IndexSpec::Literal(index),
            Err(_) => IndexSpec::Attribute(token.to_string()),
        }
    }

    fn resolve<C: Context + ?Sized>(&self, context: &C) -> EvalResult<i64> {
        match self {
            IndexSpec::Literal(index) => Ok(*index),
            IndexSpec::Attribute(name) => {
                let value = context
                    .get(name)
                    .ok_or_else(|| EvalError::UndefinedAttribute { name: name.clone() })?;
                Ok(i64::from_value(value.clone())?)
            }
        }
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexSpec::Literal(index) => write!(f, "{}", index),
            IndexSpec::Attribute(name) => f.write_str(name),
        }
    }
}

/// A compiled, immutable evaluation node.
///
/// The `name` of an accessor is the access path of the value it applies
/// to, i.e. everything written before its own suffix. Errors raised by the
/// accessor report that name. The full path, suffix included, is
/// [`display_name`](Self::display_name).
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Literal text outside any expression marker.
    Static(String),

    /// Root of an accessor chain: `${name}`.
    Attribute(String),

    /// Element at an index: `child(index)`.
    Index {
        child: Box<Part>,
        name: String,
        index: IndexSpec,
    },

    /// Value bound to a key: `child.key`.
    Key {
        child: Box<Part>,
        name: String,
        key: String,
    },

    /// Element count: `child.size`.
    Size { child: Box<Part>, name: String },

    /// Uniformly random element: `child.random`.
    Random { child: Box<Part>, name: String },
}

impl Part {
    /// Whether this part is literal text.
    pub fn is_static(&self) -> bool {
        matches!(self, Part::Static(_))
    }

    /// The full access path of a dynamic part, including its own suffix.
    /// `None` for static text.
    pub fn display_name(&self) -> Option<String> {
        if self.is_static() {
            return None;
        }
        let mut path = String::new();
        self.write_path(&mut path).ok()?;
        Some(path)
    }

    fn write_path<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            Part::Static(_) => Ok(()),
            Part::Attribute(name) => out.write_str(name),
            Part::Index { child, index, .. } => {
                child.write_path(out)?;
                write!(out, "({})", index)
            }
            Part::Key { child, key, .. } => {
                child.write_path(out)?;
                write!(out, ".{}", key)
            }
            Part::Size { child, .. } => {
                child.write_path(out)?;
                out.write_str(".size")
            }
            Part::Random { child, .. } => {
                child.write_path(out)?;
                out.write_str(".random")
            }
        }
    }

    /// Evaluate this part against a context.
    ///
    /// Values found in the context are borrowed; only computed values
    /// (literal text, sizes) are owned.
    pub fn eval<'c, C: Context + ?Sized>(&self, context: &'c C) -> EvalResult<Cow<'c, Value>> {
        match self {
            Part::Static(text) => Ok(Cow::Owned(Value::String(text.clone()))),

            Part::Attribute(name) => context
                .get(name)
                .map(Cow::Borrowed)
                .ok_or_else(|| EvalError::UndefinedAttribute { name: name.clone() }),

            Part::Size { child, name } => {
                let value = child.eval(context)?;
                match value.shape().len() {
                    Some(len) => Ok(Cow::Owned(Value::Int(len as i64))),
                    None => Err(EvalError::SizeNotSupported {
                        value: value.into_owned(),
                        name: name.clone(),
                    }),
                }
            }

            Part::Random { child, name } => {
                let value = child.eval(context)?;
                let len = match value.shape() {
                    Shape::Sequence(items) => items.len(),
                    _ => 0,
                };
                if len == 0 {
                    return Err(EvalError::RandomNotSupported {
                        value: value.into_owned(),
                        name: name.clone(),
                    });
                }
                // Drawn per call from the calling thread's generator.
                let position = fastrand::usize(..len);
                project(value, |v| v.element(position)).ok_or_else(|| {
                    EvalError::UndefinedIndex {
                        name: name.clone(),
                        index: position as i64,
                    }
                })
            }

            Part::Index { child, name, index } => {
                let index = index.resolve(context)?;
                let value = child.eval(context)?;
                if !matches!(value.shape(), Shape::Sequence(_)) {
                    return Err(EvalError::IndexNotSupported {
                        value: value.into_owned(),
                        name: name.clone(),
                    });
                }
                usize::try_from(index)
                    .ok()
                    .and_then(|position| project(value, |v| v.element(position)))
                    .ok_or_else(|| EvalError::UndefinedIndex {
                        name: name.clone(),
                        index,
                    })
            }

            Part::Key { child, name, key } => {
                let value = child.eval(context)?;
                if !matches!(value.shape(), Shape::Mapping(_)) {
                    return Err(EvalError::KeyAccessNotSupported {
                        value: value.into_owned(),
                        name: name.clone(),
                    });
                }
                project(value, |v| v.entry(key)).ok_or_else(|| EvalError::UndefinedKey {
                    name: name.clone(),
                    key: key.clone(),
                })
            }
        }
    }
}

/// Apply a borrowing accessor to a possibly-owned value, keeping the
/// result borrowed from the context whenever the input was.
fn project<'c, F>(value: Cow<'c, Value>, accessor: F) -> Option<Cow<'c, Value>>
where
    F: FnOnce(&Value) -> Option<&Value>,
{
    match value {
        Cow::Borrowed(v) => accessor(v).map(Cow::Borrowed),
        Cow::Owned(v) => accessor(&v).cloned().map(Cow::Owned),
    }
}

/// Reconstructs the template text this part was parsed from. Integer index
/// literals are written in canonical form, so `(+1)` comes back as `(1)`.
impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Static(text) => f.write_str(text),
            dynamic => {
                f.write_str("${")?;
                dynamic.write_path(f)?;
                f.write_str("}")
            }
        }
    }
}
