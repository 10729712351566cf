/*
 * cast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion of evaluation results to the caller's requested type.
//!
//! A value that already has the requested shape passes through. Primitive
//! targets accept text and parse it with the standard `FromStr` rules;
//! malformed text is a [`CastError`].

use crate::error::CastError;
use crate::value::Value;
use std::collections::BTreeMap;

/// Types an expression result can be cast to.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, CastError>;
}

/// Cast `value` to `T`.
pub fn cast<T: FromValue>(value: Value) -> Result<T, CastError> {
    T::from_value(value)
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, CastError> {
        Ok(value)
    }
}

/// Strings pass through; anything else uses its default text representation.
impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::String(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match &value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => s.parse().map_err(|_| CastError::new(&value, "bool")),
            _ => Err(CastError::new(&value, "bool")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match &value {
            Value::Float(x) => Ok(*x),
            Value::Int(n) => Ok(*n as f64),
            Value::String(s) => s.parse().map_err(|_| CastError::new(&value, "f64")),
            _ => Err(CastError::new(&value, "f64")),
        }
    }
}

macro_rules! impl_from_value_for_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, CastError> {
                    let converted = match &value {
                        Value::Int(n) => <$ty>::try_from(*n).ok(),
                        Value::String(s) => s.parse::<$ty>().ok(),
                        _ => None,
                    };
                    converted.ok_or_else(|| CastError::new(&value, stringify!($ty)))
                }
            }
        )*
    };
}

impl_from_value_for_int!(i64, i32, u32, u64, usize);

/// Lists and sets both cast to their elements.
impl FromValue for Vec<Value> {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::List(items) | Value::Set(items) => Ok(items),
            other => Err(CastError::new(&other, "list")),
        }
    }
}

impl FromValue for BTreeMap<String, Value> {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Map(entries) => Ok(entries),
            other => Err(CastError::new(&other, "map")),
        }
    }
}

/// `null` casts to `None`; anything else must cast to `T`.
impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
