/*
 * messages.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Message catalog for evaluation failures.
//!
//! Each function formats one failure kind. `name` is always the full access
//! path of the failing part (e.g. `order.items(2)`), and `value` the runtime
//! value the accessor was applied to.

use crate::value::Value;
use std::fmt::Display;

pub fn undefined_attribute(name: &str) -> String {
    format!("Attribute '{}' is not defined", name)
}

pub fn undefined_index(name: &str, index: impl Display) -> String {
    format!("Index {} is out of bounds for '{}'", index, name)
}

pub fn undefined_key(name: &str, key: &str) -> String {
    format!("Key '{}' is not defined in '{}'", key, name)
}

pub fn size_not_supported(value: &Value, name: &str) -> String {
    format!(
        "Cannot take the size of '{}': value '{}' is not a collection",
        name, value
    )
}

pub fn key_access_not_supported(value: &Value, name: &str) -> String {
    format!(
        "Cannot access keys of '{}': value '{}' is not a map",
        name, value
    )
}

pub fn random_not_supported(value: &Value, name: &str) -> String {
    format!(
        "Cannot pick a random element of '{}': value '{}' is not a non-empty list",
        name, value
    )
}

pub fn index_not_supported(value: &Value, name: &str) -> String {
    format!("Cannot index '{}': value '{}' is not a list", name, value)
}
