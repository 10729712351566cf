/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for expression compilation and evaluation.
//!
//! Compilation has a single fatal failure, [`ParseError`]. Evaluation
//! failures are ordinary [`EvalError`] values returned to the caller.

use crate::messages;
use crate::value::Value;
use thiserror::Error;

/// A grammar violation found while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid expression '{template}': {message} at offset {offset}")]
pub struct ParseError {
    /// The full template that failed to parse.
    pub template: String,
    /// What the parser expected or found.
    pub message: String,
    /// Byte offset of the failure in `template`.
    pub offset: usize,
}

/// Errors that can occur while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl CompileError {
    /// The template that failed to compile.
    pub fn template(&self) -> &str {
        match self {
            CompileError::Parse(err) => &err.template,
        }
    }
}

/// A value could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot cast '{value}' to {target}")]
pub struct CastError {
    /// Text form of the offending value.
    pub value: String,
    /// Name of the requested type.
    pub target: &'static str,
}

impl CastError {
    pub fn new(value: &Value, target: &'static str) -> Self {
        Self {
            value: value.to_string(),
            target,
        }
    }
}

/// A recoverable failure produced while evaluating an expression.
///
/// `name` fields carry the access path accumulated up to the failing part.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("{}", messages::undefined_attribute(.name))]
    UndefinedAttribute { name: String },

    #[error("{}", messages::undefined_index(.name, .index))]
    UndefinedIndex { name: String, index: i64 },

    #[error("{}", messages::undefined_key(.name, .key))]
    UndefinedKey { name: String, key: String },

    #[error("{}", messages::size_not_supported(.value, .name))]
    SizeNotSupported { value: Value, name: String },

    #[error("{}", messages::key_access_not_supported(.value, .name))]
    KeyAccessNotSupported { value: Value, name: String },

    #[error("{}", messages::random_not_supported(.value, .name))]
    RandomNotSupported { value: Value, name: String },

    #[error("{}", messages::index_not_supported(.value, .name))]
    IndexNotSupported { value: Value, name: String },

    #[error(transparent)]
    Cast(#[from] CastError),
}

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
