/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compiled `${...}` expression templates.
//!
//! This crate compiles template strings with embedded expression markers into
//! reusable evaluation plans. A marker names a context value and may chain
//! accessors onto it:
//!
//! - Attribute lookup: `${name}`
//! - Indexed element: `${list(0)}` or `${list(i)}` (index taken from `i`)
//! - Keyed lookup: `${map.key}`
//! - Element count: `${list.size}`
//! - Random element: `${list.random}`
//!
//! Templates are parsed once; the resulting [`CompiledExpression`] can be
//! evaluated any number of times, from any number of threads, against
//! different [`Context`]s. Evaluation failures are returned as
//! [`EvalError`] values naming the access path of the value that could not
//! be accessed, e.g. `list` for a failing `${list(5)}`.
//!
//! # Example
//!
//! ```
//! use template_expr::{Value, ValueContext, compile, compile_str};
//!
//! let greeting = compile_str("Hello ${user.name}, you have ${inbox.size} messages")?;
//!
//! let ctx = ValueContext::new()
//!     .with("user", Value::map([("name", "Ada")]))
//!     .with("inbox", Value::list(["a", "b"]));
//!
//! assert_eq!(greeting.evaluate(&ctx)?, "Hello Ada, you have 2 messages");
//!
//! let count = compile::<i64>("${inbox.size}")?;
//! assert_eq!(count.evaluate(&ctx)?, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cast;
pub mod compiler;
pub mod context;
pub mod error;
pub mod messages;
pub mod parser;
pub mod part;
pub mod value;

// Re-export main types at crate root
pub use cast::{FromValue, cast};
pub use compiler::{CompiledExpression, compile, compile_str};
pub use context::{Context, ContextError, ValueContext};
pub use error::{CastError, CompileError, CompileResult, EvalError, EvalResult, ParseError};
pub use parser::{Parser, Template};
pub use part::{IndexSpec, Part};
pub use value::{Shape, Value};
