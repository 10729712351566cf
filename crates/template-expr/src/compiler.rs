/*
 * compiler.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compilation of templates into typed, reusable expressions.
//!
//! A template is parsed once. The resulting [`CompiledExpression`] picks an
//! evaluation plan based on the shape of the part list:
//!
//! - a single static part is cast once, at compile time;
//! - a single dynamic part is evaluated and its value cast directly;
//! - anything else renders every part to text and casts the text.

use crate::cast::FromValue;
use crate::context::Context;
use crate::error::{CastError, CompileResult, EvalError, EvalResult};
use crate::parser::Template;
use crate::part::Part;
use crate::value::Value;

/// Compile `source` into an expression producing `T`.
///
/// Fails with the original text and a parse diagnostic if the template is
/// malformed. No expression is produced in that case.
pub fn compile<T: FromValue + Clone>(source: &str) -> CompileResult<CompiledExpression<T>> {
    CompiledExpression::compile(source)
}

/// Compile `source` into an expression producing text.
pub fn compile_str(source: &str) -> CompileResult<CompiledExpression<String>> {
    compile(source)
}

#[derive(Debug, Clone)]
enum Plan<T> {
    /// Template without expressions; the cast result is computed up front.
    Constant(Result<T, CastError>),
    /// At least one expression; evaluated against each context.
    Dynamic,
}

/// A template compiled for repeated evaluation against different contexts.
///
/// Immutable after compilation; `Send` and `Sync` whenever `T` is, so one
/// instance can be shared by any number of threads.
#[derive(Debug, Clone)]
pub struct CompiledExpression<T> {
    template: Template,
    plan: Plan<T>,
}

impl<T: FromValue + Clone> CompiledExpression<T> {
    /// Parse `source` and select an evaluation plan.
    pub fn compile(source: &str) -> CompileResult<Self> {
        let template = Template::parse(source)?;
        let expression = Self::from_template(template);
        tracing::debug!(
            template = source,
            parts = expression.parts().len(),
            plan = expression.plan_name(),
            "Compiled expression"
        );
        Ok(expression)
    }

    /// Select an evaluation plan for an already-parsed template.
    pub fn from_template(template: Template) -> Self {
        let plan = match template.parts() {
            [Part::Static(text)] => Plan::Constant(T::from_value(Value::String(text.clone()))),
            _ => Plan::Dynamic,
        };
        Self { template, plan }
    }

    /// Evaluate against `context`.
    ///
    /// A lone expression yields its value cast to `T`. Otherwise the parts
    /// are rendered to text, stopping at the first failing part, and the
    /// text is cast.
    pub fn evaluate<C: Context + ?Sized>(&self, context: &C) -> EvalResult<T> {
        let result = match (&self.plan, self.template.parts()) {
            (Plan::Constant(cast), _) => cast.clone().map_err(EvalError::from),
            (Plan::Dynamic, [part]) => part
                .eval(context)
                .and_then(|value| T::from_value(value.into_owned()).map_err(EvalError::from)),
            (Plan::Dynamic, parts) => render_parts(parts, context)
                .and_then(|text| T::from_value(Value::String(text)).map_err(EvalError::from)),
        };
        if let Err(err) = &result {
            tracing::trace!(template = self.source(), error = %err, "Expression evaluation failed");
        }
        result
    }

    /// Evaluate, substituting `default` on any evaluation failure.
    pub fn evaluate_or<C: Context + ?Sized>(&self, context: &C, default: T) -> T {
        self.evaluate(context).unwrap_or(default)
    }

    fn plan_name(&self) -> &'static str {
        match (&self.plan, self.parts().len()) {
            (Plan::Constant(_), _) => "constant",
            (Plan::Dynamic, 1) => "single",
            (Plan::Dynamic, _) => "concat",
        }
    }
}

impl<T> CompiledExpression<T> {
    /// The template text this expression was compiled from.
    pub fn source(&self) -> &str {
        self.template.source()
    }

    /// The parsed parts, in template order.
    pub fn parts(&self) -> &[Part] {
        self.template.parts()
    }

    /// Whether evaluation never consults the context.
    pub fn is_static(&self) -> bool {
        matches!(self.plan, Plan::Constant(_))
    }
}

impl CompiledExpression<String> {
    /// Evaluate to text.
    pub fn render<C: Context + ?Sized>(&self, context: &C) -> EvalResult<String> {
        self.evaluate(context)
    }
}

/// Render parts to text in order, stopping at the first failure.
fn render_parts<C: Context + ?Sized>(parts: &[Part], context: &C) -> EvalResult<String> {
    let mut output = String::new();
    for part in parts {
        match part {
            Part::Static(text) => output.push_str(text),
            dynamic => output.push_str(&dynamic.eval(context)?.to_string()),
        }
    }
    Ok(output)
}
