//! Public API for compiling and evaluating formulas.
//!
//! Two entry points cover every use:
//!
//! 1. **Pipeline functions**: [`compile`] resolves a formula against a [`Context`] into a
//!    [`TypedExpr`] that can be evaluated many times; [`evaluate`] does both steps at once
//!    and is what `eval()` uses for nested formulas.
//! 2. **Engine**: [`Engine`] owns a function registry, the standard constants, macros,
//!    process parameters and options, and hands out contexts and compiled formulas.
//!
//! # Example
//!
//! ```ignore
//! use formula_core::api::{Engine, EngineOptions};
//! use formula_core::context::Bindings;
//! use formula_core::values::Value;
//!
//! let engine = Engine::new(EngineOptions::default());
//! let mut row = Bindings::new().with("price", Value::double(2.5));
//!
//! let formula = engine.compile("[price] * 4", &row).unwrap();
//! assert_eq!(formula.run(&row).unwrap(), Value::double(10.0));
//!
//! row.set("price", Value::double(3.0)).unwrap();
//! assert_eq!(formula.run(&row).unwrap(), Value::double(12.0));
//! ```

pub mod engine;
pub mod error;
pub mod expression;
pub mod options;

pub use engine::Engine;
pub use error::{Diagnostic, Error, RelatedInfo, Severity};
pub use expression::CompiledFormula;
pub use options::{CompilationOptions, EngineOptions, ExecutionOptions};

use crate::analyzer::{self, TypedExpr};
use crate::context::Context;
use crate::parser;
use crate::values::Value;

/// Parses and resolves `source` against `context`.
///
/// The result carries a fixed kind and can be evaluated against any context that
/// declares the same attributes.
pub fn compile(source: &str, context: &Context<'_>) -> Result<TypedExpr, Error> {
    let max_depth = context.compilation_options().max_parse_depth;
    let parsed = parser::parse_with_max_depth(source, max_depth)?;
    let typed = analyzer::analyze(&parsed, context)?;
    tracing::debug!(source, kind = %typed.kind(), nesting = context.nesting(), "compiled formula");
    Ok(typed)
}

/// Parses, resolves and evaluates `source` in one go.
pub fn evaluate(source: &str, context: &Context<'_>) -> Result<Value, Error> {
    let typed = compile(source, context)?;
    Ok(typed.evaluate(context)?)
}
