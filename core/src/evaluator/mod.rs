//! Tree-walking evaluator for resolved formulas.
//!
//! The evaluator interprets a [`TypedExpr`] against a [`Context`] and produces one
//! [`Value`] of the expression's kind.
//!
//! ## Design Principles
//!
//! - **Never panic**: every input that made it through the analyzer evaluates or fails with
//!   an [`EvaluationError`]
//! - **Stack-safe**: depth tracking prevents stack overflow from deeply nested expressions
//! - **Missing is a value**: missing operands propagate instead of raising
//!
//! ## Example
//!
//! ```ignore
//! use formula_core::{api, context::Context, evaluator};
//!
//! let context = Context::new();
//! let typed = api::compile("1 + 2", &context).unwrap();
//! let result = evaluator::eval(&typed, &context).unwrap();
//! assert_eq!(result.as_number(), Some(3.0));
//! ```

mod error;
mod eval;
pub mod operators;


pub use error::{EvaluationError, EvaluationErrorKind};
pub use eval::Evaluator;

use crate::{analyzer::TypedExpr, context::Context, values::Value};

/// Evaluate a resolved expression with the limits configured on the context.
pub fn eval(expr: &TypedExpr, context: &Context<'_>) -> Result<Value, EvaluationError> {
    eval_with_limits(expr, context, context.execution_options().max_depth)
}

/// Evaluate a resolved expression with a custom depth limit.
///
/// ```ignore
/// // Allow deeper recursion for specific use case
/// let result = eval_with_limits(&typed, &context, 5000)?;
/// ```
pub fn eval_with_limits(
    expr: &TypedExpr,
    context: &Context<'_>,
    max_depth: usize,
) -> Result<Value, EvaluationError> {
    tracing::trace!(source = %expr.source, nesting = context.nesting(), "evaluate");
    Evaluator::new(context, max_depth).eval(expr)
}
