//! Type resolver: assigns a value-kind to every node before any data is seen.

pub mod analyzer;
pub mod error;
pub mod typed_expr;

#[cfg(test)]
mod analyzer_test;

pub use analyzer::analyze;
pub use error::{TypeError, TypeErrorKind};
pub use typed_expr::{Expr, ExprInner, TypedExpr};
