//! Core of the formula engine: parser, type resolver, function catalog and evaluator.
//!
//! The pipeline is `text -> parser -> analyzer -> evaluator`. A formula is resolved once
//! into a [`TypedExpr`](analyzer::TypedExpr) and can then be evaluated any number of
//! times against a [`Context`](context::Context) that is rebound row by row.
//!
//! ```ignore
//! use formula_core::{context::{Bindings, Context, ConstantTable}, functions::FunctionRegistry};
//! use formula_core::{types::ValueKind, values::Value};
//!
//! let registry = FunctionRegistry::standard();
//! let constants = ConstantTable::standard();
//! let mut row = Bindings::new();
//! row.insert("integer", Value::integer(5.0));
//!
//! let context = Context::new()
//!     .with_functions(&registry)
//!     .with_constants(&constants)
//!     .with_variables(&row);
//! let value = formula_core::evaluate(r#"eval("3*" + [integer], REAL)"#, &context).unwrap();
//! assert_eq!(value, Value::double(15.0));
//! ```

pub mod analyzer;
pub mod api;
pub mod context;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod types;
pub mod values;

pub use analyzer::TypedExpr;
pub use api::{Error, compile, evaluate};

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
