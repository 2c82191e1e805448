//! Formula - a small typed expression language for row-wise data transformation
//!
//! # Overview
//!
//! A formula such as `if([age] >= 18, "adult", "minor")` is compiled once against the
//! attribute kinds of a data table and then evaluated against every row. Common uses:
//!
//! - Derived columns computed from existing attributes
//! - Row filters (`[price] > 100 && contains([name], "pro")`)
//! - String cleanup, date arithmetic and rounding
//!
//! # Quick Start
//!
//! ```
//! use formula::{Bindings, Engine, Value, ValueKind};
//!
//! let engine = Engine::default();
//!
//! // Declare the kinds of the row's attributes.
//! let mut row = Bindings::new();
//! row.declare("integer", ValueKind::Integer);
//!
//! // Resolve once.
//! let formula = engine.compile(r#"eval("3*" + [integer], REAL)"#, &row).unwrap();
//! assert_eq!(formula.kind(), ValueKind::Double);
//!
//! // Evaluate per row.
//! row.set("integer", Value::integer(5.0)).unwrap();
//! assert_eq!(formula.run(&row).unwrap(), Value::double(15.0));
//! ```
//!
//! # Missing values
//!
//! Every kind has a missing value. Arithmetic on a missing operand is missing, ordering
//! against a missing value is false, and `str()` of a missing value is missing.
//!
//! # Errors
//!
//! Compilation reports [`Error::Syntax`] or [`Error::Type`] before any row is seen;
//! evaluation reports [`Error::Evaluation`]. Use [`render_error_to_string`] to show any of
//! them with the offending fragment underlined.

mod error_renderer;

pub use formula_core::api::{
    CompilationOptions, CompiledFormula, Diagnostic, Engine, EngineOptions, Error,
    ExecutionOptions, RelatedInfo, Severity,
};
pub use formula_core::context::{
    Bindings, ConstantTable, Context, Macros, ProcessScope, VariableResolver,
};
pub use formula_core::functions::{
    Category, FunctionDescriptor, FunctionError, FunctionRegistry,
};
pub use formula_core::types::{KindSet, ValueKind};
pub use formula_core::values::Value;
pub use formula_core::{TypedExpr, compile, evaluate};

// Stage modules for callers that drive the pipeline by hand.
pub use formula_core::{analyzer, context, evaluator, functions, parser, types, values};

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
