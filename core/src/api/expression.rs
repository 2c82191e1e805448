//! Compiled formulas.

use super::{Engine, Error};
use crate::analyzer::TypedExpr;
use crate::context::VariableResolver;
use crate::types::ValueKind;
use crate::values::Value;

/// A formula compiled by an [`Engine`], ready to run against any number of rows.
///
/// The resolved tree is owned; only the engine is borrowed, for its functions, constants
/// and options.
#[derive(Debug)]
pub struct CompiledFormula<'e> {
    engine: &'e Engine,
    typed: TypedExpr,
}

impl<'e> CompiledFormula<'e> {
    /// Create a new compiled formula.
    ///
    /// This is called internally by Engine::compile().
    pub(crate) fn new(engine: &'e Engine, typed: TypedExpr) -> Self {
        Self { engine, typed }
    }

    pub fn kind(&self) -> ValueKind {
        self.typed.kind()
    }

    pub fn source(&self) -> &str {
        &self.typed.source
    }

    pub fn typed_expr(&self) -> &TypedExpr {
        &self.typed
    }

    /// Unwraps the resolved tree, e.g. to evaluate it from other threads.
    pub fn into_typed_expr(self) -> TypedExpr {
        self.typed
    }

    /// Evaluate against one row.
    pub fn run(&self, row: &dyn VariableResolver) -> Result<Value, Error> {
        let context = self.engine.context(row);
        Ok(self.typed.evaluate(&context)?)
    }
}
