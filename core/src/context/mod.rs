//! Resolver capabilities queried while resolving and evaluating formulas.
//!
//! A [`Context`] is a small bundle of optional borrowed resolvers. Every capability is
//! optional: asking a context without, say, a scope resolver for a macro simply finds
//! nothing. Contexts are `Copy`, and moving to the next row is a single pointer swap
//! through [`Context::bind`].

mod bindings;
mod constants;
mod process;
mod scope;

use std::fmt;
use std::sync::Arc;

use crate::api::{CompilationOptions, EngineOptions, ExecutionOptions};
use crate::functions::FunctionDescriptor;
use crate::types::ValueKind;
use crate::values::Value;

pub use bindings::{BindingError, Bindings};
pub use constants::ConstantTable;
pub use process::ProcessScope;
pub use scope::Macros;

/// Looks up functions by name.
pub trait FunctionResolver {
    fn resolve_function(&self, name: &str) -> Option<Arc<FunctionDescriptor>>;

    /// All known functions, for tooling. Not needed for evaluation.
    fn functions(&self) -> Vec<Arc<FunctionDescriptor>> {
        Vec::new()
    }
}

/// Named constants such as `pi` or `MISSING_NUMERIC`.
pub trait ConstantResolver {
    fn constant(&self, name: &str) -> Option<Value>;

    fn constant_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// The row being evaluated: declared kinds known at resolution, values at evaluation.
pub trait VariableResolver {
    /// Declared kind of a variable, available before any value is bound.
    fn kind_of(&self, name: &str) -> Option<ValueKind>;

    /// Current value of a variable. `None` means the variable does not exist; a missing
    /// value is reported as `Some` of the kind's missing value.
    fn value_of(&self, name: &str) -> Option<Value>;

    fn variables(&self) -> Vec<(String, ValueKind)> {
        Vec::new()
    }
}

/// Macros: named text values that stay fixed for the whole context.
pub trait ScopeResolver {
    fn macro_value(&self, name: &str) -> Option<String>;

    fn macro_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Process-level services: operator parameters and randomness.
pub trait ProcessResolver {
    fn parameter(&self, operator: &str, parameter: &str) -> Option<String>;

    /// Next random number in `[0, 1)`. A seed selects a reproducible sequence.
    fn random(&self, seed: Option<i64>) -> f64;
}

/// The set of resolvers a formula is resolved and evaluated against.
#[derive(Clone, Copy, Default)]
pub struct Context<'a> {
    functions: Option<&'a dyn FunctionResolver>,
    constants: Option<&'a dyn ConstantResolver>,
    variables: Option<&'a dyn VariableResolver>,
    scope: Option<&'a dyn ScopeResolver>,
    process: Option<&'a dyn ProcessResolver>,
    options: EngineOptions,
    nesting: usize,
}

/// Returned by [`Context::nested`] when formulas nest deeper than allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestingTooDeep {
    pub max_nesting: usize,
}

impl<'a> Context<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_functions(mut self, functions: &'a dyn FunctionResolver) -> Self {
        self.functions = Some(functions);
        self
    }

    pub fn with_constants(mut self, constants: &'a dyn ConstantResolver) -> Self {
        self.constants = Some(constants);
        self
    }

    pub fn with_variables(mut self, variables: &'a dyn VariableResolver) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_scope(mut self, scope: &'a dyn ScopeResolver) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_process(mut self, process: &'a dyn ProcessResolver) -> Self {
        self.process = Some(process);
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Rebinds the context to another row.
    pub fn bind(&mut self, variables: &'a dyn VariableResolver) {
        self.variables = Some(variables);
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn compilation_options(&self) -> &CompilationOptions {
        &self.options.compilation
    }

    pub fn execution_options(&self) -> &ExecutionOptions {
        &self.options.execution
    }

    /// How many `eval` levels deep this context is.
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// The context for a formula evaluated one `eval` level deeper.
    pub fn nested(&self) -> Result<Context<'a>, NestingTooDeep> {
        let max_nesting = self.options.execution.max_nesting;
        if self.nesting >= max_nesting {
            return Err(NestingTooDeep { max_nesting });
        }
        Ok(Context {
            nesting: self.nesting + 1,
            ..*self
        })
    }

    pub fn function(&self, name: &str) -> Option<Arc<FunctionDescriptor>> {
        let found = self.functions?.resolve_function(name);
        tracing::trace!(name, found = found.is_some(), "resolve function");
        found
    }

    pub fn constant(&self, name: &str) -> Option<Value> {
        self.constants?.constant(name)
    }

    pub fn variable_kind(&self, name: &str) -> Option<ValueKind> {
        self.variables?.kind_of(name)
    }

    pub fn variable_value(&self, name: &str) -> Option<Value> {
        self.variables?.value_of(name)
    }

    pub fn macro_value(&self, name: &str) -> Option<String> {
        self.scope?.macro_value(name)
    }

    pub fn parameter(&self, operator: &str, parameter: &str) -> Option<String> {
        self.process?.parameter(operator, parameter)
    }

    /// Next random number, from the process resolver when there is one.
    pub fn random(&self, seed: Option<i64>) -> f64 {
        match self.process {
            Some(process) => process.random(seed),
            None => ProcessScope::fresh_random(seed),
        }
    }

    /// All functions visible through this context, sorted by name.
    pub fn list_functions(&self) -> Vec<Arc<FunctionDescriptor>> {
        let mut functions = self.functions.map(|f| f.functions()).unwrap_or_default();
        functions.sort_by(|a, b| a.name.cmp(&b.name));
        functions
    }

    /// All named constants visible through this context, sorted.
    pub fn list_constants(&self) -> Vec<String> {
        let mut names = self.constants.map(|c| c.constant_names()).unwrap_or_default();
        names.sort();
        names
    }

    /// All variables of the bound row, sorted by name.
    pub fn list_variables(&self) -> Vec<(String, ValueKind)> {
        let mut variables = self.variables.map(|v| v.variables()).unwrap_or_default();
        variables.sort();
        variables
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("functions", &self.functions.is_some())
            .field("constants", &self.constants.is_some())
            .field("variables", &self.variables.is_some())
            .field("scope", &self.scope.is_some())
            .field("process", &self.process.is_some())
            .field("options", &self.options)
            .field("nesting", &self.nesting)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_context_finds_nothing() {
        let context = Context::new();
        assert!(context.function("sqrt").is_none());
        assert!(context.constant("pi").is_none());
        assert!(context.variable_kind("a").is_none());
        assert!(context.macro_value("m").is_none());
        assert!(context.parameter("op", "p").is_none());
        assert!(context.list_functions().is_empty());
    }

    #[test]
    fn test_bind_swaps_rows() {
        let first = Bindings::new().with("a", Value::integer(1.0));
        let second = Bindings::new().with("a", Value::integer(2.0));
        let mut context = Context::new().with_variables(&first);
        assert_eq!(context.variable_value("a"), Some(Value::integer(1.0)));
        context.bind(&second);
        assert_eq!(context.variable_value("a"), Some(Value::integer(2.0)));
    }

    #[test]
    fn test_nesting_limit() {
        let mut options = EngineOptions::default();
        options.execution.max_nesting = 2;
        let context = Context::new().with_options(options);
        let once = context.nested().unwrap();
        let twice = once.nested().unwrap();
        assert_eq!(twice.nesting(), 2);
        assert_eq!(twice.nested().unwrap_err(), NestingTooDeep { max_nesting: 2 });
    }

    #[test]
    fn test_random_without_process_is_in_range() {
        let context = Context::new();
        for _ in 0..100 {
            let value = context.random(None);
            assert!((0.0..1.0).contains(&value));
        }
    }
}
