//! The formula engine.

use super::{CompiledFormula, EngineOptions, Error, compile};
use crate::context::{ConstantTable, Context, Macros, ProcessScope, VariableResolver};
use crate::functions::{FunctionDescriptor, FunctionRegistry};

/// Owns everything a formula needs besides the row: the function catalog, named
/// constants, macros, process parameters and options.
///
/// # Example
///
/// ```ignore
/// use formula_core::api::{Engine, EngineOptions};
/// use formula_core::context::Bindings;
/// use formula_core::types::ValueKind;
///
/// let mut engine = Engine::new(EngineOptions::default());
/// engine.define_macro("threshold", "10");
///
/// let mut row = Bindings::new();
/// row.declare("count", ValueKind::Integer);
///
/// let formula = engine.compile("[count] > parse(%{threshold})", &row).unwrap();
/// assert_eq!(formula.kind(), ValueKind::Boolean);
/// ```
#[derive(Debug)]
pub struct Engine {
    functions: FunctionRegistry,
    constants: ConstantTable,
    macros: Macros,
    process: ProcessScope,
    options: EngineOptions,
}

impl Engine {
    /// An engine with the built-in functions and constants.
    pub fn new(options: EngineOptions) -> Self {
        Self::with_parts(
            FunctionRegistry::standard(),
            ConstantTable::standard(),
            ProcessScope::new(),
            options,
        )
    }

    /// An engine whose `rand()` draws are reproducible.
    pub fn seeded(seed: u64, options: EngineOptions) -> Self {
        Self::with_parts(
            FunctionRegistry::standard(),
            ConstantTable::standard(),
            ProcessScope::with_seed(seed),
            options,
        )
    }

    /// An engine built from explicit parts, e.g. a registry with only a few functions.
    pub fn with_parts(
        functions: FunctionRegistry,
        constants: ConstantTable,
        process: ProcessScope,
        options: EngineOptions,
    ) -> Self {
        Self {
            functions,
            constants,
            macros: Macros::new(),
            process,
            options,
        }
    }

    /// Adds a function next to the built-in ones, replacing any function of that name.
    pub fn register_function(&mut self, descriptor: FunctionDescriptor) {
        self.functions.register(descriptor);
    }

    pub fn define_macro(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.macros.insert(name, value);
    }

    pub fn set_parameter(
        &mut self,
        operator: impl Into<String>,
        parameter: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.process.set_parameter(operator, parameter, value);
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    /// Access the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// A context over the engine's resolvers, bound to `row`.
    pub fn context<'a>(&'a self, row: &'a dyn VariableResolver) -> Context<'a> {
        Context::new()
            .with_functions(&self.functions)
            .with_constants(&self.constants)
            .with_scope(&self.macros)
            .with_process(&self.process)
            .with_options(self.options)
            .with_variables(row)
    }

    /// Compile a formula against the attributes `row` declares.
    ///
    /// Only declared kinds are used; the compiled formula can then run against any row
    /// declaring the same attributes.
    pub fn compile(
        &self,
        source: &str,
        row: &dyn VariableResolver,
    ) -> Result<CompiledFormula<'_>, Error> {
        let typed = compile(source, &self.context(row))?;
        Ok(CompiledFormula::new(self, typed))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Bindings;
    use crate::types::ValueKind;
    use crate::values::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compile_once_run_many() {
        let engine = Engine::default();
        let mut row = Bindings::new();
        row.declare("x", ValueKind::Integer);

        let formula = engine.compile("[x] * 2 + 1", &row).unwrap();
        assert_eq!(formula.kind(), ValueKind::Integer);
        assert!(formula.run(&row).unwrap().is_missing());

        for x in 0..5 {
            row.set("x", Value::integer(x as f64)).unwrap();
            assert_eq!(formula.run(&row).unwrap(), Value::integer((x * 2 + 1) as f64));
        }
    }

    #[test]
    fn test_macros_and_parameters() {
        let mut engine = Engine::default();
        engine.define_macro("name", "world");
        engine.set_parameter("Read CSV", "file", "data.csv");
        let row = Bindings::new();

        let formula = engine
            .compile(r#""hello " + %{name} + " from " + param("Read CSV", "file")"#, &row)
            .unwrap();
        assert_eq!(
            formula.run(&row).unwrap(),
            Value::string("hello world from data.csv")
        );
    }

    #[test]
    fn test_seeded_engines_agree() {
        let row = Bindings::new();
        let a = Engine::seeded(7, EngineOptions::default());
        let b = Engine::seeded(7, EngineOptions::default());
        let fa = a.compile("rand()", &row).unwrap();
        let fb = b.compile("rand()", &row).unwrap();
        for _ in 0..3 {
            assert_eq!(fa.run(&row).unwrap(), fb.run(&row).unwrap());
        }
    }

    #[test]
    fn test_custom_function() {
        use crate::functions::Category;
        use crate::types::KindSet;

        let mut engine = Engine::default();
        engine.register_function(
            FunctionDescriptor::builder("twice", Category::Arithmetic)
                .params([KindSet::NUMERIC])
                .returns(ValueKind::Double)
                .body(|_, args| Ok(Value::double(args[0].to_number() * 2.0))),
        );
        let row = Bindings::new();
        let formula = engine.compile("twice(21)", &row).unwrap();
        assert_eq!(formula.run(&row).unwrap(), Value::double(42.0));
    }
}
