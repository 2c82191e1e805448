//! The function catalog.
//!
//! Functions are described by a [`FunctionDescriptor`]: an arity, the kinds accepted at
//! each position, a rule computing the result kind, and a body that receives the already
//! evaluated arguments. A [`FunctionRegistry`] maps names to descriptors and is handed to
//! the analyzer and evaluator through a [`Context`]. There is no global catalog:
//! [`FunctionRegistry::standard`] builds a fresh registry with every built-in function,
//! and callers may register their own functions next to them.

mod arithmetic;
mod bitwise;
mod conversion;
mod date;
mod indirection;
mod logical;
mod math;
mod process;
mod rounding;
mod statistics;
mod strings;
mod transform;
mod trig;


use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use thiserror::Error;

use crate::api;
use crate::context::{Context, FunctionResolver};
use crate::types::{KindSet, ValueKind, promote};
use crate::values::Value;

pub use date::DateUnit;
pub(crate) use strings::compare_strings;

/// Catalog section a function is listed under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Arithmetic,
    Comparison,
    Logical,
    Bitwise,
    Conversion,
    Date,
    Mathematical,
    Rounding,
    Statistical,
    StringInformation,
    StringTransformation,
    Trigonometric,
    Process,
    Indirection,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Arithmetic => "arithmetic",
            Category::Comparison => "comparison",
            Category::Logical => "logical",
            Category::Bitwise => "bitwise",
            Category::Conversion => "conversion",
            Category::Date => "date",
            Category::Mathematical => "mathematical",
            Category::Rounding => "rounding",
            Category::Statistical => "statistical",
            Category::StringInformation => "string information",
            Category::StringTransformation => "string transformation",
            Category::Trigonometric => "trigonometric",
            Category::Process => "process",
            Category::Indirection => "indirection",
        })
    }
}

/// Number of arguments a function accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    /// Inclusive range.
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Range(min, max) => (min..=max).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(1) => write!(f, "exactly 1 argument"),
            Arity::Exact(n) => write!(f, "exactly {} arguments", n),
            Arity::AtLeast(1) => write!(f, "at least 1 argument"),
            Arity::AtLeast(n) => write!(f, "at least {} arguments", n),
            Arity::Range(min, max) => write!(f, "{} to {} arguments", min, max),
        }
    }
}

/// Argument count and accepted kinds.
#[derive(Debug, Clone)]
pub struct Signature {
    pub arity: Arity,
    /// Accepted kinds of the leading positional parameters.
    pub params: Vec<KindSet>,
    /// Accepted kinds of every argument past `params`.
    pub rest: Option<KindSet>,
}

impl Signature {
    /// Kinds accepted at argument position `index`.
    pub fn accepted_at(&self, index: usize) -> KindSet {
        self.params
            .get(index)
            .copied()
            .or(self.rest)
            .unwrap_or(KindSet::ANY)
    }
}

/// What the analyzer knows about one argument of a call.
#[derive(Debug, Clone)]
pub struct ArgInfo {
    pub kind: ValueKind,
    /// The argument's value when it is a compile-time constant.
    pub constant: Option<Value>,
}

/// Input of a custom result-kind rule.
pub struct KindRequest<'r, 'a> {
    pub args: &'r [ArgInfo],
    pub context: &'r Context<'a>,
}

impl KindRequest<'_, '_> {
    /// The constant text of argument `index`, if it is a constant `STRING`.
    pub fn constant_str(&self, index: usize) -> Option<&str> {
        self.args.get(index)?.constant.as_ref()?.as_str()
    }
}

pub type KindRule = dyn Fn(&KindRequest<'_, '_>) -> Result<ValueKind, String> + Send + Sync;

/// How the result kind of a call is computed from its arguments.
#[derive(Clone)]
pub enum ResultKind {
    Fixed(ValueKind),
    /// `INTEGER` when every argument is `INTEGER`, `DOUBLE` otherwise.
    Promoted,
    /// One kind for a single argument and another for more.
    ByArity { one: ValueKind, more: ValueKind },
    Custom(Arc<KindRule>),
}

impl ResultKind {
    pub fn custom(
        rule: impl Fn(&KindRequest<'_, '_>) -> Result<ValueKind, String> + Send + Sync + 'static,
    ) -> Self {
        ResultKind::Custom(Arc::new(rule))
    }

    pub fn resolve(&self, request: &KindRequest<'_, '_>) -> Result<ValueKind, String> {
        match self {
            ResultKind::Fixed(kind) => Ok(*kind),
            ResultKind::Promoted => Ok(promote(request.args.iter().map(|arg| arg.kind))),
            ResultKind::ByArity { one, more } => Ok(if request.args.len() <= 1 {
                *one
            } else {
                *more
            }),
            ResultKind::Custom(rule) => rule(request),
        }
    }
}

impl fmt::Debug for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::Fixed(kind) => write!(f, "Fixed({:?})", kind),
            ResultKind::Promoted => write!(f, "Promoted"),
            ResultKind::ByArity { one, more } => write!(f, "ByArity({:?}, {:?})", one, more),
            ResultKind::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

/// What a function body can see besides its arguments.
pub struct CallContext<'c, 'a> {
    pub name: &'c str,
    pub context: &'c Context<'a>,
    /// The kind the analyzer assigned to this call.
    pub result_kind: ValueKind,
}

impl CallContext<'_, '_> {
    /// Parses, resolves and evaluates `text` one nesting level deeper.
    pub fn evaluate_formula(&self, text: &str) -> Result<Value, FunctionError> {
        let nested = self
            .context
            .nested()
            .map_err(|err| FunctionError::NestingTooDeep {
                max_nesting: err.max_nesting,
            })?;
        tracing::debug!(formula = text, nesting = nested.nesting(), "evaluate nested formula");
        api::evaluate(text, &nested).map_err(|error| FunctionError::Nested {
            formula: text.to_string(),
            error: Box::new(error),
        })
    }

    /// Converts `value` to the call's result kind.
    pub fn coerce(&self, value: Value) -> Result<Value, FunctionError> {
        let found = value.kind();
        value
            .coerce(self.result_kind)
            .ok_or(FunctionError::KindMismatch {
                expected: self.result_kind,
                found,
            })
    }
}

pub type FunctionBody =
    dyn Fn(&CallContext<'_, '_>, &[Value]) -> Result<Value, FunctionError> + Send + Sync;

/// Runtime failures raised by function bodies.
#[derive(Debug, Clone, Error)]
pub enum FunctionError {
    #[error("invalid regular expression '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
    #[error("index {index} is out of range for a string of length {length}")]
    IndexOutOfRange { index: f64, length: usize },
    #[error("bitwise operations need whole numbers, got {value}")]
    NonIntegral { value: f64 },
    #[error("unknown date unit '{0}'")]
    InvalidDateUnit(String),
    #[error("invalid date pattern '{0}'")]
    InvalidPattern(String),
    #[error("unknown locale '{0}'")]
    InvalidLocale(String),
    #[error("unknown time zone '{0}'")]
    InvalidTimeZone(String),
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
    #[error("unknown macro '{0}'")]
    UnknownMacro(String),
    #[error("unknown parameter '{parameter}' of operator '{operator}'")]
    UnknownParameter { operator: String, parameter: String },
    #[error("cannot convert a {found} value to {expected}")]
    KindMismatch {
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("nested formulas exceed the maximum depth of {max_nesting}")]
    NestingTooDeep { max_nesting: usize },
    #[error("nested formula '{formula}' failed: {error}")]
    Nested {
        formula: String,
        error: Box<api::Error>,
    },
    #[error("{0}")]
    InvalidArgument(String),
}

/// A function that can be called from formulas.
pub struct FunctionDescriptor {
    pub name: String,
    pub category: Category,
    pub description: String,
    pub signature: Signature,
    pub result: ResultKind,
    body: Arc<FunctionBody>,
}

impl FunctionDescriptor {
    /// Starts describing a function. Finish with [`DescriptorBuilder::body`].
    pub fn builder(name: impl Into<String>, category: Category) -> DescriptorBuilder {
        DescriptorBuilder {
            name: name.into(),
            category,
            description: String::new(),
            arity: None,
            params: Vec::new(),
            rest: None,
            result: ResultKind::Fixed(ValueKind::Double),
        }
    }

    pub fn call(&self, call: &CallContext<'_, '_>, args: &[Value]) -> Result<Value, FunctionError> {
        (self.body)(call, args)
    }

    /// Human readable signature, e.g. `round(numeric, numeric)`.
    pub fn synopsis(&self) -> String {
        let mut parts: Vec<String> = self.signature.params.iter().map(|k| k.to_string()).collect();
        if let Some(rest) = self.signature.rest {
            parts.push(format!("{}...", rest));
        }
        format!("{}({})", self.name, parts.join(", "))
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("signature", &self.signature)
            .field("result", &self.result)
            .finish()
    }
}

pub struct DescriptorBuilder {
    name: String,
    category: Category,
    description: String,
    arity: Option<Arity>,
    params: Vec<KindSet>,
    rest: Option<KindSet>,
    result: ResultKind,
}

impl DescriptorBuilder {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Accepted kinds of the positional parameters. Unless [`DescriptorBuilder::arity`]
    /// says otherwise, they are all required.
    pub fn params(mut self, params: impl IntoIterator<Item = KindSet>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Accepted kinds of any number of trailing arguments.
    pub fn rest(mut self, kinds: KindSet) -> Self {
        self.rest = Some(kinds);
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    pub fn returns(mut self, kind: ValueKind) -> Self {
        self.result = ResultKind::Fixed(kind);
        self
    }

    pub fn result(mut self, result: ResultKind) -> Self {
        self.result = result;
        self
    }

    pub fn body(
        self,
        body: impl Fn(&CallContext<'_, '_>, &[Value]) -> Result<Value, FunctionError>
        + Send
        + Sync
        + 'static,
    ) -> FunctionDescriptor {
        let arity = self.arity.unwrap_or(match self.rest {
            Some(_) => Arity::AtLeast(self.params.len()),
            None => Arity::Exact(self.params.len()),
        });
        FunctionDescriptor {
            name: self.name,
            category: self.category,
            description: self.description,
            signature: Signature {
                arity,
                params: self.params,
                rest: self.rest,
            },
            result: self.result,
            body: Arc::new(body),
        }
    }
}

/// Name → descriptor map.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<FunctionDescriptor>>,
}

impl FunctionRegistry {
    /// A registry without any functions.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the whole built-in catalog.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        arithmetic::register(&mut registry);
        logical::register(&mut registry);
        bitwise::register(&mut registry);
        conversion::register(&mut registry);
        date::register(&mut registry);
        math::register(&mut registry);
        rounding::register(&mut registry);
        statistics::register(&mut registry);
        strings::register(&mut registry);
        transform::register(&mut registry);
        trig::register(&mut registry);
        process::register(&mut registry);
        indirection::register(&mut registry);
        tracing::debug!(count = registry.len(), "standard function registry built");
        registry
    }

    /// Adds a function, replacing any function of the same name.
    pub fn register(&mut self, descriptor: FunctionDescriptor) {
        self.functions
            .insert(descriptor.name.clone(), Arc::new(descriptor));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<FunctionDescriptor>> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FunctionResolver for FunctionRegistry {
    fn resolve_function(&self, name: &str) -> Option<Arc<FunctionDescriptor>> {
        self.functions.get(name).cloned()
    }

    fn functions(&self) -> Vec<Arc<FunctionDescriptor>> {
        self.functions.values().cloned().collect()
    }
}

// ============================================================================
// Helpers shared by the catalog
// ============================================================================

/// Numeric argument `index`, NaN when absent or not numeric.
pub(crate) fn number(args: &[Value], index: usize) -> f64 {
    args.get(index).map(Value::to_number).unwrap_or(f64::NAN)
}

/// String argument `index`, `None` when absent or missing.
pub(crate) fn text(args: &[Value], index: usize) -> Option<&str> {
    args.get(index).and_then(Value::as_str)
}

/// Registers a one-argument numeric function returning `DOUBLE`.
pub(crate) fn unary_double(
    registry: &mut FunctionRegistry,
    name: &str,
    category: Category,
    description: &str,
    f: fn(f64) -> f64,
) {
    registry.register(
        FunctionDescriptor::builder(name, category)
            .describe(description)
            .params([KindSet::NUMERIC])
            .returns(ValueKind::Double)
            .body(move |_, args| Ok(Value::double(f(number(args, 0))))),
    );
}
