//! Configuration options for the formula engine.

use crate::parser::DEFAULT_MAX_DEPTH;

/// Configuration options for compilation.
///
/// # Example
///
/// ```
/// use formula_core::api::CompilationOptions;
///
/// let options = CompilationOptions { max_parse_depth: 64 };
/// assert!(options.max_parse_depth < CompilationOptions::default().max_parse_depth);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Maximum nesting of parentheses, and maximum height of the syntax tree, accepted
    /// by the parser. Long operator chains count one level per operator.
    ///
    /// Default: 256
    pub max_parse_depth: usize,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            max_parse_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Configuration options for formula evaluation.
///
/// These options control resource limits during evaluation.
///
/// # Example
///
/// ```
/// use formula_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions {
///     max_depth: 500,
///     max_nesting: 8,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Maximum evaluation depth of the expression tree.
    ///
    /// Default: 1000
    pub max_depth: usize,

    /// Maximum nesting of formulas evaluated through `eval`.
    ///
    /// Default: 32
    pub max_nesting: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            max_nesting: 32,
        }
    }
}

/// Configuration options for the formula engine.
///
/// # Example
///
/// ```
/// use formula_core::api::{CompilationOptions, EngineOptions, ExecutionOptions};
///
/// let options = EngineOptions {
///     compilation: CompilationOptions::default(),
///     execution: ExecutionOptions {
///         max_depth: 500,
///         max_nesting: 4,
///     },
/// };
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Options for compilation.
    pub compilation: CompilationOptions,

    /// Options for evaluation.
    pub execution: ExecutionOptions,
}
