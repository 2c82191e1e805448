//! Runtime evaluation errors.
//!
//! Kind mismatches, unknown functions and arity problems are caught by the analyzer, so
//! what is left here depends on the bound row: names that only exist at run time, function
//! bodies that reject their arguments, and the resource limits on recursion.
//!
//! Missing values are never errors. They propagate through the tree as values.

use core::fmt;

use thiserror::Error;

use crate::api::{self, Diagnostic, Severity};
use crate::functions::FunctionError;
use crate::parser::Span;
use crate::types::ValueKind;

/// Runtime evaluation error, located in the formula when the failing node is known.
#[derive(Debug, Clone)]
pub struct EvaluationError {
    pub kind: EvaluationErrorKind,
    pub span: Option<Span>,
    /// Text of the formula being evaluated.
    pub source: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum EvaluationErrorKind {
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("unknown macro '{0}'")]
    UnknownMacro(String),

    #[error("unknown parameter '{parameter}' of operator '{operator}'")]
    UnknownParameter { operator: String, parameter: String },

    /// A value could not be converted to the kind the formula expects.
    #[error("cannot convert a {found} value to {expected}")]
    KindMismatch {
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },

    #[error("nested formulas exceed the maximum depth of {max_nesting}")]
    NestingTooDeep { max_nesting: usize },

    /// A formula evaluated through `eval` failed.
    #[error("nested formula '{formula}' failed: {error}")]
    Nested {
        formula: String,
        error: Box<api::Error>,
    },

    /// A function body rejected its arguments.
    #[error("{function}: {error}")]
    Function {
        function: String,
        error: FunctionError,
    },
}

impl EvaluationError {
    pub fn new(kind: EvaluationErrorKind) -> Self {
        Self {
            kind,
            span: None,
            source: None,
        }
    }

    pub fn at(kind: EvaluationErrorKind, span: Span) -> Self {
        Self {
            kind,
            span: Some(span),
            source: None,
        }
    }

    /// Wraps the failure of a function body, lifting the failures that are not specific
    /// to one function into their own kinds.
    pub fn from_function(function: &str, error: FunctionError) -> Self {
        let kind = match error {
            FunctionError::Nested { formula, error } => {
                EvaluationErrorKind::Nested { formula, error }
            }
            FunctionError::NestingTooDeep { max_nesting } => {
                EvaluationErrorKind::NestingTooDeep { max_nesting }
            }
            FunctionError::KindMismatch { expected, found } => {
                EvaluationErrorKind::KindMismatch { expected, found }
            }
            FunctionError::UnknownAttribute(name) => EvaluationErrorKind::UnknownAttribute(name),
            FunctionError::UnknownMacro(name) => EvaluationErrorKind::UnknownMacro(name),
            FunctionError::UnknownParameter {
                operator,
                parameter,
            } => EvaluationErrorKind::UnknownParameter {
                operator,
                parameter,
            },
            error => EvaluationErrorKind::Function {
                function: function.to_string(),
                error,
            },
        };
        Self::new(kind)
    }

    /// Attaches a span unless the error already carries a more precise one.
    pub fn with_span(mut self, span: &Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span.clone());
        }
        self
    }

    /// Attaches the formula text unless one is already set.
    pub fn with_source(mut self, source: &str) -> Self {
        if self.source.is_none() {
            self.source = Some(source.to_string());
        }
        self
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            EvaluationErrorKind::UnknownAttribute(_) => (
                "R001",
                Some("The attribute is not part of the row being evaluated".to_string()),
            ),
            EvaluationErrorKind::UnknownMacro(_) => (
                "R002",
                Some("Define the macro or pass a default: macro(name, default)".to_string()),
            ),
            EvaluationErrorKind::UnknownParameter { .. } => ("R003", None),
            EvaluationErrorKind::KindMismatch { .. } => (
                "R004",
                Some("Pass a kind name the value can be converted to".to_string()),
            ),
            EvaluationErrorKind::DepthExceeded { .. } => (
                "R005",
                Some("Simplify the formula or raise ExecutionOptions::max_depth".to_string()),
            ),
            EvaluationErrorKind::NestingTooDeep { .. } => (
                "R006",
                Some("A formula evaluated through eval probably refers to itself".to_string()),
            ),
            EvaluationErrorKind::Nested { .. } => ("R007", None),
            EvaluationErrorKind::Function { .. } => ("R008", None),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone().unwrap_or(Span::new(0, 0)),
            related: Vec::new(),
            help,
            code: Some(code.to_string()),
        }
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let (Some(span), Some(source)) = (&self.span, &self.source) {
            let fragment = span.str_of(source);
            if !fragment.is_empty() {
                write!(f, " in '{}'", fragment)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for EvaluationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            EvaluationErrorKind::Nested { error, .. } => Some(error.as_ref()),
            EvaluationErrorKind::Function { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<EvaluationErrorKind> for EvaluationError {
    fn from(kind: EvaluationErrorKind) -> Self {
        Self::new(kind)
    }
}
