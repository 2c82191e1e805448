//! Public error types for the formula API.
//!
//! Every stage of the pipeline has its own error type. They meet here in [`Error`], and
//! each can be lowered to a [`Diagnostic`] for rendering.

use core::fmt;

use crate::analyzer::TypeError;
use crate::evaluator::EvaluationError;
use crate::parser::{Span, SyntaxError};

/// Public error type for all formula operations.
#[derive(Debug, Clone)]
pub enum Error {
    /// Malformed formula text.
    Syntax(SyntaxError),

    /// Kind mismatch, unknown name or bad arity found before any data was seen.
    Type(TypeError),

    /// Runtime-only failure while evaluating against a context.
    Evaluation(EvaluationError),
}

impl Error {
    /// Convert to a Diagnostic for rendering.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Syntax(err) => err.to_diagnostic(),
            Error::Type(err) => err.to_diagnostic(),
            Error::Evaluation(err) => err.to_diagnostic(),
        }
    }

    /// The formula text the diagnostic's span refers to, when known.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            Error::Syntax(err) => Some(&err.source),
            Error::Type(err) => Some(&err.source),
            Error::Evaluation(err) => err.source.as_deref(),
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Error::Type(_))
    }

    pub fn is_evaluation(&self) -> bool {
        matches!(self, Error::Evaluation(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Syntax(err) => write!(f, "Syntax error: {}", err),
            Error::Type(err) => write!(f, "Type error: {}", err),
            Error::Evaluation(err) => write!(f, "Evaluation error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Syntax(err) => Some(err),
            Error::Type(err) => Some(err),
            Error::Evaluation(err) => Some(err),
        }
    }
}

/// A diagnostic message (error, warning, or info) with source location.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level (error, warning, info).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Related locations that provide additional context.
    pub related: Vec<RelatedInfo>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Optional error code (e.g., "E001") for documentation lookup.
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - the formula cannot be evaluated.
    Error,
    /// Warning - suspicious code that might be wrong.
    Warning,
    /// Info - informational message.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Related information for a diagnostic (e.g., "declared here").
#[derive(Debug, Clone)]
pub struct RelatedInfo {
    /// Source location of the related information.
    pub span: Span,

    /// Message explaining the relevance.
    pub message: String,
}

// ============================================================================
// Conversion from stage errors
// ============================================================================

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Error::Syntax(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

impl From<EvaluationError> for Error {
    fn from(err: EvaluationError) -> Self {
        Error::Evaluation(err)
    }
}
