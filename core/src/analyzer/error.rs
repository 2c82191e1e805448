use crate::api::{Diagnostic, Severity};
use crate::parser::Span;
use crate::types::ValueKind;

/// Type error with the offending node's location.
#[derive(Debug, Clone)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub source: String,
}

impl core::fmt::Display for TypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(f, "{}: {}", diagnostic.severity, diagnostic.message)?;

        if let Some(ref code) = diagnostic.code {
            write!(f, " [{}]", code)?;
        }

        if let Some(ref help) = diagnostic.help {
            write!(f, "\nhelp: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for TypeError {}

/// Specific kinds of type errors
#[derive(Debug, Clone, PartialEq)]
pub enum TypeErrorKind {
    /// Binary operator applied to kinds it does not accept
    OperatorMismatch {
        operator: String,
        left: ValueKind,
        right: ValueKind,
        span: Span,
    },
    /// Unary operator applied to a kind it does not accept
    UnaryMismatch {
        operator: String,
        operand: ValueKind,
        span: Span,
    },
    /// Function argument of a kind the function does not accept
    ArgumentMismatch {
        function: String,
        position: usize,
        expected: String,
        found: ValueKind,
        span: Span,
    },
    /// Wrong number of arguments
    ArityMismatch {
        function: String,
        expected: String,
        found: usize,
        span: Span,
    },
    /// No function with this name
    UnknownFunction { name: String, span: Span },
    /// Bare name that is neither a constant nor an attribute
    UnknownIdentifier { name: String, span: Span },
    /// Bracketed attribute the row does not declare
    UnknownAttribute { name: String, span: Span },
    /// Condition of `if` that is neither numeric nor boolean
    ConditionMismatch { found: ValueKind, span: Span },
    /// A function could not determine its result kind
    UnresolvableKind {
        function: String,
        message: String,
        span: Span,
    },
}

impl TypeErrorKind {
    /// Get the span of the error
    pub fn span(&self) -> Span {
        match self {
            TypeErrorKind::OperatorMismatch { span, .. } => span.clone(),
            TypeErrorKind::UnaryMismatch { span, .. } => span.clone(),
            TypeErrorKind::ArgumentMismatch { span, .. } => span.clone(),
            TypeErrorKind::ArityMismatch { span, .. } => span.clone(),
            TypeErrorKind::UnknownFunction { span, .. } => span.clone(),
            TypeErrorKind::UnknownIdentifier { span, .. } => span.clone(),
            TypeErrorKind::UnknownAttribute { span, .. } => span.clone(),
            TypeErrorKind::ConditionMismatch { span, .. } => span.clone(),
            TypeErrorKind::UnresolvableKind { span, .. } => span.clone(),
        }
    }
}

impl TypeError {
    pub fn new(kind: TypeErrorKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    /// The part of the source the error points at.
    pub fn fragment(&self) -> &str {
        self.kind.span().str_of(&self.source)
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (message, code, help) = match &self.kind {
            TypeErrorKind::OperatorMismatch {
                operator,
                left,
                right,
                ..
            } => (
                format!(
                    "Operator '{}' cannot be applied to {} and {}",
                    operator, left, right
                ),
                "E001",
                Some(operator_help(operator)),
            ),
            TypeErrorKind::UnaryMismatch {
                operator, operand, ..
            } => (
                format!("Operator '{}' cannot be applied to {}", operator, operand),
                "E002",
                None,
            ),
            TypeErrorKind::ArgumentMismatch {
                function,
                position,
                expected,
                found,
                ..
            } => (
                format!(
                    "Argument {} of '{}' must be {}, found {}",
                    position + 1,
                    function,
                    expected,
                    found
                ),
                "E003",
                None,
            ),
            TypeErrorKind::ArityMismatch {
                function,
                expected,
                found,
                ..
            } => (
                format!(
                    "Function '{}' takes {}, found {}",
                    function, expected, found
                ),
                "E004",
                Some("Check the number of arguments in the function call"),
            ),
            TypeErrorKind::UnknownFunction { name, .. } => (
                format!("Unknown function '{}'", name),
                "E005",
                Some("Check the function name for typos"),
            ),
            TypeErrorKind::UnknownIdentifier { name, .. } => (
                format!("Unknown constant or attribute '{}'", name),
                "E006",
                Some("Attribute names that are not identifiers can be written as [name]"),
            ),
            TypeErrorKind::UnknownAttribute { name, .. } => (
                format!("Unknown attribute '{}'", name),
                "E007",
                None,
            ),
            TypeErrorKind::ConditionMismatch { found, .. } => (
                format!("Condition must be numeric or BOOLEAN, found {}", found),
                "E008",
                None,
            ),
            TypeErrorKind::UnresolvableKind {
                function, message, ..
            } => (
                format!("Cannot determine the result of '{}': {}", function, message),
                "E009",
                None,
            ),
        };

        Diagnostic {
            severity: Severity::Error,
            message,
            span: self.kind.span(),
            related: Vec::new(),
            help: help.map(|s| s.to_string()),
            code: Some(code.to_string()),
        }
    }
}

fn operator_help(operator: &str) -> &'static str {
    match operator {
        "<" | "<=" | ">" | ">=" => "Only two numbers or two strings can be ordered",
        "&&" | "||" => "Logical operators take numbers or booleans",
        "+" => "'+' adds numbers or concatenates when either side is a string",
        _ => "Arithmetic operators take numbers",
    }
}
