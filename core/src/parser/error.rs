use crate::api::{Diagnostic, Severity};
use crate::parser::{Rule, Span};

/// Syntax error with the offending location.
#[derive(Debug, Clone)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub source: String,
    pub span: Span,
}

/// Specific kinds of syntax errors
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    /// Unexpected token
    UnexpectedToken { expected: String, found: String },
    /// Invalid number literal
    InvalidNumber { text: String },
    /// Invalid string literal (bad escape sequence)
    InvalidString { message: String },
    /// Maximum nesting depth exceeded
    MaxDepthExceeded { max_depth: usize },
    /// Other syntax errors
    Other { message: String },
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, source: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            source: source.into(),
            span,
        }
    }

    /// The part of the source the error points at.
    pub fn fragment(&self) -> &str {
        self.span.str_of(&self.source)
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (message, code, help) = match &self.kind {
            SyntaxErrorKind::UnexpectedToken { expected, found } => (
                format!("Expected {}, found {}", expected, found),
                "P001",
                None,
            ),
            SyntaxErrorKind::InvalidNumber { text } => (
                format!("Invalid number literal '{}'", text),
                "P002",
                Some("Check the number format".to_string()),
            ),
            SyntaxErrorKind::InvalidString { message } => (
                format!("Invalid string literal: {}", message),
                "P003",
                Some(r#"Supported escapes are \", \\, \n, \r, \t and \uXXXX"#.to_string()),
            ),
            SyntaxErrorKind::MaxDepthExceeded { max_depth } => (
                format!(
                    "Expression nesting depth exceeds maximum of {} levels",
                    max_depth
                ),
                "P004",
                Some("Reduce nesting or simplify the expression".to_string()),
            ),
            SyntaxErrorKind::Other { message } => (message.clone(), "P999", None),
        };

        Diagnostic {
            severity: Severity::Error,
            message,
            span: self.span.clone(),
            related: Vec::new(),
            help,
            code: Some(code.to_string()),
        }
    }
}

impl core::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(f, "{}: {}", diagnostic.severity, diagnostic.message)?;
        if let Some(ref code) = diagnostic.code {
            write!(f, " [{}]", code)?;
        }
        if !self.fragment().is_empty() {
            write!(f, " near '{}'", self.fragment())?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// Convert Pest error to human-readable SyntaxError
pub fn convert_pest_error(err: pest::error::Error<Rule>, source: &str) -> SyntaxError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => {
            // Point at the offending character rather than an empty range.
            let end = source[pos..]
                .chars()
                .next()
                .map(|c| pos + c.len_utf8())
                .unwrap_or(pos);
            Span(pos..end)
        }
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => SyntaxErrorKind::UnexpectedToken {
            expected: format_expected_rules(&positives),
            found: format_found(&negatives, span.str_of(source)),
        },
        ErrorVariant::CustomError { message } => SyntaxErrorKind::Other { message },
    };

    SyntaxError::new(kind, source, span)
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "something else".to_string();
    }

    // Group related rules into higher-level concepts
    let mut concepts = Vec::new();
    for rule in rules {
        let concept = match rule {
            Rule::integer | Rule::float | Rule::string => "literal",
            Rule::ident | Rule::call => "identifier",
            Rule::attribute => "attribute",
            Rule::macro_ref => "macro",
            Rule::EOI => "end of input",
            Rule::or
            | Rule::and
            | Rule::eq
            | Rule::neq
            | Rule::le
            | Rule::lt
            | Rule::ge
            | Rule::gt
            | Rule::add
            | Rule::sub
            | Rule::mul
            | Rule::div
            | Rule::modulo
            | Rule::pow => "operator",
            _ => "expression",
        };
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        None => "something else".to_string(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

fn format_found(rules: &[Rule], fragment: &str) -> String {
    if let Some(rule) = rules.first() {
        return format!("{:?}", rule);
    }
    if fragment.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{}'", fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_syntax_error_to_diagnostic() {
        let error = SyntaxError::new(
            SyntaxErrorKind::UnexpectedToken {
                expected: "expression".to_string(),
                found: "','".to_string(),
            },
            "1 + ,",
            Span(4..5),
        );

        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.severity, Severity::Error);
        assert!(diagnostic.message.contains("Expected expression"));
        assert_eq!(diagnostic.code, Some("P001".to_string()));
        assert_eq!(error.fragment(), ",");
    }

    #[test]
    fn test_format_expected_rules() {
        let rules = vec![Rule::integer, Rule::float];
        assert_eq!(format_expected_rules(&rules), "literal");

        let rules = vec![Rule::add, Rule::EOI];
        assert_eq!(format_expected_rules(&rules), "operator or end of input");
    }
}
