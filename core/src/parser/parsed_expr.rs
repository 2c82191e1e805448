use crate::parser::{BinaryOp, BoolOp, ComparisonOp, Span, UnaryOp};
use serde::Serialize;

/// A parsed formula: the source text and the root of its syntax tree.
#[derive(Debug)]
pub struct ParsedExpr {
    pub source: String,
    pub expr: Node,
}

/// A syntax tree node with the source span it was parsed from.
///
/// Equality ignores spans, so trees that differ only in grouping or whitespace compare
/// equal.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub expr: Expr,
    pub span: Span,
}

impl Node {
    pub fn new(expr: Expr, span: Span) -> Self {
        Self { expr, span }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Boolean {
        op: BoolOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Comparison {
        op: ComparisonOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Node>,
    },
    Call {
        name: String,
        args: Vec<Node>,
    },
    /// Bracketed attribute reference: `[name]`.
    Attribute(String),
    /// Macro reference: `%{name}`.
    Macro(String),
    /// Bare identifier: a named constant or an attribute.
    Ident(String),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Int(f64),
    Float(f64),
    Str(String),
}
