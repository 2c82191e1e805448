use std::sync::Arc;

use crate::context::Context;
use crate::evaluator::{self, EvaluationError};
use crate::functions::FunctionDescriptor;
use crate::parser::{BinaryOp, BoolOp, ComparisonOp, Span, UnaryOp};
use crate::types::ValueKind;
use crate::values::Value;

/// A resolved formula: every node carries its final kind and functions are bound to
/// their descriptors. Immutable once built; evaluate it against as many contexts as
/// needed, from as many threads as needed.
#[derive(Debug, Clone)]
pub struct TypedExpr {
    pub source: String,
    pub expr: Expr,
}

static_assertions::assert_impl_all!(TypedExpr: Send, Sync);

impl TypedExpr {
    /// Kind of every value this formula evaluates to.
    pub fn kind(&self) -> ValueKind {
        self.expr.kind
    }

    /// Whether resolution folded the whole formula into a single value.
    pub fn as_constant(&self) -> Option<&Value> {
        match &self.expr.inner {
            ExprInner::Constant(value) => Some(value),
            _ => None,
        }
    }

    pub fn evaluate(&self, context: &Context<'_>) -> Result<Value, EvaluationError> {
        evaluator::eval(self, context)
    }
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ValueKind,
    pub span: Span,
    pub inner: ExprInner,
}

impl Expr {
    pub fn new(kind: ValueKind, span: Span, inner: ExprInner) -> Self {
        Self { kind, span, inner }
    }

    pub fn constant(value: Value, span: Span) -> Self {
        Self::new(value.kind(), span, ExprInner::Constant(value))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.inner, ExprInner::Constant(_))
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match &self.inner {
            ExprInner::Constant(value) => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.inner == other.inner
    }
}

#[derive(Debug, Clone)]
pub enum ExprInner {
    Constant(Value),
    /// Dynamic variable of the bound row.
    Attribute(String),
    /// Scope macro, always a `STRING`.
    Macro(String),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Comparison {
        op: ComparisonOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Call {
        function: Arc<FunctionDescriptor>,
        args: Vec<Expr>,
    },
}

impl PartialEq for ExprInner {
    fn eq(&self, other: &Self) -> bool {
        use ExprInner::*;
        match (self, other) {
            (Constant(a), Constant(b)) => a == b,
            (Attribute(a), Attribute(b)) | (Macro(a), Macro(b)) => a == b,
            (Unary { op: o1, expr: e1 }, Unary { op: o2, expr: e2 }) => o1 == o2 && e1 == e2,
            (
                Binary { op: o1, left: l1, right: r1 },
                Binary { op: o2, left: l2, right: r2 },
            ) => o1 == o2 && l1 == l2 && r1 == r2,
            (
                Comparison { op: o1, left: l1, right: r1 },
                Comparison { op: o2, left: l2, right: r2 },
            ) => o1 == o2 && l1 == l2 && r1 == r2,
            (
                Logical { op: o1, left: l1, right: r1 },
                Logical { op: o2, left: l2, right: r2 },
            ) => o1 == o2 && l1 == l2 && r1 == r2,
            (
                If { cond: c1, then_branch: t1, else_branch: e1 },
                If { cond: c2, then_branch: t2, else_branch: e2 },
            ) => c1 == c2 && t1 == t2 && e1 == e2,
            // Descriptors are compared by identity.
            (Call { function: f1, args: a1 }, Call { function: f2, args: a2 }) => {
                Arc::ptr_eq(f1, f2) && a1 == a2
            }
            _ => false,
        }
    }
}
