//! Core evaluation logic.

use smallvec::SmallVec;

use crate::{
    analyzer::{Expr, ExprInner, TypedExpr},
    context::Context,
    evaluator::{
        EvaluationError, EvaluationErrorKind,
        operators::{arithmetic, compare, logical_and, logical_or, truth, unary},
    },
    functions::CallContext,
    parser::BoolOp,
    values::Value,
};

/// Evaluator for resolved expressions.
pub struct Evaluator<'c, 'a> {
    context: &'c Context<'a>,
    max_depth: usize,
    depth: usize,
}

impl<'c, 'a> Evaluator<'c, 'a> {
    pub fn new(context: &'c Context<'a>, max_depth: usize) -> Self {
        Self {
            context,
            max_depth,
            depth: 0,
        }
    }

    /// Evaluate a resolved formula, attaching its text to any error.
    pub fn eval(&mut self, typed: &TypedExpr) -> Result<Value, EvaluationError> {
        self.eval_expr(&typed.expr)
            .map_err(|err| err.with_source(&typed.source))
    }

    /// Evaluate an expression node.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, EvaluationError> {
        // Check depth before recursing
        if self.depth >= self.max_depth {
            return Err(EvaluationError::at(
                EvaluationErrorKind::DepthExceeded {
                    depth: self.depth + 1,
                    max_depth: self.max_depth,
                },
                expr.span.clone(),
            ));
        }

        self.depth += 1;
        let result = self.eval_expr_inner(expr);
        self.depth -= 1;

        result
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> Result<Value, EvaluationError> {
        match &expr.inner {
            ExprInner::Constant(value) => Ok(value.clone()),

            ExprInner::Attribute(name) => {
                let value = self.context.variable_value(name).ok_or_else(|| {
                    EvaluationError::at(
                        EvaluationErrorKind::UnknownAttribute(name.clone()),
                        expr.span.clone(),
                    )
                })?;
                // The row may declare a different kind than the one seen at resolution.
                self.conform(expr, value)
            }

            ExprInner::Macro(name) => match self.context.macro_value(name) {
                Some(text) => Ok(Value::string(text)),
                None => Err(EvaluationError::at(
                    EvaluationErrorKind::UnknownMacro(name.clone()),
                    expr.span.clone(),
                )),
            },

            ExprInner::Unary { op, expr: operand } => {
                let value = self.eval_expr(operand)?;
                Ok(unary(*op, &value))
            }

            ExprInner::Binary { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Ok(arithmetic(*op, expr.kind, &left, &right))
            }

            ExprInner::Comparison { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Ok(Value::boolean(compare(*op, &left, &right)))
            }

            // Both sides are always evaluated: a missing operand makes the result missing
            // even when the other side alone would decide it.
            ExprInner::Logical { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Ok(match op {
                    BoolOp::And => logical_and(&left, &right),
                    BoolOp::Or => logical_or(&left, &right),
                })
            }

            ExprInner::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.eval_expr(cond)?;
                let branch = match truth(&cond) {
                    Some(true) => then_branch,
                    Some(false) => else_branch,
                    None => return Ok(Value::missing(expr.kind)),
                };
                let value = self.eval_expr(branch)?;
                self.conform(expr, value)
            }

            ExprInner::Call { function, args } => {
                let values = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<Result<SmallVec<[Value; 4]>, _>>()?;
                let call = CallContext {
                    name: &function.name,
                    context: self.context,
                    result_kind: expr.kind,
                };
                let value = function.call(&call, &values).map_err(|err| {
                    EvaluationError::from_function(&function.name, err).with_span(&expr.span)
                })?;
                self.conform(expr, value)
            }
        }
    }

    /// Converts `value` to the node's kind.
    fn conform(&self, expr: &Expr, value: Value) -> Result<Value, EvaluationError> {
        let found = value.kind();
        value.coerce(expr.kind).ok_or_else(|| {
            EvaluationError::at(
                EvaluationErrorKind::KindMismatch {
                    expected: expr.kind,
                    found,
                },
                expr.span.clone(),
            )
        })
    }
}
