use crate::{
    analyzer::{
        error::{TypeError, TypeErrorKind},
        typed_expr::{Expr, ExprInner, TypedExpr},
    },
    context::Context,
    evaluator::operators::{arithmetic, compare, logical_and, logical_or, truth, unary},
    functions::{ArgInfo, Arity, KindRequest},
    parser::{self, BinaryOp, BoolOp, ComparisonOp, Literal, Node, Span, UnaryOp},
    types::{ValueKind, arithmetic_result, unify},
    values::Value,
};

/// Name of the conditional special form.
const IF: &str = "if";

/// Assigns a kind to every node of `parsed`, binds functions and folds constants.
pub fn analyze(parsed: &parser::ParsedExpr, context: &Context<'_>) -> Result<TypedExpr, TypeError> {
    let analyzer = Analyzer {
        context,
        source: &parsed.source,
    };
    let expr = analyzer.analyze(&parsed.expr)?;
    tracing::debug!(source = %parsed.source, kind = %expr.kind, "resolved formula");
    Ok(TypedExpr {
        source: parsed.source.clone(),
        expr,
    })
}

struct Analyzer<'c, 'a> {
    context: &'c Context<'a>,
    source: &'c str,
}

impl Analyzer<'_, '_> {
    fn error(&self, kind: TypeErrorKind) -> TypeError {
        TypeError::new(kind, self.source)
    }

    fn analyze(&self, node: &Node) -> Result<Expr, TypeError> {
        let span = node.span.clone();
        match &node.expr {
            parser::Expr::Literal(literal) => Ok(Expr::constant(
                match literal {
                    Literal::Int(v) => Value::integer(*v),
                    Literal::Float(v) => Value::double(*v),
                    Literal::Str(s) => Value::string(s.clone()),
                },
                span,
            )),

            // Named constants shadow attributes of the same name.
            parser::Expr::Ident(name) => {
                if let Some(value) = self.context.constant(name) {
                    return Ok(Expr::constant(value, span));
                }
                match self.context.variable_kind(name) {
                    Some(kind) => Ok(Expr::new(kind, span, ExprInner::Attribute(name.clone()))),
                    None => Err(self.error(TypeErrorKind::UnknownIdentifier {
                        name: name.clone(),
                        span,
                    })),
                }
            }

            parser::Expr::Attribute(name) => match self.context.variable_kind(name) {
                Some(kind) => Ok(Expr::new(kind, span, ExprInner::Attribute(name.clone()))),
                None => Err(self.error(TypeErrorKind::UnknownAttribute {
                    name: name.clone(),
                    span,
                })),
            },

            parser::Expr::Macro(name) => Ok(Expr::new(
                ValueKind::String,
                span,
                ExprInner::Macro(name.clone()),
            )),

            parser::Expr::Unary { op, expr } => {
                let operand = self.analyze(expr)?;
                let kind = self.unary_kind(*op, operand.kind, &span)?;
                let node = Expr::new(
                    kind,
                    span,
                    ExprInner::Unary {
                        op: *op,
                        expr: Box::new(operand),
                    },
                );
                Ok(fold(node))
            }

            parser::Expr::Binary { op, left, right } => {
                let left = self.analyze(left)?;
                let right = self.analyze(right)?;
                let kind = self.binary_kind(*op, left.kind, right.kind, &span)?;
                let node = Expr::new(
                    kind,
                    span,
                    ExprInner::Binary {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                );
                Ok(fold(node))
            }

            parser::Expr::Comparison { op, left, right } => {
                let left = self.analyze(left)?;
                let right = self.analyze(right)?;
                self.check_comparison(*op, left.kind, right.kind, &span)?;
                let node = Expr::new(
                    ValueKind::Boolean,
                    span,
                    ExprInner::Comparison {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                );
                Ok(fold(node))
            }

            parser::Expr::Boolean { op, left, right } => {
                let left = self.analyze(left)?;
                let right = self.analyze(right)?;
                if !is_truthy(left.kind) || !is_truthy(right.kind) {
                    return Err(self.error(TypeErrorKind::OperatorMismatch {
                        operator: op.to_string(),
                        left: left.kind,
                        right: right.kind,
                        span,
                    }));
                }
                let node = Expr::new(
                    ValueKind::Boolean,
                    span,
                    ExprInner::Logical {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                );
                Ok(fold(node))
            }

            parser::Expr::Call { name, args } if name == IF => self.analyze_if(args, span),

            parser::Expr::Call { name, args } => self.analyze_call(name, args, span),
        }
    }

    fn unary_kind(&self, op: UnaryOp, operand: ValueKind, span: &Span) -> Result<ValueKind, TypeError> {
        let accepted = match op {
            UnaryOp::Neg | UnaryOp::Pos => operand.is_numeric(),
            UnaryOp::Not => is_truthy(operand),
        };
        if !accepted {
            return Err(self.error(TypeErrorKind::UnaryMismatch {
                operator: op.to_string(),
                operand,
                span: span.clone(),
            }));
        }
        Ok(match op {
            UnaryOp::Not => ValueKind::Boolean,
            _ => operand,
        })
    }

    fn binary_kind(
        &self,
        op: BinaryOp,
        left: ValueKind,
        right: ValueKind,
        span: &Span,
    ) -> Result<ValueKind, TypeError> {
        if op == BinaryOp::Add && (left == ValueKind::String || right == ValueKind::String) {
            return Ok(ValueKind::String);
        }
        if left.is_numeric() && right.is_numeric() {
            return Ok(match op {
                BinaryOp::Div => ValueKind::Double,
                _ => arithmetic_result(left, right),
            });
        }
        Err(self.error(TypeErrorKind::OperatorMismatch {
            operator: op.to_string(),
            left,
            right,
            span: span.clone(),
        }))
    }

    fn check_comparison(
        &self,
        op: ComparisonOp,
        left: ValueKind,
        right: ValueKind,
        span: &Span,
    ) -> Result<(), TypeError> {
        let comparable = op.is_equality()
            || (left.is_numeric() && right.is_numeric())
            || (left == ValueKind::String && right == ValueKind::String);
        if comparable {
            Ok(())
        } else {
            Err(self.error(TypeErrorKind::OperatorMismatch {
                operator: op.to_string(),
                left,
                right,
                span: span.clone(),
            }))
        }
    }

    /// `if(cond, a, b)`. A constant condition keeps only the selected branch, whose kind
    /// becomes the kind of the whole conditional.
    fn analyze_if(&self, args: &[Node], span: Span) -> Result<Expr, TypeError> {
        let [cond, then_branch, else_branch] = args else {
            return Err(self.error(TypeErrorKind::ArityMismatch {
                function: IF.to_string(),
                expected: Arity::Exact(3).to_string(),
                found: args.len(),
                span,
            }));
        };
        let cond = self.analyze(cond)?;
        if !is_truthy(cond.kind) {
            return Err(self.error(TypeErrorKind::ConditionMismatch {
                found: cond.kind,
                span: cond.span,
            }));
        }

        if let Some(value) = cond.as_constant() {
            match truth(value) {
                Some(true) => return self.analyze(then_branch),
                Some(false) => return self.analyze(else_branch),
                None => {}
            }
        }

        let then_branch = self.analyze(then_branch)?;
        let else_branch = self.analyze(else_branch)?;
        let kind = unify(then_branch.kind, else_branch.kind);
        if cond.is_constant() {
            // A missing constant condition selects neither branch.
            tracing::debug!(%kind, "folded conditional with missing condition");
            return Ok(Expr::new(kind, span, ExprInner::Constant(Value::missing(kind))));
        }
        Ok(Expr::new(
            kind,
            span,
            ExprInner::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
        ))
    }

    fn analyze_call(&self, name: &str, args: &[Node], span: Span) -> Result<Expr, TypeError> {
        let function = self.context.function(name).ok_or_else(|| {
            self.error(TypeErrorKind::UnknownFunction {
                name: name.to_string(),
                span: span.clone(),
            })
        })?;

        let signature = &function.signature;
        if !signature.arity.accepts(args.len()) {
            return Err(self.error(TypeErrorKind::ArityMismatch {
                function: name.to_string(),
                expected: signature.arity.to_string(),
                found: args.len(),
                span,
            }));
        }

        let args = args
            .iter()
            .map(|arg| self.analyze(arg))
            .collect::<Result<Vec<_>, _>>()?;
        for (position, arg) in args.iter().enumerate() {
            let accepted = signature.accepted_at(position);
            if !accepted.accepts(arg.kind) {
                return Err(self.error(TypeErrorKind::ArgumentMismatch {
                    function: name.to_string(),
                    position,
                    expected: accepted.to_string(),
                    found: arg.kind,
                    span: arg.span.clone(),
                }));
            }
        }

        let infos: Vec<ArgInfo> = args
            .iter()
            .map(|arg| ArgInfo {
                kind: arg.kind,
                constant: arg.as_constant().cloned(),
            })
            .collect();
        let request = KindRequest {
            args: &infos,
            context: self.context,
        };
        let kind = function.result.resolve(&request).map_err(|message| {
            self.error(TypeErrorKind::UnresolvableKind {
                function: name.to_string(),
                message,
                span: span.clone(),
            })
        })?;

        Ok(Expr::new(kind, span, ExprInner::Call { function, args }))
    }
}

/// Kinds usable as a truth value.
fn is_truthy(kind: ValueKind) -> bool {
    kind.is_numeric() || kind == ValueKind::Boolean
}

/// Replaces an operator node whose operands are all constants by its value.
fn fold(expr: Expr) -> Expr {
    let Some(value) = folded_value(&expr) else {
        return expr;
    };
    tracing::debug!(value = %value, kind = %expr.kind, "folded constant");
    Expr::new(expr.kind, expr.span, ExprInner::Constant(value))
}

fn folded_value(expr: &Expr) -> Option<Value> {
    match &expr.inner {
        ExprInner::Unary { op, expr: operand } => Some(unary(*op, operand.as_constant()?)),
        ExprInner::Binary { op, left, right } => Some(arithmetic(
            *op,
            expr.kind,
            left.as_constant()?,
            right.as_constant()?,
        )),
        ExprInner::Comparison { op, left, right } => Some(Value::boolean(compare(
            *op,
            left.as_constant()?,
            right.as_constant()?,
        ))),
        ExprInner::Logical { op, left, right } => {
            let (l, r) = (left.as_constant()?, right.as_constant()?);
            Some(match op {
                BoolOp::And => logical_and(l, r),
                BoolOp::Or => logical_or(l, r),
            })
        }
        _ => None,
    }
}
