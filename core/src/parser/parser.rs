use crate::parser::{
    BinaryOp, BoolOp, ComparisonOp, Span, UnaryOp,
    error::{SyntaxError, SyntaxErrorKind, convert_pest_error},
    parsed_expr::{Expr, Literal, Node, ParsedExpr},
    string_literal::{unescape_attribute_name, unescape_string},
};
use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

/// Default maximum nesting depth of parentheses, and height of the syntax tree.
pub const DEFAULT_MAX_DEPTH: usize = 256;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::or, Assoc::Left))            // `||`
        .op(Op::infix(Rule::and, Assoc::Left))           // `&&`
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::neq, Assoc::Left)
        )                                                // `==`, `!=`
        .op(
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left)
        )                                                // `<`, `<=`, `>`, `>=`
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                                // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::modulo, Assoc::Left)
        )                                                // `*`, `/`, `%`
        .op(
            Op::prefix(Rule::neg) |
            Op::prefix(Rule::pos) |
            Op::prefix(Rule::not)
        )                                                // `-`, `+`, `!`
        .op(Op::infix(Rule::pow, Assoc::Right))          // `^` (right-assoc)
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct ExpressionParser;

/// Parse a formula with the default nesting limit.
pub fn parse(source: &str) -> Result<ParsedExpr, SyntaxError> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse a formula, rejecting parentheses nested deeper than `max_depth` and syntax trees
/// taller than `max_depth`.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<ParsedExpr, SyntaxError> {
    check_nesting(source, max_depth)?;

    let mut pairs = ExpressionParser::parse(Rule::main, source)
        .map_err(|err| convert_pest_error(err, source))?;
    let main = pairs.next().ok_or_else(|| {
        SyntaxError::new(
            SyntaxErrorKind::Other {
                message: "empty formula".to_string(),
            },
            source,
            Span::new(0, 0),
        )
    })?;
    let builder = Builder { source, max_depth };
    let expr = builder.build_main(main)?;
    tracing::debug!(source, "parsed formula");
    Ok(ParsedExpr {
        source: source.to_string(),
        expr,
    })
}

/// Rejects inputs whose parenthesis nesting exceeds `max_depth` before handing them to
/// the recursive descent parser. String literals and attribute names are skipped.
fn check_nesting(source: &str, max_depth: usize) -> Result<(), SyntaxError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut in_attribute = false;
    let mut escaped = false;
    for (pos, ch) in source.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string || in_attribute => escaped = true,
            '"' if !in_attribute => in_string = !in_string,
            '[' if !in_string => in_attribute = true,
            ']' if !in_string => in_attribute = false,
            '(' if !in_string && !in_attribute => {
                depth += 1;
                if depth > max_depth {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::MaxDepthExceeded { max_depth },
                        source,
                        Span::new(pos, pos + 1),
                    ));
                }
            }
            ')' if !in_string && !in_attribute => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

struct Builder<'s> {
    source: &'s str,
    max_depth: usize,
}

/// A built subtree and its height.
struct Built {
    node: Node,
    depth: usize,
}

impl Built {
    fn leaf(expr: Expr, span: Span) -> Self {
        Self {
            node: Node::new(expr, span),
            depth: 1,
        }
    }
}

impl<'s> Builder<'s> {
    fn error(&self, kind: SyntaxErrorKind, span: Span) -> SyntaxError {
        SyntaxError::new(kind, self.source, span)
    }

    fn missing(&self, what: &str, span: Span) -> SyntaxError {
        self.error(
            SyntaxErrorKind::Other {
                message: format!("missing {}", what),
            },
            span,
        )
    }

    fn too_deep(&self, span: Span) -> SyntaxError {
        self.error(
            SyntaxErrorKind::MaxDepthExceeded {
                max_depth: self.max_depth,
            },
            span,
        )
    }

    fn build_main(&self, pair: Pair<'_, Rule>) -> Result<Node, SyntaxError> {
        let span = Span::from(pair.as_span());
        let expression = pair
            .into_inner()
            .find(|p| p.as_rule() == Rule::expression)
            .ok_or_else(|| self.missing("expression", span))?;
        Ok(self.build(expression)?.node)
    }

    /// Places `expr` one level above its tallest child.
    fn nest(&self, expr: Expr, span: Span, child_depth: usize) -> Result<Built, SyntaxError> {
        let depth = child_depth + 1;
        if depth > self.max_depth {
            return Err(self.too_deep(span));
        }
        Ok(Built {
            node: Node::new(expr, span),
            depth,
        })
    }

    /// Prefix operators and `^` bind to the right, so the Pratt parser recurses once per
    /// operator in an unbroken run of them.
    fn check_right_nesting(&self, pairs: &Pairs<'_, Rule>) -> Result<(), SyntaxError> {
        let mut run = 0usize;
        for pair in pairs.clone() {
            match pair.as_rule() {
                Rule::neg | Rule::pos | Rule::not | Rule::pow => {
                    run += 1;
                    if run > self.max_depth {
                        return Err(self.too_deep(Span::from(pair.as_span())));
                    }
                }
                Rule::or
                | Rule::and
                | Rule::eq
                | Rule::neq
                | Rule::lt
                | Rule::le
                | Rule::gt
                | Rule::ge
                | Rule::add
                | Rule::sub
                | Rule::mul
                | Rule::div
                | Rule::modulo => run = 0,
                _ => {}
            }
        }
        Ok(())
    }

    fn build(&self, pair: Pair<'_, Rule>) -> Result<Built, SyntaxError> {
        let span = Span::from(pair.as_span());
        match pair.as_rule() {
            Rule::expression => {
                let pairs = pair.into_inner();
                self.check_right_nesting(&pairs)?;
                self.build_operators(pairs)
            }

            Rule::grouped => {
                let inner = pair
                    .into_inner()
                    .next()
                    .ok_or_else(|| self.missing("expression in parentheses", span.clone()))?;
                // Keep the parentheses in the span so errors point at the whole group.
                let built = self.build(inner)?;
                Ok(Built {
                    node: Node::new(built.node.expr, span),
                    depth: built.depth,
                })
            }

            Rule::call => {
                let mut inner = pair.into_inner();
                let name = inner
                    .next()
                    .ok_or_else(|| self.missing("function name", span.clone()))?
                    .as_str()
                    .to_string();
                let mut args = Vec::new();
                let mut depth = 0;
                for arg in inner {
                    let built = self.build(arg)?;
                    depth = depth.max(built.depth);
                    args.push(built.node);
                }
                self.nest(Expr::Call { name, args }, span, depth)
            }

            Rule::attribute => {
                let name = pair
                    .into_inner()
                    .next()
                    .ok_or_else(|| self.missing("attribute name", span.clone()))?;
                let name = unescape_attribute_name(name.as_str()).into_owned();
                Ok(Built::leaf(Expr::Attribute(name), span))
            }

            Rule::macro_ref => {
                let name = pair
                    .into_inner()
                    .next()
                    .ok_or_else(|| self.missing("macro name", span.clone()))?;
                Ok(Built::leaf(Expr::Macro(name.as_str().to_string()), span))
            }

            Rule::integer => {
                let value = self.number(pair.as_str(), &span)?;
                Ok(Built::leaf(Expr::Literal(Literal::Int(value)), span))
            }

            Rule::float => {
                let value = self.number(pair.as_str(), &span)?;
                Ok(Built::leaf(Expr::Literal(Literal::Float(value)), span))
            }

            Rule::string => {
                let content = pair
                    .into_inner()
                    .next()
                    .map(|inner| inner.as_str())
                    .unwrap_or("");
                let value = unescape_string(content).map_err(|err| {
                    self.error(
                        SyntaxErrorKind::InvalidString {
                            message: err.to_string(),
                        },
                        span.clone(),
                    )
                })?;
                Ok(Built::leaf(
                    Expr::Literal(Literal::Str(value.into_owned())),
                    span,
                ))
            }

            Rule::ident => Ok(Built::leaf(Expr::Ident(pair.as_str().to_string()), span)),

            rule => Err(self.error(
                SyntaxErrorKind::Other {
                    message: format!("Unhandled rule: {:?}", rule),
                },
                span,
            )),
        }
    }

    fn build_operators(&self, pairs: Pairs<'_, Rule>) -> Result<Built, SyntaxError> {
        PRATT_PARSER
            .map_primary(|primary| self.build(primary))
            .map_prefix(|op, rhs| {
                let rhs = rhs?;
                let op_span = Span::from(op.as_span());
                let op = match op.as_rule() {
                    Rule::neg => UnaryOp::Neg,
                    Rule::pos => UnaryOp::Pos,
                    Rule::not => UnaryOp::Not,
                    rule => {
                        return Err(self.error(
                            SyntaxErrorKind::Other {
                                message: format!("unknown prefix operator {:?}", rule),
                            },
                            op_span,
                        ));
                    }
                };
                let span = Span::combine(&op_span, &rhs.node.span);
                self.nest(
                    Expr::Unary {
                        op,
                        expr: Box::new(rhs.node),
                    },
                    span,
                    rhs.depth,
                )
            })
            .map_infix(|lhs, op, rhs| {
                let (lhs, rhs) = (lhs?, rhs?);
                let child_depth = lhs.depth.max(rhs.depth);
                let left = Box::new(lhs.node);
                let right = Box::new(rhs.node);
                let span = Span::combine(&left.span, &right.span);
                let expr = match op.as_rule() {
                    Rule::add => Expr::Binary { op: BinaryOp::Add, left, right },
                    Rule::sub => Expr::Binary { op: BinaryOp::Sub, left, right },
                    Rule::mul => Expr::Binary { op: BinaryOp::Mul, left, right },
                    Rule::div => Expr::Binary { op: BinaryOp::Div, left, right },
                    Rule::modulo => Expr::Binary { op: BinaryOp::Mod, left, right },
                    Rule::pow => Expr::Binary { op: BinaryOp::Pow, left, right },
                    Rule::and => Expr::Boolean { op: BoolOp::And, left, right },
                    Rule::or => Expr::Boolean { op: BoolOp::Or, left, right },
                    Rule::eq => Expr::Comparison { op: ComparisonOp::Eq, left, right },
                    Rule::neq => Expr::Comparison { op: ComparisonOp::Neq, left, right },
                    Rule::lt => Expr::Comparison { op: ComparisonOp::Lt, left, right },
                    Rule::le => Expr::Comparison { op: ComparisonOp::Le, left, right },
                    Rule::gt => Expr::Comparison { op: ComparisonOp::Gt, left, right },
                    Rule::ge => Expr::Comparison { op: ComparisonOp::Ge, left, right },
                    rule => {
                        return Err(self.error(
                            SyntaxErrorKind::Other {
                                message: format!("unknown binary operator {:?}", rule),
                            },
                            Span::from(op.as_span()),
                        ));
                    }
                };
                self.nest(expr, span, child_depth)
            })
            .parse(pairs)
    }

    fn number(&self, text: &str, span: &Span) -> Result<f64, SyntaxError> {
        text.parse::<f64>().map_err(|_| {
            self.error(
                SyntaxErrorKind::InvalidNumber {
                    text: text.to_string(),
                },
                span.clone(),
            )
        })
    }
}
