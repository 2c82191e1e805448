mod parsed_expr;
pub mod parser;
mod string_literal;
mod syntax;
pub mod error;

// Re-export the parser and rule enum for external use
pub use parser::ExpressionParser;
pub use parser::Rule;
pub use parser::parse;
pub use parser::parse_with_max_depth;
pub use parser::DEFAULT_MAX_DEPTH;

pub use parsed_expr::{Expr, Literal, Node, ParsedExpr};
pub use string_literal::{UnescapeError, unescape_attribute_name, unescape_string};
pub use syntax::{BinaryOp, BoolOp, ComparisonOp, Span, UnaryOp};
pub use error::{SyntaxError, SyntaxErrorKind};
