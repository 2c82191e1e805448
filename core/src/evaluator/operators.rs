//! Binary and unary operator implementations.
//!
//! These are shared by the evaluator and by the analyzer's constant folding, so a folded
//! constant always has the value the evaluator would have computed.

use core::cmp::Ordering;

use crate::functions::compare_strings;
use crate::parser::{BinaryOp, ComparisonOp, UnaryOp};
use crate::types::ValueKind;
use crate::values::{Value, format_minimal, render_date};

/// Evaluate an arithmetic operation whose result has kind `kind`.
///
/// A `STRING` result means concatenation; anything else is numeric arithmetic on `f64`
/// following IEEE 754 (division by zero gives an infinity or NaN, never an error).
pub fn arithmetic(op: BinaryOp, kind: ValueKind, left: &Value, right: &Value) -> Value {
    if kind == ValueKind::String {
        return concat(left, right);
    }
    Value::number(kind, eval_binary_float(op, left.to_number(), right.to_number()))
}

pub(crate) fn eval_binary_float(op: BinaryOp, left: f64, right: f64) -> f64 {
    match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div => left / right,
        BinaryOp::Mod => left % right,
        BinaryOp::Pow => left.powf(right),
    }
}

/// String `+`: a missing operand contributes nothing, two missing operands give missing.
pub fn concat(left: &Value, right: &Value) -> Value {
    match (left.render(), right.render()) {
        (None, None) => Value::missing(ValueKind::String),
        (l, r) => Value::string(l.unwrap_or_default() + r.as_deref().unwrap_or("")),
    }
}

pub fn unary(op: UnaryOp, value: &Value) -> Value {
    match op {
        UnaryOp::Neg => Value::number(value.kind(), -value.to_number()),
        UnaryOp::Pos => value.clone(),
        UnaryOp::Not => logical_not(value),
    }
}

/// Truth value of a logical operand: NaN is missing, zero is false.
pub fn truth(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => *b,
        Value::Integer(n) | Value::Double(n) if n.is_nan() => None,
        Value::Integer(n) | Value::Double(n) => Some(*n != 0.0),
        _ => None,
    }
}

/// `&&` with both operands already evaluated. Missing on either side is missing.
pub fn logical_and(left: &Value, right: &Value) -> Value {
    match (truth(left), truth(right)) {
        (Some(l), Some(r)) => Value::boolean(l && r),
        _ => Value::missing(ValueKind::Boolean),
    }
}

/// `||` with both operands already evaluated. Missing on either side is missing.
pub fn logical_or(left: &Value, right: &Value) -> Value {
    match (truth(left), truth(right)) {
        (Some(l), Some(r)) => Value::boolean(l || r),
        _ => Value::missing(ValueKind::Boolean),
    }
}

pub fn logical_not(value: &Value) -> Value {
    match truth(value) {
        Some(b) => Value::boolean(!b),
        None => Value::missing(ValueKind::Boolean),
    }
}

/// Evaluate a comparison. Never fails.
pub fn compare(op: ComparisonOp, left: &Value, right: &Value) -> bool {
    match op {
        ComparisonOp::Eq => equals(left, right),
        ComparisonOp::Neq => !equals(left, right),
        ComparisonOp::Lt => ordering(left, right) == Some(Ordering::Less),
        ComparisonOp::Le => matches!(
            ordering(left, right),
            Some(Ordering::Less | Ordering::Equal)
        ),
        ComparisonOp::Gt => ordering(left, right) == Some(Ordering::Greater),
        ComparisonOp::Ge => matches!(
            ordering(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
    }
}

/// Ordering of two non-missing values of comparable kinds.
fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    if left.is_missing() || right.is_missing() {
        return None;
    }
    match (left, right) {
        (Value::String(Some(a)), Value::String(Some(b))) => Some(compare_strings(a, b)),
        _ => left.as_number()?.partial_cmp(&right.as_number()?),
    }
}

/// Formula `==`: cross-kind comparison through a common representation.
pub fn equals(left: &Value, right: &Value) -> bool {
    match (left.is_missing(), right.is_missing()) {
        (true, true) => same_category(left.kind(), right.kind()),
        (false, false) => equal_values(left, right),
        _ => false,
    }
}

fn same_category(a: ValueKind, b: ValueKind) -> bool {
    a == b || (a.is_numeric() && b.is_numeric())
}

fn equal_values(left: &Value, right: &Value) -> bool {
    use Value::*;
    match (left, right) {
        (Integer(a) | Double(a), Integer(b) | Double(b)) => a == b,
        (String(Some(a)), String(Some(b))) => a == b,
        (Boolean(Some(a)), Boolean(Some(b))) => a == b,
        (Date(Some(a)), Date(Some(b))) => a == b,

        (Integer(n) | Double(n), String(Some(s))) | (String(Some(s)), Integer(n) | Double(n)) => {
            format_minimal(*n).as_deref() == Some(s.as_str())
        }
        (Boolean(Some(b)), Integer(n) | Double(n)) | (Integer(n) | Double(n), Boolean(Some(b))) => {
            *b == (*n != 0.0)
        }
        (Boolean(Some(b)), String(Some(s))) | (String(Some(s)), Boolean(Some(b))) => {
            s == if *b { "true" } else { "false" }
        }
        (Date(Some(d)), Integer(n) | Double(n)) | (Integer(n) | Double(n), Date(Some(d))) => {
            d.timestamp_millis() as f64 == *n
        }
        (Date(Some(d)), String(Some(s))) | (String(Some(s)), Date(Some(d))) => {
            render_date(d) == *s
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_integer_arithmetic_keeps_kind() {
        let result = arithmetic(
            BinaryOp::Mul,
            ValueKind::Integer,
            &Value::integer(3.0),
            &Value::integer(5.0),
        );
        assert_eq!(result, Value::integer(15.0));
    }

    #[test]
    fn test_float_div_by_zero() {
        assert_eq!(eval_binary_float(BinaryOp::Div, 5.0, 0.0), f64::INFINITY);
        assert_eq!(eval_binary_float(BinaryOp::Div, -5.0, 0.0), f64::NEG_INFINITY);
        assert!(eval_binary_float(BinaryOp::Div, 0.0, 0.0).is_nan());
        assert!(eval_binary_float(BinaryOp::Mod, 7.0, 0.0).is_nan());
    }

    #[test]
    fn test_float_pow() {
        assert_eq!(eval_binary_float(BinaryOp::Pow, 2.0, 3.0), 8.0);
        assert_eq!(eval_binary_float(BinaryOp::Mod, -7.0, 3.0), -1.0);
    }

    #[test]
    fn test_concat_missing_contributes_nothing() {
        assert_eq!(
            concat(&Value::string("hello "), &Value::double(4711.7)),
            Value::string("hello 4711.7")
        );
        assert_eq!(
            concat(&Value::missing(ValueKind::String), &Value::integer(15.0)),
            Value::string("15")
        );
        assert_eq!(
            concat(
                &Value::missing(ValueKind::String),
                &Value::missing(ValueKind::Double)
            ),
            Value::missing(ValueKind::String)
        );
    }

    #[test]
    fn test_missing_poisons_logic() {
        let missing = Value::missing(ValueKind::Boolean);
        let no = Value::boolean(false);
        assert_eq!(logical_and(&missing, &no), missing);
        assert_eq!(logical_or(&Value::boolean(true), &missing), missing);
        assert_eq!(logical_not(&Value::double(f64::NAN)), missing);
    }

    #[test]
    fn test_numeric_truth() {
        assert_eq!(truth(&Value::integer(0.0)), Some(false));
        assert_eq!(truth(&Value::double(-2.5)), Some(true));
        assert_eq!(truth(&Value::double(f64::NAN)), None);
    }

    #[test]
    fn test_missing_equality() {
        let nan = Value::missing(ValueKind::Double);
        assert!(equals(&nan, &nan));
        assert!(equals(&nan, &Value::missing(ValueKind::Integer)));
        assert!(!equals(&nan, &Value::missing(ValueKind::String)));
        assert!(!equals(&nan, &Value::double(1.0)));
        assert!(compare(ComparisonOp::Neq, &nan, &Value::double(1.0)));
    }

    #[test]
    fn test_cross_kind_equality() {
        assert!(equals(&Value::integer(3.0), &Value::string("3")));
        assert!(equals(&Value::string("3.5"), &Value::double(3.5)));
        assert!(equals(&Value::boolean(true), &Value::integer(2.0)));
        assert!(equals(&Value::boolean(false), &Value::string("false")));
        let date = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert!(equals(&Value::date(date), &Value::string("2020-01-02 03:04:05")));
        assert!(equals(
            &Value::double(date.timestamp_millis() as f64),
            &Value::date(date)
        ));
        assert!(!equals(&Value::boolean(true), &Value::date(date)));
    }

    #[test]
    fn test_ordering_with_missing_is_false() {
        let missing = Value::missing(ValueKind::String);
        let boom = Value::string("boom");
        for op in [ComparisonOp::Lt, ComparisonOp::Le, ComparisonOp::Gt, ComparisonOp::Ge] {
            assert!(!compare(op, &boom, &missing));
        }
        assert!(compare(ComparisonOp::Lt, &Value::string("a"), &Value::string("b")));
        assert!(compare(ComparisonOp::Ge, &Value::integer(2.0), &Value::double(2.0)));
    }

    #[test]
    fn test_unary() {
        assert_eq!(unary(UnaryOp::Neg, &Value::integer(4.0)), Value::integer(-4.0));
        assert_eq!(unary(UnaryOp::Not, &Value::boolean(true)), Value::boolean(false));
    }
}
