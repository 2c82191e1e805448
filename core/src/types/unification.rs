//! Kind unification rules shared by the analyzer and the function catalog.

use super::ValueKind;

/// Unifies the kinds of the two branches of a conditional.
///
/// Equal kinds unify to themselves, `Integer` and `Double` unify to `Double`, and every
/// other pair falls back to `String`, since every kind has a string rendering.
pub fn unify(a: ValueKind, b: ValueKind) -> ValueKind {
    if a == b {
        a
    } else if a.is_numeric() && b.is_numeric() {
        ValueKind::Double
    } else {
        ValueKind::String
    }
}

/// Numeric promotion over any number of numeric kinds: `Integer` only if all are.
pub fn promote(kinds: impl IntoIterator<Item = ValueKind>) -> ValueKind {
    if kinds.into_iter().all(|kind| kind == ValueKind::Integer) {
        ValueKind::Integer
    } else {
        ValueKind::Double
    }
}

/// Result kind of a numeric binary operation on two numeric kinds.
pub fn arithmetic_result(left: ValueKind, right: ValueKind) -> ValueKind {
    promote([left, right])
}

/// Resolves a kind name as used by `eval` and `attribute`. Case-insensitive.
pub fn parse_kind_name(name: &str) -> Option<ValueKind> {
    match name.trim().to_ascii_lowercase().as_str() {
        "real" | "double" | "numerical" | "numeric" => Some(ValueKind::Double),
        "integer" => Some(ValueKind::Integer),
        "nominal" | "polynominal" | "string" | "text" => Some(ValueKind::String),
        "binominal" | "boolean" => Some(ValueKind::Boolean),
        "date_time" | "date" | "time" => Some(ValueKind::Date),
        _ => None,
    }
}
