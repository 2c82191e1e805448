use super::*;
use crate::context::{Bindings, ConstantTable, Context};
use crate::functions::FunctionRegistry;
use crate::parser;
use crate::types::ValueKind;
use crate::values::Value;
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;

static FUNCTIONS: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::standard);
static CONSTANTS: Lazy<ConstantTable> = Lazy::new(ConstantTable::standard);

fn row() -> Bindings {
    let mut row = Bindings::new();
    row.declare("i", ValueKind::Integer);
    row.declare("d", ValueKind::Double);
    row.declare("s", ValueKind::String);
    row.declare("b", ValueKind::Boolean);
    row.declare("t", ValueKind::Date);
    row.declare("c", ValueKind::Boolean);
    row.declare("my attribute", ValueKind::String);
    row
}

// Helper to parse and analyze a source string
fn analyze_source(source: &str) -> Result<TypedExpr, TypeError> {
    let row = row();
    let context = Context::new()
        .with_functions(&*FUNCTIONS)
        .with_constants(&*CONSTANTS)
        .with_variables(&row);
    let parsed = parser::parse(source).expect("parsing failed");
    analyze(&parsed, &context)
}

fn kind_of(source: &str) -> ValueKind {
    match analyze_source(source) {
        Ok(typed) => typed.kind(),
        Err(err) => panic!("'{}' failed to resolve: {}", source, err),
    }
}

fn error_kind(source: &str) -> TypeErrorKind {
    match analyze_source(source) {
        Ok(typed) => panic!("'{}' resolved to {} but should fail", source, typed.kind()),
        Err(err) => err.kind,
    }
}

// ============================================================================
// Binary Operations
// ============================================================================

#[test]
fn test_arithmetic_operators_integers() {
    for op in ["+", "-", "*", "%", "^"] {
        assert_eq!(kind_of(&format!("[i] {} 2", op)), ValueKind::Integer, "{}", op);
    }
    assert_eq!(kind_of("[i] / 2"), ValueKind::Double);
}

#[test]
fn test_arithmetic_mixed_numeric_promotes() {
    for op in ["+", "-", "*", "/", "%", "^"] {
        assert_eq!(kind_of(&format!("[i] {} [d]", op)), ValueKind::Double, "{}", op);
    }
}

#[test]
fn test_plus_with_string_concatenates() {
    assert_eq!(kind_of("[s] + [i]"), ValueKind::String);
    assert_eq!(kind_of("[t] + [s]"), ValueKind::String);
    assert_eq!(kind_of("[b] + \"x\""), ValueKind::String);
}

#[test]
fn test_arithmetic_on_other_kinds_fails() {
    for source in ["[s] - 1", "[b] * 2", "[t] + 1", "[s] * [s]", "-[s]", "+[b]"] {
        assert!(analyze_source(source).is_err(), "{} should fail", source);
    }
}

#[test]
fn test_relational_operators() {
    assert_eq!(kind_of("[i] < [d]"), ValueKind::Boolean);
    assert_eq!(kind_of("[s] >= \"a\""), ValueKind::Boolean);
    assert!(matches!(
        error_kind("[t] < [t]"),
        TypeErrorKind::OperatorMismatch { ref operator, .. } if operator == "<"
    ));
    assert!(analyze_source("[s] < 1").is_err());
    assert!(analyze_source("MISSING_NOMINAL < 8").is_err());
}

#[test]
fn test_equality_accepts_any_kinds() {
    for source in ["[t] == [b]", "[s] != [i]", "[b] == 1", "MISSING_DATE == [t]"] {
        assert_eq!(kind_of(source), ValueKind::Boolean, "{}", source);
    }
}

#[test]
fn test_logical_operators() {
    assert_eq!(kind_of("[b] && [i]"), ValueKind::Boolean);
    assert_eq!(kind_of("[d] || !(c)"), ValueKind::Boolean);
    assert!(matches!(
        error_kind("[s] && [b]"),
        TypeErrorKind::OperatorMismatch { left: ValueKind::String, .. }
    ));
    assert!(matches!(
        error_kind("![t]"),
        TypeErrorKind::UnaryMismatch { operand: ValueKind::Date, .. }
    ));
}

// ============================================================================
// Names
// ============================================================================

#[test]
fn test_identifiers() {
    assert_eq!(kind_of("pi"), ValueKind::Double);
    assert_eq!(kind_of("TRUE"), ValueKind::Boolean);
    assert_eq!(kind_of("i"), ValueKind::Integer);
    assert_eq!(kind_of("[my attribute]"), ValueKind::String);
    assert!(matches!(
        error_kind("nope"),
        TypeErrorKind::UnknownIdentifier { ref name, .. } if name == "nope"
    ));
    assert!(matches!(
        error_kind("[nope]"),
        TypeErrorKind::UnknownAttribute { ref name, .. } if name == "nope"
    ));
}

#[test]
fn test_macro_is_string() {
    assert_eq!(kind_of("%{anything}"), ValueKind::String);
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn test_constant_if_keeps_selected_branch() {
    let typed = analyze_source("if(TRUE, 4, FALSE)").unwrap();
    assert_eq!(typed.kind(), ValueKind::Integer);
    assert_eq!(typed.as_constant(), Some(&Value::integer(4.0)));

    let typed = analyze_source("if(TRUE, FALSE, 4)").unwrap();
    assert_eq!(typed.kind(), ValueKind::Boolean);
    assert_eq!(typed.as_constant(), Some(&Value::boolean(false)));
}

#[test]
fn test_constant_if_ignores_unselected_branch() {
    // The unselected branch is not even resolved.
    assert_eq!(kind_of("if(1 > 2, [nope], [s])"), ValueKind::String);
    assert_eq!(kind_of("if(0, [t], [d])"), ValueKind::Double);
}

#[test]
fn test_dynamic_if_unifies() {
    assert_eq!(kind_of("if(c, 1, 3.4)"), ValueKind::Double);
    assert_eq!(kind_of("if(c, TRUE, 3)"), ValueKind::String);
    assert_eq!(kind_of("if(c, [t], [t])"), ValueKind::Date);
    assert_eq!(kind_of("if([i] > 3, [s], [t])"), ValueKind::String);
}

#[test]
fn test_if_with_missing_constant_condition() {
    let typed = analyze_source("if(MISSING_NUMERIC, 1, 2.5)").unwrap();
    assert_eq!(typed.kind(), ValueKind::Double);
    assert_eq!(typed.as_constant(), Some(&Value::missing(ValueKind::Double)));
}

#[test]
fn test_if_errors() {
    assert!(matches!(
        error_kind("if(c, 1)"),
        TypeErrorKind::ArityMismatch { found: 2, .. }
    ));
    assert!(matches!(
        error_kind("if([s], 1, 2)"),
        TypeErrorKind::ConditionMismatch { found: ValueKind::String, .. }
    ));
}

// ============================================================================
// Constant folding
// ============================================================================

#[test]
fn test_constant_folding() {
    let typed = analyze_source("3 * 5 + 1").unwrap();
    assert_eq!(typed.as_constant(), Some(&Value::integer(16.0)));

    let typed = analyze_source("\"a\" + 1 == \"a1\" && !FALSE").unwrap();
    assert_eq!(typed.as_constant(), Some(&Value::boolean(true)));

    let typed = analyze_source("[i] + 2 * 3").unwrap();
    match &typed.expr.inner {
        ExprInner::Binary { right, .. } => {
            assert_eq!(right.as_constant(), Some(&Value::integer(6.0)));
        }
        other => panic!("unexpected node {:?}", other),
    }
}

#[test]
fn test_function_calls_are_not_folded() {
    let typed = analyze_source("rand()").unwrap();
    assert!(typed.as_constant().is_none());
}

// ============================================================================
// Function calls
// ============================================================================

#[test]
fn test_function_result_kinds() {
    assert_eq!(kind_of("sqrt(4)"), ValueKind::Double);
    assert_eq!(kind_of("abs([i])"), ValueKind::Integer);
    assert_eq!(kind_of("abs([d])"), ValueKind::Double);
    assert_eq!(kind_of("max(1, 2, [i])"), ValueKind::Integer);
    assert_eq!(kind_of("max(1, 2.5, [i])"), ValueKind::Double);
    assert_eq!(kind_of("round([d])"), ValueKind::Integer);
    assert_eq!(kind_of("round([d], 2)"), ValueKind::Double);
    assert_eq!(kind_of("length([s])"), ValueKind::Integer);
}

#[test]
fn test_function_errors() {
    assert!(matches!(
        error_kind("nope(1)"),
        TypeErrorKind::UnknownFunction { ref name, .. } if name == "nope"
    ));
    assert!(matches!(
        error_kind("sqrt(1, 2)"),
        TypeErrorKind::ArityMismatch { found: 2, .. }
    ));
    assert!(matches!(
        error_kind("sqrt([s])"),
        TypeErrorKind::ArgumentMismatch { position: 0, found: ValueKind::String, .. }
    ));
    assert!(matches!(
        error_kind("length(1, [s])"),
        TypeErrorKind::ArityMismatch { .. }
    ));
}

#[test]
fn test_indirection_kinds() {
    assert_eq!(kind_of(r#"eval("3*" + [i], REAL)"#), ValueKind::Double);
    assert_eq!(kind_of(r#"eval("1 + 2")"#), ValueKind::Integer);
    assert_eq!(kind_of(r#"attribute("t")"#), ValueKind::Date);
    assert_eq!(kind_of(r#"attribute([s], "nominal")"#), ValueKind::String);

    for source in [
        r#"eval([s])"#,
        r#"eval("1", "widget")"#,
        r#"eval("1", [s])"#,
        r#"eval("1 +")"#,
        r#"attribute("nope")"#,
    ] {
        assert!(
            matches!(error_kind(source), TypeErrorKind::UnresolvableKind { .. }),
            "{} should not resolve",
            source
        );
    }
}

#[test]
fn test_error_span_points_at_node() {
    let err = analyze_source("1 + sqrt([s])").unwrap_err();
    assert_eq!(err.fragment(), "[s]");
    assert_eq!(err.source, "1 + sqrt([s])");
}
