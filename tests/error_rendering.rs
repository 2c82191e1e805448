use formula::{Error, render_error_to_string_no_color};

#[macro_use]
mod cases;

// ======== Diagnostic codes per stage ========

test_case! {
    name: unbalanced_parenthesis,
    input: "(1 + 2",
    error: "P001",
}

test_case! {
    name: dangling_operator,
    input: "1 + * 2",
    error: "P001",
}

#[test]
fn parse_depth_is_bounded() {
    let input = format!("{}1{}", "(".repeat(300), ")".repeat(300));
    let err = cases::run_err(&input);
    assert!(err.is_syntax());
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("P004"));
}

#[test]
fn long_operator_chains_are_rejected_before_resolution() {
    let sum = vec!["1"; 10_000].join("+");
    assert_eq!(cases::run_err(&sum).to_diagnostic().code.as_deref(), Some("P004"));

    let negated = format!("{}1", "-".repeat(10_000));
    assert_eq!(cases::run_err(&negated).to_diagnostic().code.as_deref(), Some("P004"));
}

#[test]
fn chains_within_the_limit_still_evaluate() {
    let sum = vec!["[integer]"; 200].join(" + ");
    assert_eq!(cases::run_ok(&sum).1, formula::Value::integer(1000.0));
}

#[test]
fn stages_are_distinguished() {
    assert!(cases::run_err("1 +").is_syntax());
    assert!(cases::run_err("[name] - 1").is_type());
    assert!(cases::run_err("%{nope}").is_evaluation());
}

// ======== Rendered output ========

#[test]
fn type_error_underlines_fragment() {
    let err = cases::run_err("1 + sqrt([name])");
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.span.0, 9..15);

    let output = render_error_to_string_no_color(&err);
    assert!(output.contains("[E003] Error:"), "{}", output);
    assert!(output.contains("1 + sqrt([name])"), "{}", output);
}

#[test]
fn evaluation_error_names_function() {
    let err = cases::run_err("length(cut([name], 2, 10))");
    let Error::Evaluation(inner) = &err else {
        panic!("expected an evaluation error, got {:?}", err);
    };
    assert_eq!(inner.span.as_ref().map(|s| s.0.clone()), Some(7..25));
    assert!(err.to_string().starts_with("Evaluation error: cut:"), "{}", err);

    let output = render_error_to_string_no_color(&err);
    assert!(output.contains("[R008] Error:"), "{}", output);
}
