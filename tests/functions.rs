use formula::{Value, ValueKind};

#[macro_use]
mod cases;

// ======== Two rendering paths ========

test_case! {
    name: str_uses_three_decimals,
    input: "str(4711.7)",
    kind: ValueKind::String,
    value: Value::string("4711.700"),
}

test_case! {
    name: str_of_infinity,
    input: "str(5.0 / 0)",
    kind: ValueKind::String,
    value: Value::string("∞"),
}

test_case! {
    name: str_of_missing_is_missing,
    input: "str([gap])",
    missing: ValueKind::String,
}

// ======== Rounding ========

test_case! {
    name: round_to_two_places,
    input: "round(1.666, 2)",
    kind: ValueKind::Double,
    value: Value::double(1.67),
}

test_case! {
    name: rint_half_to_even_up,
    input: "rint(2.5)",
    kind: ValueKind::Integer,
    value: Value::integer(2.0),
}

test_case! {
    name: rint_half_to_even_down,
    input: "rint(1.5)",
    kind: ValueKind::Integer,
    value: Value::integer(2.0),
}

test_case! {
    name: round_half_away_from_zero,
    input: "round(-[real])",
    kind: ValueKind::Integer,
    value: Value::integer(-3.0),
}

test_case! {
    name: round_with_missing_precision_uses_zero_places,
    input: "round(2.4, [gap])",
    kind: ValueKind::Double,
    value: Value::double(2.0),
}

test_case! {
    name: round_with_negative_infinite_precision,
    input: "round(2.4, -1/0)",
    missing: ValueKind::Double,
}

// ======== Aggregation ========

test_case! {
    name: max_of_integers_is_integer,
    input: "max(1, [integer], 3)",
    kind: ValueKind::Integer,
    value: Value::integer(5.0),
}

test_case! {
    name: sum_of_mixed_is_double,
    input: "sum(1, [real])",
    kind: ValueKind::Double,
    value: Value::double(3.5),
}

test_case! {
    name: aggregation_propagates_missing,
    input: "avg(1, [gap], 3)",
    missing: ValueKind::Double,
}

// ======== Strings ========

test_case! {
    name: string_pipeline,
    input: r#"upper(prefix(trim("  " + [text]), 5)) + length([name])"#,
    kind: ValueKind::String,
    value: Value::string("HELLO3"),
}

test_case! {
    name: cut_out_of_range_raises,
    input: "cut([name], 2, 10)",
    error: "R008",
}

test_case! {
    name: suffix_clamps,
    input: "suffix([name], 10)",
    kind: ValueKind::String,
    value: Value::string("Ada"),
}

test_case! {
    name: invalid_regex_raises,
    input: r#"matches([name], "[")"#,
    error: "R008",
}

// ======== Process scope ========

test_case! {
    name: macro_reference,
    input: "%{greeting} + \" \" + [name]",
    kind: ValueKind::String,
    value: Value::string("hi Ada"),
}

test_case! {
    name: unknown_macro_reference,
    input: "%{nope}",
    error: "R002",
}

test_case! {
    name: macro_with_default,
    input: r#"macro("nope", "fallback")"#,
    kind: ValueKind::String,
    value: Value::string("fallback"),
}

test_case! {
    name: process_parameter,
    input: r#"param("Read CSV", "file")"#,
    kind: ValueKind::String,
    value: Value::string("data.csv"),
}

test_case! {
    name: unknown_process_parameter,
    input: r#"param("Read CSV", "encoding")"#,
    error: "R003",
}

// ======== Resolution errors ========

test_case! {
    name: unknown_function,
    input: "frobnicate(1)",
    error: "E005",
}

test_case! {
    name: wrong_argument_kind,
    input: "sqrt([name])",
    error: "E003",
}

test_case! {
    name: wrong_arity,
    input: "sqrt(1, 2)",
    error: "E004",
}

test_case! {
    name: unknown_attribute,
    input: "[nope] + 1",
    error: "E007",
}

test_case! {
    name: unknown_identifier,
    input: "nope + 1",
    error: "E006",
}
