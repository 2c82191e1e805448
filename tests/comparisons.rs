use formula::{Value, ValueKind};

#[macro_use]
mod cases;

// ======== Equality never raises ========

test_case! {
    name: missing_numeric_equals_itself,
    input: "MISSING_NUMERIC == MISSING_NUMERIC",
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

test_case! {
    name: missing_values_of_different_kinds_differ,
    input: "MISSING_NUMERIC == MISSING_NOMINAL",
    kind: ValueKind::Boolean,
    value: Value::boolean(false),
}

test_case! {
    name: missing_attribute_equals_missing_constant,
    input: "[gap] == MISSING_NUMERIC",
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

test_case! {
    name: missing_never_equals_present,
    input: "[none] == \"\"",
    kind: ValueKind::Boolean,
    value: Value::boolean(false),
}

test_case! {
    name: number_equals_its_rendering,
    input: r#"3 == "3""#,
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

test_case! {
    name: fraction_equals_its_rendering,
    input: r#"[real] == "2.5""#,
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

test_case! {
    name: boolean_against_number,
    input: "[flag] == 1 && [c] == 0",
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

test_case! {
    name: boolean_against_string,
    input: r#"[flag] == "true""#,
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

test_case! {
    name: integer_and_double_compare_numerically,
    input: "[integer] == [real] * 2",
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

test_case! {
    name: not_equal,
    input: r#"[name] != "Bob""#,
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

// ======== Ordering ========

test_case! {
    name: string_ordering,
    input: r#""apple" < "banana""#,
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

test_case! {
    name: numeric_ordering_across_kinds,
    input: "[integer] >= [real]",
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

test_case! {
    name: ordering_against_missing_string_is_false,
    input: r#""boom" < MISSING_NOMINAL"#,
    kind: ValueKind::Boolean,
    value: Value::boolean(false),
}

test_case! {
    name: ordering_against_missing_number_is_false,
    input: "[gap] > -1/0",
    kind: ValueKind::Boolean,
    value: Value::boolean(false),
}

test_case! {
    name: ordering_string_against_number_is_type_error,
    input: "MISSING_NOMINAL < 8",
    error: "E001",
}

test_case! {
    name: dates_are_not_orderable,
    input: "[when] < [when]",
    error: "E001",
}

test_case! {
    name: booleans_are_not_orderable,
    input: "[flag] > [c]",
    error: "E001",
}

// ======== Logic ========

test_case! {
    name: missing_poisons_and,
    input: r#"contains(MISSING_NOMINAL, "x") && FALSE"#,
    missing: ValueKind::Boolean,
}

test_case! {
    name: missing_poisons_or,
    input: "TRUE || [gap]",
    missing: ValueKind::Boolean,
}

test_case! {
    name: numbers_are_truthy,
    input: "[integer] && !0",
    kind: ValueKind::Boolean,
    value: Value::boolean(true),
}

test_case! {
    name: strings_are_not_logical,
    input: "[name] || TRUE",
    error: "E001",
}
