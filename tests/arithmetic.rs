use formula::{Value, ValueKind};

#[macro_use]
mod cases;

// ======== Integer arithmetic keeps its kind ========

test_case! {
    name: integer_product_without_row,
    input: "3*5",
    kind: ValueKind::Integer,
    value: Value::integer(15.0),
}

test_case! {
    name: precedence,
    input: "1 + 2 * 3 - 4",
    kind: ValueKind::Integer,
    value: Value::integer(3.0),
}

test_case! {
    name: power_is_right_associative,
    input: "2 ^ 3 ^ 2",
    kind: ValueKind::Integer,
    value: Value::integer(512.0),
}

test_case! {
    name: modulo,
    input: "[integer] % 3",
    kind: ValueKind::Integer,
    value: Value::integer(2.0),
}

test_case! {
    name: unary_minus_on_attribute,
    input: "-[integer] + 1",
    kind: ValueKind::Integer,
    value: Value::integer(-4.0),
}

// ======== Promotion to DOUBLE ========

test_case! {
    name: division_is_always_double,
    input: "[integer] / 5",
    kind: ValueKind::Double,
    value: Value::double(1.0),
}

test_case! {
    name: mixed_operands_promote,
    input: "[integer] + [real]",
    kind: ValueKind::Double,
    value: Value::double(7.5),
}

test_case! {
    name: scientific_literal,
    input: "1.5e3 + 1",
    kind: ValueKind::Double,
    value: Value::double(1501.0),
}

// ======== Non-finite results are values, not errors ========

test_case! {
    name: division_by_zero_is_infinity,
    input: "5.0 / 0",
    kind: ValueKind::Double,
    value: Value::double(f64::INFINITY),
}

test_case! {
    name: zero_over_zero_is_missing,
    input: "0/0",
    missing: ValueKind::Double,
}

test_case! {
    name: missing_propagates,
    input: "[gap] * 2 + [integer]",
    missing: ValueKind::Double,
}

// ======== String concatenation ========

test_case! {
    name: plus_renders_minimally,
    input: r#""hello " + 4711.7"#,
    kind: ValueKind::String,
    value: Value::string("hello 4711.7"),
}

test_case! {
    name: plus_renders_whole_numbers_without_fraction,
    input: r#"[name] + 3 * 5"#,
    kind: ValueKind::String,
    value: Value::string("Ada15"),
}

test_case! {
    name: plus_renders_booleans_and_dates,
    input: r#"[flag] + " " + [when]"#,
    kind: ValueKind::String,
    value: Value::string("true 2024-03-15 12:30:00"),
}

test_case! {
    name: missing_contributes_nothing_to_concatenation,
    input: r#""a" + [gap] + [none] + "b""#,
    kind: ValueKind::String,
    value: Value::string("ab"),
}

test_case! {
    name: infinity_renders_as_glyph,
    input: r#""x" + -1/0"#,
    kind: ValueKind::String,
    value: Value::string("x-∞"),
}
