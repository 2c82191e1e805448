//! Shared fixture for the integration tests: a seeded engine and one row.
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use formula::{Bindings, Engine, EngineOptions, Error, Value, ValueKind};

/// The row every case is compiled and evaluated against.
pub fn row() -> Bindings {
    Bindings::new()
        .with("integer", Value::integer(5.0))
        .with("real", Value::double(2.5))
        .with("name", Value::string("Ada"))
        .with("text", Value::string("Hello World"))
        .with("flag", Value::boolean(true))
        .with("c", Value::boolean(false))
        .with("gap", Value::missing(ValueKind::Double))
        .with("none", Value::missing(ValueKind::String))
        .with(
            "when",
            Value::date(Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap()),
        )
}

pub fn engine() -> Engine {
    let mut engine = Engine::seeded(1, EngineOptions::default());
    engine.define_macro("greeting", "hi");
    engine.set_parameter("Read CSV", "file", "data.csv");
    engine
}

pub fn run(input: &str) -> Result<(ValueKind, Value), Error> {
    let engine = engine();
    let row = row();
    let formula = engine.compile(input, &row)?;
    let value = formula.run(&row)?;
    Ok((formula.kind(), value))
}

pub fn run_ok(input: &str) -> (ValueKind, Value) {
    match run(input) {
        Ok(result) => result,
        Err(err) => panic!("'{}' failed: {}", input, err),
    }
}

pub fn run_err(input: &str) -> Error {
    match run(input) {
        Ok((kind, value)) => panic!("'{}' returned {} ({}) but should fail", input, value, kind),
        Err(err) => err,
    }
}

/// Declares one formula test.
///
/// `kind`/`value` check a successful run; `error` checks the diagnostic code of a failure.
#[allow(unused_macros)]
macro_rules! test_case {
    (name: $name:ident, input: $input:expr, kind: $kind:expr, value: $value:expr $(,)?) => {
        #[test]
        fn $name() {
            let (kind, value) = crate::cases::run_ok($input);
            pretty_assertions::assert_eq!(kind, $kind, "kind of {}", $input);
            pretty_assertions::assert_eq!(value, $value, "value of {}", $input);
        }
    };
    (name: $name:ident, input: $input:expr, missing: $kind:expr $(,)?) => {
        #[test]
        fn $name() {
            let (kind, value) = crate::cases::run_ok($input);
            pretty_assertions::assert_eq!(kind, $kind, "kind of {}", $input);
            assert!(value.is_missing(), "{} should be missing, got {}", $input, value);
        }
    };
    (name: $name:ident, input: $input:expr, error: $code:expr $(,)?) => {
        #[test]
        fn $name() {
            let err = crate::cases::run_err($input);
            pretty_assertions::assert_eq!(
                err.to_diagnostic().code.as_deref(),
                Some($code),
                "{}",
                err
            );
        }
    };
}
