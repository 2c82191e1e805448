use super::{Arity, Category, FunctionDescriptor, FunctionError, FunctionRegistry, ResultKind, number};
use crate::types::{KindSet, ValueKind};
use crate::values::Value;

/// Folds numeric arguments, returning NaN as soon as one is missing.
fn fold(args: &[Value], init: f64, f: fn(f64, f64) -> f64) -> f64 {
    let mut acc = init;
    for value in args.iter().map(Value::to_number) {
        if value.is_nan() {
            return f64::NAN;
        }
        acc = f(acc, value);
    }
    acc
}

/// Binomial coefficient `n over k` for whole, non-negative `n` and `k`.
fn binomial(n: f64, k: f64) -> Result<f64, FunctionError> {
    if n.is_nan() || k.is_nan() {
        return Ok(f64::NAN);
    }
    if n < 0.0 || k < 0.0 || n.fract() != 0.0 || k.fract() != 0.0 || !n.is_finite() {
        return Err(FunctionError::InvalidArgument(format!(
            "binom needs whole, non-negative arguments, got {} and {}",
            n, k
        )));
    }
    if k > n {
        return Ok(0.0);
    }
    let k = k.min(n - k);
    let mut result = 1.0;
    let mut i = 1.0;
    while i <= k {
        result = result * (n - k + i) / i;
        i += 1.0;
    }
    Ok(result.round())
}

fn aggregate(registry: &mut FunctionRegistry, name: &str, description: &str, f: fn(&[Value]) -> f64) {
    registry.register(
        FunctionDescriptor::builder(name, Category::Statistical)
            .describe(description)
            .rest(KindSet::NUMERIC)
            .arity(Arity::AtLeast(1))
            .result(ResultKind::Promoted)
            .body(move |call, args| Ok(Value::number(call.result_kind, f(args)))),
    );
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    aggregate(registry, "sum", "Sum of the arguments", |args| {
        fold(args, 0.0, |a, b| a + b)
    });
    aggregate(registry, "avg", "Average of the arguments", |args| {
        fold(args, 0.0, |a, b| a + b) / args.len() as f64
    });
    aggregate(registry, "min", "Smallest argument", |args| {
        fold(args, f64::INFINITY, |a, b| if b < a { b } else { a })
    });
    aggregate(registry, "max", "Largest argument", |args| {
        fold(args, f64::NEG_INFINITY, |a, b| if b > a { b } else { a })
    });

    registry.register(
        FunctionDescriptor::builder("binom", Category::Statistical)
            .describe("Binomial coefficient: the number of ways to choose k of n")
            .params([KindSet::NUMERIC, KindSet::NUMERIC])
            .returns(ValueKind::Integer)
            .body(|_, args| Ok(Value::integer(binomial(number(args, 0), number(args, 1))?))),
    );
}
