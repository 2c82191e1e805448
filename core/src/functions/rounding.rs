use super::{Arity, Category, FunctionDescriptor, FunctionRegistry, ResultKind, number};
use crate::types::{KindSet, ValueKind};
use crate::values::Value;

/// Beyond this many digits scaling by a power of ten overflows.
const MAX_DIGITS: f64 = 300.0;

/// Applies `round_fn` at `precision` decimal places.
///
/// A NaN precision means zero places, `+∞` leaves the value unchanged and `-∞` yields
/// NaN. Finite precisions are truncated to whole digits and may be negative.
pub(crate) fn round_to(value: f64, precision: Option<f64>, round_fn: fn(f64) -> f64) -> f64 {
    let digits = match precision {
        None => return round_fn(value),
        Some(p) if p.is_nan() => return round_fn(value),
        Some(p) if p == f64::INFINITY => return value,
        Some(p) if p == f64::NEG_INFINITY => return f64::NAN,
        Some(p) => p.trunc(),
    };
    if !value.is_finite() || digits >= MAX_DIGITS {
        return value;
    }
    if digits <= -MAX_DIGITS {
        return round_fn(0.0) * value.signum();
    }
    if digits >= 0.0 {
        let scale = 10f64.powi(digits as i32);
        round_fn(value * scale) / scale
    } else {
        let scale = 10f64.powi(-digits as i32);
        round_fn(value / scale) * scale
    }
}

fn rounding(registry: &mut FunctionRegistry, name: &str, description: &str, round_fn: fn(f64) -> f64) {
    registry.register(
        FunctionDescriptor::builder(name, Category::Rounding)
            .describe(description)
            .params([KindSet::NUMERIC, KindSet::NUMERIC])
            .arity(Arity::Range(1, 2))
            .result(ResultKind::ByArity {
                one: ValueKind::Integer,
                more: ValueKind::Double,
            })
            .body(move |call, args| {
                let precision = (args.len() > 1).then(|| number(args, 1));
                Ok(Value::number(
                    call.result_kind,
                    round_to(number(args, 0), precision, round_fn),
                ))
            }),
    );
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    rounding(
        registry,
        "round",
        "Rounds half away from zero, optionally to a number of decimal places",
        f64::round,
    );
    rounding(
        registry,
        "rint",
        "Rounds half to even, optionally to a number of decimal places",
        f64::round_ties_even,
    );
    rounding(
        registry,
        "floor",
        "Rounds down, optionally to a number of decimal places",
        f64::floor,
    );
    rounding(
        registry,
        "ceil",
        "Rounds up, optionally to a number of decimal places",
        f64::ceil,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_to(1.666, Some(2.0), f64::round), 1.67);
        assert_eq!(round_to(1234.5, Some(-2.0), f64::round), 1200.0);
        assert_eq!(round_to(2.5, None, f64::round_ties_even), 2.0);
        assert_eq!(round_to(1.5, None, f64::round_ties_even), 2.0);
        assert_eq!(round_to(-2.5, None, f64::round), -3.0);
        assert_eq!(round_to(1.29, Some(1.9), f64::floor), 1.2);
    }

    #[test]
    fn test_non_finite_precision() {
        assert_eq!(round_to(1.666, Some(f64::NAN), f64::round), 2.0);
        assert_eq!(round_to(1.666, Some(f64::INFINITY), f64::round), 1.666);
        assert!(round_to(1.666, Some(f64::NEG_INFINITY), f64::round).is_nan());
        assert!(round_to(f64::NAN, Some(2.0), f64::round).is_nan());
    }
}
