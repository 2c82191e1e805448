use super::{Category, FunctionDescriptor, FunctionRegistry, ResultKind, number, unary_double};
use crate::types::KindSet;
use crate::values::Value;

fn signum(value: f64) -> f64 {
    if value.is_nan() || value == 0.0 {
        // Zero has no sign; NaN stays missing.
        value * 0.0
    } else {
        value.signum()
    }
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    unary_double(registry, "sqrt", Category::Mathematical, "Square root", f64::sqrt);
    unary_double(registry, "exp", Category::Mathematical, "e raised to the argument", f64::exp);
    unary_double(registry, "ln", Category::Mathematical, "Natural logarithm", f64::ln);
    unary_double(registry, "log", Category::Mathematical, "Logarithm to base 10", f64::log10);
    unary_double(registry, "ld", Category::Mathematical, "Logarithm to base 2", f64::log2);

    registry.register(
        FunctionDescriptor::builder("sgn", Category::Mathematical)
            .describe("Sign of the argument: -1, 0 or 1")
            .params([KindSet::NUMERIC])
            .result(ResultKind::Promoted)
            .body(|call, args| Ok(Value::number(call.result_kind, signum(number(args, 0))))),
    );
    registry.register(
        FunctionDescriptor::builder("abs", Category::Mathematical)
            .describe("Absolute value")
            .params([KindSet::NUMERIC])
            .result(ResultKind::Promoted)
            .body(|call, args| Ok(Value::number(call.result_kind, number(args, 0).abs()))),
    );
}
