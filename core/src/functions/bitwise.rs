use super::{Category, FunctionDescriptor, FunctionError, FunctionRegistry, number};
use crate::types::{KindSet, ValueKind};
use crate::values::Value;

/// Largest magnitude at which every whole `f64` is exactly representable.
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

fn whole(value: f64) -> Result<i64, FunctionError> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        Ok(value as i64)
    } else {
        Err(FunctionError::NonIntegral { value })
    }
}

fn binary(registry: &mut FunctionRegistry, name: &str, description: &str, op: fn(i64, i64) -> i64) {
    registry.register(
        FunctionDescriptor::builder(name, Category::Bitwise)
            .describe(description)
            .params([KindSet::NUMERIC, KindSet::NUMERIC])
            .returns(ValueKind::Integer)
            .body(move |_, args| {
                let left = whole(number(args, 0))?;
                let right = whole(number(args, 1))?;
                Ok(Value::integer(op(left, right) as f64))
            }),
    );
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    binary(registry, "bit_and", "Bitwise AND of two whole numbers", |a, b| a & b);
    binary(registry, "bit_or", "Bitwise OR of two whole numbers", |a, b| a | b);
    binary(registry, "bit_xor", "Bitwise XOR of two whole numbers", |a, b| a ^ b);
    registry.register(
        FunctionDescriptor::builder("bit_not", Category::Bitwise)
            .describe("Bitwise complement of a whole number")
            .params([KindSet::NUMERIC])
            .returns(ValueKind::Integer)
            .body(|_, args| Ok(Value::integer(!whole(number(args, 0))? as f64))),
    );
}
