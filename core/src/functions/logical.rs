use super::{Category, FunctionDescriptor, FunctionRegistry, number};
use crate::evaluator::operators::{logical_and, logical_not, logical_or};
use crate::types::{KindSet, ValueKind};
use crate::values::Value;

const TRUTHY: KindSet = KindSet::NUMERIC.union(KindSet::BOOLEAN);

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(
        FunctionDescriptor::builder("and", Category::Logical)
            .describe("Logical conjunction; missing if either argument is missing")
            .params([TRUTHY, TRUTHY])
            .returns(ValueKind::Boolean)
            .body(|_, args| Ok(logical_and(&args[0], &args[1]))),
    );
    registry.register(
        FunctionDescriptor::builder("or", Category::Logical)
            .describe("Logical disjunction; missing if either argument is missing")
            .params([TRUTHY, TRUTHY])
            .returns(ValueKind::Boolean)
            .body(|_, args| Ok(logical_or(&args[0], &args[1]))),
    );
    registry.register(
        FunctionDescriptor::builder("not", Category::Logical)
            .describe("Logical negation")
            .params([TRUTHY])
            .returns(ValueKind::Boolean)
            .body(|_, args| Ok(logical_not(&args[0]))),
    );

    registry.register(
        FunctionDescriptor::builder("missing", Category::Comparison)
            .describe("Whether the argument is a missing value")
            .params([KindSet::ANY])
            .returns(ValueKind::Boolean)
            .body(|_, args| Ok(Value::boolean(args[0].is_missing()))),
    );
    registry.register(
        FunctionDescriptor::builder("isFinite", Category::Comparison)
            .describe("Whether the argument is neither infinite nor missing")
            .params([KindSet::NUMERIC])
            .returns(ValueKind::Boolean)
            .body(|_, args| {
                let value = number(args, 0);
                if value.is_nan() {
                    Ok(Value::missing(ValueKind::Boolean))
                } else {
                    Ok(Value::boolean(value.is_finite()))
                }
            }),
    );
}
