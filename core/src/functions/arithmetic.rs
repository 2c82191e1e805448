use super::{Category, FunctionDescriptor, FunctionRegistry, ResultKind, number};
use crate::types::KindSet;
use crate::values::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(
        FunctionDescriptor::builder("pow", Category::Arithmetic)
            .describe("Raises the first argument to the power of the second")
            .params([KindSet::NUMERIC, KindSet::NUMERIC])
            .result(ResultKind::Promoted)
            .body(|call, args| {
                Ok(Value::number(
                    call.result_kind,
                    number(args, 0).powf(number(args, 1)),
                ))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("mod", Category::Arithmetic)
            .describe("Remainder of dividing the first argument by the second")
            .params([KindSet::NUMERIC, KindSet::NUMERIC])
            .result(ResultKind::Promoted)
            .body(|call, args| {
                Ok(Value::number(
                    call.result_kind,
                    number(args, 0) % number(args, 1),
                ))
            }),
    );
}
