use super::{Arity, Category, FunctionDescriptor, FunctionError, FunctionRegistry, number, text};
use crate::types::{KindSet, ValueKind};
use crate::values::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(
        FunctionDescriptor::builder("rand", Category::Process)
            .describe("Random number in [0, 1); a seed makes the sequence reproducible")
            .params([KindSet::NUMERIC])
            .arity(Arity::Range(0, 1))
            .returns(ValueKind::Double)
            .body(|call, args| {
                let seed = match args.first() {
                    Some(_) => {
                        let seed = number(args, 0);
                        (seed.is_finite()).then(|| seed.trunc() as i64)
                    }
                    None => None,
                };
                Ok(Value::double(call.context.random(seed)))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("param", Category::Process)
            .describe("Value of a parameter of an operator in the running process")
            .params([KindSet::STRING, KindSet::STRING])
            .returns(ValueKind::String)
            .body(|call, args| {
                let (Some(operator), Some(parameter)) = (text(args, 0), text(args, 1)) else {
                    return Ok(Value::missing(ValueKind::String));
                };
                call.context
                    .parameter(operator, parameter)
                    .map(Value::string)
                    .ok_or_else(|| FunctionError::UnknownParameter {
                        operator: operator.to_string(),
                        parameter: parameter.to_string(),
                    })
            }),
    );
    registry.register(
        FunctionDescriptor::builder("macro", Category::Process)
            .describe("Value of a macro, or the default when it is not defined")
            .params([KindSet::STRING, KindSet::STRING])
            .arity(Arity::Range(1, 2))
            .returns(ValueKind::String)
            .body(|call, args| {
                let Some(name) = text(args, 0) else {
                    return Ok(Value::missing(ValueKind::String));
                };
                match call.context.macro_value(name) {
                    Some(value) => Ok(Value::string(value)),
                    None if args.len() > 1 => Ok(args[1].clone()),
                    None => Err(FunctionError::UnknownMacro(name.to_string())),
                }
            }),
    );
}
