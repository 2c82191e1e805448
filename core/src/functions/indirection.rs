//! `eval` and `attribute`: formulas and attribute names computed at evaluation time.

use super::{
    Arity, Category, FunctionDescriptor, FunctionError, FunctionRegistry, KindRequest, ResultKind,
    text,
};
use crate::api;
use crate::types::{KindSet, ValueKind, parse_kind_name};
use crate::values::Value;

/// Kind named by the constant argument at `index`.
fn kind_argument(request: &KindRequest<'_, '_>, index: usize) -> Result<ValueKind, String> {
    let arg = &request.args[index];
    let Some(constant) = &arg.constant else {
        return Err("the kind argument must be a constant kind name such as REAL".to_string());
    };
    let name = constant
        .as_str()
        .ok_or_else(|| format!("the kind argument must be text, found {}", constant.kind()))?;
    parse_kind_name(name).ok_or_else(|| format!("unknown kind name '{}'", name))
}

fn eval_kind(request: &KindRequest<'_, '_>) -> Result<ValueKind, String> {
    if request.args.len() > 1 {
        return kind_argument(request, 1);
    }
    let formula = request.constant_str(0).ok_or_else(|| {
        "without a kind argument the formula must be a constant string".to_string()
    })?;
    let nested = request
        .context
        .nested()
        .map_err(|err| format!("nested formulas exceed the maximum depth of {}", err.max_nesting))?;
    api::compile(formula, &nested)
        .map(|expr| expr.kind())
        .map_err(|err| format!("invalid nested formula '{}': {}", formula, err))
}

fn attribute_kind(request: &KindRequest<'_, '_>) -> Result<ValueKind, String> {
    if request.args.len() > 1 {
        return kind_argument(request, 1);
    }
    let name = request.constant_str(0).ok_or_else(|| {
        "without a kind argument the attribute name must be a constant string".to_string()
    })?;
    request
        .context
        .variable_kind(name)
        .ok_or_else(|| format!("unknown attribute '{}'", name))
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(
        FunctionDescriptor::builder("eval", Category::Indirection)
            .describe("Evaluates formula text, optionally converting the result to a kind")
            .params([KindSet::STRING, KindSet::STRING])
            .arity(Arity::Range(1, 2))
            .result(ResultKind::custom(eval_kind))
            .body(|call, args| match text(args, 0) {
                Some(formula) => call.coerce(call.evaluate_formula(formula)?),
                None => Ok(Value::missing(call.result_kind)),
            }),
    );
    registry.register(
        FunctionDescriptor::builder("attribute", Category::Indirection)
            .describe("Value of the attribute with the given name, optionally converted")
            .params([KindSet::STRING, KindSet::STRING])
            .arity(Arity::Range(1, 2))
            .result(ResultKind::custom(attribute_kind))
            .body(|call, args| {
                let Some(name) = text(args, 0) else {
                    return Ok(Value::missing(call.result_kind));
                };
                let value = call
                    .context
                    .variable_value(name)
                    .ok_or_else(|| FunctionError::UnknownAttribute(name.to_string()))?;
                call.coerce(value)
            }),
    );
}
