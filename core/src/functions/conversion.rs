use super::{Category, FunctionDescriptor, FunctionRegistry, number, text};
use crate::types::{KindSet, ValueKind};
use crate::values::{Value, format_fixed, format_minimal};

/// Parses a number, returning NaN for text that is not one.
fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    match trimmed {
        "∞" | "+∞" => f64::INFINITY,
        "-∞" => f64::NEG_INFINITY,
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(
        FunctionDescriptor::builder("parse", Category::Conversion)
            .describe("Parses text as a number; NaN when the text is not a number")
            .params([KindSet::STRING])
            .returns(ValueKind::Double)
            .body(|_, args| Ok(Value::double(text(args, 0).map_or(f64::NAN, parse_number)))),
    );
    registry.register(
        FunctionDescriptor::builder("str", Category::Conversion)
            .describe("Renders a number as text, with three decimals for non-integers")
            .params([KindSet::NUMERIC])
            .returns(ValueKind::String)
            .body(|_, args| {
                // Averages and negative powers leave fractions in INTEGER values.
                let rendered = match args[0] {
                    Value::Integer(value) if value.fract() == 0.0 => format_minimal(value),
                    _ => format_fixed(number(args, 0)),
                };
                Ok(Value::String(rendered))
            }),
    );
}
