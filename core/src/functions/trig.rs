use super::{Category, FunctionDescriptor, FunctionRegistry, number, unary_double};
use crate::types::{KindSet, ValueKind};
use crate::values::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    let t = Category::Trigonometric;
    unary_double(registry, "sin", t, "Sine of an angle in radians", f64::sin);
    unary_double(registry, "cos", t, "Cosine of an angle in radians", f64::cos);
    unary_double(registry, "tan", t, "Tangent of an angle in radians", f64::tan);
    unary_double(registry, "cot", t, "Cotangent of an angle in radians", |x| 1.0 / x.tan());
    unary_double(registry, "sec", t, "Secant of an angle in radians", |x| 1.0 / x.cos());
    unary_double(registry, "cosec", t, "Cosecant of an angle in radians", |x| 1.0 / x.sin());
    unary_double(registry, "asin", t, "Arc sine", f64::asin);
    unary_double(registry, "acos", t, "Arc cosine", f64::acos);
    unary_double(registry, "atan", t, "Arc tangent", f64::atan);
    unary_double(registry, "sinh", t, "Hyperbolic sine", f64::sinh);
    unary_double(registry, "cosh", t, "Hyperbolic cosine", f64::cosh);
    unary_double(registry, "tanh", t, "Hyperbolic tangent", f64::tanh);
    unary_double(registry, "asinh", t, "Inverse hyperbolic sine", f64::asinh);
    unary_double(registry, "acosh", t, "Inverse hyperbolic cosine", f64::acosh);
    unary_double(registry, "atanh", t, "Inverse hyperbolic tangent", f64::atanh);

    registry.register(
        FunctionDescriptor::builder("atan2", t)
            .describe("Angle of the point (x, y), called as atan2(y, x)")
            .params([KindSet::NUMERIC, KindSet::NUMERIC])
            .returns(ValueKind::Double)
            .body(|_, args| Ok(Value::double(number(args, 0).atan2(number(args, 1))))),
    );
}
