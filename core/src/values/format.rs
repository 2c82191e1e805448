//! The two numeric rendering paths.
//!
//! Implicit stringification (string `+`, equality against strings, coercion to `STRING`)
//! uses the minimal representation; the `str()` function uses a fixed three-decimal
//! representation. Both render infinities with the infinity glyph and leave NaN to the
//! caller as a missing value.

use chrono::{DateTime, Utc};

/// Canonical rendering of a date in implicit stringification.
pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const INFINITY_GLYPH: &str = "∞";
const NEG_INFINITY_GLYPH: &str = "-∞";

/// Whole numbers below this magnitude are printed without a fraction or exponent.
const PLAIN_INTEGER_LIMIT: f64 = 1e15;

fn format_non_finite(value: f64) -> Option<Option<String>> {
    if value.is_nan() {
        Some(None)
    } else if value == f64::INFINITY {
        Some(Some(INFINITY_GLYPH.to_string()))
    } else if value == f64::NEG_INFINITY {
        Some(Some(NEG_INFINITY_GLYPH.to_string()))
    } else {
        None
    }
}

/// Minimal representation: `15.0` → `"15"`, `3.5` → `"3.5"`, `1e300` → `"1e300"`.
pub fn format_minimal(value: f64) -> Option<String> {
    if let Some(rendered) = format_non_finite(value) {
        return rendered;
    }
    let magnitude = value.abs();
    if value.fract() == 0.0 && magnitude < PLAIN_INTEGER_LIMIT {
        Some(format!("{}", value as i64))
    } else if magnitude >= PLAIN_INTEGER_LIMIT || magnitude < 1e-4 {
        Some(format!("{:e}", value))
    } else {
        Some(format!("{}", value))
    }
}

/// Fixed representation with exactly three decimals: `4711.7` → `"4711.700"`.
pub fn format_fixed(value: f64) -> Option<String> {
    if let Some(rendered) = format_non_finite(value) {
        return rendered;
    }
    Some(format!("{:.3}", value))
}

pub fn render_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_whole_numbers() {
        assert_eq!(format_minimal(15.0).as_deref(), Some("15"));
        assert_eq!(format_minimal(-3.0).as_deref(), Some("-3"));
        assert_eq!(format_minimal(-0.0).as_deref(), Some("0"));
    }

    #[test]
    fn test_minimal_fractions() {
        assert_eq!(format_minimal(3.5).as_deref(), Some("3.5"));
        assert_eq!(format_minimal(4711.7).as_deref(), Some("4711.7"));
    }

    #[test]
    fn test_minimal_extremes() {
        assert_eq!(format_minimal(1e300).as_deref(), Some("1e300"));
        assert_eq!(format_minimal(0.00001).as_deref(), Some("1e-5"));
    }

    #[test]
    fn test_fixed() {
        assert_eq!(format_fixed(4711.7).as_deref(), Some("4711.700"));
        assert_eq!(format_fixed(2.0).as_deref(), Some("2.000"));
        assert_eq!(format_fixed(1.23456).as_deref(), Some("1.235"));
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_minimal(f64::INFINITY).as_deref(), Some("∞"));
        assert_eq!(format_fixed(f64::NEG_INFINITY).as_deref(), Some("-∞"));
        assert_eq!(format_minimal(f64::NAN), None);
        assert_eq!(format_fixed(f64::NAN), None);
    }
}
