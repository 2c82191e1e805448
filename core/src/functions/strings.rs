use core::cmp::Ordering;

use regex::Regex;

use super::{Category, FunctionDescriptor, FunctionError, FunctionRegistry, text};
use crate::types::{KindSet, ValueKind};
use crate::values::Value;

pub(super) fn regex(pattern: &str) -> Result<Regex, FunctionError> {
    Regex::new(pattern).map_err(|err| FunctionError::InvalidRegex {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

/// Lexicographic comparison over UTF-16 code units: the difference of the first
/// differing units, or of the lengths when one string is a prefix of the other.
fn compare_utf16(a: &str, b: &str) -> i64 {
    let mut left = a.encode_utf16();
    let mut right = b.encode_utf16();
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) if x != y => return i64::from(x) - i64::from(y),
            (Some(_), Some(_)) => continue,
            (None, None) => return 0,
            (Some(_), None) => return 1 + left.count() as i64,
            (None, Some(_)) => return -1 - right.count() as i64,
        }
    }
}

/// Character index of the first occurrence of `needle`, or -1.
fn char_index(haystack: &str, needle: &str) -> i64 {
    haystack
        .find(needle)
        .map_or(-1, |byte| haystack[..byte].chars().count() as i64)
}

/// Registers a predicate over two strings; missing when either is missing.
fn predicate(
    registry: &mut FunctionRegistry,
    name: &str,
    description: &str,
    f: fn(&str, &str) -> Result<bool, FunctionError>,
) {
    registry.register(
        FunctionDescriptor::builder(name, Category::StringInformation)
            .describe(description)
            .params([KindSet::STRING, KindSet::STRING])
            .returns(ValueKind::Boolean)
            .body(move |_, args| match (text(args, 0), text(args, 1)) {
                (Some(a), Some(b)) => Ok(Value::boolean(f(a, b)?)),
                _ => Ok(Value::missing(ValueKind::Boolean)),
            }),
    );
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    predicate(registry, "contains", "Whether the text contains the search string", |a, b| {
        Ok(a.contains(b))
    });
    predicate(registry, "equals", "Whether both texts are equal", |a, b| Ok(a == b));
    predicate(registry, "starts", "Whether the text starts with the prefix", |a, b| {
        Ok(a.starts_with(b))
    });
    predicate(registry, "ends", "Whether the text ends with the suffix", |a, b| {
        Ok(a.ends_with(b))
    });
    predicate(
        registry,
        "matches",
        "Whether the whole text matches the regular expression",
        |a, pattern| Ok(regex(&format!("^(?:{})$", pattern))?.is_match(a)),
    );
    predicate(
        registry,
        "finds",
        "Whether the regular expression matches somewhere in the text",
        |a, pattern| Ok(regex(pattern)?.is_match(a)),
    );

    registry.register(
        FunctionDescriptor::builder("compare", Category::StringInformation)
            .describe("Lexicographic comparison: negative, zero or positive")
            .params([KindSet::STRING, KindSet::STRING])
            .returns(ValueKind::Integer)
            .body(|_, args| {
                Ok(Value::integer(match (text(args, 0), text(args, 1)) {
                    (Some(a), Some(b)) => compare_utf16(a, b) as f64,
                    _ => f64::NAN,
                }))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("index", Category::StringInformation)
            .describe("Character position of the search string in the text, or -1")
            .params([KindSet::STRING, KindSet::STRING])
            .returns(ValueKind::Integer)
            .body(|_, args| {
                Ok(Value::integer(match (text(args, 0), text(args, 1)) {
                    (Some(a), Some(b)) => char_index(a, b) as f64,
                    _ => f64::NAN,
                }))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("length", Category::StringInformation)
            .describe("Number of characters in the text")
            .params([KindSet::STRING])
            .returns(ValueKind::Integer)
            .body(|_, args| {
                Ok(Value::integer(
                    text(args, 0).map_or(f64::NAN, |a| a.chars().count() as f64),
                ))
            }),
    );
}

/// Sign of a UTF-16 comparison, for callers that only need the ordering.
pub(crate) fn compare_strings(a: &str, b: &str) -> Ordering {
    compare_utf16(a, b).cmp(&0)
}
