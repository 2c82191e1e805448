use super::strings::regex;
use super::{Category, FunctionDescriptor, FunctionError, FunctionRegistry, number, text};
use crate::types::{KindSet, ValueKind};
use crate::values::Value;

/// Whole character count from a numeric argument; `None` for NaN.
fn count(value: f64) -> Option<i64> {
    if value.is_nan() {
        None
    } else if value.is_infinite() {
        Some(if value > 0.0 { i64::MAX } else { i64::MIN })
    } else {
        Some(value.trunc() as i64)
    }
}

/// Characters `start .. start + length`; out of range is an error.
fn cut(text: &str, start: f64, length: f64) -> Result<Option<String>, FunctionError> {
    let (Some(first), Some(len)) = (count(start), count(length)) else {
        return Ok(None);
    };
    let total = text.chars().count();
    let out_of_range = |index: i64| FunctionError::IndexOutOfRange {
        index: index as f64,
        length: total,
    };
    if first < 0 || first as usize > total {
        return Err(out_of_range(first));
    }
    if len < 0 || first.saturating_add(len) as usize > total {
        return Err(out_of_range(first.saturating_add(len)));
    }
    Ok(Some(
        text.chars().skip(first as usize).take(len as usize).collect(),
    ))
}

/// First `n` characters, clamped to the text.
fn prefix(text: &str, n: i64) -> String {
    text.chars().take(n.max(0) as usize).collect()
}

/// Last `n` characters, clamped to the text.
fn suffix(text: &str, n: i64) -> String {
    let total = text.chars().count();
    let keep = (n.max(0) as usize).min(total);
    text.chars().skip(total - keep).collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn map_text(registry: &mut FunctionRegistry, name: &str, description: &str, f: fn(&str) -> String) {
    registry.register(
        FunctionDescriptor::builder(name, Category::StringTransformation)
            .describe(description)
            .params([KindSet::STRING])
            .returns(ValueKind::String)
            .body(move |_, args| Ok(Value::String(text(args, 0).map(f)))),
    );
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(
        FunctionDescriptor::builder("concat", Category::StringTransformation)
            .describe("Concatenates its arguments; missing arguments contribute nothing")
            .rest(KindSet::STRING)
            .returns(ValueKind::String)
            .body(|_, args| {
                if !args.is_empty() && args.iter().all(Value::is_missing) {
                    return Ok(Value::missing(ValueKind::String));
                }
                Ok(Value::string(
                    args.iter().filter_map(Value::as_str).collect::<String>(),
                ))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("replaceAll", Category::StringTransformation)
            .describe("Replaces every match of a regular expression; $1 refers to groups")
            .params([KindSet::STRING, KindSet::STRING, KindSet::STRING])
            .returns(ValueKind::String)
            .body(|_, args| match (text(args, 0), text(args, 1), text(args, 2)) {
                (Some(input), Some(pattern), Some(replacement)) => Ok(Value::string(
                    regex(pattern)?.replace_all(input, replacement).into_owned(),
                )),
                _ => Ok(Value::missing(ValueKind::String)),
            }),
    );
    registry.register(
        FunctionDescriptor::builder("replace", Category::StringTransformation)
            .describe("Replaces every occurrence of a literal search string")
            .params([KindSet::STRING, KindSet::STRING, KindSet::STRING])
            .returns(ValueKind::String)
            .body(|_, args| match (text(args, 0), text(args, 1), text(args, 2)) {
                (Some(input), Some(search), Some(replacement)) => {
                    Ok(Value::string(input.replace(search, replacement)))
                }
                _ => Ok(Value::missing(ValueKind::String)),
            }),
    );
    registry.register(
        FunctionDescriptor::builder("cut", Category::StringTransformation)
            .describe("Substring of a length from a start index; fails when out of range")
            .params([KindSet::STRING, KindSet::NUMERIC, KindSet::NUMERIC])
            .returns(ValueKind::String)
            .body(|_, args| match text(args, 0) {
                Some(input) => Ok(Value::String(cut(input, number(args, 1), number(args, 2))?)),
                None => Ok(Value::missing(ValueKind::String)),
            }),
    );
    registry.register(
        FunctionDescriptor::builder("prefix", Category::StringTransformation)
            .describe("The first n characters, or the whole text if shorter")
            .params([KindSet::STRING, KindSet::NUMERIC])
            .returns(ValueKind::String)
            .body(|_, args| {
                Ok(Value::String(
                    text(args, 0)
                        .zip(count(number(args, 1)))
                        .map(|(input, n)| prefix(input, n)),
                ))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("suffix", Category::StringTransformation)
            .describe("The last n characters, or the whole text if shorter")
            .params([KindSet::STRING, KindSet::NUMERIC])
            .returns(ValueKind::String)
            .body(|_, args| {
                Ok(Value::String(
                    text(args, 0)
                        .zip(count(number(args, 1)))
                        .map(|(input, n)| suffix(input, n)),
                ))
            }),
    );
    registry.register(
        FunctionDescriptor::builder("char", Category::StringTransformation)
            .describe("The character at an index; missing when out of range")
            .params([KindSet::STRING, KindSet::NUMERIC])
            .returns(ValueKind::String)
            .body(|_, args| {
                let found = text(args, 0)
                    .zip(count(number(args, 1)))
                    .filter(|(_, index)| *index >= 0)
                    .and_then(|(input, index)| input.chars().nth(index as usize))
                    .map(String::from);
                Ok(Value::String(found))
            }),
    );

    map_text(registry, "lower", "Lower case", str::to_lowercase);
    map_text(registry, "upper", "Upper case", str::to_uppercase);
    map_text(registry, "trim", "Removes leading and trailing whitespace", |s| {
        s.trim().to_string()
    });
    map_text(
        registry,
        "escape_html",
        "Escapes the characters HTML treats specially",
        escape_html,
    );

}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cut() {
        assert_eq!(cut("hello", 1.0, 3.0).unwrap().as_deref(), Some("ell"));
        assert_eq!(cut("hello", 5.0, 0.0).unwrap().as_deref(), Some(""));
        assert!(cut("hello", 3.0, 5.0).is_err());
        assert!(cut("hello", -1.0, 2.0).is_err());
        assert_eq!(cut("hello", f64::NAN, 2.0).unwrap(), None);
    }

    #[test]
    fn test_prefix_and_suffix_clamp() {
        assert_eq!(prefix("hello", 2), "he");
        assert_eq!(prefix("hello", 10), "hello");
        assert_eq!(prefix("hello", -1), "");
        assert_eq!(suffix("hello", 3), "llo");
        assert_eq!(suffix("hello", 10), "hello");
        assert_eq!(suffix("hello", -3), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
