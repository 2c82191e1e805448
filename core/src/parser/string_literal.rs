//! Unescaping of string literals and attribute names.

use std::borrow::Cow;
use thiserror::Error;

/// Errors that can occur when unescaping string literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnescapeError {
    /// Invalid escape sequence (e.g., `\q`)
    #[error("invalid escape sequence '{seq}' at position {pos}")]
    InvalidEscape { pos: usize, seq: String },
    /// Incomplete Unicode escape (not enough digits)
    #[error("incomplete Unicode escape at position {pos}: expected 4 digits, got {got}")]
    IncompleteUnicodeEscape { pos: usize, got: usize },
    /// Invalid Unicode scalar value
    #[error("invalid Unicode scalar value U+{value:X} at position {pos}")]
    InvalidUnicodeScalar { pos: usize, value: u32 },
}

/// Unescape the content of a string literal (without the surrounding quotes).
///
/// Supports `\"`, `\\`, `\n`, `\r`, `\t` and `\uXXXX`. Returns the input unchanged when
/// it contains no backslash.
pub fn unescape_string(input: &str) -> Result<Cow<'_, str>, UnescapeError> {
    if !input.contains('\\') {
        return Ok(Cow::Borrowed(input));
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();
    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some((_, '"')) => out.push('"'),
            Some((_, '\\')) => out.push('\\'),
            Some((_, 'n')) => out.push('\n'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, 't')) => out.push('\t'),
            Some((_, 'u')) => {
                let mut value = 0u32;
                let mut got = 0;
                while got < 4 {
                    match chars.peek().and_then(|(_, c)| c.to_digit(16)) {
                        Some(digit) => {
                            value = value * 16 + digit;
                            got += 1;
                            chars.next();
                        }
                        None => break,
                    }
                }
                if got < 4 {
                    return Err(UnescapeError::IncompleteUnicodeEscape { pos, got });
                }
                let ch = char::from_u32(value)
                    .ok_or(UnescapeError::InvalidUnicodeScalar { pos, value })?;
                out.push(ch);
            }
            Some((_, other)) => {
                return Err(UnescapeError::InvalidEscape {
                    pos,
                    seq: format!("\\{}", other),
                });
            }
            None => {
                return Err(UnescapeError::InvalidEscape {
                    pos,
                    seq: "\\".to_string(),
                });
            }
        }
    }
    Ok(Cow::Owned(out))
}

/// Unescape an attribute name from `[...]`, where a backslash escapes the next character.
pub fn unescape_attribute_name(input: &str) -> Cow<'_, str> {
    if !input.contains('\\') {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_escapes_borrows() {
        assert!(matches!(unescape_string("plain"), Ok(Cow::Borrowed("plain"))));
    }

    #[test]
    fn test_common_escapes() {
        assert_eq!(
            unescape_string(r#"a\"b\\c\nd\re\tf"#).unwrap(),
            "a\"b\\c\nd\re\tf"
        );
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(unescape_string(r"\u00e9t\u00e9").unwrap(), "été");
    }

    #[test]
    fn test_surrogate_is_rejected() {
        assert_eq!(
            unescape_string(r"\ud800"),
            Err(UnescapeError::InvalidUnicodeScalar {
                pos: 0,
                value: 0xd800
            })
        );
    }

    #[test]
    fn test_invalid_escape() {
        assert!(matches!(
            unescape_string(r"\q"),
            Err(UnescapeError::InvalidEscape { .. })
        ));
    }

    #[test]
    fn test_attribute_name_escapes() {
        assert_eq!(unescape_attribute_name(r"a\]b\\c"), "a]b\\c");
        assert_eq!(unescape_attribute_name("my attr"), "my attr");
    }
}
