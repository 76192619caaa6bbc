// ABOUTME: Strict parser for serialized list columns such as "['2 eggs', 'salt']"
// ABOUTME: Accepts only flat list literals of quoted strings or numbers, never evaluates input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! List literal parsing
//!
//! Food.com exports store ingredient, step, tag, and nutrition lists as text
//! such as `['2 eggs', "baker's yeast"]` or `[51.5, 0.0, 13.0]`. This module
//! tokenizes exactly that shape: a bracketed, comma-separated sequence of
//! single- or double-quoted strings or bare numeric tokens. Anything else is a
//! [`ListFieldError`] carrying the byte offset of the problem.

use nutriveci_core::errors::ListFieldError;
use serde_json::Value;
use std::iter::Peekable;
use std::str::CharIndices;

/// One scanned list element
#[derive(Debug)]
struct Element {
    offset: usize,
    text: String,
    quoted: bool,
}

/// Parse a list of strings (`['a', "b"]`)
///
/// # Errors
///
/// Returns `ListFieldError` for anything that is not a flat list of quoted strings
pub fn parse_string_list(input: &str) -> Result<Vec<String>, ListFieldError> {
    scan_elements(input)?
        .into_iter()
        .map(|element| {
            if element.quoted {
                Ok(element.text)
            } else {
                Err(ListFieldError::UnexpectedToken {
                    offset: element.offset,
                    found: element.text.chars().next().unwrap_or(' '),
                })
            }
        })
        .collect()
}

/// Parse a list of numbers (`[51.5, 0.0, 13]`)
///
/// # Errors
///
/// Returns `ListFieldError` if the list is malformed or an element is not a finite number
pub fn parse_number_list(input: &str) -> Result<Vec<f64>, ListFieldError> {
    scan_elements(input)?
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            element
                .text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or(ListFieldError::InvalidNumber {
                    index,
                    value: element.text,
                })
        })
        .collect()
}

/// Decode a string-list field that may be a JSON array, a list literal, or absent
///
/// # Errors
///
/// Returns `ListFieldError` if a string value is not a valid list literal or the
/// value has an unsupported JSON type
pub fn string_list_from_value(value: &Value) -> Result<Vec<String>, ListFieldError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(text) if text.trim().is_empty() => Ok(Vec::new()),
        Value::String(text) => parse_string_list(text),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => Ok(text.clone()),
                Value::Number(number) => Ok(number.to_string()),
                other => Err(ListFieldError::NotAList {
                    found: preview(&other.to_string()),
                }),
            })
            .collect(),
        other => Err(ListFieldError::NotAList {
            found: preview(&other.to_string()),
        }),
    }
}

/// Decode a number-list field that may be a JSON array, a list literal, or absent
///
/// # Errors
///
/// Returns `ListFieldError` if any element is not a finite number
pub fn number_list_from_value(value: &Value) -> Result<Vec<f64>, ListFieldError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(text) => parse_number_list(text),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_f64()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ListFieldError::InvalidNumber {
                        index,
                        value: item.to_string(),
                    })
            })
            .collect(),
        other => Err(ListFieldError::NotAList {
            found: preview(&other.to_string()),
        }),
    }
}

fn preview(text: &str) -> String {
    text.chars().take(32).collect()
}

fn skip_whitespace(chars: &mut Peekable<CharIndices<'_>>) {
    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
}

fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_')
}

fn scan_elements(input: &str) -> Result<Vec<Element>, ListFieldError> {
    let trimmed = input.trim();
    let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return Err(ListFieldError::NotAList {
            found: preview(trimmed),
        });
    };
    // Offsets are reported against the original input
    let base = input.len() - input.trim_start().len() + 1;

    let mut chars = inner.char_indices().peekable();
    let mut elements = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        let Some(&(offset, c)) = chars.peek() else {
            break;
        };
        match c {
            '\'' | '"' => {
                chars.next();
                let text = read_quoted(&mut chars, c, base + offset)?;
                elements.push(Element {
                    offset: base + offset,
                    text,
                    quoted: true,
                });
            }
            c if is_bare_char(c) => {
                let mut text = String::new();
                while let Some((_, c)) = chars.next_if(|(_, c)| is_bare_char(*c)) {
                    text.push(c);
                }
                elements.push(Element {
                    offset: base + offset,
                    text,
                    quoted: false,
                });
            }
            found => {
                return Err(ListFieldError::UnexpectedToken {
                    offset: base + offset,
                    found,
                })
            }
        }

        skip_whitespace(&mut chars);
        match chars.next() {
            None => break,
            Some((_, ',')) => {}
            Some((offset, found)) => {
                return Err(ListFieldError::UnexpectedToken {
                    offset: base + offset,
                    found,
                })
            }
        }
    }
    Ok(elements)
}

fn read_quoted(
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
    offset: usize,
) -> Result<String, ListFieldError> {
    let mut text = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, 'r')) => text.push('\r'),
                Some((_, 'u')) => text.push(read_unicode_escape(chars)),
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            c if c == quote => return Ok(text),
            c => text.push(c),
        }
    }
    Err(ListFieldError::UnterminatedString { offset })
}

/// `\uXXXX` as written by JSON encoders; malformed escapes become U+FFFD
fn read_unicode_escape(chars: &mut Peekable<CharIndices<'_>>) -> char {
    let mut code = 0_u32;
    for _ in 0..4 {
        match chars.next_if(|(_, c)| c.is_ascii_hexdigit()) {
            Some((_, digit)) => code = code * 16 + digit.to_digit(16).unwrap_or(0),
            None => return char::REPLACEMENT_CHARACTER,
        }
    }
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mixed_quotes_and_escapes() {
        let parsed = parse_string_list(r#"['2 eggs', "baker's yeast", 'it\'s, fine']"#).unwrap();
        assert_eq!(parsed, vec!["2 eggs", "baker's yeast", "it's, fine"]);
    }

    #[test]
    fn test_json_encoded_list_round_trips() {
        let items = vec!["tab\there".to_owned(), "quote \"x\"".to_owned(), "\u{1}".to_owned()];
        let encoded = serde_json::to_string(&items).unwrap();
        assert_eq!(parse_string_list(&encoded).unwrap(), items);
    }

    #[test]
    fn test_empty_and_trailing_comma() {
        assert!(parse_string_list("[]").unwrap().is_empty());
        assert!(parse_string_list("  [ ]  ").unwrap().is_empty());
        assert_eq!(parse_string_list("['a',]").unwrap(), vec!["a"]);
    }

    #[test]
    fn test_expressions_are_rejected() {
        let err = parse_string_list("[__import__('os').system('ls')]").unwrap_err();
        assert_eq!(
            err,
            ListFieldError::UnexpectedToken {
                offset: 11,
                found: '('
            }
        );
        assert!(matches!(
            parse_string_list("os.system('ls')"),
            Err(ListFieldError::NotAList { .. })
        ));
    }

    #[test]
    fn test_unterminated_string_reports_offset() {
        assert_eq!(
            parse_string_list("['ok', 'broken]"),
            Err(ListFieldError::UnterminatedString { offset: 7 })
        );
    }

    #[test]
    fn test_missing_separator_is_rejected() {
        assert!(matches!(
            parse_string_list("['a' 'b']"),
            Err(ListFieldError::UnexpectedToken { found: '\'', .. })
        ));
    }

    #[test]
    fn test_number_list() {
        let parsed = parse_number_list("[51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]").unwrap();
        assert_eq!(parsed.len(), 7);
        assert!((parsed[0] - 51.5).abs() < f64::EPSILON);
        assert_eq!(
            parse_number_list("[1.0, abc]"),
            Err(ListFieldError::InvalidNumber {
                index: 1,
                value: "abc".into()
            })
        );
    }

    #[test]
    fn test_values_from_json() {
        assert_eq!(
            string_list_from_value(&json!(["a", "b"])).unwrap(),
            vec!["a", "b"]
        );
        assert_eq!(
            string_list_from_value(&json!("['a']")).unwrap(),
            vec!["a"]
        );
        assert!(string_list_from_value(&Value::Null).unwrap().is_empty());
        assert!(string_list_from_value(&json!({"a": 1})).is_err());
        assert_eq!(number_list_from_value(&json!([1, 2.5])).unwrap(), vec![1.0, 2.5]);
    }
}
