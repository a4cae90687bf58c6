//! Conversion of raw form text into typed values.
//!
//! [`convert`] is total: every failure has a defined fallback.
//!
//! | Type | Success | Fallback |
//! |------|---------|----------|
//! | `Text` | text verbatim | n/a |
//! | `Integer` | leading integer (`"42px"` → 42, `"0x1f"` → 31) | invalid number |
//! | `Float` | leading float literal (`"2.5e3kg"` → 2500) | invalid number |
//! | `Array` | JSON array (`""` → `[]`) | `[]` |
//! | `Object` | JSON object | `{}` |

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::field::FieldType;
use crate::value::{Numeric, TypedValue};

/// Converts raw text to a typed value according to the declared type.
///
/// # Example
///
/// ```
/// use mongoform_query::{convert, FieldType, TypedValue};
///
/// assert_eq!(convert(FieldType::Integer, "12 apples"), TypedValue::from(12i64));
/// assert_eq!(convert(FieldType::Array, "oops"), TypedValue::Array(vec![]));
/// ```
pub fn convert(declared_type: FieldType, raw: &str) -> TypedValue {
    match declared_type {
        FieldType::Text => TypedValue::Text(raw.to_string()),
        FieldType::Integer => TypedValue::Number(numeric_or_invalid(leading_integer(raw), raw)),
        FieldType::Float => TypedValue::Number(numeric_or_invalid(leading_float(raw), raw)),
        FieldType::Array => TypedValue::Array(parse_array(raw)),
        FieldType::Object => TypedValue::Object(parse_object(raw)),
    }
}

fn numeric_or_invalid(parsed: Option<f64>, raw: &str) -> Numeric {
    match parsed {
        Some(n) => Numeric::new(n),
        None => {
            trace!(raw, "no numeric prefix, using invalid sentinel");
            Numeric::INVALID
        }
    }
}

fn parse_array(raw: &str) -> Vec<Value> {
    let source = if raw.is_empty() { "[]" } else { raw };
    match parse_json(source) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            trace!(raw, kind = json_kind(&other), "array literal is another JSON kind");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn parse_object(raw: &str) -> Map<String, Value> {
    match parse_json(raw) {
        Some(Value::Object(map)) => map,
        Some(other) => {
            trace!(raw, kind = json_kind(&other), "object literal is another JSON kind");
            Map::new()
        }
        None => Map::new(),
    }
}

/// Parses a JSON literal the way a browser's `JSON.parse` would accept it.
///
/// Numbers keep their source text, so out-of-range values such as `1e400`
/// parse and later canonicalize to `null`. Lone surrogate escapes become
/// U+FFFD. Nesting is limited by [`MAX_NESTING`] rather than the parser's
/// default recursion limit.
fn parse_json(raw: &str) -> Option<Value> {
    let text = replace_lone_surrogates(raw);

    let depth = nesting_depth(&text);
    if depth > MAX_NESTING {
        trace!(raw, depth, "literal nests too deeply");
        return None;
    }

    let mut de = serde_json::Deserializer::from_str(&text);
    de.disable_recursion_limit();
    match Value::deserialize(&mut de).and_then(|value| de.end().map(|()| value)) {
        Ok(value) => Some(value),
        Err(err) => {
            trace!(raw, %err, "malformed JSON literal");
            None
        }
    }
}

/// Deepest container nesting accepted in array and object literals.
const MAX_NESTING: usize = 512;

/// Deepest bracket nesting outside string literals.
fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for b in text.bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Rewrites `\uXXXX` escapes of unpaired surrogates as `\ufffd`.
fn replace_lone_surrogates(raw: &str) -> Cow<'_, str> {
    if !raw.contains("\\u") {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let escape = &rest[pos..];
        match unicode_escape(escape) {
            Some(unit) if is_high_surrogate(unit) => {
                let paired = escape
                    .get(6..)
                    .and_then(unicode_escape)
                    .is_some_and(is_low_surrogate);
                if paired {
                    out.push_str(&escape[..12]);
                    rest = &escape[12..];
                } else {
                    out.push_str(REPLACEMENT_ESCAPE);
                    rest = &escape[6..];
                }
            }
            Some(unit) if is_low_surrogate(unit) => {
                out.push_str(REPLACEMENT_ESCAPE);
                rest = &escape[6..];
            }
            Some(_) => {
                out.push_str(&escape[..6]);
                rest = &escape[6..];
            }
            None => {
                // Any other escape, including an escaped backslash, is copied whole.
                let len = 1 + escape[1..].chars().next().map_or(0, char::len_utf8);
                out.push_str(&escape[..len]);
                rest = &escape[len..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

const REPLACEMENT_ESCAPE: &str = "\\ufffd";

/// Code unit of a `\uXXXX` escape at the start of `s`.
fn unicode_escape(s: &str) -> Option<u32> {
    let hex = s.strip_prefix("\\u")?.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

fn is_high_surrogate(unit: u32) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

fn is_low_surrogate(unit: u32) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Skips the whitespace a form's number parsing ignores.
fn skip_leading_space(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Splits an optional leading sign, returning `(negative, rest)`.
fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

/// Reads the integer at the start of `raw`, ignoring anything after it.
///
/// A `0x`/`0X` prefix switches to hexadecimal. Returns `None` when no digit
/// follows the optional sign and prefix.
fn leading_integer(raw: &str) -> Option<f64> {
    let (negative, rest) = split_sign(skip_leading_space(raw));
    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = if radix == 10 {
        digits.parse::<f64>().ok()?
    } else {
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Reads the floating-point literal at the start of `raw`.
///
/// Accepts `digits[.digits][e[sign]digits]`, `.digits[...]` and `Infinity`,
/// each with an optional sign. An exponent without digits is not consumed.
fn leading_float(raw: &str) -> Option<f64> {
    let trimmed = skip_leading_space(raw);
    let (negative, rest) = split_sign(trimmed);
    if rest.starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let bytes = trimmed.as_bytes();
    let len = bytes.len();
    let mut end = trimmed.len() - rest.len();

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digit_count = end - int_start;

    if end < len && bytes[end] == b'.' {
        let mut cursor = end + 1;
        while cursor < len && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        let fraction_digits = cursor - end - 1;
        if digit_count + fraction_digits > 0 {
            digit_count += fraction_digits;
            end = cursor;
        }
    }

    if digit_count == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut cursor = end + 1;
        if cursor < len && matches!(bytes[cursor], b'+' | b'-') {
            cursor += 1;
        }
        let exponent_start = cursor;
        while cursor < len && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exponent_start {
            end = cursor;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(declared_type: FieldType, raw: &str) -> Numeric {
        convert(declared_type, raw)
            .as_number()
            .expect("numeric types convert to numbers")
    }

    #[test]
    fn text_is_verbatim() {
        assert_eq!(convert(FieldType::Text, "  hi "), TypedValue::from("  hi "));
        assert_eq!(convert(FieldType::Text, ""), TypedValue::from(""));
    }

    #[test]
    fn integer_reads_leading_digits() {
        assert_eq!(number(FieldType::Integer, "5").value(), 5.0);
        assert_eq!(number(FieldType::Integer, "  -42px").value(), -42.0);
        assert_eq!(number(FieldType::Integer, "+7").value(), 7.0);
        assert_eq!(number(FieldType::Integer, "3.9").value(), 3.0);
        assert_eq!(number(FieldType::Integer, "1e3").value(), 1.0);
        assert_eq!(number(FieldType::Integer, "007").value(), 7.0);
    }

    #[test]
    fn integer_reads_hex_prefix() {
        assert_eq!(number(FieldType::Integer, "0x1F").value(), 31.0);
        assert_eq!(number(FieldType::Integer, "-0xff").value(), -255.0);
        assert!(!number(FieldType::Integer, "0x").is_valid());
    }

    #[test]
    fn integer_failures_are_invalid() {
        for raw in ["", "abc", "-", " ", "x12", ".5"] {
            assert!(!number(FieldType::Integer, raw).is_valid(), "{raw:?}");
        }
    }

    #[test]
    fn float_reads_leading_literal() {
        assert_eq!(number(FieldType::Float, "2.5").value(), 2.5);
        assert_eq!(number(FieldType::Float, " -.5kg").value(), -0.5);
        assert_eq!(number(FieldType::Float, "5.").value(), 5.0);
        assert_eq!(number(FieldType::Float, "2.5e3x").value(), 2500.0);
        assert_eq!(number(FieldType::Float, "1E-2").value(), 0.01);
        assert_eq!(number(FieldType::Float, "3e").value(), 3.0);
        assert_eq!(number(FieldType::Float, "3e+").value(), 3.0);
        assert_eq!(number(FieldType::Float, "1.2.3").value(), 1.2);
    }

    #[test]
    fn float_reads_infinity() {
        assert_eq!(number(FieldType::Float, "Infinity").value(), f64::INFINITY);
        assert_eq!(number(FieldType::Float, "-Infinityx").value(), f64::NEG_INFINITY);
        assert!(!number(FieldType::Float, "inf").is_valid());
    }

    #[test]
    fn float_failures_are_invalid() {
        for raw in ["", ".", "e5", "abc", "+", "-.e1"] {
            assert!(!number(FieldType::Float, raw).is_valid(), "{raw:?}");
        }
    }

    #[test]
    fn array_parses_json() {
        assert_eq!(
            convert(FieldType::Array, r#"[1, "two", {"three": 3}]"#),
            TypedValue::Array(vec![json!(1), json!("two"), json!({"three": 3})])
        );
        assert_eq!(convert(FieldType::Array, ""), TypedValue::Array(vec![]));
    }

    #[test]
    fn array_falls_back_to_empty() {
        for raw in ["not-json", "[1,", "{\"a\": 1}", "5", " "] {
            assert_eq!(convert(FieldType::Array, raw), TypedValue::Array(vec![]), "{raw:?}");
        }
    }

    #[test]
    fn object_parses_json() {
        let value = convert(FieldType::Object, r#"{"b": 1, "a": [true]}"#);
        let expected = json!({"b": 1, "a": [true]});
        assert_eq!(value, TypedValue::Object(expected.as_object().unwrap().clone()));
    }

    #[test]
    fn out_of_range_numbers_keep_the_container() {
        let TypedValue::Array(items) = convert(FieldType::Array, "[1, 1e400]") else {
            panic!("expected an array");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_i64(), Some(1));
        assert_eq!(items[1].as_f64(), None);

        let TypedValue::Object(map) = convert(FieldType::Object, r#"{"a": 2, "b": -1e400}"#) else {
            panic!("expected an object");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn lone_surrogates_become_replacement_characters() {
        assert_eq!(
            convert(FieldType::Array, r#"["\ud800", 1, "x\udc00y"]"#),
            TypedValue::Array(vec![json!("\u{fffd}"), json!(1), json!("x\u{fffd}y")])
        );
    }

    #[test]
    fn surrogate_pairs_and_escaped_backslashes_are_untouched() {
        assert_eq!(
            convert(FieldType::Array, r#"["\ud83d\ude00", "\\ud800"]"#),
            TypedValue::Array(vec![json!("\u{1f600}"), json!("\\ud800")])
        );
    }

    #[test]
    fn deep_nesting_parses() {
        let raw = format!("{}{}", "[".repeat(200), "]".repeat(200));
        let TypedValue::Array(items) = convert(FieldType::Array, &raw) else {
            panic!("expected an array");
        };
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn nesting_beyond_limit_falls_back() {
        let raw = format!("{}{}", "[".repeat(MAX_NESTING + 1), "]".repeat(MAX_NESTING + 1));
        assert_eq!(convert(FieldType::Array, &raw), TypedValue::Array(vec![]));
    }

    #[test]
    fn nesting_ignores_brackets_in_strings() {
        assert_eq!(nesting_depth(r#"[{"k": "[[[\"]]"}]"#), 2);
    }

    #[test]
    fn object_falls_back_to_empty() {
        for raw in ["", "{", "[1]", "null", "\"text\""] {
            assert_eq!(convert(FieldType::Object, raw), TypedValue::Object(Map::new()), "{raw:?}");
        }
    }
}
