//! Scalar Classifier: maps plain-scalar text to
//! null/bool/int/float/string per the YAML version in effect and any tag
//! already resolved for the node.

use crate::value::{tag, Value};

/// Result of classifying a plain scalar's text.
pub struct Classified {
    pub value: Value,
    /// Set only by rule 11 (float-special literals with no explicit tag):
    /// the value stays a string, but the node's tag becomes `!!float` so
    /// consumers can still detect it via `Document::get_tag`.
    pub inferred_tag: Option<&'static str>,
}

impl Classified {
    fn plain(value: Value) -> Self {
        Classified { value, inferred_tag: None }
    }
}

/// Classify `text`, the already-trimmed content of a plain scalar.
/// `explicit_tag` is the tag resolved for this node, if any;
/// `version` is `(major, minor)`, defaulting elsewhere to `(1, 2)`.
pub fn classify(text: &str, explicit_tag: Option<&str>, version: (u32, u32)) -> Classified {
    // 1. explicit !!str short-circuits everything else.
    if explicit_tag == Some(tag::STR) {
        return Classified::plain(Value::String(text.to_string()));
    }

    // 2. explicit !!float over integer-shaped text: a decimal number.
    if explicit_tag == Some(tag::FLOAT) && is_integer_shape(text) {
        if let Some(v) = parse_decimal(text) {
            return Classified::plain(v);
        }
    }

    // 3. explicit !!int over decimal-shaped (not integer-shaped) text with
    // zero fractional part.
    if explicit_tag == Some(tag::INT) && !is_integer_shape(text) && is_decimal_shape(text) {
        if let Some(int_text) = zero_fraction_integer_text(text) {
            if let Some(v) = parse_integer(&int_text) {
                return Classified::plain(v);
            }
        }
    }

    // 4. YAML 1.0/1.1 legacy scalar rules.
    if version.1 < 2 {
        if let Some(b) = legacy_bool(text) {
            return Classified::plain(Value::Bool(b));
        }
        if let Some(v) = legacy_octal(text) {
            return Classified::plain(v);
        }
    }

    // 5. null forms.
    if matches!(text, "" | "null" | "Null" | "NULL" | "~") {
        return Classified::plain(Value::Null);
    }

    // 6. bool forms (1.2 core schema).
    match text {
        "true" | "True" | "TRUE" => return Classified::plain(Value::Bool(true)),
        "false" | "False" | "FALSE" => return Classified::plain(Value::Bool(false)),
        _ => {}
    }

    // 7. 0o octal.
    if let Some(digits) = text.strip_prefix("0o") {
        if !digits.is_empty() && digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            if let Ok(n) = i64::from_str_radix(digits, 8) {
                return Classified::plain(Value::from(n));
            }
        }
    }

    // 8. 0x hex.
    if let Some(digits) = text.strip_prefix("0x") {
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            if let Ok(n) = i64::from_str_radix(digits, 16) {
                return Classified::plain(Value::from(n));
            }
        }
    }

    // 9. integer shape.
    if is_integer_shape(text) {
        if let Some(v) = parse_integer(text) {
            return Classified::plain(v);
        }
    }

    // 10. decimal shape: arbitrary-precision decimal.
    if is_decimal_shape(text) {
        if let Some(v) = parse_decimal(text) {
            return Classified::plain(v);
        }
    }

    // 11. float-special literals with no tag yet: stay a string, but the
    // resolver should record the float tag for this node.
    if explicit_tag.is_none() && is_float_special(text) {
        return Classified {
            value: Value::String(text.to_string()),
            inferred_tag: Some(tag::FLOAT),
        };
    }

    // 12. fallback: raw string.
    Classified::plain(Value::String(text.to_string()))
}

fn is_integer_shape(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal_shape(s: &str) -> bool {
    let mut chars = s.chars().peekable();
    if matches!(chars.peek(), Some('+') | Some('-')) {
        chars.next();
    }
    let mut saw_digit = false;
    while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
        chars.next();
        saw_digit = true;
    }
    if chars.peek() == Some(&'.') {
        chars.next();
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            chars.next();
            saw_digit = true;
        }
    }
    if !saw_digit {
        return false;
    }
    if matches!(chars.peek(), Some('e') | Some('E')) {
        chars.next();
        if matches!(chars.peek(), Some('+') | Some('-')) {
            chars.next();
        }
        let mut saw_exp_digit = false;
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            chars.next();
            saw_exp_digit = true;
        }
        if !saw_exp_digit {
            return false;
        }
    }
    chars.next().is_none()
}

/// For a decimal-shaped string with zero fractional part, the integer text
/// (sign + integral digits) it would round to, or `None` if the fraction
/// isn't all zeros or an exponent is present.
fn zero_fraction_integer_text(s: &str) -> Option<String> {
    if s.contains(['e', 'E']) {
        return None;
    }
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if !frac_part.bytes().all(|b| b == b'0') {
        return None;
    }
    Some(int_part.to_string())
}

fn parse_integer(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::from(n));
    }
    // Out-of-range for i64 falls back to the arbitrary-precision decimal
    // representation rather than failing.
    parse_decimal(text)
}

fn parse_decimal(text: &str) -> Option<Value> {
    // With the `arbitrary_precision` feature, serde_json stores the number
    // as its original text, so this never loses precision the way an f64
    // cast would.
    serde_json::from_str(text).ok()
}

fn legacy_bool(text: &str) -> Option<bool> {
    match text {
        "yes" | "Yes" | "YES" | "on" | "On" | "ON" => Some(true),
        "no" | "No" | "NO" | "off" | "Off" | "OFF" => Some(false),
        _ => None,
    }
}

/// YAML 1.1: a string longer than one character, starting with `0`, whose
/// remaining characters are all octal digits.
fn legacy_octal(text: &str) -> Option<Value> {
    if text.len() > 1 && text.starts_with('0') && text[1..].bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        i64::from_str_radix(text, 8).ok().map(Value::from)
    } else {
        None
    }
}

fn is_float_special(text: &str) -> bool {
    matches!(
        text,
        ".nan" | ".NaN" | ".NAN" | ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" | "-.inf" | "-.Inf" | "-.INF"
    )
}
