//! Block mapping parsing: `key: value` entries at the same
//! column, plus the explicit `? key` / `: value` form for complex keys.

use crate::context::Context;
use crate::error::{Mark, ParseError};
use crate::lexer::{DoubleQuotedScalar, PlainScalar, SingleQuotedScalar};
use crate::line::Line;
use crate::value::Value;

use super::initial::parse_node;
use super::LineStream;

/// The entry that starts (or continues) a mapping, already partially
/// scanned by the caller — [`super::initial::parse_node`] for the first
/// entry, [`next_entry`] for every one after.
pub(crate) enum FirstKey<'a> {
    /// A plain or quoted scalar key, already read and positioned right
    /// after its `:` (and any following spaces).
    Simple { key: String, value_line: Line<'a> },
    /// `?` has been consumed; `key_line` is positioned at the key node's
    /// content (on the same line, e.g. `? [a, b]`, or already past a
    /// trailing comment/blank if the key starts on a later line).
    Explicit { key_line: Line<'a> },
}

/// `indent` is the column shared by every key (`?` or plain/quoted key)
/// in this mapping.
pub(crate) fn parse<'a>(stream: &mut LineStream<'a>, ctx: Context, indent: usize, first: FirstKey<'a>) -> Result<Value, ParseError> {
    let mut map = serde_json::Map::new();
    let mut next = Some(first);
    while let Some(entry) = next.take() {
        let (key, mark, value) = match entry {
            FirstKey::Simple { key, value_line } => {
                let mark = value_line.mark();
                let value_ctx = ctx.child_key(&key);
                let value = parse_node(stream, value_ctx, value_line, indent)?;
                (key, mark, value)
            }
            FirstKey::Explicit { key_line } => {
                let mark = key_line.mark();
                let key_ctx = ctx.child_key("?");
                let key_value = parse_node(stream, key_ctx, key_line, indent + 1)?;
                let key = super::coerce_key(&key_value);
                let value_ctx = ctx.child_key(&key);
                let value = match find_value_marker(stream, indent) {
                    Some(value_line) => parse_node(stream, value_ctx, value_line, indent)?,
                    None => Value::Null,
                };
                (key, mark, value)
            }
        };
        if map.contains_key(&key) {
            return Err(ParseError::reference(mark, format!("duplicate key {key:?} in mapping")));
        }
        map.insert(key, value);
        next = next_entry(stream, indent)?;
    }
    let value = Value::Object(map);
    ctx.save_node_properties(&value);
    Ok(value)
}

/// `?` stands alone at `indent`, followed by whitespace or end of line.
fn is_question_indicator(line: &Line) -> bool {
    line.peek() == Some('?') && matches!(line.peek_at(1), None | Some(' ') | Some('\t'))
}

fn find_value_marker<'a>(stream: &mut LineStream<'a>, indent: usize) -> Option<Line<'a>> {
    let peeked = super::peek_content_line(stream, indent)?;
    if peeked.indent() != indent || peeked.peek() != Some(':') {
        return None;
    }
    let mut consumed = stream.advance()?;
    consumed.advance();
    consumed.skip_spaces();
    Some(consumed)
}

fn next_entry<'a>(stream: &mut LineStream<'a>, indent: usize) -> Result<Option<FirstKey<'a>>, ParseError> {
    let Some(line) = super::peek_content_line(stream, indent) else {
        return Ok(None);
    };
    if line.indent() != indent {
        return Ok(None);
    }
    if is_question_indicator(&line) {
        let mut consumed = stream.advance().expect("peeked line must still be present");
        consumed.advance();
        consumed.skip_spaces();
        return Ok(Some(FirstKey::Explicit { key_line: consumed }));
    }
    let mut consumed = stream.advance().expect("peeked line must still be present");
    let mark = consumed.mark();
    let key = scan_simple_key(&mut consumed, mark)?;
    consumed.skip_spaces();
    Ok(Some(FirstKey::Simple { key, value_line: consumed }))
}

/// Scans a scalar key that must be immediately followed by `:` on the
/// same line — the simple-entry form only ever spans one line for its
/// key, unlike a node's own value which may continue across lines.
fn scan_simple_key(line: &mut Line, mark: Mark) -> Result<String, ParseError> {
    match line.peek() {
        Some('"') => {
            line.advance();
            let scalar = DoubleQuotedScalar::scan(line)?;
            if !scalar.terminated() {
                return Err(ParseError::syntax(mark, "mapping key must close its quote on the same line"));
            }
            if !line.consume_colon_indicator() {
                return Err(ParseError::syntax(mark, "expected ':' after mapping key"));
            }
            Ok(scalar.into_text())
        }
        Some('\'') => {
            line.advance();
            let scalar = SingleQuotedScalar::scan(line);
            if !scalar.terminated() {
                return Err(ParseError::syntax(mark, "mapping key must close its quote on the same line"));
            }
            if !line.consume_colon_indicator() {
                return Err(ParseError::syntax(mark, "expected ':' after mapping key"));
            }
            Ok(scalar.into_text())
        }
        _ => {
            let scalar = PlainScalar::scan(line, false);
            if !scalar.stopped_at_colon() {
                return Err(ParseError::syntax(mark, "expected ':' after mapping key"));
            }
            line.consume_colon_indicator();
            Ok(scalar.into_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::initial::parse_document_root;

    fn run(lines: &[&str]) -> Value {
        let owned: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        let mut stream = LineStream::new(&owned);
        let ctx = Context::new_document();
        parse_document_root(&mut stream, ctx).unwrap()
    }

    #[test]
    fn flat_mapping_of_scalars() {
        let v = run(&["a: 1", "b: 2"]);
        assert_eq!(v, serde_json::json!({"a": 1, "b": 2}));
    }

    #[test]
    fn nested_mapping_indented_value() {
        let v = run(&["a:", "  b: 1", "  c: 2"]);
        assert_eq!(v, serde_json::json!({"a": {"b": 1, "c": 2}}));
    }

    #[test]
    fn sequence_value_at_same_column_as_key() {
        let v = run(&["a:", "- 1", "- 2"]);
        assert_eq!(v, serde_json::json!({"a": [1, 2]}));
    }

    #[test]
    fn quoted_key_upgrades_to_mapping() {
        let v = run(&["\"a\": 1", "b: 2"]);
        assert_eq!(v, serde_json::json!({"a": 1, "b": 2}));
    }

    #[test]
    fn explicit_complex_key() {
        let v = run(&["? [a, b]", ": 1"]);
        assert_eq!(v, serde_json::json!({"[\"a\",\"b\"]": 1}));
    }

    #[test]
    fn duplicate_key_is_fatal() {
        let owned: Vec<String> = ["a: 1", "a: 2"].iter().map(|s| s.to_string()).collect();
        let mut stream = LineStream::new(&owned);
        let ctx = Context::new_document();
        assert!(parse_document_root(&mut stream, ctx).is_err());
    }

    #[test]
    fn value_missing_after_colon_is_null() {
        let v = run(&["a:", "b: 1"]);
        assert_eq!(v, serde_json::json!({"a": null, "b": 1}));
    }
}
