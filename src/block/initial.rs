//! Initial block dispatch: given the next undecided line,
//! decide whether it starts a sequence, a mapping, a block scalar, a flow
//! container, or a plain/quoted scalar — including the "bare scalar
//! followed by `:`" rule that turns what looked like a scalar node into a
//! single-entry (or more) block mapping.

use crate::classifier::classify;
use crate::context::Context;
use crate::error::ParseError;
use crate::flow::FlowParser;
use crate::lexer::{DoubleQuotedScalar, PlainScalar, SingleQuotedScalar};
use crate::line::Line;
use crate::properties;
use crate::value::Value;

use super::{block_scalar, child, mapping, next_content_line, sequence, LineStream};

/// Parses the single root node of one document's line range. `stream`
/// must already be scoped to just that document (the framer's job).
pub fn parse_document_root(stream: &mut LineStream, ctx: Context) -> Result<Value, ParseError> {
    match next_content_line(stream, 0) {
        Some(line) => {
            let indent = line.indent();
            let value = parse_node(stream, ctx, line, indent)?;
            // The root node's own parse owns every line at or below its
            // indentation; anything still on the stream is content at a
            // column the root didn't claim (e.g. a block sequence's own
            // indent rule rejected it as a sibling) and is fatal rather
            // than silently dropped.
            if let Some(leftover) = next_content_line(stream, 0) {
                return Err(ParseError::indentation(
                    leftover.mark(),
                    "content at an unexpected column after the document's root node",
                ));
            }
            Ok(value)
        }
        None => Ok(Value::Null),
    }
}

/// Parses one node whose content starts at `line` (already advanced off
/// the stream), anchored at column `node_indent` — the column later
/// siblings (further mapping keys, sequence dashes) must match, and the
/// threshold a nested block's own content must exceed (or, for a block
/// sequence value, may equal).
pub(crate) fn parse_node<'a>(stream: &mut LineStream<'a>, mut ctx: Context, mut line: Line<'a>, node_indent: usize) -> Result<Value, ParseError> {
    ctx.check_depth(line.mark())?;
    properties::consume_properties(&mut line, &mut ctx)?;

    if line.at_logical_end() {
        return parse_empty_or_nested(stream, ctx, node_indent);
    }

    match line.peek() {
        Some('-') if line.is_dash_indicator() => sequence::parse(stream, ctx, line, node_indent),
        Some('?') if is_question_indicator(&line) => {
            line.advance();
            line.skip_spaces();
            mapping::parse(stream, ctx, node_indent, mapping::FirstKey::Explicit { key_line: line })
        }
        Some('|') => {
            line.advance();
            block_scalar::parse(stream, ctx, line, block_scalar::Style::Literal, node_indent)
        }
        Some('>') => {
            line.advance();
            block_scalar::parse(stream, ctx, line, block_scalar::Style::Folded, node_indent)
        }
        Some('[') | Some('{') => {
            let open = line.advance().expect("peeked char must still be present");
            let mut parser = FlowParser::start(open, &mut line, ctx)?;
            if !parser.complete() {
                child::continue_flow(stream, &mut parser)?;
            }
            Ok(parser.into_value())
        }
        Some('"') => parse_double_quoted_node(stream, ctx, line, node_indent),
        Some('\'') => parse_single_quoted_node(stream, ctx, line, node_indent),
        Some('*') => {
            let mark = line.mark();
            let name = properties::parse_alias_name(&mut line)?;
            let value = ctx
                .lookup_alias(&name)
                .ok_or_else(|| ParseError::reference(mark, format!("unknown alias '*{name}'")))?;
            ctx.record_alias_use(&name);
            Ok(value)
        }
        _ => parse_plain_node(stream, ctx, line, node_indent),
    }
}

/// Nothing but a (possibly anchored/tagged) empty rest-of-line: the value
/// is either an empty/null scalar, a block sequence at the very same
/// column (the one case a nested block doesn't need to indent further:
/// `key:` followed by `- a` / `- b` at `key`'s own column), or a deeper
/// nested node on a following line.
fn parse_empty_or_nested(stream: &mut LineStream, ctx: Context, node_indent: usize) -> Result<Value, ParseError> {
    match super::peek_content_line(stream, node_indent) {
        Some(peeked) if peeked.indent() == node_indent && peeked.is_dash_indicator() => {
            let consumed = stream.advance().expect("peeked line must still be present");
            sequence::parse(stream, ctx, consumed, node_indent)
        }
        Some(peeked) if peeked.indent() > node_indent => {
            let child_indent = peeked.indent();
            let consumed = stream.advance().expect("peeked line must still be present");
            parse_node(stream, ctx, consumed, child_indent)
        }
        _ => {
            let value = Value::Null;
            ctx.save_node_properties(&value);
            Ok(value)
        }
    }
}

fn is_question_indicator(line: &Line) -> bool {
    line.peek() == Some('?') && matches!(line.peek_at(1), None | Some(' ') | Some('\t'))
}

fn parse_double_quoted_node<'a>(stream: &mut LineStream<'a>, mut ctx: Context, mut line: Line<'a>, node_indent: usize) -> Result<Value, ParseError> {
    line.advance();
    let mut scalar = DoubleQuotedScalar::scan(&mut line)?;
    if scalar.terminated() {
        // Upgrade-to-mapping-key only applies when the quote closed on
        // the same physical line it opened on.
        if line.consume_colon_indicator() {
            line.skip_spaces();
            let key = scalar.into_text();
            return mapping::parse(stream, ctx, node_indent, mapping::FirstKey::Simple { key, value_line: line });
        }
        let value = Value::String(scalar.into_text());
        ctx.save_node_properties(&value);
        return Ok(value);
    }
    child::continue_double(stream, &mut scalar, node_indent + 1)?;
    let value = Value::String(scalar.into_text());
    ctx.save_node_properties(&value);
    Ok(value)
}

fn parse_single_quoted_node<'a>(stream: &mut LineStream<'a>, mut ctx: Context, mut line: Line<'a>, node_indent: usize) -> Result<Value, ParseError> {
    line.advance();
    let mut scalar = SingleQuotedScalar::scan(&mut line);
    if scalar.terminated() {
        if line.consume_colon_indicator() {
            line.skip_spaces();
            let key = scalar.into_text();
            return mapping::parse(stream, ctx, node_indent, mapping::FirstKey::Simple { key, value_line: line });
        }
        let value = Value::String(scalar.into_text());
        ctx.save_node_properties(&value);
        return Ok(value);
    }
    child::continue_single(stream, &mut scalar, node_indent + 1)?;
    let value = Value::String(scalar.into_text());
    ctx.save_node_properties(&value);
    Ok(value)
}

fn parse_plain_node<'a>(stream: &mut LineStream<'a>, mut ctx: Context, mut line: Line<'a>, node_indent: usize) -> Result<Value, ParseError> {
    let mut scalar = PlainScalar::scan(&mut line, false);
    let mut last_line = line;
    if !scalar.terminated() {
        if let Some(continued) = child::continue_plain(stream, &mut scalar, node_indent + 1) {
            last_line = continued;
        }
    }

    if scalar.stopped_at_colon() {
        last_line.consume_colon_indicator();
        last_line.skip_spaces();
        let key = scalar.into_text();
        return mapping::parse(stream, ctx, node_indent, mapping::FirstKey::Simple { key, value_line: last_line });
    }

    let text = scalar.into_text();
    let classified = classify(&text, ctx.pending_tag(), ctx.version());
    if let Some(inferred) = classified.inferred_tag {
        ctx.set_pending_tag(inferred.to_string());
    }
    ctx.save_node_properties(&classified.value);
    Ok(classified.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> Value {
        let owned: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        let mut stream = LineStream::new(&owned);
        let ctx = Context::new_document();
        parse_document_root(&mut stream, ctx).unwrap()
    }

    #[test]
    fn scalar_document() {
        assert_eq!(run(&["hello"]), Value::String("hello".to_string()));
    }

    #[test]
    fn empty_document_is_null() {
        assert_eq!(run(&[]), Value::Null);
    }

    #[test]
    fn top_level_sequence() {
        assert_eq!(run(&["- a", "- b"]), serde_json::json!(["a", "b"]));
    }

    #[test]
    fn top_level_mapping() {
        assert_eq!(run(&["a: 1", "b: 2"]), serde_json::json!({"a": 1, "b": 2}));
    }

    #[test]
    fn anchor_and_alias_round_trip() {
        let v = run(&["a: &x 1", "b: *x"]);
        assert_eq!(v, serde_json::json!({"a": 1, "b": 1}));
    }

    #[test]
    fn flow_value_is_not_upgraded_to_a_mapping_even_if_a_colon_follows() {
        // A flow collection closes the node outright; a trailing `:
        // something` on the same line is simply left for a syntax error
        // to catch at a higher level, not silently treated as a key.
        let owned: Vec<String> = vec!["[1, 2]".to_string()];
        let mut stream = LineStream::new(&owned);
        let ctx = Context::new_document();
        let v = parse_document_root(&mut stream, ctx).unwrap();
        assert_eq!(v, serde_json::json!([1, 2]));
    }

    #[test]
    fn block_scalar_value_in_a_mapping() {
        let v = run(&["a: |", "  line one", "  line two"]);
        assert_eq!(v, serde_json::json!({"a": "line one\nline two\n"}));
    }

    #[test]
    fn misindented_content_after_the_root_sequence_is_fatal() {
        let owned: Vec<String> = vec!["- a".to_string(), " - b".to_string()];
        let mut stream = LineStream::new(&owned);
        let ctx = Context::new_document();
        let err = parse_document_root(&mut stream, ctx).unwrap_err();
        assert!(matches!(err, ParseError::Indentation { .. }));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let owned: Vec<String> = vec!["a:".to_string(), "  b:".to_string(), "    c: 1".to_string()];
        let mut stream = LineStream::new(&owned);
        let ctx = Context::new_document_with_max_depth(Some(1));
        assert!(parse_document_root(&mut stream, ctx).is_err());
    }
}
