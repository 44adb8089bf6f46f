//! Block sequence parsing: a run of `- ` entries at the same
//! column.

use crate::context::Context;
use crate::error::ParseError;
use crate::line::Line;
use crate::value::Value;

use super::initial::parse_node;
use super::LineStream;

/// `line` is positioned at the first entry's `-`; `indent` is that dash's
/// column, shared by every sibling entry.
pub(crate) fn parse<'a>(stream: &mut LineStream<'a>, ctx: Context, line: Line<'a>, indent: usize) -> Result<Value, ParseError> {
    let mut items = Vec::new();
    let mut current = Some(line);
    while let Some(mut item_line) = current.take() {
        let mark = item_line.mark();
        if !item_line.consume_dash_indicator() {
            return Err(ParseError::syntax(mark, "expected '-' to start a block sequence entry"));
        }
        item_line.skip_spaces();
        // The item's own node column is where its content actually starts
        // (normally indent+2, the column after "- "), not the dash's own
        // column — a mapping key or plain scalar here must compare its
        // siblings/continuations against that column, not the dash's.
        // When nothing follows the dash on this line, fall back to the
        // dash column itself; a nested block on a following line only
        // needs to be indented past it.
        let item_indent = if item_line.at_logical_end() { indent } else { item_line.pos() };
        let item_ctx = ctx.child_index(items.len());
        let value = parse_node(stream, item_ctx, item_line, item_indent)?;
        items.push(value);
        current = next_dash_at_indent(stream, indent);
    }
    let value = Value::Array(items);
    ctx.save_node_properties(&value);
    Ok(value)
}

fn next_dash_at_indent<'a>(stream: &mut LineStream<'a>, indent: usize) -> Option<Line<'a>> {
    let peeked = super::peek_content_line(stream, indent)?;
    if peeked.indent() != indent || !peeked.is_dash_indicator() {
        return None;
    }
    stream.advance()
}
