//! Literal (`|`) and folded (`>`) block scalars.

use crate::context::Context;
use crate::error::ParseError;
use crate::line::Line;
use crate::value::Value;

use super::LineStream;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Style {
    Literal,
    Folded,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Chomp {
    Strip,
    Clip,
    Keep,
}

/// `line` is positioned right after the `|`/`>` character; `header_indent`
/// is the column of that character, i.e. this scalar's own node column.
pub fn parse(
    stream: &mut LineStream,
    ctx: Context,
    mut line: Line,
    style: Style,
    header_indent: usize,
) -> Result<Value, ParseError> {
    let header_mark = line.mark();
    let mut chomp = Chomp::Clip;
    let mut explicit_indent: Option<usize> = None;

    for _ in 0..2 {
        match line.peek() {
            Some('-') if chomp == Chomp::Clip => {
                line.advance();
                chomp = Chomp::Strip;
            }
            Some('+') if chomp == Chomp::Clip => {
                line.advance();
                chomp = Chomp::Keep;
            }
            Some(c) if explicit_indent.is_none() && c.is_ascii_digit() && c != '0' => {
                line.advance();
                explicit_indent = Some(header_indent + c.to_digit(10).unwrap() as usize);
            }
            _ => break,
        }
    }

    line.skip_spaces();
    if !line.at_logical_end() {
        return Err(ParseError::syntax(header_mark, "unexpected content after block scalar header"));
    }

    let (content_lines, blanks_before, trailing_blanks) = collect_lines(stream, header_indent, explicit_indent);
    let body = fold(&content_lines, &blanks_before, style);
    let text = apply_chomping(body, chomp, !content_lines.is_empty(), trailing_blanks);

    let value = Value::String(text);
    ctx.save_node_properties(&value);
    Ok(value)
}

/// Scans raw physical lines (bypassing the usual blank/comment-skipping
/// dispatch — every line belongs to the scalar or ends it, except a
/// comment line dedented past the scalar's indent, which is tolerated)
/// and returns `(dedented content lines, blank-run-before-each, trailing
/// blank count)`.
fn collect_lines(stream: &mut LineStream, header_indent: usize, mut indent: Option<usize>) -> (Vec<String>, Vec<usize>, usize) {
    let mut lines = Vec::new();
    let mut blanks_before = Vec::new();
    let mut pending_blanks = 0usize;

    loop {
        let Some(raw) = stream.peek() else { break };

        if raw.is_whitespace_only() {
            stream.advance();
            pending_blanks += 1;
            continue;
        }

        let dedented = match indent {
            Some(base) => raw.indent() < base,
            None => raw.indent() <= header_indent,
        };

        if dedented {
            if raw.is_blank() {
                // A comment line dedented past the scalar's indent is
                // tolerated: consumed and ignored, it neither extends nor
                // ends the scalar.
                stream.advance();
                continue;
            }
            break;
        }

        if indent.is_none() {
            indent = Some(raw.indent());
        }
        let base = indent.expect("just set above when None");
        let raw = stream.advance().expect("peeked line must still be present");
        let text: String = raw.text().chars().skip(base).collect();
        blanks_before.push(if lines.is_empty() { 0 } else { pending_blanks });
        lines.push(text);
        pending_blanks = 0;
    }

    (lines, blanks_before, pending_blanks)
}

fn fold(lines: &[String], blanks_before: &[usize], style: Style) -> String {
    let mut out = String::new();
    for (i, text) in lines.iter().enumerate() {
        if i > 0 {
            let blanks = blanks_before[i];
            if blanks > 0 {
                for _ in 0..blanks {
                    out.push('\n');
                }
            } else {
                match style {
                    Style::Literal => out.push('\n'),
                    Style::Folded => out.push(' '),
                }
            }
        }
        out.push_str(text);
    }
    out
}

fn apply_chomping(mut body: String, chomp: Chomp, had_content: bool, trailing_blanks: usize) -> String {
    if !had_content {
        return String::new();
    }
    match chomp {
        Chomp::Strip => body,
        Chomp::Clip => {
            body.push('\n');
            body
        }
        Chomp::Keep => {
            body.push('\n');
            for _ in 0..trailing_blanks {
                body.push('\n');
            }
            body
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::LineStream;

    fn run(header: &str, body_lines: &[&str], style: Style) -> String {
        let lines: Vec<String> = body_lines.iter().map(|s| s.to_string()).collect();
        let mut stream = LineStream::new(&lines);
        let mut header_line = Line::new(0, header);
        header_line.set_pos(header.find(['|', '>']).unwrap() + 1);
        let ctx = Context::new_document();
        let value = parse(&mut stream, ctx, header_line, style, 0).unwrap();
        match value {
            Value::String(s) => s,
            _ => panic!("expected string"),
        }
    }

    #[test]
    fn literal_strip_drops_all_trailing_newlines() {
        let text = run("s: |-", &["  line1", "  line2"], Style::Literal);
        assert_eq!(text, "line1\nline2");
    }

    #[test]
    fn literal_clip_keeps_exactly_one() {
        let text = run("s: |", &["  line1", "  line2"], Style::Literal);
        assert_eq!(text, "line1\nline2\n");
    }

    #[test]
    fn literal_keep_preserves_trailing_blank_lines() {
        let text = run("s: |+", &["  line1", "", ""], Style::Literal);
        assert_eq!(text, "line1\n\n\n");
    }

    #[test]
    fn folded_joins_single_newlines_with_a_space() {
        let text = run("s: >", &["  one", "  two"], Style::Folded);
        assert_eq!(text, "one two\n");
    }

    #[test]
    fn folded_preserves_paragraph_breaks() {
        let text = run("s: >", &["  one", "", "  two"], Style::Folded);
        assert_eq!(text, "one\ntwo\n");
    }

    #[test]
    fn indented_hash_line_is_content_not_a_comment() {
        let text = run("s: |", &["  # keep me", "  real"], Style::Literal);
        assert_eq!(text, "# keep me\nreal\n");
    }

    #[test]
    fn comment_dedented_past_indent_is_tolerated_and_dropped() {
        let text = run("s: |", &["  real", "# trailing comment"], Style::Literal);
        assert_eq!(text, "real\n");
    }
}
