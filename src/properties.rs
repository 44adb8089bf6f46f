//! Node-Property Resolver: `&anchor` and `!tag` prefixes,
//! consumed in any order and repeatedly before a node's content is
//! dispatched, and tag-handle resolution.

use crate::context::Context;
use crate::error::{Mark, ParseError};
use crate::line::Line;

const FLOW_INDICATORS: [char; 5] = ['[', ']', '{', '}', ','];

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_tag_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "#;/?:@&=+$,_.~*'()[]-".contains(c)
}

/// Consume every `&anchor`/`!tag` token at the cursor, recording pending
/// anchor/tag on `ctx`. Leaves the cursor positioned at the node's content
/// (skipping separating spaces).
pub fn consume_properties(line: &mut Line, ctx: &mut Context) -> Result<(), ParseError> {
    loop {
        line.skip_spaces();
        match line.peek() {
            Some('&') => {
                let mark = line.mark();
                let name = parse_anchor_name(line, mark)?;
                if !ctx.set_pending_anchor(name) {
                    return Err(ParseError::reference(mark, "duplicate anchor on the same node"));
                }
            }
            Some('!') => {
                let tag = parse_tag(line, ctx)?;
                ctx.set_pending_tag(tag);
            }
            _ => break,
        }
    }
    Ok(())
}

/// Parse an alias name after `*`, without touching `ctx` (aliases are
/// resolved, not recorded, by the caller).
pub fn parse_alias_name(line: &mut Line) -> Result<String, ParseError> {
    let mark = line.mark();
    line.advance(); // `*`
    let name = line
        .consume_while(|c| !c.is_whitespace() && !FLOW_INDICATORS.contains(&c))
        .to_string();
    if name.is_empty() {
        return Err(ParseError::syntax(mark, "missing alias name after '*'"));
    }
    Ok(name)
}

fn parse_anchor_name(line: &mut Line, mark: Mark) -> Result<String, ParseError> {
    line.advance(); // `&`
    let name = line
        .consume_while(|c| !c.is_whitespace() && !FLOW_INDICATORS.contains(&c))
        .to_string();
    if name.is_empty() {
        return Err(ParseError::syntax(mark, "missing anchor name after '&'"));
    }
    Ok(name)
}

/// Parse a tag token (`!<uri>`, `!!suffix`, `!handle!suffix`, or
/// `!suffix`) and resolve it to a full tag URI via `ctx`'s tag handles.
fn parse_tag(line: &mut Line, ctx: &Context) -> Result<String, ParseError> {
    let start_mark = line.mark();
    line.advance(); // leading `!`

    if line.consume_char('<') {
        let text = line.consume_while(|c| c != '>').to_string();
        if text.is_empty() || !line.consume_char('>') {
            return Err(ParseError::syntax(start_mark, "unterminated verbatim tag '!<...>'"));
        }
        return Ok(text);
    }

    let mut len = 0;
    while matches!(line.peek_at(len), Some(c) if is_word_char(c)) {
        len += 1;
    }
    let handle = if line.peek_at(len) == Some('!') {
        let name: String = (0..len).filter_map(|i| line.peek_at(i)).collect();
        for _ in 0..=len {
            line.advance();
        }
        format!("!{name}!")
    } else {
        "!".to_string()
    };

    let suffix = scan_tag_suffix(line, start_mark)?;
    let prefix = ctx
        .resolve_tag_handle(&handle)
        .ok_or_else(|| ParseError::reference(start_mark, format!("undeclared tag handle {handle:?}")))?;
    Ok(format!("{prefix}{suffix}"))
}

fn scan_tag_suffix(line: &mut Line, start_mark: Mark) -> Result<String, ParseError> {
    let mut bytes = Vec::new();
    loop {
        match line.peek() {
            Some('%') => {
                let mark = line.mark();
                line.advance();
                let v = line
                    .consume_hex_digits(2)
                    .ok_or_else(|| ParseError::encoding(mark, "illegal %-escape in tag suffix"))?;
                bytes.push(v as u8);
            }
            Some(c) if is_tag_uri_char(c) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                line.advance();
            }
            _ => break,
        }
    }
    if bytes.is_empty() {
        return Err(ParseError::syntax(start_mark, "missing tag suffix after '!'"));
    }
    String::from_utf8(bytes)
        .map_err(|_| ParseError::encoding(start_mark, "percent-encoded tag suffix is not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbatim_tag_is_stored_literally() {
        let mut ctx = Context::new_document();
        let mut line = Line::new(1, "!<tag:example.com,2023:thing> v");
        consume_properties(&mut line, &mut ctx).unwrap();
        assert_eq!(ctx.pending_tag(), Some("tag:example.com,2023:thing"));
    }

    #[test]
    fn double_bang_shorthand_resolves_against_default_handle() {
        let mut ctx = Context::new_document();
        let mut line = Line::new(1, "!!str hello");
        consume_properties(&mut line, &mut ctx).unwrap();
        assert_eq!(ctx.pending_tag(), Some("tag:yaml.org,2002:str"));
    }

    #[test]
    fn custom_handle_must_be_declared_first() {
        let mut ctx = Context::new_document();
        ctx.declare_tag_handle("!e!".to_string(), "tag:example.com,2023:".to_string());
        let mut line = Line::new(1, "!e!thing v");
        consume_properties(&mut line, &mut ctx).unwrap();
        assert_eq!(ctx.pending_tag(), Some("tag:example.com,2023:thing"));
    }

    #[test]
    fn undeclared_handle_is_fatal() {
        let mut ctx = Context::new_document();
        let mut line = Line::new(1, "!z!thing v");
        assert!(consume_properties(&mut line, &mut ctx).is_err());
    }

    #[test]
    fn anchor_then_tag_or_tag_then_anchor_both_work() {
        let mut a = Context::new_document();
        let mut l1 = Line::new(1, "&x !!str v");
        consume_properties(&mut l1, &mut a).unwrap();
        assert_eq!(a.pending_anchor(), Some("x"));
        assert_eq!(a.pending_tag(), Some("tag:yaml.org,2002:str"));

        let mut b = Context::new_document();
        let mut l2 = Line::new(1, "!!str &x v");
        consume_properties(&mut l2, &mut b).unwrap();
        assert_eq!(b.pending_anchor(), Some("x"));
        assert_eq!(b.pending_tag(), Some("tag:yaml.org,2002:str"));
    }

    #[test]
    fn duplicate_anchor_on_same_node_is_fatal() {
        let mut ctx = Context::new_document();
        let mut line = Line::new(1, "&a &b v");
        assert!(consume_properties(&mut line, &mut ctx).is_err());
    }
}
