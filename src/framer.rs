//! Directive & Document Framer: recognizes `%YAML`/`%TAG` directives and
//! `---`/`...` document markers, and slices the input into the line
//! ranges each document's block parse should see.
//!
//! Implemented as a single forward pass building a list of
//! [`RawDocument`]s up front, rather than literal INITIAL/DIRECTIVE/MAIN
//! states threaded through callbacks — the whole line list is already in
//! memory, so there's no reason to make this incremental.

use std::ops::Range;

use crate::error::{Mark, ParseError, ParseWarning};
use crate::line::Line;

#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub version: Option<(u32, u32)>,
    pub tag_overrides: Vec<(String, String)>,
    pub warnings: Vec<ParseWarning>,
    pub content: Range<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Directive,
    Main,
}

/// Splits `lines` into one [`RawDocument`] per `---`/`...`-delimited
/// section. `allow_multiple` controls whether a second `---` while
/// already in MAIN starts a new document (stream mode) or is a fatal
/// "multiple documents not allowed" error (single-document mode).
///
/// Always returns at least one document: empty input produces a single
/// entry with an empty content range, which the block parser reads as a
/// null root.
pub fn split_documents(lines: &[String], allow_multiple: bool) -> Result<Vec<RawDocument>, ParseError> {
    let mut state = State::Initial;
    let mut docs = Vec::new();
    let mut version = None;
    let mut tag_overrides = Vec::new();
    let mut warnings = Vec::new();
    let mut content_start = 0usize;

    let mut i = 0usize;
    while i < lines.len() {
        let line = Line::new((i + 1) as u64, &lines[i]);

        if line.is_blank() {
            i += 1;
            continue;
        }
        if line.indent() == 0 && line.peek() == Some('%') {
            match state {
                State::Initial | State::Directive => {
                    parse_directive(line.text(), line.mark(), &mut version, &mut tag_overrides, &mut warnings)?;
                    state = State::Directive;
                }
                State::Main => {
                    // A `%`-prefixed line inside a document's content is
                    // just content; directives only matter before `---`.
                }
            }
            i += 1;
            continue;
        }
        if is_marker(&line, "---") {
            match state {
                State::Initial | State::Directive => {
                    state = State::Main;
                    content_start = i + 1;
                }
                State::Main => {
                    if !allow_multiple {
                        return Err(ParseError::structural(line.mark(), "multiple documents not allowed"));
                    }
                    docs.push(RawDocument {
                        version: version.take(),
                        tag_overrides: std::mem::take(&mut tag_overrides),
                        warnings: std::mem::take(&mut warnings),
                        content: content_start..i,
                    });
                    state = State::Main;
                    content_start = i + 1;
                }
            }
            i += 1;
            continue;
        }
        if is_marker(&line, "...") {
            let end = i;
            docs.push(RawDocument {
                version: version.take(),
                tag_overrides: std::mem::take(&mut tag_overrides),
                warnings: std::mem::take(&mut warnings),
                content: content_start..end,
            });
            state = State::Initial;
            content_start = i + 1;
            i += 1;
            continue;
        }

        match state {
            State::Initial => {
                content_start = i;
                state = State::Main;
            }
            State::Directive => {
                return Err(ParseError::structural(line.mark(), "content is not allowed after directives without '---'"));
            }
            State::Main => {}
        }
        i += 1;
    }

    match state {
        State::Main => {
            docs.push(RawDocument {
                version: version.take(),
                tag_overrides: std::mem::take(&mut tag_overrides),
                warnings: std::mem::take(&mut warnings),
                content: content_start..lines.len(),
            });
        }
        State::Directive => {
            return Err(ParseError::structural(Mark::default(), "input ends with directives but no document"));
        }
        State::Initial => {
            if docs.is_empty() {
                docs.push(RawDocument::default());
            }
        }
    }

    Ok(docs)
}

fn is_marker(line: &Line, marker: &str) -> bool {
    if line.indent() != 0 {
        return false;
    }
    let text = line.text();
    text == marker || text.starts_with(&format!("{marker} ")) || text.starts_with(&format!("{marker}\t"))
}

fn parse_directive(
    raw: &str,
    mark: Mark,
    version: &mut Option<(u32, u32)>,
    tag_overrides: &mut Vec<(String, String)>,
    warnings: &mut Vec<ParseWarning>,
) -> Result<(), ParseError> {
    let body = raw.trim_start_matches('%');
    let mut parts = body.split_whitespace();
    let name = parts.next().unwrap_or("");
    match name {
        "YAML" => {
            if version.is_some() {
                return Err(ParseError::structural(mark, "duplicate %YAML directive"));
            }
            let value = parts.next().ok_or_else(|| ParseError::syntax(mark, "missing %YAML version"))?;
            let (major_s, minor_s) = value
                .split_once('.')
                .ok_or_else(|| ParseError::syntax(mark, "malformed %YAML version"))?;
            let major: u32 = major_s
                .parse()
                .map_err(|_| ParseError::syntax(mark, "malformed %YAML major version"))?;
            let minor: u32 = minor_s
                .parse()
                .map_err(|_| ParseError::syntax(mark, "malformed %YAML minor version"))?;
            if major != 1 {
                return Err(ParseError::version(mark, format!("unsupported YAML major version {major}")));
            }
            if minor != 1 && minor != 2 {
                warnings.push(ParseWarning::UnsupportedMinorVersion { mark, minor });
            }
            *version = Some((major, minor));
        }
        "TAG" => {
            let handle = parts.next().ok_or_else(|| ParseError::syntax(mark, "missing %TAG handle"))?;
            let prefix = parts.next().ok_or_else(|| ParseError::syntax(mark, "missing %TAG prefix"))?;
            tag_overrides.push((handle.to_string(), prefix.to_string()));
        }
        other => {
            warnings.push(ParseWarning::UnknownDirective { mark, name: other.to_string() });
        }
    }
    Ok(())
}
