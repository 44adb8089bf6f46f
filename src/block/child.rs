//! Continuation driver: once a scalar, quoted scalar, or flow container
//! has started on one line but hasn't finished, these loops feed it
//! further lines until it terminates, a dedent is seen, or the stream
//! runs out, without a separate object per in-flight child (this
//! module's caller already holds the scalar/flow value directly).

use crate::error::ParseError;
use crate::flow::FlowParser;
use crate::lexer::{DoubleQuotedScalar, PlainScalar, SingleQuotedScalar};
use crate::line::Line;

use super::{next_content_line, LineStream};

/// Feeds `scalar` further lines at or past `min_indent` until it reports
/// `terminated`. Returns the line on which it terminated, if any
/// continuation line was consumed at all — the caller needs that line's
/// cursor (parked right at the terminating colon, if any) to decide
/// whether this scalar introduces a mapping.
pub(crate) fn continue_plain<'a>(
    stream: &mut LineStream<'a>,
    scalar: &mut PlainScalar,
    min_indent: usize,
) -> Option<Line<'a>> {
    let mut last = None;
    while !scalar.terminated() {
        match next_content_line(stream, min_indent) {
            Some(mut line) => {
                scalar.continuation(&mut line);
                last = Some(line);
            }
            None => break,
        }
    }
    last
}

/// Single-quoted scalars never fail to terminate by design (an unterminated
/// quote simply runs to end of input is not legal YAML); running out of
/// lines before a closing `'` is a syntax error.
pub(crate) fn continue_single(
    stream: &mut LineStream,
    scalar: &mut SingleQuotedScalar,
    min_indent: usize,
) -> Result<(), ParseError> {
    while !scalar.terminated() {
        match next_content_line(stream, min_indent) {
            Some(mut line) => scalar.continuation(&mut line),
            None => return Err(ParseError::syntax(Default::default(), "unterminated single-quoted scalar")),
        }
    }
    Ok(())
}

pub(crate) fn continue_double(
    stream: &mut LineStream,
    scalar: &mut DoubleQuotedScalar,
    min_indent: usize,
) -> Result<(), ParseError> {
    while !scalar.terminated() {
        match next_content_line(stream, min_indent) {
            Some(mut line) => scalar.continuation(&mut line)?,
            None => return Err(ParseError::syntax(Default::default(), "unterminated double-quoted scalar")),
        }
    }
    Ok(())
}

/// Flow containers ignore indentation entirely once opened (
/// gives no column rule for continuation lines), so `min_indent` is
/// always 0 here: any line, including one at column 0, may continue an
/// open `[...]`/`{...}`.
pub(crate) fn continue_flow(stream: &mut LineStream, parser: &mut FlowParser) -> Result<(), ParseError> {
    while !parser.complete() {
        match next_content_line(stream, 0) {
            Some(mut line) => parser.continuation(&mut line)?,
            None => return Err(ParseError::syntax(Default::default(), "unterminated flow collection")),
        }
    }
    Ok(())
}
