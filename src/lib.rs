#![doc = include_str!("../README.md")]
#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::too_many_lines
)]
#![deny(unsafe_code)]

mod block;
mod classifier;
mod context;
mod document;
mod error;
mod flow;
mod framer;
mod lexer;
mod line;
mod options;
mod pointer;
mod properties;
mod source;
mod value;

pub use crate::document::Document;
pub use crate::error::{Mark, ParseError, ParseWarning, TagError};
pub use crate::options::ParserOptions;
pub use crate::source::{Source, SourceError};
pub use crate::value::{Map, Number, Value};

use crate::framer::split_documents;

/// Parses `source` as a single YAML document, failing if the input
/// contains more than one (`---` after content has already been seen).
pub fn parse(source: impl Into<Source>) -> Result<Document, ParseError> {
    parse_with(source, &ParserOptions::default())
}

pub fn parse_with(source: impl Into<Source>, options: &ParserOptions) -> Result<Document, ParseError> {
    let lines = source.into().into_lines()?;
    let mut raw_docs = split_documents(&lines, false)?;
    let raw = raw_docs.pop().expect("split_documents always returns at least one document");
    log::debug!("parsed single document spanning lines {:?}", raw.content);
    Document::build(&lines, raw, options)
}

/// Parses `source` as a stream of zero or more `---`/`...`-delimited
/// documents. Always returns at least one document — an empty input
/// yields a single document with a null root.
pub fn parse_stream(source: impl Into<Source>) -> Result<Vec<Document>, ParseError> {
    parse_stream_with(source, &ParserOptions::default())
}

pub fn parse_stream_with(source: impl Into<Source>, options: &ParserOptions) -> Result<Vec<Document>, ParseError> {
    let lines = source.into().into_lines()?;
    let raw_docs = split_documents(&lines, true)?;
    if let Some(max) = options.max_document_count {
        if raw_docs.len() > max {
            return Err(ParseError::structural(
                Mark::default(),
                format!("document count {} exceeds the configured maximum of {max}", raw_docs.len()),
            ));
        }
    }
    log::debug!("parsing stream of {} document(s)", raw_docs.len());
    raw_docs.into_iter().map(|raw| Document::build(&lines, raw, options)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_flat_mapping() {
        let doc = parse("a: 1\nb: two\n").unwrap();
        assert_eq!(doc.root(), &serde_json::json!({"a": 1, "b": "two"}));
    }

    #[test]
    fn empty_input_yields_one_null_document() {
        let docs = parse_stream("").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].root(), &Value::Null);
    }

    #[test]
    fn stream_splits_on_document_markers() {
        let docs = parse_stream("---\nabc\n---\ndef\n...\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].root(), &serde_json::json!("abc"));
        assert_eq!(docs[1].root(), &serde_json::json!("def"));
    }

    #[test]
    fn a_second_top_level_document_is_rejected_by_parse() {
        assert!(parse("---\na\n---\nb\n").is_err());
    }

    #[test]
    fn max_document_count_is_enforced() {
        let options = ParserOptions::new().with_max_document_count(1);
        let err = parse_stream_with("---\na\n---\nb\n", &options).unwrap_err();
        assert!(matches!(err, ParseError::Structural { .. }));
    }
}
