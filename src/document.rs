//! Document Assembler: turns one framer-delimited section of input into a
//! fully parsed [`Document`] — the root value, the resolved version, the
//! tag map, and any warnings collected along the way.

use std::collections::BTreeMap;

use crate::block::{parse_document_root, LineStream};
use crate::context::Context;
use crate::error::{ParseError, ParseWarning, TagError};
use crate::framer::RawDocument;
use crate::options::ParserOptions;
use crate::value::{self, Value};

/// One parsed YAML document: a root value plus the per-node metadata a
/// bare JSON tree can't carry.
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
    tag_map: BTreeMap<String, String>,
    major_version: u32,
    minor_version: u32,
    warnings: Vec<ParseWarning>,
}

impl Document {
    pub(crate) fn build(lines: &[String], raw: RawDocument, options: &ParserOptions) -> Result<Self, ParseError> {
        let ctx = Context::new_document_with_max_depth(options.max_depth);
        let (major, minor) = raw.version.unwrap_or((1, 2));
        ctx.set_version(major, minor);
        for (handle, prefix) in &raw.tag_overrides {
            ctx.declare_tag_handle(handle.clone(), prefix.clone());
        }

        let mut stream = LineStream::new(&lines[raw.content.clone()]);
        let root = parse_document_root(&mut stream, ctx.clone())?;

        Ok(Document {
            root,
            tag_map: ctx.tag_map_snapshot(),
            major_version: major,
            minor_version: minor,
            warnings: raw.warnings,
        })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn major_version(&self) -> u32 {
        self.major_version
    }

    pub fn minor_version(&self) -> u32 {
        self.minor_version
    }

    /// The tag at `pointer` (RFC 6901): the explicitly written tag if one
    /// was attached to that node, otherwise the default tag its JSON kind
    /// resolves to. Fails only if no node exists at `pointer` at all.
    pub fn get_tag(&self, pointer: &str) -> Result<&str, TagError> {
        if let Some(tag) = self.tag_map.get(pointer) {
            return Ok(tag.as_str());
        }
        let node = self
            .root
            .pointer(pointer)
            .ok_or_else(|| TagError::NoSuchNode(pointer.to_string()))?;
        Ok(value::tag::default_for(node))
    }

    pub fn tag_map(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tag_map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framer::split_documents;

    fn build_one(text: &str) -> Document {
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();
        let mut docs = split_documents(&lines, false).unwrap();
        Document::build(&lines, docs.remove(0), &ParserOptions::default()).unwrap()
    }

    #[test]
    fn root_and_version_defaults() {
        let doc = build_one("a: 1");
        assert_eq!(doc.major_version(), 1);
        assert_eq!(doc.minor_version(), 2);
        assert_eq!(doc.root(), &serde_json::json!({"a": 1}));
    }

    #[test]
    fn explicit_tag_is_resolved_via_get_tag() {
        let doc = build_one("%TAG !e! tag:example.com,2023:\n---\n- !e!thing v");
        assert_eq!(doc.get_tag("/0").unwrap(), "tag:example.com,2023:thing");
    }

    #[test]
    fn default_tag_is_reported_when_no_explicit_tag_was_given() {
        let doc = build_one("a: 1");
        assert_eq!(doc.get_tag("/a").unwrap(), "tag:yaml.org,2002:int");
    }

    #[test]
    fn missing_pointer_is_an_error() {
        let doc = build_one("a: 1");
        assert!(doc.get_tag("/nope").is_err());
    }
}
