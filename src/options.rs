//! Parser configuration, collapsed into a single value passed by call
//! rather than process-wide mutable state.
//!
//! Duplicate-key detection is always fatal; there is no knob
//! for it. The two knobs here guard against pathological/adversarial
//! input rather than changing observable parse results.

/// Resource limits applied while parsing. The zero-argument [`Default`]
/// matches `parse`/`parse_stream`'s behavior: unbounded depth and
/// document count.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct ParserOptions {
    /// Maximum node nesting depth (mapping/sequence/flow-container
    /// descent). `None` means unbounded. Guards against stack exhaustion
    /// on adversarial input.
    pub max_depth: Option<usize>,
    /// Maximum number of documents `parse_stream` will produce before
    /// failing. `None` means unbounded.
    pub max_document_count: Option<usize>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_depth: None,
            max_document_count: None,
        }
    }
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    #[must_use]
    pub fn with_max_document_count(mut self, max_document_count: usize) -> Self {
        self.max_document_count = Some(max_document_count);
        self
    }
}
