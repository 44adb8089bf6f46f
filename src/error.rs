//! Error and warning types, and the `Mark` position every one of them
//! carries.

/// A position in the input stream: 1-based line, 1-based column.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Mark {
    /// Column within the line, reused as a byte/char index for the line
    /// cursor's own bookkeeping.
    pub index: u64,
    /// 1-based line number.
    pub line: u64,
    /// 1-based column.
    pub column: u64,
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Fatal parse failures. The first one aborts the parse; there is no
/// recovery.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Unexpected character, illegal directive, bad chomping header,
    /// standalone `:` indicator, non-blank content after a document end.
    #[error("{mark}: {message}")]
    Syntax { mark: Mark, message: String },
    /// Bad block-scalar indentation, content at an unexpected column, a
    /// block mapping value that never arrives.
    #[error("{mark}: {message}")]
    Indentation { mark: Mark, message: String },
    /// Unknown alias, undeclared tag handle, duplicate anchor, duplicate
    /// mapping key.
    #[error("{mark}: {message}")]
    Reference { mark: Mark, message: String },
    /// Illegal hex/unicode escape, illegal percent-encoding, supplementary
    /// code point out of range.
    #[error("{mark}: {message}")]
    Encoding { mark: Mark, message: String },
    /// `%YAML` major version other than 1.
    #[error("{mark}: {message}")]
    Version { mark: Mark, message: String },
    /// `---` in single-document mode, content after a directive block with
    /// no `---`.
    #[error("{mark}: {message}")]
    Structural { mark: Mark, message: String },
    #[error(transparent)]
    Source(#[from] crate::source::SourceError),
}

impl ParseError {
    pub fn mark(&self) -> Option<Mark> {
        match self {
            ParseError::Syntax { mark, .. }
            | ParseError::Indentation { mark, .. }
            | ParseError::Reference { mark, .. }
            | ParseError::Encoding { mark, .. }
            | ParseError::Version { mark, .. }
            | ParseError::Structural { mark, .. } => Some(*mark),
            ParseError::Source(_) => None,
        }
    }

    pub(crate) fn syntax(mark: Mark, message: impl Into<String>) -> Self {
        ParseError::Syntax { mark, message: message.into() }
    }

    pub(crate) fn indentation(mark: Mark, message: impl Into<String>) -> Self {
        ParseError::Indentation { mark, message: message.into() }
    }

    pub(crate) fn reference(mark: Mark, message: impl Into<String>) -> Self {
        ParseError::Reference { mark, message: message.into() }
    }

    pub(crate) fn encoding(mark: Mark, message: impl Into<String>) -> Self {
        ParseError::Encoding { mark, message: message.into() }
    }

    pub(crate) fn version(mark: Mark, message: impl Into<String>) -> Self {
        ParseError::Version { mark, message: message.into() }
    }

    pub(crate) fn structural(mark: Mark, message: impl Into<String>) -> Self {
        ParseError::Structural { mark, message: message.into() }
    }
}

/// Non-fatal conditions: an unknown directive, or a `%YAML` minor version
/// the parser doesn't specifically know but accepts under 1.2 rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseWarning {
    #[error("{mark}: unknown directive %{name}, ignored")]
    UnknownDirective { mark: Mark, name: String },
    #[error("{mark}: unsupported YAML minor version {minor}, parsing with 1.2 rules")]
    UnsupportedMinorVersion { mark: Mark, minor: u32 },
}

/// Failure from [`crate::Document::get_tag`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("node does not exist at pointer {0:?}")]
    NoSuchNode(String),
}
