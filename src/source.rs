//! Character-source abstraction: turns a byte stream, an already-decoded
//! string, or a filesystem path into an ordered list of text lines.
//!
//! This is intentionally thin: charset sniffing and multi-byte (UTF-16/32)
//! decoding are out of scope; the only encoding this module understands
//! is UTF-8, with an optional leading BOM.

use std::path::{Path, PathBuf};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("input is not valid UTF-8 at byte offset {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Where the parser reads its input from.
pub enum Source {
    Text(String),
    Path(PathBuf),
}

impl Source {
    pub fn into_lines(self) -> Result<Vec<String>, SourceError> {
        let text = match self {
            Source::Text(s) => s,
            Source::Path(path) => decode(&std::fs::read(&path)?)?,
        };
        Ok(split_lines(&text))
    }
}

fn decode(bytes: &[u8]) -> Result<String, SourceError> {
    let bytes = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| SourceError::InvalidUtf8 { valid_up_to: e.valid_up_to() })
}

fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
        .collect()
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::Text(s.to_owned())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Source::Text(s)
    }
}

impl From<&Path> for Source {
    fn from(p: &Path) -> Self {
        Source::Path(p.to_owned())
    }
}

impl From<PathBuf> for Source {
    fn from(p: PathBuf) -> Self {
        Source::Path(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_and_splits_lines() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"a: 1\r\nb: 2\n");
        let text = decode(&bytes).unwrap();
        assert_eq!(split_lines(&text), vec!["a: 1".to_string(), "b: 2".to_string()]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(split_lines("").is_empty());
    }
}
