//! Double-quoted scalar recognition, including escape decoding.

use crate::error::ParseError;
use crate::line::Line;

#[derive(Debug, Default)]
pub struct DoubleQuotedScalar {
    text: String,
    terminated: bool,
    /// Set when the line ended on a bare trailing `\`, which suppresses
    /// the implicit space normally inserted when joining the next line.
    suppress_space: bool,
}

impl DoubleQuotedScalar {
    /// `line` must be positioned just after the opening `"`.
    pub fn scan(line: &mut Line) -> Result<Self, ParseError> {
        let mut scalar = DoubleQuotedScalar::default();
        scalar.consume(line)?;
        Ok(scalar)
    }

    pub fn continuation(&mut self, line: &mut Line) -> Result<(), ParseError> {
        self.consume(line)
    }

    fn consume(&mut self, line: &mut Line) -> Result<(), ParseError> {
        let mut buf = String::new();
        let mut trailing_backslash = false;
        loop {
            match line.peek() {
                None => break,
                Some('"') => {
                    line.advance();
                    self.terminated = true;
                    break;
                }
                Some('\\') => {
                    let mark = line.mark();
                    line.advance();
                    match line.peek() {
                        None => {
                            trailing_backslash = true;
                            break;
                        }
                        Some(escape) => {
                            line.advance();
                            decode_escape(line, mark, escape, &mut buf)?;
                        }
                    }
                }
                Some(c) => {
                    buf.push(c);
                    line.advance();
                }
            }
        }
        if self.suppress_space {
            self.text.push_str(&buf);
        } else {
            super::append_with_space(&mut self.text, &buf);
        }
        self.suppress_space = trailing_backslash;
        Ok(())
    }

    pub fn terminated(&self) -> bool {
        self.terminated
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

fn decode_escape(
    line: &mut Line,
    mark: crate::error::Mark,
    escape: char,
    buf: &mut String,
) -> Result<(), ParseError> {
    match escape {
        '0' => buf.push('\0'),
        'a' => buf.push('\u{7}'),
        'b' => buf.push('\u{8}'),
        't' | '\t' => buf.push('\t'),
        'n' => buf.push('\n'),
        'v' => buf.push('\u{b}'),
        'f' => buf.push('\u{c}'),
        'r' => buf.push('\r'),
        'e' => buf.push('\u{1b}'),
        ' ' => buf.push(' '),
        '"' => buf.push('"'),
        '/' => buf.push('/'),
        '\\' => buf.push('\\'),
        'N' => buf.push('\u{85}'),
        '_' => buf.push('\u{a0}'),
        'L' => buf.push('\u{2028}'),
        'P' => buf.push('\u{2029}'),
        'x' => {
            let v = line
                .consume_hex_digits(2)
                .ok_or_else(|| ParseError::encoding(mark, "illegal \\x escape"))?;
            push_scalar_value(buf, mark, v)?;
        }
        'u' => {
            let high = line
                .consume_hex_digits(4)
                .ok_or_else(|| ParseError::encoding(mark, "illegal \\u escape"))?;
            decode_u_escape(line, mark, high, buf)?;
        }
        'U' => {
            let v = line
                .consume_hex_digits(8)
                .ok_or_else(|| ParseError::encoding(mark, "illegal \\U escape"))?;
            push_scalar_value(buf, mark, v)?;
        }
        other => {
            return Err(ParseError::syntax(mark, format!("unknown escape sequence \\{other}")));
        }
    }
    Ok(())
}

fn decode_u_escape(
    line: &mut Line,
    mark: crate::error::Mark,
    high: u32,
    buf: &mut String,
) -> Result<(), ParseError> {
    const HIGH_SURROGATE: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
    const LOW_SURROGATE: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

    if LOW_SURROGATE.contains(&high) {
        return Err(ParseError::encoding(mark, "lone low UTF-16 surrogate in \\u escape"));
    }
    if HIGH_SURROGATE.contains(&high) {
        if !line.consume_str("\\u") {
            return Err(ParseError::encoding(mark, "unpaired UTF-16 surrogate in \\u escape"));
        }
        let low = line
            .consume_hex_digits(4)
            .ok_or_else(|| ParseError::encoding(mark, "illegal \\u escape"))?;
        if !LOW_SURROGATE.contains(&low) {
            return Err(ParseError::encoding(mark, "unpaired UTF-16 surrogate in \\u escape"));
        }
        let code = 0x10000 + (high - 0xD800) * 0x400 + (low - 0xDC00);
        return push_scalar_value(buf, mark, code);
    }
    push_scalar_value(buf, mark, high)
}

fn push_scalar_value(buf: &mut String, mark: crate::error::Mark, value: u32) -> Result<(), ParseError> {
    match char::from_u32(value) {
        Some(c) => {
            buf.push(c);
            Ok(())
        }
        None => Err(ParseError::encoding(mark, format!("supplementary code point U+{value:X} out of range"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_escapes() {
        let mut line = Line::new(1, r#"unicode: "Sosa did fine.☺""#);
        line.set_pos("unicode: \"".len());
        let scalar = DoubleQuotedScalar::scan(&mut line).unwrap();
        assert!(scalar.terminated());
        assert_eq!(scalar.into_text(), "Sosa did fine.\u{263A}");
    }

    #[test]
    fn decodes_control_and_hex_escapes() {
        let mut line = Line::new(1, r#""\b1998\t1999\t2000\n""#);
        line.set_pos(1);
        let scalar = DoubleQuotedScalar::scan(&mut line).unwrap();
        assert_eq!(scalar.into_text(), "\u{8}1998\t1999\t2000\n");
    }

    #[test]
    fn trailing_backslash_suppresses_join_space() {
        let mut first = Line::new(1, r#"abc\"#);
        let mut scalar = DoubleQuotedScalar::scan(&mut first).unwrap();
        assert!(!scalar.terminated());
        let mut second = Line::new(2, r#"def""#);
        scalar.continuation(&mut second).unwrap();
        assert_eq!(scalar.into_text(), "abcdef");
    }

    #[test]
    fn surrogate_pair_combines_into_supplementary_codepoint() {
        let mut line = Line::new(1, r#""😀""#);
        line.set_pos(1);
        let scalar = DoubleQuotedScalar::scan(&mut line).unwrap();
        assert_eq!(scalar.into_text(), "\u{1F600}");
    }

    #[test]
    fn lone_high_surrogate_is_an_encoding_error() {
        let mut line = Line::new(1, r#""\uD800""#);
        line.set_pos(1);
        assert!(DoubleQuotedScalar::scan(&mut line).is_err());
    }
}
