//! Plain and flow-plain scalar recognition.

use crate::line::Line;

/// Accumulates a plain scalar across one or more lines. `terminated`
/// becomes true once a colon-with-whitespace, a comment, or (in flow
/// context) a flow indicator has been seen; until then the scalar may
/// still grow via [`PlainScalar::continuation`].
#[derive(Debug, Default)]
pub struct PlainScalar {
    text: String,
    terminated: bool,
    in_flow: bool,
    /// Set when the scalar stopped specifically because of a
    /// colon-with-whitespace — the Initial block uses this to decide
    /// whether to become a mapping.
    stopped_at_colon: bool,
}

impl PlainScalar {
    pub fn scan(line: &mut Line, in_flow: bool) -> Self {
        let mut scalar = PlainScalar {
            in_flow,
            ..Default::default()
        };
        scalar.consume(line);
        scalar
    }

    fn consume(&mut self, line: &mut Line) {
        let mut buf = String::new();
        loop {
            if line.at_logical_end() {
                break;
            }
            let c = line.peek().unwrap();
            if self.in_flow && matches!(c, '[' | ']' | '{' | '}' | ',') {
                self.terminated = true;
                break;
            }
            if c == ':' && line.is_colon_indicator() {
                self.terminated = true;
                self.stopped_at_colon = true;
                break;
            }
            buf.push(c);
            line.advance();
        }
        let trimmed = buf.trim_end_matches([' ', '\t']).to_string();
        super::append_with_space(&mut self.text, &trimmed);
    }

    pub fn continuation(&mut self, line: &mut Line) {
        self.consume(line);
    }

    pub fn terminated(&self) -> bool {
        self.terminated
    }

    pub fn stopped_at_colon(&self) -> bool {
        self.stopped_at_colon
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_before_colon_with_whitespace() {
        let mut line = Line::new(1, "key: value");
        let scalar = PlainScalar::scan(&mut line, false);
        assert_eq!(scalar.text(), "key");
        assert!(scalar.stopped_at_colon());
    }

    #[test]
    fn colon_without_whitespace_is_part_of_the_scalar() {
        let mut line = Line::new(1, "a:b");
        let scalar = PlainScalar::scan(&mut line, false);
        assert_eq!(scalar.text(), "a:b");
        assert!(!scalar.terminated());
    }

    #[test]
    fn flow_plain_stops_at_flow_indicators() {
        let mut line = Line::new(1, "abcde, hello");
        let scalar = PlainScalar::scan(&mut line, true);
        assert_eq!(scalar.text(), "abcde");
        assert!(scalar.terminated());
    }

    #[test]
    fn continuation_joins_with_single_space() {
        let mut first = Line::new(1, "first");
        let mut scalar = PlainScalar::scan(&mut first, false);
        assert!(!scalar.terminated());
        let mut second = Line::new(2, "second");
        scalar.continuation(&mut second);
        assert_eq!(scalar.text(), "first second");
    }
}
