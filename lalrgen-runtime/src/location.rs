use std::fmt;

/// Human-friendly position within a source string, for use in lexical and
/// syntax error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    line_number: usize,
    offset: usize,
}

impl Location {
    pub fn start() -> Self {
        Location { line_number: 1, offset: 1 }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Advances this location past `text`, tracking line breaks.
    pub fn advance_past(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line_number += 1;
                self.offset = 1;
            } else {
                self.offset += 1;
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line_number, self.offset)
    }
}
