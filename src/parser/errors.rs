//! Parse error with caret rendering.

use std::error::Error;
use std::fmt;

/// Result type for parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// A syntax error in the SQL text.
///
/// Displays the original statement with a caret indicator under the
/// offending span.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    message: String,
    sql: String,
    start: usize,
    end: usize,
}

impl ParseError {
    pub(super) fn new(message: impl Into<String>, sql: &str, start: usize, end: usize) -> Self {
        let end = end.max(start + 1);
        Self {
            message: message.into(),
            sql: sql.to_string(),
            start,
            end,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte span of the offending token within the SQL text
    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.end.min(self.sql.len().max(self.start + 1)) - self.start;
        write!(
            f,
            "{}:\n{}\n{}{}",
            self.message,
            self.sql,
            " ".repeat(self.start),
            "^".repeat(width.max(1)),
        )
    }
}

impl Error for ParseError {}
