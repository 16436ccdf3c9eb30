//! The token definition for the encoded query string.

/// One `alias[:|__op__]value` unit cut out of a RawQuery, with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseToken<'a> {
    pub text: &'a str,
    pub span: Span,
}

impl<'a> ClauseToken<'a> {
    pub fn new(text: &'a str, span: Span) -> Self {
        Self { text, span }
    }
}

/// Represents a span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The starting byte offset.
    pub start: usize,
    /// The ending byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
