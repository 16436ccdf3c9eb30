//! Clause splitter for the encoded query string.
//!
//! A RawQuery such as `name__co__Prog+author__co__Ritchie` is cut on the
//! clause separator into ordered [`ClauseToken`]s. Empty pieces produced by
//! leading, trailing or doubled separators are skipped.

use crate::token::{ClauseToken, Span};

pub const DEFAULT_CLAUSE_SEPARATOR: char = '+';

pub struct Splitter<'a> {
    input: &'a str,
    separator: char,
    /// Current position in the input (byte index)
    position: usize,
}

impl<'a> Splitter<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_separator(input, DEFAULT_CLAUSE_SEPARATOR)
    }

    pub fn with_separator(input: &'a str, separator: char) -> Self {
        Splitter {
            input,
            separator,
            position: 0,
        }
    }

    /// Returns the character at the current position without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Advances one character and returns it.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    fn skip_separators(&mut self) {
        while self.peek() == Some(self.separator) {
            self.bump();
        }
    }

    fn read_clause(&mut self, start: usize) -> ClauseToken<'a> {
        while let Some(c) = self.peek() {
            if c == self.separator {
                break;
            }
            self.bump();
        }
        ClauseToken::new(
            &self.input[start..self.position],
            Span::new(start, self.position),
        )
    }
}

impl<'a> Iterator for Splitter<'a> {
    type Item = ClauseToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_separators();
        if self.position >= self.input.len() {
            return None;
        }
        let start = self.position;
        Some(self.read_clause(start))
    }
}

/// Splits a RawQuery into its clause tokens.
pub fn split_clauses(input: &str, separator: char) -> Vec<ClauseToken<'_>> {
    Splitter::with_separator(input, separator).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        Splitter::new(input).map(|t| t.text).collect()
    }

    #[test]
    fn test_single_clause() {
        let mut splitter = Splitter::new("name:Python");
        let token = splitter.next().unwrap();
        assert_eq!(token.text, "name:Python");
        assert_eq!(token.span, Span::new(0, 11));
        assert_eq!(splitter.next(), None);
    }

    #[test]
    fn test_multiple_clauses_keep_order() {
        assert_eq!(
            texts("name__co__Prog+author__co__Ritchie+age__lt__18"),
            vec!["name__co__Prog", "author__co__Ritchie", "age__lt__18"]
        );
    }

    #[test]
    fn test_empty_pieces_are_skipped() {
        assert_eq!(texts("+a:1++b:2+"), vec!["a:1", "b:2"]);
        assert_eq!(texts("+++"), Vec::<&str>::new());
        assert_eq!(texts(""), Vec::<&str>::new());
    }

    #[test]
    fn test_spans_point_into_input() {
        let input = "+a:1++bb:22";
        for token in Splitter::new(input) {
            assert_eq!(&input[token.span.start..token.span.end], token.text);
        }
        let spans: Vec<_> = Splitter::new(input).map(|t| t.span).collect();
        assert_eq!(spans, vec![Span::new(1, 4), Span::new(6, 11)]);
    }

    #[test]
    fn test_custom_separator() {
        let tokens = split_clauses("a:1;b__in__[x,y]", ';');
        let kinds: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(kinds, vec!["a:1", "b__in__[x,y]"]);
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(texts("名前:パイソン+é:ü"), vec!["名前:パイソン", "é:ü"]);
    }
}
