//! Clause interpreter
//!
//! ## Grammar
//!
//! ```text
//! clause    := alias SEP value
//! SEP       := ":"                  (default operator)
//!            | "__" code "__"       (explicit operator)
//! code      := co | eq | in | ni | lt | lte | gt | gte
//! value     := scalar | "[" item ("," item)* "]" | "[" "]"
//! ```
//!
//! The first `:` or `__` in the clause decides its form, so aliases never
//! contain either. Surrounding whitespace is trimmed from the alias.
//! Everything after the separator is the value and is kept as an opaque
//! string; list items are trimmed but otherwise untouched.
//!
//! ## Examples
//!
//! ```text
//! name:Python                 -> (name, <default>, "Python")
//! name__co__Prog              -> (name, CONTAINS, "Prog")
//! name__in__[Python, Ruby]    -> (name, IN, ["Python", "Ruby"])
//! age__lt__18                 -> (age, LESS_THAN, "18")
//! ```

use crate::ast::{Arity, Clause, Operator, ValueToken};
use crate::error::{MalformedReason, Result, SearchError};
use crate::lexer::DEFAULT_CLAUSE_SEPARATOR;
use crate::token::ClauseToken;
use serde::{Deserialize, Serialize};

const DEFAULT_SEPARATOR: char = ':';
const DIRECTIVE_MARK: &str = "__";

/// Punctuation of the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    pub clause_separator: char,
    pub list_open: char,
    pub list_close: char,
    pub list_delimiter: char,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            clause_separator: DEFAULT_CLAUSE_SEPARATOR,
            list_open: '[',
            list_close: ']',
            list_delimiter: ',',
        }
    }
}

/// Interprets single clause tokens into `(alias, operator, value)`.
pub struct ClauseParser<'s> {
    syntax: &'s Syntax,
    default_op: Operator,
}

impl<'s> ClauseParser<'s> {
    pub fn new(syntax: &'s Syntax, default_op: Operator) -> Self {
        Self { syntax, default_op }
    }

    pub fn parse(&self, token: &ClauseToken<'_>) -> Result<Clause> {
        self.parse_clause(token.text)
            .map_err(|reason| SearchError::MalformedClause {
                clause: token.text.to_string(),
                span: token.span,
                reason,
            })
    }

    fn parse_clause(&self, text: &str) -> std::result::Result<Clause, MalformedReason> {
        let (alias, code, raw_value) = split_clause(text)?;

        let alias = alias.trim();
        if alias.is_empty() {
            return Err(MalformedReason::EmptyAlias);
        }

        let op = match code {
            None => self.default_op,
            Some(code) => Operator::from_code(code)
                .ok_or_else(|| MalformedReason::UnknownOperator(code.to_string()))?,
        };

        let value = self.parse_value(raw_value, op)?;

        Ok(Clause {
            alias: alias.to_string(),
            op,
            value,
        })
    }

    /// Applies the value shape rules for `op`.
    fn parse_value(&self, raw: &str, op: Operator) -> std::result::Result<ValueToken, MalformedReason> {
        let items = self.list_items(raw);
        match (op.arity(), items) {
            (Arity::Scalar, None) => Ok(ValueToken::Scalar(raw.to_string())),
            (Arity::Scalar, Some(_)) => Err(MalformedReason::ShapeMismatch {
                op,
                expected: "scalar",
            }),
            (Arity::List, Some(items)) => Ok(ValueToken::List(items)),
            (Arity::Pair, Some(items)) if items.len() == 2 => Ok(ValueToken::List(items)),
            (Arity::List, None) => Err(MalformedReason::ShapeMismatch {
                op,
                expected: "list",
            }),
            (Arity::Pair, _) => Err(MalformedReason::ShapeMismatch {
                op,
                expected: "two-element list",
            }),
        }
    }

    /// Returns the trimmed items if `raw` is a bracketed list, `None` otherwise.
    fn list_items(&self, raw: &str) -> Option<Vec<String>> {
        let inner = raw
            .strip_prefix(self.syntax.list_open)?
            .strip_suffix(self.syntax.list_close)?;
        if inner.trim().is_empty() {
            return Some(Vec::new());
        }
        Some(
            inner
                .split(self.syntax.list_delimiter)
                .map(|item| item.trim().to_string())
                .collect(),
        )
    }
}

/// Cuts a clause into alias, optional operator code and raw value.
fn split_clause(text: &str) -> std::result::Result<(&str, Option<&str>, &str), MalformedReason> {
    let directive = text.find(DIRECTIVE_MARK);

    match text.find(DEFAULT_SEPARATOR) {
        Some(c) if directive.map_or(true, |d| c < d) => {
            Ok((&text[..c], None, &text[c + DEFAULT_SEPARATOR.len_utf8()..]))
        }
        _ => {
            let d = directive.ok_or(MalformedReason::MissingSeparator)?;
            let rest = &text[d + DIRECTIVE_MARK.len()..];
            let end = rest
                .find(DIRECTIVE_MARK)
                .ok_or(MalformedReason::UnterminatedOperator)?;
            Ok((
                &text[..d],
                Some(&rest[..end]),
                &rest[end + DIRECTIVE_MARK.len()..],
            ))
        }
    }
}
