//! Error types for query-string parsing and search definition loading.

use crate::ast::Operator;
use crate::token::Span;
use std::path::PathBuf;
use thiserror::Error;

/// Errors a parse call can return to its caller.
///
/// Either one fails the whole parse; no partial tree is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("malformed clause `{clause}` at {span}: {reason}")]
    MalformedClause {
        clause: String,
        span: Span,
        reason: MalformedReason,
    },

    /// Only raised under [`UnmappedPolicy::Reject`](crate::resolver::UnmappedPolicy).
    #[error("field `{alias}` is not searchable")]
    UnmappedField { alias: String },
}

/// Why a single clause could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("missing `:` or `__op__` separator")]
    MissingSeparator,

    #[error("empty field alias")]
    EmptyAlias,

    #[error("operator directive is not closed with `__`")]
    UnterminatedOperator,

    #[error("unknown operator code `{0}`")]
    UnknownOperator(String),

    #[error("operator {op} expects a {expected} value")]
    ShapeMismatch { op: Operator, expected: &'static str },
}

/// Result type for parse operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised while loading or validating a search definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read search definition {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse search definition {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid search definition: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid(message.into())
    }
}
