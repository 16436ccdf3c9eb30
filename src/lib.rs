//! Query-string search: turns an encoded client query such as
//! `name__co__Prog+author__co__Ritchie` into a predicate tree over canonical
//! field paths, joined with the server's mandatory and default predicates.
//!
//! ```text
//! RawQuery -> lexer (clauses) -> parser (alias, op, value)
//!          -> resolver (canonical field) -> builder (leaf)
//!          -> composer (AND tree)
//! ```

pub mod ast;
pub mod builder;
pub mod composer;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod search;
pub mod sql_compiler;
pub mod token;

pub use ast::{Connective, Operator, Predicate, PredicateNode, ValueToken};
pub use error::{ConfigError, MalformedReason, SearchError};
pub use parser::Syntax;
pub use resolver::{FieldMapping, UnmappedPolicy};
pub use search::{parse, SearchDefinition, SearchDefinitionBuilder, SharedDefinition};
pub use sql_compiler::SqlCompiler;
