//! Search definitions and the parse entry points.
//!
//! A [`SearchDefinition`] is plain immutable data. Parsing borrows it and
//! keeps every intermediate value local to the call, so any number of
//! requests can parse against the same definition at once. Reloading
//! configuration goes through [`SharedDefinition`], which swaps in a new
//! definition instead of editing the current one.

use crate::ast::{Operator, Predicate, PredicateNode};
use crate::builder::build_leaf;
use crate::composer::compose;
use crate::error::{ConfigError, Result};
use crate::lexer::Splitter;
use crate::parser::{ClauseParser, Syntax};
use crate::resolver::{resolve_alias, FieldMapping, UnmappedPolicy};
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_PARAM: &str = "q";

/// Everything one search endpoint needs to turn a query string into a tree.
///
/// Only validated definitions exist: build one with
/// [`SearchDefinition::builder`] or load it from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DefinitionFile")]
pub struct SearchDefinition {
    pub(crate) param: String,
    pub(crate) default_operator: Operator,
    pub(crate) unmapped: UnmappedPolicy,
    pub(crate) syntax: Syntax,
    pub(crate) fields: FieldMapping,
    pub(crate) mandatory: Vec<Predicate>,
    pub(crate) defaults: Vec<Predicate>,
}

/// On-disk shape of a definition, before validation.
#[derive(Debug, Deserialize)]
struct DefinitionFile {
    #[serde(default = "default_param")]
    param: String,
    #[serde(default = "default_operator")]
    default_operator: Operator,
    #[serde(default)]
    unmapped: UnmappedPolicy,
    #[serde(default)]
    syntax: Syntax,
    fields: FieldMapping,
    #[serde(default)]
    mandatory: Vec<Predicate>,
    #[serde(default)]
    defaults: Vec<Predicate>,
}

impl TryFrom<DefinitionFile> for SearchDefinition {
    type Error = ConfigError;

    fn try_from(file: DefinitionFile) -> std::result::Result<Self, ConfigError> {
        let definition = SearchDefinition {
            param: file.param,
            default_operator: file.default_operator,
            unmapped: file.unmapped,
            syntax: file.syntax,
            fields: file.fields,
            mandatory: file.mandatory,
            defaults: file.defaults,
        };
        definition.validate()?;
        Ok(definition)
    }
}

fn default_param() -> String {
    DEFAULT_PARAM.to_string()
}

fn default_operator() -> Operator {
    Operator::Equals
}

impl SearchDefinition {
    pub fn builder(fields: FieldMapping) -> SearchDefinitionBuilder {
        SearchDefinitionBuilder {
            draft: SearchDefinition {
                param: default_param(),
                default_operator: default_operator(),
                unmapped: UnmappedPolicy::default(),
                syntax: Syntax::default(),
                fields,
                mandatory: Vec::new(),
                defaults: Vec::new(),
            },
        }
    }

    /// Starts a builder from this definition, for publishing a changed copy.
    pub fn to_builder(&self) -> SearchDefinitionBuilder {
        SearchDefinitionBuilder {
            draft: self.clone(),
        }
    }

    /// Request parameter carrying the RawQuery.
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Operator for the bare `alias:value` form.
    pub fn default_operator(&self) -> Operator {
        self.default_operator
    }

    pub fn unmapped(&self) -> UnmappedPolicy {
        self.unmapped
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    pub fn fields(&self) -> &FieldMapping {
        &self.fields
    }

    pub fn mandatory(&self) -> &[Predicate] {
        &self.mandatory
    }

    pub fn defaults(&self) -> &[Predicate] {
        &self.defaults
    }

    /// Parses a RawQuery against this definition.
    pub fn parse(&self, raw: &str) -> Result<PredicateNode> {
        parse(raw, self)
    }

    /// Parses the RawQuery found under [`param`](Self::param) in already
    /// decoded request parameters. The last occurrence wins; a missing
    /// parameter is an empty query.
    pub fn parse_params<I, K, V>(&self, params: I) -> Result<PredicateNode>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let raw = params
            .into_iter()
            .filter(|(k, _)| k.as_ref() == self.param)
            .last()
            .map(|(_, v)| v.as_ref().to_string())
            .unwrap_or_default();
        self.parse(&raw)
    }
}

/// Collects definition settings; [`build`](Self::build) validates them.
#[derive(Debug, Clone)]
pub struct SearchDefinitionBuilder {
    draft: SearchDefinition,
}

impl SearchDefinitionBuilder {
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.draft.param = param.into();
        self
    }

    pub fn with_default_operator(mut self, op: Operator) -> Self {
        self.draft.default_operator = op;
        self
    }

    pub fn with_unmapped(mut self, policy: UnmappedPolicy) -> Self {
        self.draft.unmapped = policy;
        self
    }

    /// Shorthand for `with_unmapped(UnmappedPolicy::Reject)`.
    pub fn strict(self) -> Self {
        self.with_unmapped(UnmappedPolicy::Reject)
    }

    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.draft.syntax = syntax;
        self
    }

    pub fn with_field(mut self, alias: impl Into<String>, field: impl Into<String>) -> Self {
        self.draft.fields = self.draft.fields.with(alias, field);
        self
    }

    pub fn with_mandatory(mut self, predicate: Predicate) -> Self {
        self.draft.mandatory.push(predicate);
        self
    }

    pub fn with_default(mut self, predicate: Predicate) -> Self {
        self.draft.defaults.push(predicate);
        self
    }

    pub fn build(self) -> std::result::Result<SearchDefinition, ConfigError> {
        self.draft.validate()?;
        Ok(self.draft)
    }
}

/// Turns `raw` into the final predicate tree.
///
/// Fails on the first malformed clause, or on an unmapped alias when the
/// definition rejects those. Nothing partial is returned on failure.
pub fn parse(raw: &str, definition: &SearchDefinition) -> Result<PredicateNode> {
    let parser = ClauseParser::new(&definition.syntax, definition.default_operator);
    let mut leaves = Vec::new();

    for token in Splitter::with_separator(raw, definition.syntax.clause_separator) {
        let clause = parser.parse(&token)?;
        if let Some(field) = resolve_alias(&definition.fields, &clause.alias, definition.unmapped)? {
            leaves.push(build_leaf(field, clause));
        }
    }

    Ok(compose(leaves, &definition.mandatory, &definition.defaults))
}

/// A definition that can be replaced while requests are being served.
///
/// Each parse works on the snapshot it loaded; [`publish`](Self::publish)
/// only affects later loads.
pub struct SharedDefinition {
    inner: ArcSwap<SearchDefinition>,
}

impl SharedDefinition {
    pub fn new(definition: SearchDefinition) -> Self {
        Self {
            inner: ArcSwap::from_pointee(definition),
        }
    }

    pub fn load(&self) -> Arc<SearchDefinition> {
        self.inner.load_full()
    }

    pub fn publish(&self, definition: SearchDefinition) {
        self.inner.store(Arc::new(definition));
    }

    pub fn parse(&self, raw: &str) -> Result<PredicateNode> {
        self.inner.load().parse(raw)
    }
}
