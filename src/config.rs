//! Loading search definitions from JSON files.

use crate::ast::{Operator, Predicate, ValueToken};
use crate::error::ConfigError;
use crate::parser::Syntax;
use crate::resolver::{FieldMapping, UnmappedPolicy};
use crate::search::{SearchDefinition, DEFAULT_PARAM};
use std::fs;
use std::path::Path;

impl SearchDefinition {
    /// Loads and validates a search definition from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let definition: SearchDefinition =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path_ref.to_path_buf(),
                source,
            })?;

        log::debug!(
            "loaded search definition from {} ({} fields)",
            path_ref.display(),
            definition.fields.len()
        );
        Ok(definition)
    }

    /// Parses and validates a search definition from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let definition: SearchDefinition = serde_json::from_str(content)
            .map_err(|e| ConfigError::invalid(format!("cannot parse JSON: {}", e)))?;
        Ok(definition)
    }

    /// Checks the invariants parsing relies on. Every way of obtaining a
    /// `SearchDefinition` goes through here.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let syntax = &self.syntax;
        let separator = syntax.clause_separator;
        if matches!(separator, ':' | '_')
            || separator == syntax.list_open
            || separator == syntax.list_close
            || separator == syntax.list_delimiter
        {
            return Err(ConfigError::invalid(format!(
                "clause separator `{}` collides with the clause grammar",
                separator
            )));
        }
        if syntax.list_open == syntax.list_close
            || syntax.list_delimiter == syntax.list_open
            || syntax.list_delimiter == syntax.list_close
        {
            return Err(ConfigError::invalid(
                "list brackets and delimiter must all differ",
            ));
        }
        if self.param.is_empty() {
            return Err(ConfigError::invalid("request parameter name is empty"));
        }
        if self.default_operator == Operator::Range {
            return Err(ConfigError::invalid("`range` cannot be the default operator"));
        }

        for (alias, field) in self.fields.get_mappings() {
            if alias.is_empty() || field.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "empty alias or field path in mapping `{}` -> `{}`",
                    alias, field
                )));
            }
            // A trailing `_` would merge into a following `__op__` directive.
            if alias.contains(':')
                || alias.contains("__")
                || alias.ends_with('_')
                || alias.contains(separator)
            {
                return Err(ConfigError::invalid(format!(
                    "alias `{}` contains a reserved separator",
                    alias
                )));
            }
        }

        for (kind, set) in [("mandatory", &self.mandatory), ("default", &self.defaults)] {
            for predicate in set {
                check_predicate(kind, predicate)?;
            }
        }

        Ok(())
    }

    /// A small definition for trying the parser out.
    pub fn demo() -> Self {
        let fields = FieldMapping::new()
            .with("name", "name")
            .with("author", "author__name")
            .with("age", "author__age")
            .with("lang", "language__code")
            .with("created", "createDate");

        SearchDefinition {
            param: DEFAULT_PARAM.to_string(),
            default_operator: Operator::Equals,
            unmapped: UnmappedPolicy::default(),
            syntax: Syntax::default(),
            fields,
            mandatory: vec![Predicate::new(
                "status",
                Operator::In,
                ValueToken::list(["published", "in_progress"]),
            )],
            defaults: vec![Predicate::new(
                "createDate",
                Operator::Range,
                ValueToken::list(["now-7d", "now"]),
            )],
        }
    }
}

fn check_predicate(kind: &str, predicate: &Predicate) -> Result<(), ConfigError> {
    if predicate.field.is_empty() {
        return Err(ConfigError::invalid(format!(
            "{} predicate has an empty field",
            kind
        )));
    }
    if !predicate.value.fits(predicate.op.arity()) {
        return Err(ConfigError::invalid(format!(
            "{} predicate {} has the wrong value shape",
            kind, predicate
        )));
    }
    Ok(())
}
