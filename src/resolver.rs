//! Field resolver: client aliases to canonical backing-store paths.
//!
//! Only aliases listed in the mapping are searchable. An unknown alias is
//! never passed through as a field path.

use crate::error::{Result, SearchError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Alias to canonical field path, e.g. `author` -> `author__name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    mappings: HashMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alias, builder style.
    pub fn with(mut self, alias: impl Into<String>, field: impl Into<String>) -> Self {
        self.mappings.insert(alias.into(), field.into());
        self
    }

    pub fn resolve(&self, alias: &str) -> Result<&str> {
        self.mappings
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| SearchError::UnmappedField {
                alias: alias.to_string(),
            })
    }

    pub fn get_mappings(&self) -> &HashMap<String, String> {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl<A: Into<String>, F: Into<String>> FromIterator<(A, F)> for FieldMapping {
    fn from_iter<T: IntoIterator<Item = (A, F)>>(iter: T) -> Self {
        Self {
            mappings: iter
                .into_iter()
                .map(|(a, f)| (a.into(), f.into()))
                .collect(),
        }
    }
}

/// What happens to a clause whose alias is not in the mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedPolicy {
    /// Drop the clause.
    Ignore,
    /// Drop the clause and log a warning.
    #[default]
    Warn,
    /// Fail the parse with `UnmappedField` (strict mode).
    Reject,
}

/// Resolves `alias`, applying `policy` when it is unmapped.
///
/// `Ok(None)` means the clause is dropped.
pub fn resolve_alias<'m>(
    mapping: &'m FieldMapping,
    alias: &str,
    policy: UnmappedPolicy,
) -> Result<Option<&'m str>> {
    match mapping.resolve(alias) {
        Ok(field) => Ok(Some(field)),
        Err(err) => match policy {
            UnmappedPolicy::Reject => Err(err),
            UnmappedPolicy::Warn => {
                warn!("dropping clause on unsearchable field `{}`", alias);
                Ok(None)
            }
            UnmappedPolicy::Ignore => {
                debug!("dropping clause on unsearchable field `{}`", alias);
                Ok(None)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> FieldMapping {
        FieldMapping::new()
            .with("name", "name")
            .with("author", "author__name")
    }

    #[test]
    fn test_resolve_known_alias() {
        assert_eq!(mapping().resolve("author").unwrap(), "author__name");
        assert_eq!(mapping().resolve("name").unwrap(), "name");
    }

    #[test]
    fn test_unknown_alias_is_not_passed_through() {
        let err = mapping().resolve("author__name").unwrap_err();
        assert_eq!(
            err,
            SearchError::UnmappedField {
                alias: "author__name".to_string()
            }
        );
    }

    #[test]
    fn test_policies() {
        let _ = env_logger::builder().is_test(true).try_init();
        let m = mapping();
        assert_eq!(resolve_alias(&m, "ghost", UnmappedPolicy::Ignore).unwrap(), None);
        assert_eq!(resolve_alias(&m, "ghost", UnmappedPolicy::Warn).unwrap(), None);
        assert!(resolve_alias(&m, "ghost", UnmappedPolicy::Reject).is_err());
        assert_eq!(
            resolve_alias(&m, "name", UnmappedPolicy::Reject).unwrap(),
            Some("name")
        );
    }

    #[test]
    fn test_deserialize_flat_object() {
        let m: FieldMapping =
            serde_json::from_str(r#"{"name": "name", "age": "author__age"}"#).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.resolve("age").unwrap(), "author__age");
    }

    #[test]
    fn test_from_iter() {
        let m: FieldMapping = [("a", "x.y")].into_iter().collect();
        assert_eq!(m.resolve("a").unwrap(), "x.y");
    }
}
