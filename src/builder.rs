//! Predicate builder: resolved triples to leaf predicates.

use crate::ast::{Clause, Predicate};

/// Builds the leaf for a clause whose alias resolved to `field`.
///
/// The clause interpreter already guaranteed the value shape, so this
/// cannot fail.
pub fn build_leaf(field: &str, clause: Clause) -> Predicate {
    Predicate::new(field, clause.op, clause.value)
}
