//! Search composer
//!
//! Joins the client's leaves with the server's mandatory and default
//! predicates into one AND tree:
//!
//! ```text
//! AND(
//!   user leaves       one per canonical field, last clause wins
//!   mandatory leaves  always, even on fields the user also filtered
//!   default leaves    only for fields no user leaf touched
//! )
//! ```

use crate::ast::{Predicate, PredicateNode};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Composes the final predicate tree.
pub fn compose(
    user: Vec<Predicate>,
    mandatory: &[Predicate],
    defaults: &[Predicate],
) -> PredicateNode {
    let effective = last_per_field(user);

    let touched: HashSet<&str> = effective.iter().map(|p| p.field.as_str()).collect();
    let injected: Vec<&Predicate> = defaults
        .iter()
        .filter(|d| !touched.contains(d.field.as_str()))
        .collect();

    debug!(
        "composing {} user, {} mandatory, {} default predicates",
        effective.len(),
        mandatory.len(),
        injected.len()
    );

    let mut children: Vec<PredicateNode> =
        Vec::with_capacity(effective.len() + mandatory.len() + injected.len());
    children.extend(effective.into_iter().map(PredicateNode::Leaf));
    children.extend(mandatory.iter().cloned().map(PredicateNode::Leaf));
    children.extend(injected.into_iter().cloned().map(PredicateNode::Leaf));

    PredicateNode::all(children)
}

/// Keeps one predicate per field. A later predicate replaces an earlier one
/// but takes over its position.
fn last_per_field(predicates: Vec<Predicate>) -> Vec<Predicate> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut effective: Vec<Predicate> = Vec::with_capacity(predicates.len());

    for predicate in predicates {
        match slots.get(&predicate.field) {
            Some(&i) => {
                debug!("clause on `{}` overrides an earlier one", predicate.field);
                effective[i] = predicate;
            }
            None => {
                slots.insert(predicate.field.clone(), effective.len());
                effective.push(predicate);
            }
        }
    }

    effective
}
