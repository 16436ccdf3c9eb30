//! Property-based tests for the query-string parser.

use proptest::prelude::*;
use search_query::lexer::Splitter;
use search_query::{
    FieldMapping, Operator, Predicate, SearchDefinition, SearchError, UnmappedPolicy, ValueToken,
};

// ============================================================================
// Test helpers
// ============================================================================

const ALIASES: [&str; 4] = ["name", "author", "age", "lang"];

fn definition() -> SearchDefinition {
    SearchDefinition::builder(
        FieldMapping::new()
            .with("name", "name")
            .with("author", "author__name")
            .with("age", "author__age")
            .with("lang", "language__code"),
    )
    .with_mandatory(Predicate::new(
        "status",
        Operator::In,
        ValueToken::list(["published"]),
    ))
    .with_default(Predicate::new(
        "author__age",
        Operator::GreaterThan,
        ValueToken::scalar("-1"),
    ))
    .build()
    .unwrap()
}

fn scalar_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["co", "eq", "lt", "lte", "gt", "gte"])
}

fn list_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["in", "ni"])
}

fn alias() -> impl Strategy<Value = &'static str> {
    prop::sample::select(ALIASES.to_vec())
}

// Values free of every separator character.
fn plain_value() -> impl Strategy<Value = String> {
    "[a-z0-9 ]{0,8}"
}

fn clause() -> impl Strategy<Value = String> {
    prop_oneof![
        (alias(), plain_value()).prop_map(|(a, v)| format!("{a}:{v}")),
        (alias(), scalar_op(), plain_value()).prop_map(|(a, op, v)| format!("{a}__{op}__{v}")),
    ]
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Re-joining the split clauses reproduces the input minus empty pieces.
    #[test]
    fn split_then_join_is_stable(input in "[a-z:_+]{0,40}") {
        let joined = Splitter::new(&input).map(|t| t.text).collect::<Vec<_>>().join("+");
        let expected = input.split('+').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("+");
        prop_assert_eq!(joined, expected);
    }

    /// Scalar operators always yield scalar leaves.
    #[test]
    fn scalar_operators_yield_scalars(a in alias(), op in scalar_op(), v in plain_value()) {
        let tree = definition().parse(&format!("{a}__{op}__{v}")).unwrap();
        let first = tree.leaves().next().unwrap();
        prop_assert_eq!(&first.value, &ValueToken::Scalar(v));
    }

    /// List operators keep every item, in order, duplicates included.
    #[test]
    fn list_operators_keep_items(
        a in alias(),
        op in list_op(),
        items in prop::collection::vec("[a-z0-9]{1,5}", 1..6),
    ) {
        let raw = format!("{a}__{op}__[{}]", items.join(","));
        let tree = definition().parse(&raw).unwrap();
        let first = tree.leaves().next().unwrap();
        prop_assert_eq!(&first.value, &ValueToken::List(items));
    }

    /// Unknown aliases never reach the tree, and strict mode always rejects them.
    #[test]
    fn unmapped_aliases_never_leak(ghost in "x[a-z]{1,6}", v in plain_value()) {
        let raw = format!("name:a+{ghost}:{v}");
        let tree = definition().parse(&raw).unwrap();
        prop_assert!(tree.leaves().all(|p| p.field != ghost));

        let strict = definition()
            .to_builder()
            .with_unmapped(UnmappedPolicy::Reject)
            .build()
            .unwrap();
        let is_unmapped = matches!(strict.parse(&raw), Err(SearchError::UnmappedField { .. }));
        prop_assert!(is_unmapped);
    }

    /// Mandatory predicates are always present.
    #[test]
    fn mandatory_always_present(clauses in prop::collection::vec(clause(), 0..6)) {
        let def = definition();
        let tree = def.parse(&clauses.join("+")).unwrap();
        let mandatory = &def.mandatory()[0];
        prop_assert!(tree.leaves().any(|p| p == mandatory));
    }

    /// A default is present exactly when no user clause targets its field.
    #[test]
    fn default_present_iff_field_untouched(clauses in prop::collection::vec(clause(), 0..6)) {
        let touched = clauses.iter().any(|c| c.starts_with("age:") || c.starts_with("age__"));
        let def = definition();
        let tree = def.parse(&clauses.join("+")).unwrap();
        let default = &def.defaults()[0];
        prop_assert_eq!(tree.leaves().any(|p| p == default), !touched);
    }

    /// Scalar values with list operators are rejected, never half-parsed.
    #[test]
    fn list_operator_with_scalar_fails(a in alias(), op in list_op(), v in "[a-z0-9]{0,6}") {
        let is_malformed = matches!(
            definition().parse(&format!("name:ok+{a}__{op}__{v}")),
            Err(SearchError::MalformedClause { .. })
        );
        prop_assert!(is_malformed);
    }
}
