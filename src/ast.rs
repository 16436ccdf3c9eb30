//! Operators, value tokens and the predicate tree handed to storage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a leaf predicate.
///
/// The first eight are reachable from client clauses through their two or
/// three letter code. `Range` is server-side only: it can appear in mandatory
/// or default predicate sets but never comes out of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "co")]
    Contains,
    #[serde(rename = "eq")]
    Equals,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "ni")]
    NotIn,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "lte")]
    LessOrEqual,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "gte")]
    GreaterOrEqual,
    #[serde(rename = "range")]
    Range,
}

/// Shape a value must have for a given operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Scalar,
    List,
    /// Exactly two elements, lower and upper bound.
    Pair,
}

impl Operator {
    /// Looks up an operator by its clause code. `Range` has no clause code.
    pub fn from_code(code: &str) -> Option<Operator> {
        match code {
            "co" => Some(Operator::Contains),
            "eq" => Some(Operator::Equals),
            "in" => Some(Operator::In),
            "ni" => Some(Operator::NotIn),
            "lt" => Some(Operator::LessThan),
            "lte" => Some(Operator::LessOrEqual),
            "gt" => Some(Operator::GreaterThan),
            "gte" => Some(Operator::GreaterOrEqual),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Operator::Contains => "co",
            Operator::Equals => "eq",
            Operator::In => "in",
            Operator::NotIn => "ni",
            Operator::LessThan => "lt",
            Operator::LessOrEqual => "lte",
            Operator::GreaterThan => "gt",
            Operator::GreaterOrEqual => "gte",
            Operator::Range => "range",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Operator::In | Operator::NotIn => Arity::List,
            Operator::Range => Arity::Pair,
            _ => Arity::Scalar,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Contains => "CONTAINS",
            Operator::Equals => "EQUALS",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::LessThan => "LESS_THAN",
            Operator::LessOrEqual => "LESS_OR_EQUAL",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::GreaterOrEqual => "GREATER_OR_EQUAL",
            Operator::Range => "BETWEEN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An uninterpreted value: one string, or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueToken {
    Scalar(String),
    List(Vec<String>),
}

impl ValueToken {
    pub fn scalar(value: impl Into<String>) -> Self {
        ValueToken::Scalar(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueToken::List(values.into_iter().map(Into::into).collect())
    }

    /// Whether this value has the shape `arity` requires.
    pub fn fits(&self, arity: Arity) -> bool {
        match (self, arity) {
            (ValueToken::Scalar(_), Arity::Scalar) => true,
            (ValueToken::List(_), Arity::List) => true,
            (ValueToken::List(items), Arity::Pair) => items.len() == 2,
            _ => false,
        }
    }
}

impl fmt::Display for ValueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueToken::Scalar(s) => write!(f, "{:?}", s),
            ValueToken::List(items) => write!(f, "{:?}", items),
        }
    }
}

/// A clause as written by the client, before alias resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub alias: String,
    pub op: Operator,
    pub value: ValueToken,
}

/// A leaf comparison against a canonical field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub op: Operator,
    pub value: ValueToken,
}

impl Predicate {
    pub fn new(field: impl Into<String>, op: Operator, value: ValueToken) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.op, self.field, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connective::And => f.write_str("AND"),
            Connective::Or => f.write_str("OR"),
        }
    }
}

/// The predicate tree. Built once per parse and then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateNode {
    Leaf(Predicate),
    Composite {
        connective: Connective,
        children: Vec<PredicateNode>,
    },
}

impl PredicateNode {
    pub fn all(children: Vec<PredicateNode>) -> Self {
        PredicateNode::Composite {
            connective: Connective::And,
            children,
        }
    }

    pub fn any(children: Vec<PredicateNode>) -> Self {
        PredicateNode::Composite {
            connective: Connective::Or,
            children,
        }
    }

    /// Joins this tree with another under AND, for callers adding their own
    /// predicates on top of a parsed search.
    pub fn and(self, other: PredicateNode) -> Self {
        PredicateNode::all(vec![self, other])
    }

    /// Joins this tree with another under OR.
    pub fn or(self, other: PredicateNode) -> Self {
        PredicateNode::any(vec![self, other])
    }

    pub fn children(&self) -> &[PredicateNode] {
        match self {
            PredicateNode::Leaf(_) => &[],
            PredicateNode::Composite { children, .. } => children,
        }
    }

    /// Depth-first iterator over every leaf in the tree.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// Leaves targeting `field`, in tree order.
    pub fn leaves_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Predicate> + 'a {
        self.leaves().filter(move |p| p.field == field)
    }
}

impl From<Predicate> for PredicateNode {
    fn from(predicate: Predicate) -> Self {
        PredicateNode::Leaf(predicate)
    }
}

impl fmt::Display for PredicateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateNode::Leaf(p) => write!(f, "{}", p),
            PredicateNode::Composite {
                connective,
                children,
            } => {
                write!(f, "{}(", connective)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}

pub struct Leaves<'a> {
    stack: Vec<&'a PredicateNode>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Predicate;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                PredicateNode::Leaf(p) => return Some(p),
                PredicateNode::Composite { children, .. } => {
                    self.stack.extend(children.iter().rev());
                }
            }
        }
        None
    }
}
