//! SQL compiler that turns a predicate tree into a sea-query expression.
//!
//! This is a reference storage adapter: it shows how a collaborator maps
//! leaf operators and AND/OR composites onto its native query form. Joins
//! for relation paths are left to the caller.

use crate::ast::{Connective, Operator, Predicate, PredicateNode, ValueToken};
use sea_query::{Asterisk, Expr, Iden, LikeExpr, PostgresQueryBuilder, SelectStatement, SimpleExpr};

const PATH_SEPARATORS: [&str; 2] = ["__", "."];
const LIKE_ESCAPE: char = '!';

/// Table identifier for sea-query
#[derive(Debug, Clone)]
pub struct TableName(pub String);

impl Iden for TableName {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "{}", self.0).unwrap();
    }
}

/// Column identifier wrapper
#[derive(Debug, Clone)]
pub struct ColumnName(pub String);

impl Iden for ColumnName {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "{}", self.0).unwrap();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot compile {predicate}: {message}")]
pub struct CompileError {
    pub predicate: String,
    pub message: String,
}

impl CompileError {
    fn new(predicate: &Predicate, message: &str) -> Self {
        Self {
            predicate: predicate.to_string(),
            message: message.to_string(),
        }
    }
}

/// SQL Compiler that converts predicate trees to SQL
#[derive(Debug, Clone)]
pub struct SqlCompiler {
    table: String,
}

impl SqlCompiler {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Compiles the tree into a full `SELECT * FROM <table> WHERE ...`.
    pub fn compile_select(&self, tree: &PredicateNode) -> Result<String, CompileError> {
        let mut select = SelectStatement::new();
        select.from(TableName(self.table.clone()));
        select.column(Asterisk);
        select.and_where(self.compile(tree)?);
        Ok(select.to_string(PostgresQueryBuilder))
    }

    /// Compiles the tree into a boolean expression.
    pub fn compile(&self, tree: &PredicateNode) -> Result<SimpleExpr, CompileError> {
        match tree {
            PredicateNode::Leaf(predicate) => self.compile_leaf(predicate),
            PredicateNode::Composite {
                connective,
                children,
            } => {
                let exprs = children
                    .iter()
                    .map(|child| self.compile(child))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(combine(*connective, exprs))
            }
        }
    }

    fn compile_leaf(&self, predicate: &Predicate) -> Result<SimpleExpr, CompileError> {
        let col = column(&predicate.field);

        let expr = match (predicate.op, &predicate.value) {
            (Operator::Contains, ValueToken::Scalar(v)) => {
                col.like(LikeExpr::new(format!("%{}%", escape_like(v))).escape(LIKE_ESCAPE))
            }
            (Operator::Equals, ValueToken::Scalar(v)) => col.eq(v.clone()),
            (Operator::LessThan, ValueToken::Scalar(v)) => col.lt(v.clone()),
            (Operator::LessOrEqual, ValueToken::Scalar(v)) => col.lte(v.clone()),
            (Operator::GreaterThan, ValueToken::Scalar(v)) => col.gt(v.clone()),
            (Operator::GreaterOrEqual, ValueToken::Scalar(v)) => col.gte(v.clone()),
            // Empty lists would render as invalid `IN ()`.
            (Operator::In, ValueToken::List(items)) if items.is_empty() => Expr::val(false).into(),
            (Operator::NotIn, ValueToken::List(items)) if items.is_empty() => Expr::val(true).into(),
            (Operator::In, ValueToken::List(items)) => col.is_in(items.iter().cloned()),
            (Operator::NotIn, ValueToken::List(items)) => col.is_not_in(items.iter().cloned()),
            (Operator::Range, ValueToken::List(items)) if items.len() == 2 => {
                col.between(items[0].clone(), items[1].clone())
            }
            _ => return Err(CompileError::new(predicate, "value shape does not match operator")),
        };

        Ok(expr)
    }
}

/// Builds the column reference for a canonical path. `author__name` becomes
/// `"author"."name"`; deeper paths keep the whole relation prefix.
fn column(path: &str) -> Expr {
    let segments = split_path(path);
    match segments.split_last() {
        Some((last, relation)) if !relation.is_empty() => Expr::col((
            TableName(relation.join("__")),
            ColumnName((*last).to_owned()),
        )),
        _ => Expr::col(ColumnName(path.to_string())),
    }
}

fn split_path(path: &str) -> Vec<&str> {
    let mut segments = vec![path];
    for sep in PATH_SEPARATORS {
        segments = segments
            .into_iter()
            .flat_map(|s| s.split(sep))
            .filter(|s| !s.is_empty())
            .collect();
    }
    segments
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Combine conditions under one connective
fn combine(connective: Connective, exprs: Vec<SimpleExpr>) -> SimpleExpr {
    let identity = connective == Connective::And;
    exprs
        .into_iter()
        .reduce(|acc, expr| match connective {
            Connective::And => acc.and(expr),
            Connective::Or => acc.or(expr),
        })
        .unwrap_or_else(|| Expr::val(identity).into())
}
