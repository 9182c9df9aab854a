//! A small filter language for matching records, building SQL conditions
//! and validating user queries against a schema.
//!
//! ```
//! use siftql::{JsonRouter, Query, StdMatcher};
//! use serde_json::json;
//!
//! let query: Query = r#"status:[pending, done] and age >= 18"#.parse().unwrap();
//!
//! let matcher = StdMatcher::new(JsonRouter);
//! assert!(query.matches(&json!({"status": "done", "age": 30}), &matcher));
//!
//! let (sql, args) = query.to_sql().unwrap();
//! assert_eq!(sql, "(status IN (?,?) AND age >= ?)");
//! assert_eq!(args.len(), 3);
//! ```
pub mod ast;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod router;
pub mod schema;
pub mod sql;
pub mod validation;
pub mod value;

use std::{fmt, ops::Deref, str::FromStr};

pub use ast::{BooleanOperator, Expr, FieldExpr, FieldOperator, Token, Valuer};
pub use evaluator::{Matcher, StdMatcher};
pub use lexer::{LexError, Lexer, Position};
pub use parser::{MAX_DEPTH, ParseError, Parser};
pub use registry::{
    MatcherKind, SharedMatcher, create_matcher, create_matcher_with, register_matcher,
    unregister_matcher,
};
pub use router::{FieldDef, JsonRouter, OMIT_TAG, Record, RecordRouter, RouteError, Router};
pub use schema::{Kind, Rule, Schema, ValidationError, ValidationErrors};
pub use sql::SqlError;
pub use value::{FieldValue, Number, Scalar};

/// Parses `source` into a query tree.
///
/// # Examples
///
/// ```
/// use siftql::{Expr, FieldOperator, Valuer, parse};
///
/// assert_eq!(
///     parse("status:200").unwrap(),
///     Expr::field("status", FieldOperator::Equal, Valuer::Number(200.0))
/// );
/// assert!(parse("status:").is_err());
/// ```
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(source))?.parse()
}

/// A parsed query.
///
/// Thin wrapper around [`Expr`] that parses with [`FromStr`] and renders in
/// canonical form with [`Display`](fmt::Display).
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    expr: Expr,
}

impl Query {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        parse(source).map(Query::from)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    pub fn matches<T: ?Sized>(&self, target: &T, matcher: &dyn Matcher<T>) -> bool {
        self.expr.matches(target, matcher)
    }

    /// Validates against `schema`; see [`Expr::validate`].
    pub fn validate(&self, schema: &Schema) -> (Option<Query>, ValidationErrors) {
        let (expr, errors) = self.expr.validate(schema);
        (expr.map(Query::from), errors)
    }

    pub fn to_sql(&self) -> Result<(String, Vec<Scalar>), SqlError> {
        self.expr.to_sql()
    }
}

impl From<Expr> for Query {
    fn from(expr: Expr) -> Self {
        Query { expr }
    }
}

impl Deref for Query {
    type Target = Expr;

    fn deref(&self) -> &Expr {
        &self.expr
    }
}

impl FromStr for Query {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::parse(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expr, f)
    }
}
