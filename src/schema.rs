//! Declarative field schemas used to validate and prune queries.
//!
//! A [`Schema`] maps field paths to a [`Rule`]; rules are built from the
//! combinators in [`rules`]. [`Expr::validate`](crate::Expr::validate) walks a
//! query and drops every field expression the schema rejects.
//!
//! ```
//! use siftql::schema::{Kind, Schema, rules};
//!
//! let schema = Schema::new()
//!     .field("status", rules::equals_one_of(["pending", "done"]))
//!     .field("age", rules::all([rules::is(Kind::Integer), rules::in_range(0, 150)]))
//!     .field("name", rules::any([]));
//!
//! assert!(schema.contains("age"));
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use thiserror::Error;

use crate::value::{Number, Scalar};

pub mod rules;

/// Check applied to a literal: receives the field path and the literal.
pub type Rule = Arc<dyn Fn(&str, &Scalar) -> Result<(), ValidationError> + Send + Sync>;

/// Value kinds a [`rules::is`] rule can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    /// Any number, integer or float
    Number,
    /// A number without a fractional part
    Integer,
    Bool,
}

impl Kind {
    pub fn accepts(self, value: &Scalar) -> bool {
        match (self, value) {
            (Kind::String, Scalar::String(_)) => true,
            (Kind::Number, Scalar::Float(_) | Scalar::Integer(_)) => true,
            (Kind::Integer, Scalar::Integer(_)) => true,
            // Query literals are always floats, so whole floats count.
            (Kind::Integer, Scalar::Float(n)) => n.is_finite() && n.fract() == 0.0,
            (Kind::Bool, Scalar::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::String => write!(f, "string"),
            Kind::Number => write!(f, "number"),
            Kind::Integer => write!(f, "integer"),
            Kind::Bool => write!(f, "boolean"),
        }
    }
}

fn display_list(values: &[Scalar]) -> String {
    Scalar::List(values.to_vec()).to_string()
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("field '{field}' is not part of the schema")]
    UnknownField { field: String },

    #[error("field '{field}': value must be {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: &'static str,
    },

    #[error("field '{field}': value must be in range [{min}, {max}], got {value}")]
    OutOfRange {
        field: String,
        min: Number,
        max: Number,
        value: Number,
    },

    #[error("field '{field}': value must be equal or greater than {min}, got {value}")]
    TooSmall {
        field: String,
        min: Number,
        value: Number,
    },

    #[error("field '{field}': value must be equal or less than {max}, got {value}")]
    TooLarge {
        field: String,
        max: Number,
        value: Number,
    },

    #[error("field '{field}': length must be in range [{min}, {max}], got {len}")]
    LengthOutOfRange {
        field: String,
        min: usize,
        max: usize,
        len: usize,
    },

    #[error("field '{field}': length must be at least {min}, got {len}")]
    TooShort {
        field: String,
        min: usize,
        len: usize,
    },

    #[error("field '{field}': length must be at most {max}, got {len}")]
    TooLong {
        field: String,
        max: usize,
        len: usize,
    },

    #[error("field '{field}': value must be one of {}, got {value}", display_list(.allowed))]
    NotOneOf {
        field: String,
        allowed: Vec<Scalar>,
        value: Scalar,
    },

    #[error("field '{field}': value {value:?} does not match /{pattern}/")]
    PatternMismatch {
        field: String,
        pattern: String,
        value: String,
    },

    #[error("field '{field}': {message}")]
    Custom { field: String, message: String },
}

impl ValidationError {
    /// Field path the error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::UnknownField { field }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooSmall { field, .. }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::LengthOutOfRange { field, .. }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::NotOneOf { field, .. }
            | ValidationError::PatternMismatch { field, .. }
            | ValidationError::Custom { field, .. } => field,
        }
    }
}

/// Every violation found while validating one query, in tree order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    /// `Ok(())` if there are no errors, the whole list otherwise.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Field path → rule. Fields absent from the schema are unknown.
#[derive(Clone, Default)]
pub struct Schema {
    fields: HashMap<String, Rule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the rule for `name`, builder style.
    pub fn field(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.insert(name, rule);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, rule: Rule) -> Option<Rule> {
        self.fields.insert(name.into(), rule)
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.field_names().collect();
        names.sort_unstable();
        f.debug_struct("Schema").field("fields", &names).finish()
    }
}

impl<S: Into<String>> FromIterator<(S, Rule)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, Rule)>>(iter: I) -> Self {
        Schema {
            fields: iter
                .into_iter()
                .map(|(name, rule)| (name.into(), rule))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_kind_accepts_whole_floats() {
        assert!(Kind::Integer.accepts(&Scalar::Float(200.0)));
        assert!(!Kind::Integer.accepts(&Scalar::Float(2.5)));
        assert!(!Kind::Integer.accepts(&Scalar::Float(f64::INFINITY)));
        assert!(Kind::Number.accepts(&Scalar::Integer(1)));
        assert!(!Kind::String.accepts(&Scalar::Bool(true)));
    }

    #[test]
    fn errors_join_with_semicolons() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::UnknownField { field: "a".into() });
        errors.push(ValidationError::UnknownField { field: "b".into() });
        assert_eq!(
            errors.to_string(),
            "field 'a' is not part of the schema; field 'b' is not part of the schema"
        );
        assert!(errors.into_result().is_err());
        assert_eq!(ValidationErrors::new().into_result(), Ok(()));
    }

    #[test]
    fn not_one_of_lists_allowed_values() {
        let err = ValidationError::NotOneOf {
            field: "status".into(),
            allowed: vec!["a".into(), Scalar::Float(1.0)],
            value: "b".into(),
        };
        assert_eq!(
            err.to_string(),
            r#"field 'status': value must be one of ["a", 1], got "b""#
        );
    }

    #[test]
    fn schema_from_iterator() {
        let schema: Schema = [("a", rules::any([])), ("b", rules::is(Kind::Bool))]
            .into_iter()
            .collect();
        assert_eq!(schema.len(), 2);
        assert!(schema.get("b").is_some());
        assert!(!schema.contains("c"));
    }
}
