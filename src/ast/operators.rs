use std::{cmp::Ordering, fmt};

/// Operator joining two sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOperator {
    /// Both sides must match (`and`)
    And,
    /// Either side must match (`or`)
    Or,
}

impl BooleanOperator {
    /// SQL keyword for this operator.
    pub fn sql_keyword(self) -> &'static str {
        match self {
            BooleanOperator::And => "AND",
            BooleanOperator::Or => "OR",
        }
    }
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanOperator::And => write!(f, "and"),
            BooleanOperator::Or => write!(f, "or"),
        }
    }
}

/// Operator of a field expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOperator {
    /// Equal (`:` or `=`)
    Equal,
    /// Not equal (`!=` or `!:`)
    NotEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterThanOrEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessThanOrEqual,
    /// Substring containment (`~`), strings only
    Like,
    /// Field resolves to a non-zero value (`field?`)
    Exists,
}

impl FieldOperator {
    /// Returns `true` for the four ordering comparisons.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            FieldOperator::GreaterThan
                | FieldOperator::GreaterThanOrEqual
                | FieldOperator::LessThan
                | FieldOperator::LessThanOrEqual
        )
    }

    /// Evaluates the operator given the ordering of `target` relative to the literal.
    ///
    /// `Like` and `Exists` are not ordering based and always yield `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            FieldOperator::Equal => ordering == Ordering::Equal,
            FieldOperator::NotEqual => ordering != Ordering::Equal,
            FieldOperator::GreaterThan => ordering == Ordering::Greater,
            FieldOperator::GreaterThanOrEqual => ordering != Ordering::Less,
            FieldOperator::LessThan => ordering == Ordering::Less,
            FieldOperator::LessThanOrEqual => ordering != Ordering::Greater,
            FieldOperator::Like | FieldOperator::Exists => false,
        }
    }

    /// SQL comparison operator, `None` for `Exists` which has no binary form.
    pub fn sql_operator(self) -> Option<&'static str> {
        match self {
            FieldOperator::Equal => Some("="),
            FieldOperator::NotEqual => Some("<>"),
            FieldOperator::GreaterThan => Some(">"),
            FieldOperator::GreaterThanOrEqual => Some(">="),
            FieldOperator::LessThan => Some("<"),
            FieldOperator::LessThanOrEqual => Some("<="),
            FieldOperator::Like => Some("LIKE"),
            FieldOperator::Exists => None,
        }
    }
}

impl fmt::Display for FieldOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            FieldOperator::Equal => "=",
            FieldOperator::NotEqual => "!=",
            FieldOperator::GreaterThan => ">",
            FieldOperator::GreaterThanOrEqual => ">=",
            FieldOperator::LessThan => "<",
            FieldOperator::LessThanOrEqual => "<=",
            FieldOperator::Like => "~",
            FieldOperator::Exists => "?",
        };
        f.write_str(symbol)
    }
}
