use crate::{
    ast::{BooleanOperator, Expr, FieldOperator, Valuer},
    router::{RecordRouter, Router},
    value::FieldValue,
};

/// Strategy that decides how each node of a query is matched against a target.
///
/// [`Expr::matches`] dispatches every node to one of these methods, so an
/// implementation controls both the boolean combinators and how fields are
/// looked up. [`StdMatcher`] is the general-purpose implementation; a
/// matcher specialized for one record shape can be installed through the
/// [`registry`](crate::registry).
pub trait Matcher<T: ?Sized> {
    fn match_and(&self, target: &T, left: &Expr, right: &Expr) -> bool;

    fn match_or(&self, target: &T, left: &Expr, right: &Expr) -> bool;

    fn match_not(&self, target: &T, inner: &Expr) -> bool;

    fn match_field(&self, target: &T, field: &str, value: &Valuer, op: FieldOperator) -> bool;

    /// Tests a resolved field value against a literal.
    fn match_value(&self, target: &FieldValue<'_>, value: &Valuer, op: FieldOperator) -> bool {
        value.matches(target, op)
    }
}

impl Expr {
    /// Evaluates this query against `target`.
    ///
    /// Matching is total: kind mismatches and unresolvable fields produce a
    /// boolean, never an error.
    ///
    /// # Arguments
    ///
    /// * `target` - The record to test
    /// * `matcher` - Strategy used for every node of the tree
    ///
    /// # Examples
    ///
    /// ```
    /// use siftql::{JsonRouter, StdMatcher, parse};
    /// use serde_json::json;
    ///
    /// let expr = parse("status:200 and not tags?").unwrap();
    /// let matcher = StdMatcher::new(JsonRouter);
    ///
    /// assert!(expr.matches(&json!({"status": 200, "tags": []}), &matcher));
    /// assert!(!expr.matches(&json!({"status": 404}), &matcher));
    /// ```
    pub fn matches<T: ?Sized>(&self, target: &T, matcher: &dyn Matcher<T>) -> bool {
        match self {
            Expr::Binary {
                left,
                op: BooleanOperator::And,
                right,
            } => matcher.match_and(target, left, right),
            Expr::Binary {
                left,
                op: BooleanOperator::Or,
                right,
            } => matcher.match_or(target, left, right),
            Expr::Not(inner) => matcher.match_not(target, inner),
            Expr::Field(field) => matcher.match_field(target, &field.field, &field.value, field.op),
        }
    }
}

/// General-purpose matcher that resolves fields through a [`Router`].
///
/// A field that cannot be resolved (missing, omitted, or behind a null or
/// non-record intermediate) never constrains the result: the field
/// expression is `true` for every operator except `Exists`, for which it is
/// `false`.
///
/// # Examples
///
/// ```
/// use siftql::{FieldDef, FieldValue, Record, StdMatcher, parse};
///
/// struct Server {
///     status: u16,
/// }
///
/// impl Record for Server {
///     fn field_defs(&self) -> &[FieldDef] {
///         const { &[FieldDef::new("status")] }
///     }
///
///     fn field_value(&self, name: &str) -> FieldValue<'_> {
///         match name {
///             "status" => FieldValue::from(self.status),
///             _ => FieldValue::Null,
///         }
///     }
/// }
///
/// let expr = parse("status:200").unwrap();
/// assert!(expr.matches(&Server { status: 200 }, &StdMatcher::default()));
/// ```
#[derive(Debug, Clone)]
pub struct StdMatcher<R = RecordRouter> {
    router: R,
}

impl Default for StdMatcher {
    fn default() -> Self {
        StdMatcher::new(RecordRouter)
    }
}

impl<R> StdMatcher<R> {
    pub fn new(router: R) -> Self {
        StdMatcher { router }
    }

    pub fn router(&self) -> &R {
        &self.router
    }
}

impl<T: ?Sized, R: Router<T>> Matcher<T> for StdMatcher<R> {
    fn match_and(&self, target: &T, left: &Expr, right: &Expr) -> bool {
        left.matches(target, self) && right.matches(target, self)
    }

    fn match_or(&self, target: &T, left: &Expr, right: &Expr) -> bool {
        left.matches(target, self) || right.matches(target, self)
    }

    fn match_not(&self, target: &T, inner: &Expr) -> bool {
        !inner.matches(target, self)
    }

    fn match_field(&self, target: &T, field: &str, value: &Valuer, op: FieldOperator) -> bool {
        match (self.router.route(target, field), op) {
            (Ok(resolved), FieldOperator::Exists) => !resolved.is_zero(),
            (Err(_), FieldOperator::Exists) => false,
            (Err(_), _) => true,
            (Ok(resolved), _) => self.match_value(&resolved, value, op),
        }
    }
}

impl Valuer {
    /// Tests this literal against a resolved value under `op`.
    ///
    /// Numbers compare as `f64` whatever the width of the target. A literal
    /// of one kind never matches a target of another kind.
    pub fn matches(&self, target: &FieldValue<'_>, op: FieldOperator) -> bool {
        match self {
            Valuer::String(s) | Valuer::Identifier(s) => match target {
                FieldValue::String(t) => match_str(t, s, op),
                _ => false,
            },
            Valuer::Number(n) => match_number(target, *n, op),
            Valuer::Integer(n) => match_number(target, *n as f64, op),
            Valuer::Bool(b) => match target {
                FieldValue::Bool(t) => match op {
                    FieldOperator::Equal => t == b,
                    FieldOperator::NotEqual => t != b,
                    _ => false,
                },
                _ => false,
            },
            Valuer::OneOf(values) => match op {
                FieldOperator::Equal | FieldOperator::Like => {
                    values.iter().any(|v| v.matches(target, op))
                }
                _ => false,
            },
        }
    }
}

fn match_str(target: &str, literal: &str, op: FieldOperator) -> bool {
    match op {
        FieldOperator::Equal => target == literal,
        FieldOperator::NotEqual => target != literal,
        FieldOperator::Like => target.contains(literal),
        _ => false,
    }
}

fn match_number(target: &FieldValue<'_>, literal: f64, op: FieldOperator) -> bool {
    let FieldValue::Number(n) = target else {
        return false;
    };
    let target = n.to_f64();

    match op {
        // IEEE-754: NaN is unequal to everything, itself included
        FieldOperator::Equal => target == literal,
        FieldOperator::NotEqual => target != literal,
        _ => match target.partial_cmp(&literal) {
            Some(ordering) => op.eval_ordering(ordering),
            None => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn string_operators() {
        let target = FieldValue::String("hello world");
        assert!(Valuer::from("hello world").matches(&target, FieldOperator::Equal));
        assert!(Valuer::from("lo wo").matches(&target, FieldOperator::Like));
        assert!(Valuer::Identifier("x".into()).matches(&target, FieldOperator::NotEqual));
        assert!(!Valuer::from("a").matches(&target, FieldOperator::GreaterThan));
    }

    #[test]
    fn numbers_compare_as_floats() {
        let target = FieldValue::Number(Number::U64(200));
        assert!(Valuer::Number(200.0).matches(&target, FieldOperator::Equal));
        assert!(Valuer::Integer(199).matches(&target, FieldOperator::GreaterThan));
        assert!(Valuer::Number(200.5).matches(&target, FieldOperator::LessThanOrEqual));
        assert!(!Valuer::Number(200.0).matches(&target, FieldOperator::Like));
    }

    #[test]
    fn nan_is_only_not_equal() {
        let target = FieldValue::Number(Number::F64(f64::NAN));
        assert!(!Valuer::Number(f64::NAN).matches(&target, FieldOperator::Equal));
        assert!(Valuer::Number(1.0).matches(&target, FieldOperator::NotEqual));
        assert!(!Valuer::Number(1.0).matches(&target, FieldOperator::LessThan));
    }

    #[test]
    fn kind_mismatch_is_false() {
        assert!(!Valuer::from("200").matches(&FieldValue::from(200), FieldOperator::Equal));
        assert!(!Valuer::Number(1.0).matches(&FieldValue::Bool(true), FieldOperator::Equal));
        assert!(!Valuer::Bool(false).matches(&FieldValue::Null, FieldOperator::NotEqual));
    }

    #[test]
    fn one_of_only_for_equal_and_like() {
        let list = Valuer::from(vec!["a", "b"]);
        let target = FieldValue::String("b");
        assert!(list.matches(&target, FieldOperator::Equal));
        assert!(!list.matches(&target, FieldOperator::NotEqual));
        assert!(!Valuer::OneOf(vec![]).matches(&target, FieldOperator::Equal));
    }
}
