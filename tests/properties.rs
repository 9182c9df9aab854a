//! Property-based tests using proptest.

use proptest::prelude::*;
use siftql::lexer::is_keyword;
use siftql::schema::{Kind, Schema, rules};
use siftql::{BooleanOperator, Expr, FieldOperator, FieldValue, Number, Valuer, parse};

// ============================================================================
// Strategies
// ============================================================================

const FIELDS: &[&str] = &["name", "age", "score", "tag", "address.city"];

fn field_name() -> impl Strategy<Value = String> {
    prop::sample::select(FIELDS).prop_map(String::from)
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,6}(\\.[a-z_][a-z0-9_]{0,4})?"
        .prop_filter("keywords lex differently", |s| !is_keyword(s))
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..8).prop_map(String::from_iter)
}

fn scalar() -> impl Strategy<Value = Valuer> {
    prop_oneof![
        text().prop_map(Valuer::String),
        (-1.0e6..1.0e6f64).prop_map(Valuer::Number),
        (-1000i64..1000).prop_map(|n| Valuer::Number(n as f64)),
        any::<bool>().prop_map(Valuer::Bool),
        identifier().prop_map(Valuer::Identifier),
    ]
}

fn valuer() -> impl Strategy<Value = Valuer> {
    prop_oneof![
        4 => scalar(),
        1 => prop::collection::vec(scalar(), 0..4).prop_map(Valuer::OneOf),
    ]
}

fn comparison() -> impl Strategy<Value = FieldOperator> {
    prop_oneof![
        Just(FieldOperator::Equal),
        Just(FieldOperator::NotEqual),
        Just(FieldOperator::GreaterThan),
        Just(FieldOperator::GreaterThanOrEqual),
        Just(FieldOperator::LessThan),
        Just(FieldOperator::LessThanOrEqual),
        Just(FieldOperator::Like),
    ]
}

fn field_expr() -> impl Strategy<Value = Expr> {
    prop_oneof![
        1 => field_name().prop_map(|f| Expr::field(f, FieldOperator::Exists, Valuer::Bool(true))),
        5 => (field_name(), comparison(), valuer()).prop_map(|(f, op, v)| Expr::field(f, op, v)),
    ]
}

fn expr() -> impl Strategy<Value = Expr> {
    field_expr().prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop_oneof![Just(BooleanOperator::And), Just(BooleanOperator::Or)],
                inner.clone()
            )
                .prop_map(|(l, op, r)| Expr::binary(l, op, r)),
            inner.prop_map(Expr::negate),
        ]
    })
}

#[derive(Debug, Clone)]
enum Target {
    Text(String),
    Float(f64),
    Flag(bool),
}

impl Target {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Target::Text(s) => FieldValue::String(s),
            Target::Float(n) => FieldValue::Number(Number::F64(*n)),
            Target::Flag(b) => FieldValue::Bool(*b),
        }
    }
}

fn target() -> impl Strategy<Value = Target> {
    prop_oneof![
        "[a-c]{0,3}".prop_map(Target::Text),
        (-3i64..3).prop_map(|n| Target::Float(n as f64)),
        any::<bool>().prop_map(Target::Flag),
    ]
}

fn small_scalar() -> impl Strategy<Value = Valuer> {
    prop_oneof![
        "[a-c]{0,2}".prop_map(Valuer::String),
        (-3i64..3).prop_map(|n| Valuer::Number(n as f64)),
        any::<bool>().prop_map(Valuer::Bool),
    ]
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Rendering and parsing again yields the same tree.
    #[test]
    fn canonical_rendering_round_trips(expr in expr()) {
        let rendered = expr.to_string();
        let reparsed = parse(&rendered);
        prop_assert!(reparsed.is_ok(), "failed to re-parse {:?}", rendered);
        prop_assert_eq!(reparsed.unwrap(), expr);
    }

    /// Every placeholder has exactly one argument.
    #[test]
    fn placeholders_match_args(expr in expr()) {
        if let Ok((sql, args)) = expr.to_sql() {
            prop_assert_eq!(sql.matches('?').count(), args.len());
        }
    }

    /// Validation terminates and keeps only schema fields.
    #[test]
    fn validation_keeps_only_schema_fields(
        expr in expr(),
        known in prop::sample::subsequence(FIELDS.to_vec(), 0..=FIELDS.len()),
        numeric in any::<bool>(),
    ) {
        let schema: Schema = known
            .iter()
            .map(|f| (*f, if numeric { rules::is(Kind::Number) } else { rules::any([]) }))
            .collect();

        let (pruned, errors) = expr.validate(&schema);
        if let Some(pruned) = &pruned {
            for field in pruned.fields() {
                prop_assert!(known.iter().any(|k| *k == field), "unexpected field {}", field);
            }
        }
        if errors.is_empty() {
            prop_assert_eq!(pruned, Some(expr));
        }
    }

    /// A one-of list matches exactly when one of its members does.
    #[test]
    fn one_of_is_disjunction_of_members(
        members in prop::collection::vec(small_scalar(), 0..5),
        target in target(),
        like in any::<bool>(),
    ) {
        let op = if like { FieldOperator::Like } else { FieldOperator::Equal };
        let value = target.as_field_value();
        let expected = members.iter().any(|m| m.matches(&value, op));
        prop_assert_eq!(Valuer::OneOf(members).matches(&value, op), expected);
    }

    /// `not` always inverts, whatever the tree.
    #[test]
    fn negation_inverts(expr in expr(), age in -5i64..5) {
        let doc = serde_json::json!({"age": age, "name": "ann", "tag": null});
        let matcher = siftql::StdMatcher::new(siftql::JsonRouter);
        let negated = Expr::negate(expr.clone());
        prop_assert_eq!(negated.matches(&doc, &matcher), !expr.matches(&doc, &matcher));
    }
}
