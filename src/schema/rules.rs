//! Rule constructors.
//!
//! Numeric rules compare by value, so `in_range(10, 20)` accepts the float
//! literal `15.5` and `min(10.5)` rejects the integer `10`. Length rules
//! count characters.

use std::{cmp::Ordering, sync::Arc};

use regex::Regex;

use super::{Kind, Rule, ValidationError};
use crate::value::{Number, Scalar};

/// Wraps a closure as a [`Rule`].
pub fn custom<F>(check: F) -> Rule
where
    F: Fn(&str, &Scalar) -> Result<(), ValidationError> + Send + Sync + 'static,
{
    Arc::new(check)
}

/// Passes if every rule passes; stops at the first failure.
pub fn all(rules: impl IntoIterator<Item = Rule>) -> Rule {
    let rules: Vec<Rule> = rules.into_iter().collect();
    Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            for rule in &rules {
                rule(field, value)?;
            }
            Ok(())
        },
    )
}

/// Passes if any rule passes, otherwise fails with the last rule's error.
///
/// With no rules it accepts everything.
pub fn any(rules: impl IntoIterator<Item = Rule>) -> Rule {
    let rules: Vec<Rule> = rules.into_iter().collect();
    Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            let mut last = Ok(());
            for rule in &rules {
                last = rule(field, value);
                if last.is_ok() {
                    return Ok(());
                }
            }
            last
        },
    )
}

/// Requires a value of the given kind.
pub fn is(kind: Kind) -> Rule {
    Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            if kind.accepts(value) {
                Ok(())
            } else {
                Err(ValidationError::TypeMismatch {
                    field: field.to_string(),
                    expected: kind.to_string(),
                    found: value.kind_name(),
                })
            }
        },
    )
}

fn number(field: &str, value: &Scalar) -> Result<Number, ValidationError> {
    value
        .as_number()
        .ok_or_else(|| ValidationError::TypeMismatch {
            field: field.to_string(),
            expected: Kind::Number.to_string(),
            found: value.kind_name(),
        })
}

/// `value >= bound`; NaN never satisfies it.
fn at_least(value: Number, bound: Number) -> bool {
    matches!(
        value.compare(bound),
        Some(Ordering::Greater | Ordering::Equal)
    )
}

fn at_most(value: Number, bound: Number) -> bool {
    matches!(value.compare(bound), Some(Ordering::Less | Ordering::Equal))
}

/// Requires a number within `[min, max]`, bounds inclusive.
pub fn in_range(min: impl Into<Number>, max: impl Into<Number>) -> Rule {
    let (min, max) = (min.into(), max.into());
    Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            let n = number(field, value)?;
            if at_least(n, min) && at_most(n, max) {
                Ok(())
            } else {
                Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    min,
                    max,
                    value: n,
                })
            }
        },
    )
}

/// Requires a number `>= min`.
pub fn min(min: impl Into<Number>) -> Rule {
    let min = min.into();
    Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            let n = number(field, value)?;
            if at_least(n, min) {
                Ok(())
            } else {
                Err(ValidationError::TooSmall {
                    field: field.to_string(),
                    min,
                    value: n,
                })
            }
        },
    )
}

/// Requires a number `<= max`.
pub fn max(max: impl Into<Number>) -> Rule {
    let max = max.into();
    Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            let n = number(field, value)?;
            if at_most(n, max) {
                Ok(())
            } else {
                Err(ValidationError::TooLarge {
                    field: field.to_string(),
                    max,
                    value: n,
                })
            }
        },
    )
}

fn string<'a>(field: &str, value: &'a Scalar) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or_else(|| ValidationError::TypeMismatch {
        field: field.to_string(),
        expected: Kind::String.to_string(),
        found: value.kind_name(),
    })
}

/// Requires a string whose length is within `[min, max]`.
pub fn len_in_range(min: usize, max: usize) -> Rule {
    Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            let len = string(field, value)?.chars().count();
            if (min..=max).contains(&len) {
                Ok(())
            } else {
                Err(ValidationError::LengthOutOfRange {
                    field: field.to_string(),
                    min,
                    max,
                    len,
                })
            }
        },
    )
}

/// Requires a string of at least `min` characters.
pub fn min_len(min: usize) -> Rule {
    Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            let len = string(field, value)?.chars().count();
            if len >= min {
                Ok(())
            } else {
                Err(ValidationError::TooShort {
                    field: field.to_string(),
                    min,
                    len,
                })
            }
        },
    )
}

/// Requires a string of at most `max` characters.
pub fn max_len(max: usize) -> Rule {
    Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            let len = string(field, value)?.chars().count();
            if len <= max {
                Ok(())
            } else {
                Err(ValidationError::TooLong {
                    field: field.to_string(),
                    max,
                    len,
                })
            }
        },
    )
}

/// Requires the value to equal one of `allowed`.
///
/// Numbers are compared by value: an allowed `200` accepts the literal `200.0`.
pub fn equals_one_of<I, V>(allowed: I) -> Rule
where
    I: IntoIterator<Item = V>,
    V: Into<Scalar>,
{
    let allowed: Vec<Scalar> = allowed.into_iter().map(Into::into).collect();
    Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            if allowed.iter().any(|candidate| candidate.same_value(value)) {
                Ok(())
            } else {
                Err(ValidationError::NotOneOf {
                    field: field.to_string(),
                    allowed: allowed.clone(),
                    value: value.clone(),
                })
            }
        },
    )
}

/// Requires a string matching the regular expression `pattern`.
pub fn matches(pattern: &str) -> Result<Rule, regex::Error> {
    let regex = Regex::new(pattern)?;
    Ok(Arc::new(
        move |field: &str, value: &Scalar| -> Result<(), ValidationError> {
            let s = string(field, value)?;
            if regex.is_match(s) {
                Ok(())
            } else {
                Err(ValidationError::PatternMismatch {
                    field: field.to_string(),
                    pattern: regex.as_str().to_string(),
                    value: s.to_string(),
                })
            }
        },
    ))
}
