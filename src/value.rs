use std::{cmp::Ordering, fmt};

use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::Serialize;

use crate::router::Record;

/// Plain, owned value carried by a literal.
///
/// This is what SQL arguments and schema rules see. Numbers written in a
/// query are always [`Scalar::Float`]; [`Scalar::Integer`] only comes from
/// hand-built trees.
///
/// # Examples
///
/// ```
/// use siftql::Scalar;
///
/// let args = vec![Scalar::Float(18.0), Scalar::String("Ba".to_string())];
/// assert_eq!(serde_json::to_string(&args).unwrap(), r#"[18.0,"Ba"]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Float(f64),
    Integer(i64),
    Bool(bool),
    /// Members of a one-of list, in source order
    List(Vec<Scalar>),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Scalar::Float(n) => Some(Number::F64(*n)),
            Scalar::Integer(n) => Some(Number::I64(*n)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Human-readable kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Float(_) => "float",
            Scalar::Integer(_) => "integer",
            Scalar::Bool(_) => "boolean",
            Scalar::List(_) => "list",
        }
    }

    /// Equality by value: `Integer(200)` equals `Float(200.0)`.
    pub fn same_value(&self, other: &Scalar) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.compare(b) == Some(Ordering::Equal),
            _ => match (self, other) {
                (Scalar::List(a), Scalar::List(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_value(y))
                }
                _ => self == other,
            },
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{:?}", s),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Float(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Numeric value of any primitive width.
///
/// Comparisons between representations are by value, so `I64(10)` equals
/// `F64(10.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    pub fn is_zero(self) -> bool {
        self.to_f64() == 0.0
    }

    fn to_decimal(self) -> Option<Decimal> {
        match self {
            Number::I64(n) => Decimal::from_i64(n),
            Number::U64(n) => Decimal::from_u64(n),
            Number::F64(n) => Decimal::from_f64(n),
        }
    }

    /// Compares two numbers, handling mixed representations.
    ///
    /// Integer/float pairs go through `Decimal` so that large integers are
    /// not rounded before the comparison; out-of-range or NaN values fall
    /// back to IEEE-754 ordering (`None` for NaN).
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => {
                if let Some(a) = self.to_decimal()
                    && let Some(b) = other.to_decimal()
                {
                    return Some(a.cmp(&b));
                }
                self.to_f64().partial_cmp(&other.to_f64())
            }
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Value resolved out of a target record by a [`Router`](crate::router::Router).
///
/// # Examples
///
/// ```
/// use siftql::{FieldValue, Number};
///
/// assert_eq!(FieldValue::from(42u8), FieldValue::Number(Number::U64(42)));
/// assert!(FieldValue::from("").is_zero());
/// ```
#[derive(Clone, Copy)]
pub enum FieldValue<'a> {
    String(&'a str),
    Number(Number),
    Bool(bool),
    /// Nested record that path traversal can descend into
    Record(&'a dyn Record),
    /// Value the engine cannot compare (lists, maps, ...); only its
    /// zero-ness is known
    Opaque {
        zero: bool,
    },
    /// Absent optional value or JSON `null`
    Null,
}

impl<'a> FieldValue<'a> {
    /// Wraps an optional nested record, `None` becoming [`FieldValue::Null`].
    pub fn optional<R: Record>(record: Option<&'a R>) -> Self {
        match record {
            Some(r) => FieldValue::Record(r),
            None => FieldValue::Null,
        }
    }

    /// Whether the value equals the default for its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::String(s) => s.is_empty(),
            FieldValue::Number(n) => n.is_zero(),
            FieldValue::Bool(b) => !b,
            FieldValue::Record(r) => r.is_zero(),
            FieldValue::Opaque { zero } => *zero,
            FieldValue::Null => true,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Number(_) => "number",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Record(_) => "record",
            FieldValue::Opaque { .. } => "opaque",
            FieldValue::Null => "null",
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.debug_tuple("String").field(s).finish(),
            FieldValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            FieldValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            FieldValue::Record(_) => f.write_str("Record(..)"),
            FieldValue::Opaque { zero } => f.debug_struct("Opaque").field("zero", zero).finish(),
            FieldValue::Null => f.write_str("Null"),
        }
    }
}

impl PartialEq for FieldValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Record(a), FieldValue::Record(b)) => std::ptr::addr_eq(*a, *b),
            (FieldValue::Opaque { zero: a }, FieldValue::Opaque { zero: b }) => a == b,
            (FieldValue::Null, FieldValue::Null) => true,
            _ => false,
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        FieldValue::String(s)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(s: &'a String) -> Self {
        FieldValue::String(s)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Number> for FieldValue<'_> {
    fn from(n: Number) -> Self {
        FieldValue::Number(n)
    }
}

macro_rules! field_value_from_number {
    ($($source:ty),*) => {
        $(
            impl From<$source> for FieldValue<'_> {
                fn from(n: $source) -> Self {
                    FieldValue::Number(Number::from(n))
                }
            }
        )*
    };
}

field_value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
