//! Field routing: resolving a dotted path against a target record.
//!
//! Targets describe their fields explicitly through the [`Record`] trait
//! (name, optional external tag, accessor). [`RecordRouter`] walks those
//! descriptions; [`JsonRouter`] walks `serde_json::Value` objects. Both are
//! plain implementations of [`Router`], so a specialized router for one
//! record shape can be swapped in without touching the matcher.

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::value::{FieldValue, Number};

/// Tag that excludes a field from querying.
pub const OMIT_TAG: &str = "-";

/// Query-facing description of one field of a record.
///
/// # Examples
///
/// ```
/// use siftql::FieldDef;
///
/// const FIELDS: &[FieldDef] = &[
///     FieldDef::new("name"),
///     FieldDef::tagged("zip_code", "zip"),
///     FieldDef::omitted("password"),
/// ];
/// assert_eq!(FIELDS[1].external_name(), "zip");
/// assert!(FIELDS[2].is_omitted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Name passed to [`Record::field_value`]
    pub name: &'static str,
    /// External name override, or [`OMIT_TAG`]
    pub tag: Option<&'static str>,
}

impl FieldDef {
    pub const fn new(name: &'static str) -> Self {
        FieldDef { name, tag: None }
    }

    pub const fn tagged(name: &'static str, tag: &'static str) -> Self {
        FieldDef {
            name,
            tag: Some(tag),
        }
    }

    pub const fn omitted(name: &'static str) -> Self {
        FieldDef {
            name,
            tag: Some(OMIT_TAG),
        }
    }

    pub fn is_omitted(&self) -> bool {
        self.tag == Some(OMIT_TAG)
    }

    /// Name used in queries: a non-empty tag overrides the field name.
    pub fn external_name(&self) -> &'static str {
        match self.tag {
            Some(tag) if !tag.is_empty() && tag != OMIT_TAG => tag,
            _ => self.name,
        }
    }
}

/// A target type that exposes its fields to the query engine.
///
/// # Examples
///
/// ```
/// use siftql::{FieldDef, FieldValue, Record};
///
/// struct Address {
///     city: String,
/// }
///
/// impl Record for Address {
///     fn field_defs(&self) -> &[FieldDef] {
///         const { &[FieldDef::new("city")] }
///     }
///
///     fn field_value(&self, name: &str) -> FieldValue<'_> {
///         match name {
///             "city" => FieldValue::from(&self.city),
///             _ => FieldValue::Null,
///         }
///     }
/// }
///
/// let empty = Address { city: String::new() };
/// assert!(empty.is_zero());
/// ```
pub trait Record {
    /// Field descriptions, in declaration order.
    fn field_defs(&self) -> &[FieldDef];

    /// Value of the field whose [`FieldDef::name`] is `name`.
    fn field_value(&self, name: &str) -> FieldValue<'_>;

    /// Whether this record equals its default-constructed value.
    ///
    /// The provided implementation checks that every described field is zero.
    fn is_zero(&self) -> bool {
        self.field_defs()
            .iter()
            .all(|def| self.field_value(def.name).is_zero())
    }
}

/// Why a field path could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("field '{path}' not found")]
    FieldNotFound { path: String },

    #[error("cannot resolve '{path}': '{segment}' is not a record")]
    NotARecord { path: String, segment: String },

    #[error("field '{path}' is excluded from querying")]
    FieldOmitted { path: String },
}

/// Resolves a dotted field path against a target.
pub trait Router<T: ?Sized> {
    fn route<'a>(&self, target: &'a T, path: &str) -> Result<FieldValue<'a>, RouteError>;
}

/// Splits a dotted path into its segments.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.')
}

/// Generic router over [`Record`] implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordRouter;

impl RecordRouter {
    fn lookup<'a, R: Record + ?Sized>(
        record: &'a R,
        path: &str,
        segment: &str,
    ) -> Result<FieldValue<'a>, RouteError> {
        for def in record.field_defs() {
            if def.is_omitted() {
                if def.name == segment {
                    return Err(RouteError::FieldOmitted {
                        path: path.to_string(),
                    });
                }
                continue;
            }
            if def.external_name() == segment {
                return Ok(record.field_value(def.name));
            }
        }
        Err(RouteError::FieldNotFound {
            path: path.to_string(),
        })
    }
}

impl<T: Record + ?Sized> Router<T> for RecordRouter {
    fn route<'a>(&self, target: &'a T, path: &str) -> Result<FieldValue<'a>, RouteError> {
        let mut segments = path_segments(path);
        let first = segments.next().unwrap_or_default();
        let mut current = RecordRouter::lookup(target, path, first)?;
        let mut parent = first;

        for segment in segments {
            current = match current {
                FieldValue::Record(record) => RecordRouter::lookup(record, path, segment)?,
                _ => {
                    return Err(RouteError::NotARecord {
                        path: path.to_string(),
                        segment: parent.to_string(),
                    });
                }
            };
            parent = segment;
        }
        Ok(current)
    }
}

/// Router over `serde_json::Value` documents.
///
/// Objects are records keyed by member name. Arrays and objects at the end
/// of a path resolve to [`FieldValue::Opaque`]; JSON has no omission tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRouter;

impl JsonRouter {
    fn leaf(value: &JsonValue) -> FieldValue<'_> {
        match value {
            JsonValue::Null => FieldValue::Null,
            JsonValue::Bool(b) => FieldValue::Bool(*b),
            JsonValue::String(s) => FieldValue::String(s),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    FieldValue::Number(Number::U64(u))
                } else {
                    FieldValue::Number(Number::F64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            JsonValue::Array(items) => FieldValue::Opaque {
                zero: items.is_empty(),
            },
            JsonValue::Object(map) => FieldValue::Opaque {
                zero: map.is_empty(),
            },
        }
    }
}

impl Router<JsonValue> for JsonRouter {
    fn route<'a>(&self, target: &'a JsonValue, path: &str) -> Result<FieldValue<'a>, RouteError> {
        let mut current = target;
        let mut parent = "";

        for segment in path_segments(path) {
            let Some(object) = current.as_object() else {
                return Err(RouteError::NotARecord {
                    path: path.to_string(),
                    segment: parent.to_string(),
                });
            };
            current = object
                .get(segment)
                .ok_or_else(|| RouteError::FieldNotFound {
                    path: path.to_string(),
                })?;
            parent = segment;
        }
        Ok(JsonRouter::leaf(current))
    }
}
