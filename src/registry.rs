//! Process-wide registry of matchers specialized for a record shape.
//!
//! Code generated for a particular record type registers its matcher under
//! the type's shape name; callers then ask [`create_matcher`] for either the
//! generic [`StdMatcher`] or the specialized one. Explicit injection through
//! [`StdMatcher::new`] needs none of this.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, RwLock},
};

use once_cell::sync::Lazy;

use crate::{
    evaluator::{Matcher, StdMatcher},
    router::{Record, RecordRouter, Router},
};

/// Shared handle to a matcher usable from any thread.
pub type SharedMatcher<T> = Arc<dyn Matcher<T> + Send + Sync>;

/// Which matcher [`create_matcher`] should hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatcherKind {
    /// Always the router-driven [`StdMatcher`]
    #[default]
    Generic,
    /// The registered matcher for the shape, falling back to `Generic`
    Specialized,
}

type Key = (TypeId, String);

static MATCHERS: Lazy<RwLock<HashMap<Key, Box<dyn Any + Send + Sync>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `matcher` as the specialized matcher for `shape`.
///
/// Returns `true` if it replaced an earlier registration.
pub fn register_matcher<T: ?Sized + 'static>(shape: &str, matcher: SharedMatcher<T>) -> bool {
    let mut matchers = MATCHERS.write().unwrap_or_else(|e| e.into_inner());
    matchers
        .insert((TypeId::of::<T>(), shape.to_string()), Box::new(matcher))
        .is_some()
}

/// Removes the specialized matcher for `shape`, returning whether one existed.
pub fn unregister_matcher<T: ?Sized + 'static>(shape: &str) -> bool {
    let mut matchers = MATCHERS.write().unwrap_or_else(|e| e.into_inner());
    matchers
        .remove(&(TypeId::of::<T>(), shape.to_string()))
        .is_some()
}

/// Returns the registered matcher for `shape`, if any.
pub fn registered_matcher<T: ?Sized + 'static>(shape: &str) -> Option<SharedMatcher<T>> {
    let matchers = MATCHERS.read().unwrap_or_else(|e| e.into_inner());
    matchers
        .get(&(TypeId::of::<T>(), shape.to_string()))
        .and_then(|entry| entry.downcast_ref::<SharedMatcher<T>>())
        .cloned()
}

/// Hands out a matcher for records of `shape`.
///
/// The generic fallback routes through [`RecordRouter`]; targets that are
/// not [`Record`]s, such as JSON documents, go through
/// [`create_matcher_with`].
///
/// # Examples
///
/// ```
/// use siftql::{FieldDef, FieldValue, MatcherKind, Record, create_matcher, parse};
///
/// struct Flag {
///     on: bool,
/// }
///
/// impl Record for Flag {
///     fn field_defs(&self) -> &[FieldDef] {
///         const { &[FieldDef::new("on")] }
///     }
///
///     fn field_value(&self, name: &str) -> FieldValue<'_> {
///         match name {
///             "on" => FieldValue::from(self.on),
///             _ => FieldValue::Null,
///         }
///     }
/// }
///
/// // Nothing registered: falls back to the generic matcher
/// let matcher = create_matcher::<Flag>("Flag", MatcherKind::Specialized);
/// assert!(parse("on").unwrap().matches(&Flag { on: true }, &*matcher));
/// ```
pub fn create_matcher<T: Record + ?Sized + 'static>(
    shape: &str,
    kind: MatcherKind,
) -> SharedMatcher<T> {
    create_matcher_with(shape, kind, RecordRouter)
}

/// Like [`create_matcher`], with `router` behind the generic fallback.
///
/// # Examples
///
/// ```
/// use serde_json::{Value, json};
/// use siftql::{JsonRouter, MatcherKind, parse, registry::create_matcher_with};
///
/// let matcher = create_matcher_with::<Value, _>("event", MatcherKind::Specialized, JsonRouter);
/// assert!(parse("level:warn").unwrap().matches(&json!({"level": "warn"}), &*matcher));
/// ```
pub fn create_matcher_with<T, R>(shape: &str, kind: MatcherKind, router: R) -> SharedMatcher<T>
where
    T: ?Sized + 'static,
    R: Router<T> + Send + Sync + 'static,
{
    if kind == MatcherKind::Specialized
        && let Some(matcher) = registered_matcher::<T>(shape)
    {
        return matcher;
    }
    Arc::new(StdMatcher::new(router))
}
