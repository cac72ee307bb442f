//! Situational context for conditional stat queries.
//!
//! A `ConditionContext` describes "what is happening right now" when a stat
//! is read: the target type, the damage cause, the terrain. The engine does
//! not interpret it; conditions attached to modifiers do.
//!
//! Contexts are persistent values: `with_tag` and `with_attribute` build a
//! new context and leave the receiver untouched.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Opaque handle to a host-side object (an entity, a world, a block).
///
/// The engine never dereferences it; it only travels inside contexts so
/// that custom conditions can compare handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityHandle(pub u64);

/// A typed context attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Handle(EntityHandle),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Number(f64::from(value))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<EntityHandle> for AttributeValue {
    fn from(value: EntityHandle) -> Self {
        AttributeValue::Handle(value)
    }
}

/// Checked extraction of a concrete type from an `AttributeValue`.
///
/// Returns `None` when the stored variant is not the requested type.
pub trait FromAttribute: Sized {
    fn from_attribute(value: &AttributeValue) -> Option<Self>;
}

impl FromAttribute for String {
    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromAttribute for f64 {
    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromAttribute for bool {
    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromAttribute for EntityHandle {
    fn from_attribute(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Handle(h) => Some(*h),
            _ => None,
        }
    }
}

static EMPTY: ConditionContext = ConditionContext {
    tags: BTreeSet::new(),
    attributes: BTreeMap::new(),
};

/// Immutable bag of situational facts: string tags plus typed attributes.
///
/// # Examples
///
/// ```rust
/// use statkit::ConditionContext;
///
/// let base = ConditionContext::empty();
/// let ctx = base
///     .with_tag("target:undead")
///     .with_attribute("distance", 4.5);
///
/// assert!(ctx.has_tag("target:undead"));
/// assert_eq!(ctx.attribute::<f64>("distance"), Some(4.5));
/// // Wrong type is reported as absent, not as an error.
/// assert_eq!(ctx.attribute::<bool>("distance"), None);
/// // The receiver was not touched.
/// assert!(base.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionContext {
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default)]
    attributes: BTreeMap<String, AttributeValue>,
}

impl ConditionContext {
    /// The shared context carrying no situational information.
    ///
    /// Used by every unconditional read.
    pub fn empty() -> &'static ConditionContext {
        &EMPTY
    }

    /// Return a copy of this context with `tag` added.
    ///
    /// A blank tag leaves the copy identical to `self`.
    pub fn with_tag(&self, tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref();
        let mut next = self.clone();
        if !tag.trim().is_empty() {
            next.tags.insert(tag.to_owned());
        }
        next
    }

    /// Return a copy of this context with `key` set to `value`.
    ///
    /// A blank key leaves the copy identical to `self`. An existing value
    /// under the same key is replaced in the copy.
    pub fn with_attribute(&self, key: impl AsRef<str>, value: impl Into<AttributeValue>) -> Self {
        let key = key.as_ref();
        let mut next = self.clone();
        if !key.trim().is_empty() {
            next.attributes.insert(key.to_owned(), value.into());
        }
        next
    }

    /// Check whether `tag` is present.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Iterate over the tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Raw attribute lookup.
    pub fn attribute_value(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Typed attribute lookup.
    ///
    /// Returns `None` if the key is missing or holds a different type.
    pub fn attribute<T: FromAttribute>(&self, key: &str) -> Option<T> {
        self.attributes.get(key).and_then(T::from_attribute)
    }

    /// True when the context carries neither tags nor attributes.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.attributes.is_empty()
    }
}
