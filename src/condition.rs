//! Conditions that gate modifiers.
//!
//! A condition is a named predicate over a `ConditionContext`. Modifiers
//! carry one; during recomputation a modifier contributes only if its
//! condition accepts the context of the query. Conditions are pure and are
//! shared between many modifiers, so they are handed around as
//! `Arc<dyn StatCondition>`.

use crate::context::ConditionContext;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A shareable, type-erased condition.
pub type SharedCondition = Arc<dyn StatCondition>;

/// Predicate deciding whether a modifier is active for a query.
///
/// Implement this trait for situational rules the built-ins do not cover.
///
/// # Examples
///
/// ```rust
/// use statkit::condition::StatCondition;
/// use statkit::ConditionContext;
///
/// struct LowLight;
///
/// impl StatCondition for LowLight {
///     fn test(&self, context: &ConditionContext) -> bool {
///         context.attribute::<f64>("light").map_or(false, |l| l < 4.0)
///     }
///
///     fn describe(&self) -> String {
///         "light < 4".to_string()
///     }
/// }
///
/// let dark = ConditionContext::empty().with_attribute("light", 2.0);
/// assert!(LowLight.test(&dark));
/// assert!(!LowLight.test(ConditionContext::empty()));
/// ```
pub trait StatCondition: Send + Sync {
    /// Whether the condition holds in `context`.
    fn test(&self, context: &ConditionContext) -> bool;

    /// Human-readable description for debugging and tooling.
    ///
    /// Has no effect on evaluation.
    fn describe(&self) -> String;
}

impl fmt::Debug for dyn StatCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.describe())
    }
}

/// Condition that holds in every context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Always;

impl StatCondition for Always {
    fn test(&self, _context: &ConditionContext) -> bool {
        true
    }

    fn describe(&self) -> String {
        "always".to_string()
    }
}

/// Condition that holds when the context carries a given tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCondition {
    tag: String,
}

impl TagCondition {
    /// Create a condition matching contexts that carry `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// Get the tag this condition looks for.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl StatCondition for TagCondition {
    fn test(&self, context: &ConditionContext) -> bool {
        context.has_tag(&self.tag)
    }

    fn describe(&self) -> String {
        format!("tag({})", self.tag)
    }
}

/// Condition backed by a closure.
pub struct FnCondition {
    predicate: Box<dyn Fn(&ConditionContext) -> bool + Send + Sync>,
    description: String,
}

impl FnCondition {
    /// Wrap `predicate`, reporting `description` from `describe()`.
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ConditionContext) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            description: description.into(),
        }
    }
}

impl fmt::Debug for FnCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCondition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl StatCondition for FnCondition {
    fn test(&self, context: &ConditionContext) -> bool {
        (self.predicate)(context)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// The shared always-true condition.
///
/// Every call returns a clone of the same `Arc`.
pub fn always() -> SharedCondition {
    static ALWAYS: OnceLock<SharedCondition> = OnceLock::new();
    ALWAYS.get_or_init(|| Arc::new(Always)).clone()
}

/// Condition satisfied only when the query context carries `tag`.
///
/// # Examples
///
/// ```rust
/// use statkit::condition::when_tag;
/// use statkit::ConditionContext;
///
/// let vs_undead = when_tag("target:undead");
/// assert!(vs_undead.test(&ConditionContext::empty().with_tag("target:undead")));
/// assert!(!vs_undead.test(ConditionContext::empty()));
/// assert_eq!(vs_undead.describe(), "tag(target:undead)");
/// ```
pub fn when_tag(tag: impl Into<String>) -> SharedCondition {
    Arc::new(TagCondition::new(tag))
}

/// Condition backed by a caller-supplied closure.
pub fn predicate<F>(description: impl Into<String>, predicate: F) -> SharedCondition
where
    F: Fn(&ConditionContext) -> bool + Send + Sync + 'static,
{
    Arc::new(FnCondition::new(description, predicate))
}
