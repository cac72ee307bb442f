//! Stat modifiers.
//!
//! A `StatModifier` is one contribution to one stat: an operation kind, a
//! value, the source that owns it and an optional condition gating it.

use crate::condition::{always, SharedCondition};
use crate::context::ConditionContext;
use crate::stat_id::{StatId, StatSourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation kind of a modifier.
///
/// Evaluation order is fixed: every `Flat` is summed onto the base, the sum
/// of `PercentAdd` scales that once, then each `PercentMult` compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierOp {
    /// Added to the base before any percentage.
    Flat,
    /// Summed with other additive percentages, applied once.
    PercentAdd,
    /// Applied as `× (1 + value)`, compounded across modifiers.
    PercentMult,
}

impl ModifierOp {
    /// All operations in evaluation order.
    pub const ALL: [ModifierOp; 3] = [
        ModifierOp::Flat,
        ModifierOp::PercentAdd,
        ModifierOp::PercentMult,
    ];

    /// Position of this operation in evaluation order.
    pub fn index(self) -> usize {
        match self {
            ModifierOp::Flat => 0,
            ModifierOp::PercentAdd => 1,
            ModifierOp::PercentMult => 2,
        }
    }
}

impl fmt::Display for ModifierOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModifierOp::Flat => "flat",
            ModifierOp::PercentAdd => "percent_add",
            ModifierOp::PercentMult => "percent_mult",
        };
        f.write_str(name)
    }
}

/// One contribution to a stat.
///
/// Modifiers are immutable. `priority` is carried for ordering tools and
/// debugging; recomputation evaluates modifiers of one operation in
/// insertion order and never looks at it.
///
/// # Examples
///
/// ```rust
/// use statkit::condition::when_tag;
/// use statkit::{ConditionContext, ModifierOp, StatId, StatModifier, StatSourceId};
///
/// let damage = StatId::new("attack_damage").unwrap();
/// let smite = StatSourceId::new("enchant:smite").unwrap();
///
/// let modifier = StatModifier::percent_mult(damage, smite, 0.25)
///     .with_condition(when_tag("target:undead"));
///
/// assert_eq!(modifier.op(), ModifierOp::PercentMult);
/// assert!(!modifier.applies_to(ConditionContext::empty()));
/// assert!(modifier.applies_to(&ConditionContext::empty().with_tag("target:undead")));
/// ```
#[derive(Clone)]
pub struct StatModifier {
    stat_id: StatId,
    source_id: StatSourceId,
    op: ModifierOp,
    value: f64,
    priority: i32,
    condition: SharedCondition,
}

impl StatModifier {
    /// Create an unconditional modifier with priority 0.
    pub fn new(stat_id: StatId, source_id: StatSourceId, op: ModifierOp, value: f64) -> Self {
        Self {
            stat_id,
            source_id,
            op,
            value,
            priority: 0,
            condition: always(),
        }
    }

    /// Create an unconditional `Flat` modifier.
    pub fn flat(stat_id: StatId, source_id: StatSourceId, value: f64) -> Self {
        Self::new(stat_id, source_id, ModifierOp::Flat, value)
    }

    /// Create an unconditional `PercentAdd` modifier.
    ///
    /// `0.1` means +10% of the flat sum.
    pub fn percent_add(stat_id: StatId, source_id: StatSourceId, value: f64) -> Self {
        Self::new(stat_id, source_id, ModifierOp::PercentAdd, value)
    }

    /// Create an unconditional `PercentMult` modifier.
    ///
    /// `0.25` multiplies the running value by `1.25`.
    pub fn percent_mult(stat_id: StatId, source_id: StatSourceId, value: f64) -> Self {
        Self::new(stat_id, source_id, ModifierOp::PercentMult, value)
    }

    /// Set the priority. It does not affect evaluation order.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Gate this modifier behind `condition`.
    pub fn with_condition(mut self, condition: SharedCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Get the stat this modifier targets.
    pub fn stat_id(&self) -> &StatId {
        &self.stat_id
    }

    /// Get the source that owns this modifier.
    pub fn source_id(&self) -> &StatSourceId {
        &self.source_id
    }

    /// Get the operation kind.
    pub fn op(&self) -> ModifierOp {
        self.op
    }

    /// Get the raw modifier value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Get the priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Get the condition gating this modifier.
    pub fn condition(&self) -> &SharedCondition {
        &self.condition
    }

    /// Whether this modifier contributes under `context`.
    pub fn applies_to(&self, context: &ConditionContext) -> bool {
        self.condition.test(context)
    }
}

impl fmt::Debug for StatModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatModifier")
            .field("stat_id", &self.stat_id)
            .field("source_id", &self.source_id)
            .field("op", &self.op)
            .field("value", &self.value)
            .field("priority", &self.priority)
            .field("condition", &self.condition.describe())
            .finish()
    }
}
