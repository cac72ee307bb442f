//! Per-entity stat instances.
//!
//! A `StatInstance` owns the live modifier set of one stat on one entity
//! and caches the unconditional final value behind a dirty flag.
//!
//! Recomputation, for a query context:
//!
//! ```text
//! flat_sum     = effective_base + Σ flat
//! intermediate = flat_sum × (1 + Σ percent_add)
//! result       = intermediate × Π (1 + percent_mult)
//! final        = clamp(result, min, max)
//! ```
//!
//! Only modifiers whose condition accepts the context take part.

use crate::context::ConditionContext;
use crate::definition::StatDefinition;
use crate::error::{StatError, StatResult};
use crate::modifier::{ModifierOp, StatModifier};
use crate::snapshot::StatSnapshot;
use crate::stat_id::{StatId, StatSourceId};
use std::sync::Arc;

/// Live state of one stat on one entity.
///
/// # Examples
///
/// ```rust
/// use statkit::{StatDefinition, StatId, StatInstance, StatModifier, StatSourceId};
/// use std::sync::Arc;
///
/// let armor = StatId::new("armor").unwrap();
/// let definition = Arc::new(StatDefinition::non_negative(armor.clone(), 0.0).unwrap());
/// let mut instance = StatInstance::new(definition);
///
/// let boots = StatSourceId::new("boots").unwrap();
/// instance.add_modifier(StatModifier::flat(armor, boots.clone(), 5.0)).unwrap();
/// assert_eq!(instance.final_value(), 5.0);
///
/// assert!(instance.remove_modifiers_from_source(&boots));
/// assert_eq!(instance.final_value(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct StatInstance {
    definition: Arc<StatDefinition>,
    /// One list per `ModifierOp`, indexed by `ModifierOp::index`.
    modifiers: [Vec<StatModifier>; 3],
    base_override: Option<f64>,
    cached: f64,
    dirty: bool,
}

impl StatInstance {
    /// Create an untouched instance seeded from `definition`.
    pub fn new(definition: Arc<StatDefinition>) -> Self {
        Self {
            definition,
            modifiers: Default::default(),
            base_override: None,
            cached: 0.0,
            dirty: true,
        }
    }

    /// Get the id of the stat this instance tracks.
    pub fn stat_id(&self) -> &StatId {
        self.definition.id()
    }

    /// Get the shared definition this instance was seeded from.
    pub fn definition(&self) -> &Arc<StatDefinition> {
        &self.definition
    }

    /// Base override if one was set, otherwise the registry default.
    pub fn effective_base(&self) -> f64 {
        self.base_override.unwrap_or(self.definition.base())
    }

    /// Whether the cached value is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Modifiers attached for `op`, in insertion order.
    pub fn modifiers(&self, op: ModifierOp) -> &[StatModifier] {
        &self.modifiers[op.index()]
    }

    /// Total number of attached modifiers across all operations.
    pub fn modifier_count(&self) -> usize {
        self.modifiers.iter().map(Vec::len).sum()
    }

    /// Unconditional final value.
    ///
    /// Recomputes under the empty context only if a mutation happened since
    /// the last read.
    pub fn final_value(&mut self) -> f64 {
        if self.dirty {
            self.cached = self.recompute(ConditionContext::empty());
            self.dirty = false;
        }
        self.cached
    }

    /// Final value under `context`.
    ///
    /// A non-empty context always recomputes and never touches the cache;
    /// the empty context is served by [`StatInstance::final_value`].
    pub fn compute(&mut self, context: &ConditionContext) -> f64 {
        if context.is_empty() {
            self.final_value()
        } else {
            self.recompute(context)
        }
    }

    /// Set the base override. Always invalidates the cache.
    pub fn set_base_value(&mut self, value: f64) {
        self.base_override = Some(value);
        self.dirty = true;
    }

    /// Attach a modifier at the end of its operation's list.
    ///
    /// Fails with `StatError::ModifierMismatch` if the modifier targets a
    /// different stat.
    pub fn add_modifier(&mut self, modifier: StatModifier) -> StatResult<()> {
        if modifier.stat_id() != self.stat_id() {
            return Err(StatError::ModifierMismatch {
                expected: self.stat_id().clone(),
                actual: modifier.stat_id().clone(),
            });
        }
        self.modifiers[modifier.op().index()].push(modifier);
        self.dirty = true;
        Ok(())
    }

    /// Remove every modifier owned by `source`, across all operations.
    ///
    /// Survivors keep their relative order. Returns whether anything was
    /// removed; the cache is only invalidated in that case.
    pub fn remove_modifiers_from_source(&mut self, source: &StatSourceId) -> bool {
        let before = self.modifier_count();
        for list in &mut self.modifiers {
            list.retain(|m| m.source_id() != source);
        }
        let removed = self.modifier_count() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// True if the base was set to something other than the registry
    /// default, or any modifier is attached.
    pub fn has_customizations(&self) -> bool {
        let base_changed = self
            .base_override
            .is_some_and(|base| base != self.definition.base());
        base_changed || self.modifiers.iter().any(|list| !list.is_empty())
    }

    /// Breakdown of this stat for debugging.
    pub fn snapshot(&mut self) -> StatSnapshot {
        let mut snapshot = StatSnapshot::new(
            self.stat_id().clone(),
            self.effective_base(),
            self.definition.min(),
            self.definition.max(),
        );
        snapshot.base_overridden = self.base_override.is_some();
        for list in &self.modifiers {
            for modifier in list {
                snapshot.add_modifier(modifier);
            }
        }
        snapshot.final_value = self.final_value();
        snapshot
    }

    fn recompute(&self, context: &ConditionContext) -> f64 {
        let flat_sum = self.effective_base() + self.active(ModifierOp::Flat, context).sum::<f64>();
        let percent_add_factor = 1.0 + self.active(ModifierOp::PercentAdd, context).sum::<f64>();
        let intermediate = flat_sum * percent_add_factor;
        let mult_factor = self
            .active(ModifierOp::PercentMult, context)
            .map(|v| 1.0 + v)
            .product::<f64>();

        self.definition.clamp(intermediate * mult_factor)
    }

    /// Values of the `op` modifiers whose condition accepts `context`.
    fn active<'a>(
        &'a self,
        op: ModifierOp,
        context: &'a ConditionContext,
    ) -> impl Iterator<Item = f64> + 'a {
        self.modifiers[op.index()]
            .iter()
            .filter(move |m| m.applies_to(context))
            .map(StatModifier::value)
    }
}
