//! Debug snapshots of stat instances.
//!
//! A `StatSnapshot` is a read-only dump of one stat's state on one entity:
//! the effective base, the bounds, every attached modifier and the
//! unconditional final value.

use crate::modifier::{ModifierOp, StatModifier};
use crate::stat_id::{StatId, StatSourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One modifier as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierSnapshot {
    pub source_id: StatSourceId,
    pub op: ModifierOp,
    pub value: f64,
    pub priority: i32,
    /// Output of the condition's `describe()`.
    pub condition: String,
}

impl From<&StatModifier> for ModifierSnapshot {
    fn from(modifier: &StatModifier) -> Self {
        Self {
            source_id: modifier.source_id().clone(),
            op: modifier.op(),
            value: modifier.value(),
            priority: modifier.priority(),
            condition: modifier.condition().describe(),
        }
    }
}

/// Full breakdown of one stat.
///
/// Modifiers are listed in evaluation order: by operation, then by
/// insertion order within an operation.
///
/// # Examples
///
/// ```rust
/// use statkit::snapshot::StatSnapshot;
/// use statkit::StatId;
///
/// let snapshot = StatSnapshot::new(StatId::new("armor").unwrap(), 0.0, 0.0, 30.0);
/// assert!(snapshot.modifiers.is_empty());
/// assert!(!snapshot.base_overridden);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub stat_id: StatId,

    /// Override if one is set, otherwise the registry default.
    pub base_value: f64,

    /// Whether the base was ever set explicitly.
    pub base_overridden: bool,

    /// Final value under the empty context.
    pub final_value: f64,

    pub min: f64,
    pub max: f64,

    pub modifiers: Vec<ModifierSnapshot>,
}

impl StatSnapshot {
    /// Create a snapshot with no override and no modifiers; the final value
    /// starts equal to the base.
    pub fn new(stat_id: StatId, base_value: f64, min: f64, max: f64) -> Self {
        Self {
            stat_id,
            base_value,
            base_overridden: false,
            final_value: base_value,
            min,
            max,
            modifiers: Vec::new(),
        }
    }

    /// Append `modifier` to the breakdown.
    pub fn add_modifier(&mut self, modifier: &StatModifier) {
        self.modifiers.push(modifier.into());
    }

    /// Modifiers contributed by `source`.
    pub fn modifiers_from<'a>(
        &'a self,
        source: &'a StatSourceId,
    ) -> impl Iterator<Item = &'a ModifierSnapshot> {
        self.modifiers.iter().filter(move |m| &m.source_id == source)
    }
}

impl fmt::Display for StatSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} = {:.2} (base {:.2}{}, bounds [{}, {}])",
            self.stat_id,
            self.final_value,
            self.base_value,
            if self.base_overridden { ", overridden" } else { "" },
            self.min,
            self.max
        )?;
        for m in &self.modifiers {
            writeln!(
                f,
                "  {} {:+.2} from {} [{}] (priority {})",
                m.op, m.value, m.source_id, m.condition, m.priority
            )?;
        }
        Ok(())
    }
}
