//! Per-entity stat containers.
//!
//! A `StatContainer` is the read/write surface the rest of the game talks
//! to. It holds one `StatInstance` per stat actually touched on its entity,
//! seeds new instances from the shared `StatRegistry`, and reports every
//! mutation to an optional listener as a `StatValueChange`.
//!
//! Containers have no internal locking. Every operation, reads included,
//! takes `&mut self`: a read may materialize an instance or refresh its
//! cache. Share one across threads only behind an external lock.

use crate::change::StatValueChange;
use crate::context::ConditionContext;
use crate::error::StatResult;
use crate::instance::StatInstance;
use crate::modifier::StatModifier;
use crate::registry::StatRegistry;
use crate::snapshot::StatSnapshot;
use crate::stat_id::{StatId, StatSourceId};
use log::{debug, trace};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Callback receiving every value change a container reports.
pub type ChangeListener = Box<dyn FnMut(&StatValueChange) + Send>;

/// All stats of one entity.
///
/// # Examples
///
/// ```rust
/// use statkit::registry::builtin;
/// use statkit::{StatContainer, StatId, StatModifier, StatRegistry, StatSourceId};
/// use std::sync::{Arc, Mutex};
///
/// let registry = Arc::new(StatRegistry::with_defaults());
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let mut stats = StatContainer::new(registry)
///     .with_listener(move |change| sink.lock().unwrap().push(change.clone()));
///
/// let armor = StatId::new(builtin::ARMOR).unwrap();
/// let boots = StatSourceId::new("item:boots").unwrap();
///
/// stats.add_modifier(StatModifier::flat(armor.clone(), boots.clone(), 5.0)).unwrap();
/// assert_eq!(stats.get_stat(&armor).unwrap(), 5.0);
///
/// stats.clear_source(&boots);
/// assert_eq!(stats.get_stat(&armor).unwrap(), 0.0);
/// assert_eq!(seen.lock().unwrap().len(), 2);
/// ```
pub struct StatContainer {
    registry: Arc<StatRegistry>,
    stats: BTreeMap<StatId, StatInstance>,
    listener: Option<ChangeListener>,
}

impl StatContainer {
    /// Create an empty container backed by `registry`.
    pub fn new(registry: Arc<StatRegistry>) -> Self {
        Self {
            registry,
            stats: BTreeMap::new(),
            listener: None,
        }
    }

    /// Install the change listener, replacing any previous one.
    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&StatValueChange) + Send + 'static,
    {
        self.set_listener(listener);
        self
    }

    /// Install the change listener in place, replacing any previous one.
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&StatValueChange) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Remove the listener; later changes are dropped silently.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Get the registry new instances are seeded from.
    pub fn registry(&self) -> &Arc<StatRegistry> {
        &self.registry
    }

    /// Unconditional value of a stat.
    ///
    /// Materializes the stat on first touch; the value then equals the
    /// registry default (clamped to its bounds).
    pub fn get_stat(&mut self, id: &StatId) -> StatResult<f64> {
        Ok(self.instance_mut(id)?.final_value())
    }

    /// Value of a stat under a situational context.
    pub fn compute_stat(&mut self, id: &StatId, context: &ConditionContext) -> StatResult<f64> {
        Ok(self.instance_mut(id)?.compute(context))
    }

    /// Set the base override of a stat.
    pub fn set_base(&mut self, id: &StatId, value: f64) -> StatResult<()> {
        self.mutate(id, |instance| {
            instance.set_base_value(value);
            Ok(())
        })
    }

    /// Attach a modifier to the stat it targets.
    pub fn add_modifier(&mut self, modifier: StatModifier) -> StatResult<()> {
        let id = modifier.stat_id().clone();
        self.mutate(&id, |instance| instance.add_modifier(modifier))
    }

    /// Remove every modifier `source` attached to one stat.
    ///
    /// Returns `false` when there was nothing to remove. A change is
    /// reported either way.
    pub fn remove_modifier(&mut self, id: &StatId, source: &StatSourceId) -> StatResult<bool> {
        self.mutate(id, |instance| Ok(instance.remove_modifiers_from_source(source)))
    }

    /// Remove `source` from every stat this container has materialized.
    ///
    /// Reports one change per stat that actually lost modifiers and returns
    /// how many that was. Stats never touched are not materialized.
    pub fn clear_source(&mut self, source: &StatSourceId) -> usize {
        let mut changes = Vec::new();
        for (id, instance) in self.stats.iter_mut() {
            let old_value = instance.final_value();
            if instance.remove_modifiers_from_source(source) {
                changes.push(StatValueChange::new(
                    id.clone(),
                    old_value,
                    instance.final_value(),
                ));
            }
        }

        debug!("Cleared source {} from {} stat(s)", source, changes.len());
        let affected = changes.len();
        for change in &changes {
            self.notify(change);
        }
        affected
    }

    /// Snapshots of every materialized stat, ordered by id.
    pub fn debug_view(&mut self) -> Vec<StatSnapshot> {
        self.stats.values_mut().map(StatInstance::snapshot).collect()
    }

    /// Whether a stat has a non-default base or any modifier.
    ///
    /// Fails for ids missing from the registry; unmaterialized stats are
    /// reported as uncustomized without being materialized.
    pub fn is_customized(&self, id: &StatId) -> StatResult<bool> {
        self.registry.get(id)?;
        Ok(self
            .stats
            .get(id)
            .is_some_and(StatInstance::has_customizations))
    }

    /// Seed a base value unless something already customized the stat.
    ///
    /// Returns whether the base was applied. A rejected call changes
    /// nothing and reports nothing.
    pub fn set_base_if_uncustomized(&mut self, id: &StatId, value: f64) -> StatResult<bool> {
        if self.instance_mut(id)?.has_customizations() {
            trace!("Kept customized base of {}", id);
            return Ok(false);
        }
        self.set_base(id, value)?;
        Ok(true)
    }

    /// Ids of the materialized stats, ordered.
    pub fn tracked_stats(&self) -> impl Iterator<Item = &StatId> {
        self.stats.keys()
    }

    /// Number of materialized stats.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// True if no stat has been touched yet.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    fn instance_mut(&mut self, id: &StatId) -> StatResult<&mut StatInstance> {
        match self.stats.entry(id.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let definition = Arc::clone(self.registry.get(id)?);
                trace!("Materialized stat {}", id);
                Ok(entry.insert(StatInstance::new(definition)))
            }
        }
    }

    /// Read, apply, read again, then report, whatever the outcome.
    fn mutate<R>(
        &mut self,
        id: &StatId,
        apply: impl FnOnce(&mut StatInstance) -> StatResult<R>,
    ) -> StatResult<R> {
        let instance = self.instance_mut(id)?;
        let old_value = instance.final_value();
        let result = apply(instance)?;
        let new_value = instance.final_value();

        self.notify(&StatValueChange::new(id.clone(), old_value, new_value));
        Ok(result)
    }

    fn notify(&mut self, change: &StatValueChange) {
        trace!(
            "Stat {} changed {} -> {}",
            change.stat_id,
            change.old_value,
            change.new_value
        );
        if let Some(listener) = self.listener.as_mut() {
            listener(change);
        }
    }
}

impl fmt::Debug for StatContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatContainer")
            .field("stats", &self.stats)
            .field("listener", &self.listener.as_ref().map(|_| "<listener>"))
            .finish_non_exhaustive()
    }
}
