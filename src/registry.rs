//! Stat registry module.
//!
//! The `StatRegistry` is the authoritative catalogue of stat definitions.
//! Each id is registered exactly once; lookups of unregistered ids fail
//! instead of falling back to a default. A populated registry is wrapped in
//! an `Arc` and shared read-only by every container.

use crate::definition::StatDefinition;
use crate::error::{StatError, StatResult};
use crate::stat_id::StatId;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;

/// Ids of the stats pre-registered by [`StatRegistry::with_defaults`].
pub mod builtin {
    pub const HEALTH: &str = "health";
    pub const ATTACK_DAMAGE: &str = "attack_damage";
    pub const ATTACK_SPEED: &str = "attack_speed";
    pub const MOVEMENT_SPEED: &str = "movement_speed";
    pub const ARMOR: &str = "armor";
    pub const ARMOR_TOUGHNESS: &str = "armor_toughness";
}

/// Catalogue of stat definitions keyed by id.
///
/// # Examples
///
/// ```rust
/// use statkit::{StatDefinition, StatError, StatId, StatRegistry};
///
/// let speed = StatId::new("speed").unwrap();
/// let mut registry = StatRegistry::new();
/// registry
///     .register(StatDefinition::new(speed.clone(), 0.1, 0.0, 1.0).unwrap())
///     .unwrap();
///
/// // A second definition for the same id is a configuration error.
/// let again = StatDefinition::new(speed.clone(), 0.2, 0.0, 1.0).unwrap();
/// assert_eq!(registry.register(again), Err(StatError::DuplicateStat(speed.clone())));
/// assert_eq!(registry.get(&speed).unwrap().base(), 0.1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatRegistry {
    definitions: BTreeMap<StatId, Arc<StatDefinition>>,
}

impl StatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with a baseline set of stats:
    /// health, attack damage, attack speed, movement speed, armor and armor
    /// toughness.
    ///
    /// This is bootstrap content for demos and tests. Games are expected to
    /// load their own definitions.
    pub fn with_defaults() -> Self {
        let defaults = [
            (builtin::HEALTH, 20.0, 0.0, 1024.0, "❤", "red"),
            (builtin::ATTACK_DAMAGE, 1.0, 0.0, 2048.0, "⚔", "dark_red"),
            (builtin::ATTACK_SPEED, 4.0, 0.0, 1024.0, "⚡", "yellow"),
            (builtin::MOVEMENT_SPEED, 0.1, 0.0, 1024.0, "➹", "aqua"),
            (builtin::ARMOR, 0.0, 0.0, 30.0, "🛡", "gray"),
            (builtin::ARMOR_TOUGHNESS, 0.0, 0.0, 20.0, "◆", "dark_aqua"),
        ];

        let mut registry = Self::new();
        for (name, base, min, max, icon, color) in defaults {
            let id = StatId::new_unchecked(name);
            let definition =
                StatDefinition::new_unchecked(id, base, min, max).with_display(icon, color);
            registry
                .definitions
                .insert(definition.id().clone(), Arc::new(definition));
        }
        registry
    }

    /// Parse a JSON array of definitions into a new registry.
    ///
    /// See [`StatRegistry::extend_from_json`] for the format.
    pub fn from_json(json: &str) -> StatResult<Self> {
        let mut registry = Self::new();
        registry.extend_from_json(json)?;
        Ok(registry)
    }

    /// Read a JSON array of definitions from `reader` into a new registry.
    pub fn from_reader(reader: impl Read) -> StatResult<Self> {
        let definitions: Vec<StatDefinition> = serde_json::from_reader(reader)?;
        let mut registry = Self::new();
        registry.register_loaded(definitions)?;
        Ok(registry)
    }

    /// Register every definition in a JSON array.
    ///
    /// ```json
    /// [
    ///   { "id": "armor", "base": 0.0, "min": 0.0, "max": 30.0,
    ///     "display": { "icon": "🛡", "color": "gray" } },
    ///   { "id": "luck" }
    /// ]
    /// ```
    ///
    /// Omitted bounds are open. The whole document is parsed and validated
    /// before anything is registered; registration then stops at the first
    /// duplicate id.
    pub fn extend_from_json(&mut self, json: &str) -> StatResult<()> {
        let definitions: Vec<StatDefinition> = serde_json::from_str(json)?;
        self.register_loaded(definitions)
    }

    /// Register a definition.
    ///
    /// Fails with `StatError::DuplicateStat` if the id is already present;
    /// the existing definition is kept.
    pub fn register(&mut self, definition: StatDefinition) -> StatResult<()> {
        let id = definition.id().clone();
        if self.definitions.contains_key(&id) {
            return Err(StatError::DuplicateStat(id));
        }
        debug!(
            "Registered stat {} (base {}, bounds [{}, {}])",
            id,
            definition.base(),
            definition.min(),
            definition.max()
        );
        self.definitions.insert(id, Arc::new(definition));
        Ok(())
    }

    /// Register definitions in order, stopping at the first duplicate.
    ///
    /// Definitions registered before the failing one stay registered.
    pub fn register_all(
        &mut self,
        definitions: impl IntoIterator<Item = StatDefinition>,
    ) -> StatResult<()> {
        for definition in definitions {
            if let Err(err) = self.register(definition) {
                warn!("Aborting stat registration: {}", err);
                return Err(err);
            }
        }
        Ok(())
    }

    fn register_loaded(&mut self, definitions: Vec<StatDefinition>) -> StatResult<()> {
        debug!("Loaded {} stat definitions from JSON", definitions.len());
        self.register_all(definitions)
    }

    /// Look up a definition.
    ///
    /// Fails with `StatError::UnknownStat` for unregistered ids.
    pub fn get(&self, id: &StatId) -> StatResult<&Arc<StatDefinition>> {
        self.definitions
            .get(id)
            .ok_or_else(|| StatError::UnknownStat(id.clone()))
    }

    /// Snapshot of every registered definition, ordered by id.
    ///
    /// The returned list is independent of the registry; later
    /// registrations do not show up in it.
    pub fn all(&self) -> Vec<Arc<StatDefinition>> {
        self.definitions.values().cloned().collect()
    }

    /// Check whether `id` is registered.
    pub fn contains(&self, id: &StatId) -> bool {
        self.definitions.contains_key(id)
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
