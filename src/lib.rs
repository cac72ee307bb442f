//! # statkit - Bounded, Condition-Aware Entity Stat Engine
//!
//! A stat engine for game entities that provides:
//! - **Data-driven** stat catalogs (defaults and bounds loaded from a registry)
//! - **Lazy** per-entity state (a stat exists on an entity only once touched)
//! - **Cached** evaluation (values recompute only after a mutation)
//! - **Situational** modifiers gated by conditions over a query context
//!
//! ## Core Concepts
//!
//! ### Evaluation Pipeline
//!
//! Every stat flows through the same fixed pipeline:
//!
//! ```text
//! base → + Σ flat → × (1 + Σ percent_add) → × Π (1 + percent_mult) → clamp [min, max]
//! ```
//!
//! 1. **Definitions** give each stat a default base and bounds
//! 2. **Modifiers** contribute flat, additive-percent or multiplicative-percent values
//! 3. **Conditions** decide whether a modifier applies in a given context
//!
//! ### Key Features
//!
//! - **Source Tracking**: Every modifier belongs to a source and can be removed with it
//! - **Change Events**: Every mutation reports an old/new value pair to a listener
//! - **Customization Checks**: Seed a base only when nothing else has touched the stat
//! - **Debug-Friendly**: Full snapshot of base, bounds and modifiers per stat
//!
//! ## Example
//!
//! ```rust
//! use statkit::condition::when_tag;
//! use statkit::registry::builtin;
//! use statkit::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(StatRegistry::with_defaults());
//! let mut stats = StatContainer::new(registry);
//!
//! let damage = StatId::new(builtin::ATTACK_DAMAGE).unwrap();
//! let sword = StatSourceId::new("item:sword").unwrap();
//! let smite = StatSourceId::new("enchant:smite").unwrap();
//!
//! stats.set_base(&damage, 4.0).unwrap();
//! stats.add_modifier(StatModifier::percent_add(damage.clone(), sword, 0.5)).unwrap();
//! stats
//!     .add_modifier(
//!         StatModifier::percent_mult(damage.clone(), smite, 0.25)
//!             .with_condition(when_tag("target:undead")),
//!     )
//!     .unwrap();
//!
//! // 4 * 1.5
//! assert_eq!(stats.get_stat(&damage).unwrap(), 6.0);
//!
//! // 4 * 1.5 * 1.25
//! let vs_undead = ConditionContext::empty().with_tag("target:undead");
//! assert_eq!(stats.compute_stat(&damage, &vs_undead).unwrap(), 7.5);
//! ```
//!
//! ## Modules
//!
//! - [`stat_id`] - Stat and source identifiers
//! - [`context`] - Query context for conditional modifiers
//! - [`condition`] - Modifier conditions
//! - [`definition`] - Stat definitions (default base and bounds)
//! - [`registry`] - Stat catalog
//! - [`modifier`] - Stat modifiers
//! - [`instance`] - Per-entity state of one stat
//! - [`container`] - Per-entity stat container
//! - [`change`] - Value-change notifications
//! - [`snapshot`] - Debug snapshots
//! - [`error`] - Error types

pub mod change;
pub mod condition;
pub mod container;
pub mod context;
pub mod definition;
pub mod error;
pub mod instance;
pub mod modifier;
pub mod registry;
pub mod snapshot;
pub mod stat_id;

// Re-export main types for convenience
pub use change::StatValueChange;
pub use condition::{SharedCondition, StatCondition};
pub use container::StatContainer;
pub use context::{AttributeValue, ConditionContext, EntityHandle};
pub use definition::{DisplayInfo, StackingModel, StatDefinition};
pub use error::{StatError, StatResult};
pub use instance::StatInstance;
pub use modifier::{ModifierOp, StatModifier};
pub use registry::StatRegistry;
pub use snapshot::{ModifierSnapshot, StatSnapshot};
pub use stat_id::{StatId, StatSourceId};
