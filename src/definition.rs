//! Stat definitions.
//!
//! A `StatDefinition` is the static configuration of one stat: its default
//! base value, its bounds, the stacking model used to combine modifiers and
//! optional display metadata. Definitions are immutable and validated at
//! construction, whether built in code or loaded from JSON.

use crate::error::StatError;
use crate::stat_id::StatId;
use serde::{Deserialize, Serialize};

/// Algorithm used to fold a stat's modifiers into a final value.
///
/// Only one model exists today; the enum is non-exhaustive so new models
/// can be added without breaking matches downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum StackingModel {
    /// Flat, then additive percent, then compounded multiplicative percent.
    #[default]
    Default,
}

/// Presentation hints for tooling and UI. Empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl DisplayInfo {
    /// Create display hints from an icon and a color name.
    pub fn new(icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            color: color.into(),
        }
    }
}

/// Static configuration for one stat.
///
/// # Examples
///
/// ```rust
/// use statkit::{StatDefinition, StatId};
///
/// let health = StatDefinition::new(StatId::new("health").unwrap(), 20.0, 0.0, 1024.0)
///     .unwrap()
///     .with_display("❤", "red");
/// assert_eq!(health.base(), 20.0);
/// assert_eq!(health.display().color, "red");
///
/// // Inverted bounds are rejected, never swapped.
/// assert!(StatDefinition::new(StatId::new("broken").unwrap(), 0.0, 5.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDefinition", into = "RawDefinition")]
pub struct StatDefinition {
    id: StatId,
    base: f64,
    min: f64,
    max: f64,
    stacking: StackingModel,
    display: DisplayInfo,
}

impl StatDefinition {
    /// Create a definition with the default stacking model and no display
    /// metadata.
    ///
    /// Fails with `StatError::InvalidBounds` if `min > max` or either bound
    /// is NaN, and with `StatError::InvalidBase` if `base` is NaN.
    pub fn new(id: StatId, base: f64, min: f64, max: f64) -> Result<Self, StatError> {
        if !(min <= max) {
            return Err(StatError::InvalidBounds { id, min, max });
        }
        if base.is_nan() {
            return Err(StatError::InvalidBase { id, base });
        }
        Ok(Self {
            id,
            base,
            min,
            max,
            stacking: StackingModel::Default,
            display: DisplayInfo::default(),
        })
    }

    /// Build from values known to satisfy `min <= max` with a non-NaN base.
    pub(crate) fn new_unchecked(id: StatId, base: f64, min: f64, max: f64) -> Self {
        debug_assert!(min <= max && !base.is_nan());
        Self {
            id,
            base,
            min,
            max,
            stacking: StackingModel::Default,
            display: DisplayInfo::default(),
        }
    }

    /// Create a definition bounded only from below by zero.
    pub fn non_negative(id: StatId, base: f64) -> Result<Self, StatError> {
        Self::new(id, base, 0.0, f64::INFINITY)
    }

    /// Replace the stacking model.
    pub fn with_stacking(mut self, stacking: StackingModel) -> Self {
        self.stacking = stacking;
        self
    }

    /// Attach an icon and a color for tooling.
    pub fn with_display(mut self, icon: impl Into<String>, color: impl Into<String>) -> Self {
        self.display = DisplayInfo::new(icon, color);
        self
    }

    /// Get the stat this definition describes.
    pub fn id(&self) -> &StatId {
        &self.id
    }

    /// Registry default for the base value.
    pub fn base(&self) -> f64 {
        self.base
    }

    /// Lower bound, `-inf` when open.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound, `+inf` when open.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Stacking model used to combine modifiers.
    pub fn stacking(&self) -> StackingModel {
        self.stacking
    }

    /// Presentation hints.
    pub fn display(&self) -> &DisplayInfo {
        &self.display
    }

    /// Clamp `value` into this stat's bounds.
    ///
    /// A NaN `value` maps to the clamped default base, so the result always
    /// lies in `[min, max]`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statkit::{StatDefinition, StatId};
    ///
    /// let armor = StatDefinition::new(StatId::new("armor").unwrap(), 5.0, 0.0, 30.0).unwrap();
    /// assert_eq!(armor.clamp(-4.0), 0.0);
    /// assert_eq!(armor.clamp(99.0), 30.0);
    /// assert_eq!(armor.clamp(f64::NAN), 5.0);
    /// ```
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.base.clamp(self.min, self.max);
        }
        value.clamp(self.min, self.max)
    }
}

/// Wire form of a definition. JSON has no infinities, so open bounds are
/// expressed by omitting `min`/`max`.
#[derive(Serialize, Deserialize)]
struct RawDefinition {
    id: StatId,
    #[serde(default)]
    base: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(default)]
    stacking: StackingModel,
    #[serde(default)]
    display: DisplayInfo,
}

impl TryFrom<RawDefinition> for StatDefinition {
    type Error = StatError;

    fn try_from(raw: RawDefinition) -> Result<Self, Self::Error> {
        let min = raw.min.unwrap_or(f64::NEG_INFINITY);
        let max = raw.max.unwrap_or(f64::INFINITY);
        Ok(StatDefinition::new(raw.id, raw.base, min, max)?
            .with_stacking(raw.stacking)
            .with_display(raw.display.icon, raw.display.color))
    }
}

impl From<StatDefinition> for RawDefinition {
    fn from(def: StatDefinition) -> Self {
        RawDefinition {
            id: def.id,
            base: def.base,
            min: def.min.is_finite().then_some(def.min),
            max: def.max.is_finite().then_some(def.max),
            stacking: def.stacking,
            display: def.display,
        }
    }
}
