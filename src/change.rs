//! Value-change notifications.

use crate::stat_id::StatId;
use serde::{Deserialize, Serialize};

/// Effect of one mutating container call on one stat.
///
/// Emitted for every mutation attempt, including ones that leave the value
/// unchanged. Consumers decide what counts as a change with
/// [`StatValueChange::has_changed`].
///
/// # Examples
///
/// ```rust
/// use statkit::{StatId, StatValueChange};
///
/// let change = StatValueChange::new(StatId::new("armor").unwrap(), 2.0, 2.0000001);
/// assert!(change.has_changed(0.0));
/// assert!(!change.has_changed(1e-3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatValueChange {
    pub stat_id: StatId,
    pub old_value: f64,
    pub new_value: f64,
}

impl StatValueChange {
    /// Create a change record for `stat_id`.
    pub fn new(stat_id: StatId, old_value: f64, new_value: f64) -> Self {
        Self {
            stat_id,
            old_value,
            new_value,
        }
    }

    /// `new_value - old_value`.
    pub fn delta(&self) -> f64 {
        self.new_value - self.old_value
    }

    /// True when the values differ by more than `epsilon`.
    pub fn has_changed(&self, epsilon: f64) -> bool {
        self.delta().abs() > epsilon
    }
}
