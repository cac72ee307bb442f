//! Stat and source identifier module.
//!
//! Provides `StatId` (names an attribute such as `armor`) and
//! `StatSourceId` (names the origin of a modifier such as an item instance
//! or a potion effect). Both wrap a trimmed, non-blank `Arc<str>`, so clones
//! are cheap and comparisons go by string value.

use crate::error::StatError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

macro_rules! trimmed_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create an identifier, trimming surrounding whitespace.
            ///
            /// Fails with `StatError::BlankId` when nothing is left after
            /// trimming.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, StatError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(StatError::BlankId { kind: $kind });
                }
                Ok(Self(Arc::from(trimmed)))
            }

            /// Get the string representation of this identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = StatError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = StatError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = StatError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.as_ref().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::new(s).map_err(de::Error::custom)
            }
        }
    };
}

trimmed_id!(
    /// Identifier of a stat (e.g. `armor`, `movement_speed`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statkit::StatId;
    ///
    /// let armor = StatId::new("  armor ").unwrap();
    /// assert_eq!(armor.as_str(), "armor");
    ///
    /// let parsed: StatId = "armor".parse().unwrap();
    /// assert_eq!(armor, parsed);
    ///
    /// assert!(StatId::new("   ").is_err());
    /// ```
    StatId,
    "stat id"
);

impl StatId {
    /// Build from a literal known to be trimmed and non-blank.
    pub(crate) fn new_unchecked(trimmed: &str) -> Self {
        debug_assert!(!trimmed.trim().is_empty());
        Self(Arc::from(trimmed))
    }
}

trimmed_id!(
    /// Identifier of a modifier's origin (an item instance, a buff, an aura).
    ///
    /// Every modifier contributed by one origin shares its source id, so the
    /// whole group can be removed in one call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statkit::StatSourceId;
    ///
    /// let boots = StatSourceId::new("item:boots#42").unwrap();
    /// assert_eq!(boots.to_string(), "item:boots#42");
    /// ```
    StatSourceId,
    "source id"
);
