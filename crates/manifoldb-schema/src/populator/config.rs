//! Routing configuration for combined populators.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::ValueKind;

/// Which single values the boost populator takes.
///
/// Composite updates always go to the fallback populator; this only decides
/// the routing of updates carrying exactly one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Value kinds routed to the boost populator (default: `int`, `float`).
    pub primary_kinds: BTreeSet<ValueKind>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self::numbers_only()
    }
}

impl RoutingConfig {
    /// Route integers and floats to the boost populator.
    #[must_use]
    pub fn numbers_only() -> Self {
        Self { primary_kinds: ValueKind::ALL.into_iter().filter(|k| k.is_number()).collect() }
    }

    /// Route nothing to the boost populator.
    #[must_use]
    pub fn fallback_only() -> Self {
        Self { primary_kinds: BTreeSet::new() }
    }

    /// Also route `kind` to the boost populator.
    #[must_use]
    pub fn with_primary_kind(mut self, kind: ValueKind) -> Self {
        self.primary_kinds.insert(kind);
        self
    }

    /// Stop routing `kind` to the boost populator.
    #[must_use]
    pub fn without_primary_kind(mut self, kind: ValueKind) -> Self {
        self.primary_kinds.remove(&kind);
        self
    }

    /// Check if a single value of `kind` goes to the boost populator.
    #[inline]
    #[must_use]
    pub fn is_primary_capable(&self, kind: ValueKind) -> bool {
        self.primary_kinds.contains(&kind)
    }
}
