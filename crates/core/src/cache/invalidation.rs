//! Declared mapping from mutated resource kinds to the cache keys they stale.
//!
//! Write paths never pick keys themselves: they report which kinds changed
//! and the rules table turns that into key patterns.

use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

use crate::journal::ResourceKind;

use super::{previews_pattern, stats_key, user_pattern};

/// A family of cache keys owned by one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InvalidationTarget {
    /// The user's stats summary.
    Stats,
    /// Every preview window of one kind, whatever the filters.
    Previews(ResourceKind),
    /// Every key of the user.
    Everything,
}

impl InvalidationTarget {
    /// Returns the key or glob pattern covering this target for a user.
    pub fn pattern(&self, user_id: Uuid) -> String {
        match self {
            InvalidationTarget::Stats => stats_key(user_id),
            InvalidationTarget::Previews(kind) => previews_pattern(user_id, *kind),
            InvalidationTarget::Everything => user_pattern(user_id),
        }
    }
}

/// A committed mutation: which user, and which kinds of their data changed.
///
/// Built right after a write commits and consumed immediately; never queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationEvent {
    pub user_id: Uuid,
    pub kinds: BTreeSet<ResourceKind>,
}

impl InvalidationEvent {
    pub fn new(user_id: Uuid, kinds: impl IntoIterator<Item = ResourceKind>) -> Self {
        Self {
            user_id,
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn single(user_id: Uuid, kind: ResourceKind) -> Self {
        Self::new(user_id, [kind])
    }
}

/// Resource kind -> invalidation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationRules {
    rules: BTreeMap<ResourceKind, BTreeSet<InvalidationTarget>>,
}

impl InvalidationRules {
    /// A table with no registrations.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Registers an additional target for a kind.
    pub fn register(mut self, kind: ResourceKind, target: InvalidationTarget) -> Self {
        self.rules.entry(kind).or_default().insert(target);
        self
    }

    /// Returns the targets registered for a kind.
    pub fn targets(&self, kind: ResourceKind) -> impl Iterator<Item = InvalidationTarget> + '_ {
        self.rules.get(&kind).into_iter().flatten().copied()
    }

    /// Returns the deduplicated patterns to evict for an event.
    pub fn patterns_for(&self, event: &InvalidationEvent) -> Vec<String> {
        let targets: BTreeSet<InvalidationTarget> = event
            .kinds
            .iter()
            .flat_map(|kind| self.targets(*kind))
            .collect();

        targets
            .into_iter()
            .map(|target| target.pattern(event.user_id))
            .collect()
    }
}

impl Default for InvalidationRules {
    /// Every kind evicts its own previews; kinds feeding stats also evict stats.
    fn default() -> Self {
        ResourceKind::ALL
            .into_iter()
            .fold(Self::empty(), |rules, kind| {
                let rules = rules.register(kind, InvalidationTarget::Previews(kind));
                if kind.touches_stats() {
                    rules.register(kind, InvalidationTarget::Stats)
                } else {
                    rules
                }
            })
    }
}
