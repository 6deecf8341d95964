use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UnknownResourceKind;

/// Where the authoritative records of a resource kind live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backing {
    /// Structured rows in the relational store.
    Relational,
    /// Documents under a user-scoped prefix in the object store.
    ObjectStore,
}

/// A logical collection a cache key or invalidation event refers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    FreeJournal,
    GuidedJournal,
    GardenEntry,
}

impl ResourceKind {
    /// Every resource kind, in a stable order.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::FreeJournal,
        ResourceKind::GuidedJournal,
        ResourceKind::GardenEntry,
    ];

    /// Returns the slug used in cache keys and URLs.
    pub fn slug(&self) -> &'static str {
        match self {
            ResourceKind::FreeJournal => "free_journals",
            ResourceKind::GuidedJournal => "guided_journals",
            ResourceKind::GardenEntry => "garden",
        }
    }

    /// Parses a slug produced by [`ResourceKind::slug`].
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    /// Returns the store holding the authoritative records of this kind.
    pub fn backing(&self) -> Backing {
        match self {
            ResourceKind::FreeJournal | ResourceKind::GardenEntry => Backing::Relational,
            ResourceKind::GuidedJournal => Backing::ObjectStore,
        }
    }

    /// Returns true if mutations of this kind change the user's stats summary.
    pub fn touches_stats(&self) -> bool {
        match self {
            ResourceKind::FreeJournal | ResourceKind::GuidedJournal | ResourceKind::GardenEntry => {
                true
            }
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| UnknownResourceKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_roundtrip_for_every_kind() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_slug(kind.slug()), Some(kind));
            assert_eq!(kind.to_string().parse::<ResourceKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_slug() {
        assert_eq!(ResourceKind::from_slug("journals"), None);
        assert_eq!(
            "journals".parse::<ResourceKind>(),
            Err(UnknownResourceKind("journals".to_string()))
        );
    }

    #[test]
    fn test_backing() {
        assert_eq!(ResourceKind::FreeJournal.backing(), Backing::Relational);
        assert_eq!(ResourceKind::GardenEntry.backing(), Backing::Relational);
        assert_eq!(ResourceKind::GuidedJournal.backing(), Backing::ObjectStore);
    }

    #[test]
    fn test_every_kind_touches_stats() {
        assert!(ResourceKind::ALL.iter().all(|kind| kind.touches_stats()));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&ResourceKind::GardenEntry).unwrap();
        assert_eq!(json, "\"garden_entry\"");
    }
}
