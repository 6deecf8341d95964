//! Per-user aggregate counts merged from the relational and object stores.

use serde::{Deserialize, Serialize};

/// A user's journal and garden totals.
///
/// `total_journals == total_free_journals + total_guided_journals` holds for
/// every value built through [`StatsSummary::merge`], including degraded ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_journals: u64,
    pub total_free_journals: u64,
    pub total_guided_journals: u64,
    pub total_flowers: u64,
    /// True when at least one source was unavailable and contributed zero.
    pub partial: bool,
}

impl StatsSummary {
    /// Merges per-source counts. `None` means the source was unavailable.
    pub fn merge(free: Option<u64>, guided: Option<u64>, garden: Option<u64>) -> Self {
        let partial = free.is_none() || guided.is_none() || garden.is_none();
        let total_free_journals = free.unwrap_or(0);
        let total_guided_journals = guided.unwrap_or(0);

        Self {
            total_journals: total_free_journals + total_guided_journals,
            total_free_journals,
            total_guided_journals,
            total_flowers: garden.unwrap_or(0),
            partial,
        }
    }
}
