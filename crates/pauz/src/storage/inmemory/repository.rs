//! In-memory repository implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use pauz_core::journal::{FreeJournal, GardenEntry, ResourceKind};
use pauz_core::preview::{
    sort_by_order, truncate_chars, PreviewFilters, PreviewRow, PREVIEW_FETCH_CHARS,
};
use pauz_core::sources::{CountSource, SourceError, SourceResult};
use pauz_core::storage::{FreeJournalRepository, GardenRepository, RepositoryError, Result};

use crate::sources::Availability;

const SOURCE_NAME: &str = "relational";

/// In-memory relational store.
///
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    free_journals: Arc<RwLock<HashMap<Uuid, FreeJournal>>>,
    garden: Arc<RwLock<HashMap<Uuid, GardenEntry>>>,
    availability: Availability,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            free_journals: Arc::new(RwLock::new(HashMap::new())),
            garden: Arc::new(RwLock::new(HashMap::new())),
            availability: Availability::new(SOURCE_NAME),
        }
    }

    /// Handle to simulate outages.
    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    async fn count_free_journals(&self, user_id: Uuid) -> u64 {
        let journals = self.free_journals.read().await;
        journals.values().filter(|j| j.user_id == user_id).count() as u64
    }

    async fn count_garden_entries(&self, user_id: Uuid) -> u64 {
        let garden = self.garden.read().await;
        garden.values().filter(|e| e.user_id == user_id).count() as u64
    }
}

/// Rows matching `filters` on the full content, ordered and cut to the fetch bound.
fn preview_rows<'a>(
    items: impl Iterator<Item = (Uuid, &'a str, DateTime<Utc>)>,
    filters: &PreviewFilters,
) -> Vec<PreviewRow> {
    let mut rows: Vec<PreviewRow> = items
        .filter(|(_, content, created_at)| filters.matches(*created_at, content))
        .map(|(id, content, created_at)| PreviewRow {
            id,
            content_prefix: truncate_chars(content, PREVIEW_FETCH_CHARS).0.to_string(),
            created_at,
            source_truncated: false,
        })
        .collect();
    sort_by_order(&mut rows, filters.order(), |row| (row.created_at, row.id));
    rows.truncate(filters.limit());
    rows
}

#[async_trait]
impl FreeJournalRepository for InMemoryRepository {
    async fn get_free_journal(&self, user_id: Uuid, id: Uuid) -> Result<Option<FreeJournal>> {
        self.availability.check()?;
        let journals = self.free_journals.read().await;
        Ok(journals.get(&id).filter(|j| j.user_id == user_id).cloned())
    }

    async fn create_free_journal(&self, journal: &FreeJournal) -> Result<()> {
        self.availability.check()?;
        let mut journals = self.free_journals.write().await;
        if journals.contains_key(&journal.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "FreeJournal",
                id: journal.id.to_string(),
            });
        }
        journals.insert(journal.id, journal.clone());
        Ok(())
    }

    async fn update_free_journal(&self, journal: &FreeJournal) -> Result<()> {
        self.availability.check()?;
        let mut journals = self.free_journals.write().await;
        match journals.get_mut(&journal.id) {
            Some(existing) if existing.user_id == journal.user_id => {
                *existing = journal.clone();
                Ok(())
            }
            _ => Err(RepositoryError::not_found("FreeJournal", journal.id)),
        }
    }

    async fn delete_free_journal(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.availability.check()?;
        let mut journals = self.free_journals.write().await;
        match journals.get(&id) {
            Some(existing) if existing.user_id == user_id => {
                journals.remove(&id);
                Ok(())
            }
            _ => Err(RepositoryError::not_found("FreeJournal", id)),
        }
    }
}

#[async_trait]
impl GardenRepository for InMemoryRepository {
    async fn get_garden_entry(&self, user_id: Uuid, id: Uuid) -> Result<Option<GardenEntry>> {
        self.availability.check()?;
        let garden = self.garden.read().await;
        Ok(garden.get(&id).filter(|e| e.user_id == user_id).cloned())
    }

    async fn create_garden_entry(&self, entry: &GardenEntry) -> Result<()> {
        self.availability.check()?;
        let mut garden = self.garden.write().await;
        if garden.contains_key(&entry.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "GardenEntry",
                id: entry.id.to_string(),
            });
        }
        garden.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn delete_garden_entry(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.availability.check()?;
        let mut garden = self.garden.write().await;
        match garden.get(&id) {
            Some(existing) if existing.user_id == user_id => {
                garden.remove(&id);
                Ok(())
            }
            _ => Err(RepositoryError::not_found("GardenEntry", id)),
        }
    }
}

#[async_trait]
impl CountSource for InMemoryRepository {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn count(&self, user_id: Uuid, kind: ResourceKind) -> SourceResult<u64> {
        self.availability.check()?;
        match kind {
            ResourceKind::FreeJournal => Ok(self.count_free_journals(user_id).await),
            ResourceKind::GardenEntry => Ok(self.count_garden_entries(user_id).await),
            ResourceKind::GuidedJournal => Err(SourceError::UnsupportedKind {
                source_name: SOURCE_NAME,
                kind,
            }),
        }
    }

    async fn counts(
        &self,
        user_id: Uuid,
        kinds: &[ResourceKind],
    ) -> SourceResult<BTreeMap<ResourceKind, u64>> {
        self.availability.check()?;
        // Hold both read locks so the counts come from one consistent snapshot.
        let journals = self.free_journals.read().await;
        let garden = self.garden.read().await;

        let mut counts = BTreeMap::new();
        for kind in kinds {
            let count = match kind {
                ResourceKind::FreeJournal => {
                    journals.values().filter(|j| j.user_id == user_id).count()
                }
                ResourceKind::GardenEntry => {
                    garden.values().filter(|e| e.user_id == user_id).count()
                }
                ResourceKind::GuidedJournal => {
                    return Err(SourceError::UnsupportedKind {
                        source_name: SOURCE_NAME,
                        kind: *kind,
                    })
                }
            };
            counts.insert(*kind, count as u64);
        }
        Ok(counts)
    }

    async fn list_previews(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        filters: &PreviewFilters,
    ) -> SourceResult<Vec<PreviewRow>> {
        self.availability.check()?;
        match kind {
            ResourceKind::FreeJournal => {
                let journals = self.free_journals.read().await;
                Ok(preview_rows(
                    journals
                        .values()
                        .filter(|j| j.user_id == user_id)
                        .map(|j| (j.id, j.content.as_str(), j.created_at)),
                    filters,
                ))
            }
            ResourceKind::GardenEntry => {
                let garden = self.garden.read().await;
                Ok(preview_rows(
                    garden
                        .values()
                        .filter(|e| e.user_id == user_id)
                        .map(|e| (e.id, e.note.as_deref().unwrap_or_default(), e.created_at)),
                    filters,
                ))
            }
            ResourceKind::GuidedJournal => Err(SourceError::UnsupportedKind {
                source_name: SOURCE_NAME,
                kind,
            }),
        }
    }
}
