use async_trait::async_trait;
use uuid::Uuid;

use crate::journal::{FreeJournal, GardenEntry, GuidedJournal};

use super::Result;

/// Repository for free journals. Every lookup is scoped to the owning user.
#[async_trait]
pub trait FreeJournalRepository: Send + Sync {
    async fn get_free_journal(&self, user_id: Uuid, id: Uuid) -> Result<Option<FreeJournal>>;

    async fn create_free_journal(&self, journal: &FreeJournal) -> Result<()>;

    /// Replaces an existing journal. Fails with `NotFound` if it does not exist.
    async fn update_free_journal(&self, journal: &FreeJournal) -> Result<()>;

    /// Deletes a journal. Fails with `NotFound` if the user has no such journal.
    async fn delete_free_journal(&self, user_id: Uuid, id: Uuid) -> Result<()>;
}

/// Repository for guided journals.
#[async_trait]
pub trait GuidedJournalRepository: Send + Sync {
    async fn get_guided_journal(&self, user_id: Uuid, id: Uuid) -> Result<Option<GuidedJournal>>;

    async fn create_guided_journal(&self, journal: &GuidedJournal) -> Result<()>;

    /// Replaces an existing journal. Fails with `NotFound` if it does not exist.
    async fn update_guided_journal(&self, journal: &GuidedJournal) -> Result<()>;

    async fn delete_guided_journal(&self, user_id: Uuid, id: Uuid) -> Result<()>;
}

/// Repository for garden entries.
#[async_trait]
pub trait GardenRepository: Send + Sync {
    async fn get_garden_entry(&self, user_id: Uuid, id: Uuid) -> Result<Option<GardenEntry>>;

    async fn create_garden_entry(&self, entry: &GardenEntry) -> Result<()>;

    async fn delete_garden_entry(&self, user_id: Uuid, id: Uuid) -> Result<()>;
}
