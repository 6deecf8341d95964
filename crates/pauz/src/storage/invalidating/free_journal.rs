use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use pauz_core::journal::{FreeJournal, ResourceKind};
use pauz_core::storage::{FreeJournalRepository, Result};

use crate::invalidation::InvalidationBus;

/// Invalidating free journal repository decorator.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
pub struct InvalidatingFreeJournalRepository<R>
where
    R: FreeJournalRepository,
{
    repository: Arc<R>,
    bus: InvalidationBus,
}

impl<R> InvalidatingFreeJournalRepository<R>
where
    R: FreeJournalRepository,
{
    pub fn new(repository: Arc<R>, bus: InvalidationBus) -> Self {
        Self { repository, bus }
    }
}

#[async_trait]
impl<R> FreeJournalRepository for InvalidatingFreeJournalRepository<R>
where
    R: FreeJournalRepository + 'static,
{
    async fn get_free_journal(&self, user_id: Uuid, id: Uuid) -> Result<Option<FreeJournal>> {
        self.repository.get_free_journal(user_id, id).await
    }

    async fn create_free_journal(&self, journal: &FreeJournal) -> Result<()> {
        self.repository.create_free_journal(journal).await?;
        self.bus
            .on_mutation(journal.user_id, ResourceKind::FreeJournal)
            .await;

        tracing::debug!(journal_id = %journal.id, user_id = %journal.user_id, "Free journal created");
        Ok(())
    }

    async fn update_free_journal(&self, journal: &FreeJournal) -> Result<()> {
        self.repository.update_free_journal(journal).await?;
        self.bus
            .on_mutation(journal.user_id, ResourceKind::FreeJournal)
            .await;

        tracing::debug!(journal_id = %journal.id, user_id = %journal.user_id, "Free journal updated");
        Ok(())
    }

    async fn delete_free_journal(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.repository.delete_free_journal(user_id, id).await?;
        self.bus
            .on_mutation(user_id, ResourceKind::FreeJournal)
            .await;

        tracing::debug!(journal_id = %id, %user_id, "Free journal deleted");
        Ok(())
    }
}
