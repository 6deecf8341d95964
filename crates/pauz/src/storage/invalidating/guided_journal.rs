use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use pauz_core::journal::{GuidedJournal, ResourceKind};
use pauz_core::storage::{GuidedJournalRepository, Result};

use crate::invalidation::InvalidationBus;

/// Invalidating guided journal repository decorator.
pub struct InvalidatingGuidedJournalRepository<R>
where
    R: GuidedJournalRepository,
{
    repository: Arc<R>,
    bus: InvalidationBus,
}

impl<R> InvalidatingGuidedJournalRepository<R>
where
    R: GuidedJournalRepository,
{
    pub fn new(repository: Arc<R>, bus: InvalidationBus) -> Self {
        Self { repository, bus }
    }
}

#[async_trait]
impl<R> GuidedJournalRepository for InvalidatingGuidedJournalRepository<R>
where
    R: GuidedJournalRepository + 'static,
{
    async fn get_guided_journal(&self, user_id: Uuid, id: Uuid) -> Result<Option<GuidedJournal>> {
        self.repository.get_guided_journal(user_id, id).await
    }

    async fn create_guided_journal(&self, journal: &GuidedJournal) -> Result<()> {
        self.repository.create_guided_journal(journal).await?;
        self.bus
            .on_mutation(journal.user_id, ResourceKind::GuidedJournal)
            .await;

        tracing::debug!(journal_id = %journal.id, user_id = %journal.user_id, "Guided journal created");
        Ok(())
    }

    async fn update_guided_journal(&self, journal: &GuidedJournal) -> Result<()> {
        self.repository.update_guided_journal(journal).await?;
        self.bus
            .on_mutation(journal.user_id, ResourceKind::GuidedJournal)
            .await;

        tracing::debug!(
            journal_id = %journal.id,
            user_id = %journal.user_id,
            entries = journal.entries.len(),
            "Guided journal updated"
        );
        Ok(())
    }

    async fn delete_guided_journal(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.repository.delete_guided_journal(user_id, id).await?;
        self.bus
            .on_mutation(user_id, ResourceKind::GuidedJournal)
            .await;

        tracing::debug!(journal_id = %id, %user_id, "Guided journal deleted");
        Ok(())
    }
}
