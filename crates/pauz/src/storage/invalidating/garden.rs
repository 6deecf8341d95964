use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use pauz_core::journal::{GardenEntry, ResourceKind};
use pauz_core::storage::{GardenRepository, Result};

use crate::invalidation::InvalidationBus;

/// Invalidating garden repository decorator.
pub struct InvalidatingGardenRepository<R>
where
    R: GardenRepository,
{
    repository: Arc<R>,
    bus: InvalidationBus,
}

impl<R> InvalidatingGardenRepository<R>
where
    R: GardenRepository,
{
    pub fn new(repository: Arc<R>, bus: InvalidationBus) -> Self {
        Self { repository, bus }
    }
}

#[async_trait]
impl<R> GardenRepository for InvalidatingGardenRepository<R>
where
    R: GardenRepository + 'static,
{
    async fn get_garden_entry(&self, user_id: Uuid, id: Uuid) -> Result<Option<GardenEntry>> {
        self.repository.get_garden_entry(user_id, id).await
    }

    async fn create_garden_entry(&self, entry: &GardenEntry) -> Result<()> {
        self.repository.create_garden_entry(entry).await?;
        self.bus
            .on_mutation(entry.user_id, ResourceKind::GardenEntry)
            .await;

        tracing::debug!(entry_id = %entry.id, user_id = %entry.user_id, mood = %entry.mood, "Flower planted");
        Ok(())
    }

    async fn delete_garden_entry(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.repository.delete_garden_entry(user_id, id).await?;
        self.bus
            .on_mutation(user_id, ResourceKind::GardenEntry)
            .await;

        tracing::debug!(entry_id = %id, %user_id, "Flower removed");
        Ok(())
    }
}
