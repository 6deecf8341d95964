use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pauz_core::journal::{
    parse_guided_document, render_guided_document, GuidedJournal, ResourceKind,
};
use pauz_core::sources::{object_key, ObjectStore};
use pauz_core::storage::{GuidedJournalRepository, RepositoryError, Result};

const ENTITY: &str = "GuidedJournal";

/// Guided journal repository over an [`ObjectStore`].
///
/// Each journal is one object at `users/{user_id}/guided_journals/{id}`
/// whose body is the rendered plain-text document.
#[derive(Debug)]
pub struct ObjectStoreGuidedJournals<O> {
    store: Arc<O>,
}

impl<O: ObjectStore> ObjectStoreGuidedJournals<O> {
    pub fn new(store: Arc<O>) -> Self {
        Self { store }
    }

    fn key(user_id: Uuid, id: Uuid) -> String {
        object_key(user_id, ResourceKind::GuidedJournal, id)
    }

    async fn write(&self, journal: &GuidedJournal) -> Result<()> {
        let body = render_guided_document(journal).into_bytes();
        self.store
            .put_object(&Self::key(journal.user_id, journal.id), body, journal.created_at)
            .await?;
        Ok(())
    }

    async fn exists(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        Ok(self.store.get_object(&Self::key(user_id, id)).await?.is_some())
    }
}

#[async_trait]
impl<O: ObjectStore + 'static> GuidedJournalRepository for ObjectStoreGuidedJournals<O> {
    async fn get_guided_journal(&self, user_id: Uuid, id: Uuid) -> Result<Option<GuidedJournal>> {
        let Some(object) = self.store.get_object(&Self::key(user_id, id)).await? else {
            return Ok(None);
        };
        let body = String::from_utf8(object.body)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let created_at: DateTime<Utc> = object.meta.created_at.unwrap_or(DateTime::UNIX_EPOCH);
        Ok(Some(parse_guided_document(id, user_id, created_at, &body)))
    }

    async fn create_guided_journal(&self, journal: &GuidedJournal) -> Result<()> {
        if self.exists(journal.user_id, journal.id).await? {
            return Err(RepositoryError::AlreadyExists {
                entity_type: ENTITY,
                id: journal.id.to_string(),
            });
        }
        self.write(journal).await
    }

    async fn update_guided_journal(&self, journal: &GuidedJournal) -> Result<()> {
        if !self.exists(journal.user_id, journal.id).await? {
            return Err(RepositoryError::not_found(ENTITY, journal.id));
        }
        self.write(journal).await
    }

    async fn delete_guided_journal(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if self.store.delete_object(&Self::key(user_id, id)).await? {
            Ok(())
        } else {
            Err(RepositoryError::not_found(ENTITY, id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{InMemoryObjectStore, ObjectStoreCountSource};
    use pauz_core::preview::PreviewFilters;
    use pauz_core::sources::CountSource;

    fn repo() -> (Arc<InMemoryObjectStore>, ObjectStoreGuidedJournals<InMemoryObjectStore>) {
        let store = Arc::new(InMemoryObjectStore::new());
        (store.clone(), ObjectStoreGuidedJournals::new(store))
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let (_, repo) = repo();
        let user = Uuid::new_v4();
        let mut journal = GuidedJournal::new(user, "Gratitude").unwrap();
        journal.add_entry("The sea").unwrap();

        repo.create_guided_journal(&journal).await.unwrap();

        let loaded = repo
            .get_guided_journal(user, journal.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.topic, "Gratitude");
        assert_eq!(loaded.entries, journal.entries);
        assert_eq!(loaded.created_at, journal.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_fails() {
        let (_, repo) = repo();
        let journal = GuidedJournal::new(Uuid::new_v4(), "Fear").unwrap();

        let result = repo.update_guided_journal(&journal).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_missing_fails() {
        let (_, repo) = repo();
        let result = repo
            .delete_guided_journal(Uuid::new_v4(), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_written_journals_are_counted_and_previewed() {
        let (store, repo) = repo();
        let user = Uuid::new_v4();
        let mut journal = GuidedJournal::new(user, "Hope").unwrap();
        journal.add_entry("Tomorrow").unwrap();
        repo.create_guided_journal(&journal).await.unwrap();

        let source = ObjectStoreCountSource::new(store);
        assert_eq!(
            source.count(user, ResourceKind::GuidedJournal).await.unwrap(),
            1
        );
        let rows = source
            .list_previews(user, ResourceKind::GuidedJournal, &PreviewFilters::default())
            .await
            .unwrap();
        assert_eq!(rows[0].content_prefix, "Hope\n\nTomorrow");
    }

    #[tokio::test]
    async fn test_outage_maps_to_connection_failed() {
        let (store, repo) = repo();
        store.availability().set_available(false);

        let result = repo
            .create_guided_journal(&GuidedJournal::new(Uuid::new_v4(), "Rest").unwrap())
            .await;
        assert!(matches!(result, Err(RepositoryError::ConnectionFailed(_))));
    }
}
