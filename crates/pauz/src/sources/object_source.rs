//! `CountSource` over an object store: keys and metadata for counts, bounded
//! prefix reads for previews.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pauz_core::journal::{Backing, ResourceKind};
use pauz_core::preview::{
    sort_by_order, truncate_chars, utf8_prefix, PreviewFilters, PreviewRow, PREVIEW_FETCH_BYTES,
    PREVIEW_FETCH_CHARS,
};
use pauz_core::sources::{
    id_from_object_key, object_prefix, CountSource, ObjectStore, SourceError, SourceResult,
};

const SOURCE_NAME: &str = "object_store";

/// Serves object-store-backed resource kinds.
///
/// Counting only lists keys; bodies are read solely for previews, and then
/// only up to [`PREVIEW_FETCH_BYTES`]. A search term is therefore matched
/// against that prefix, not the whole body.
#[derive(Debug)]
pub struct ObjectStoreCountSource<O> {
    store: Arc<O>,
}

impl<O> Clone for ObjectStoreCountSource<O> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<O: ObjectStore> ObjectStoreCountSource<O> {
    pub fn new(store: Arc<O>) -> Self {
        Self { store }
    }

    fn ensure_served(kind: ResourceKind) -> SourceResult<()> {
        match kind.backing() {
            Backing::ObjectStore => Ok(()),
            Backing::Relational => Err(SourceError::UnsupportedKind {
                source_name: SOURCE_NAME,
                kind,
            }),
        }
    }
}

#[async_trait]
impl<O: ObjectStore + 'static> CountSource for ObjectStoreCountSource<O> {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn count(&self, user_id: Uuid, kind: ResourceKind) -> SourceResult<u64> {
        Self::ensure_served(kind)?;
        let keys = self.store.list_keys(&object_prefix(user_id, kind)).await?;
        let count = keys
            .iter()
            .filter(|meta| id_from_object_key(&meta.key).is_some())
            .count();
        Ok(count as u64)
    }

    async fn list_previews(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        filters: &PreviewFilters,
    ) -> SourceResult<Vec<PreviewRow>> {
        Self::ensure_served(kind)?;

        let mut listed: Vec<(Uuid, String, DateTime<Utc>)> = self
            .store
            .list_keys(&object_prefix(user_id, kind))
            .await?
            .into_iter()
            .filter_map(|meta| {
                let id = id_from_object_key(&meta.key)?;
                let created_at = meta.created_at.unwrap_or(DateTime::UNIX_EPOCH);
                filters
                    .matches_date(created_at)
                    .then_some((id, meta.key, created_at))
            })
            .collect();
        sort_by_order(&mut listed, filters.order(), |(id, _, created_at)| {
            (*created_at, *id)
        });
        if filters.search().is_none() {
            listed.truncate(filters.limit());
        }

        let mut rows = Vec::with_capacity(listed.len().min(filters.limit()));
        for (id, key, created_at) in listed {
            if rows.len() == filters.limit() {
                break;
            }
            // Deleted between listing and reading.
            let Some(bytes) = self.store.get_object_prefix(&key, PREVIEW_FETCH_BYTES).await?
            else {
                continue;
            };
            let (text, dropped) = utf8_prefix(&bytes);
            if !filters.matches_search(text) {
                continue;
            }
            let (content_prefix, _) = truncate_chars(text, PREVIEW_FETCH_CHARS);
            rows.push(PreviewRow {
                id,
                content_prefix: content_prefix.to_string(),
                created_at,
                source_truncated: dropped,
            });
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::InMemoryObjectStore;
    use chrono::Duration;
    use pauz_core::preview::{PreviewRecord, SortOrder, PREVIEW_MAX_CHARS};
    use pauz_core::sources::object_key;

    async fn seed(store: &InMemoryObjectStore, user: Uuid, body: &str, age_minutes: i64) -> Uuid {
        let id = Uuid::new_v4();
        let key = object_key(user, ResourceKind::GuidedJournal, id);
        let created_at = Utc::now() - Duration::minutes(age_minutes);
        store
            .put_object(&key, body.as_bytes().to_vec(), created_at)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_count_lists_only_user_prefix() {
        let store = Arc::new(InMemoryObjectStore::new());
        let user = Uuid::new_v4();
        seed(&store, user, "a", 1).await;
        seed(&store, user, "b", 2).await;
        seed(&store, Uuid::new_v4(), "c", 3).await;

        let source = ObjectStoreCountSource::new(store);
        assert_eq!(
            source.count(user, ResourceKind::GuidedJournal).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_count_ignores_foreign_keys() {
        let store = Arc::new(InMemoryObjectStore::new());
        let user = Uuid::new_v4();
        seed(&store, user, "a", 1).await;
        let stray = format!(
            "{}README",
            object_prefix(user, ResourceKind::GuidedJournal)
        );
        store
            .put_object(&stray, b"x".to_vec(), Utc::now())
            .await
            .unwrap();

        let source = ObjectStoreCountSource::new(store);
        assert_eq!(
            source.count(user, ResourceKind::GuidedJournal).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_rejects_relational_kinds() {
        let source = ObjectStoreCountSource::new(Arc::new(InMemoryObjectStore::new()));
        let err = source
            .count(Uuid::new_v4(), ResourceKind::FreeJournal)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedKind { .. }));
    }

    #[tokio::test]
    async fn test_previews_newest_first_and_limited() {
        let store = Arc::new(InMemoryObjectStore::new());
        let user = Uuid::new_v4();
        let oldest = seed(&store, user, "oldest", 30).await;
        let newest = seed(&store, user, "newest", 1).await;
        let middle = seed(&store, user, "middle", 10).await;

        let source = ObjectStoreCountSource::new(store);
        let filters = PreviewFilters::new(2).unwrap();
        let rows = source
            .list_previews(user, ResourceKind::GuidedJournal, &filters)
            .await
            .unwrap();

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![newest, middle]);
        assert!(!ids.contains(&oldest));
        assert_eq!(rows[0].content_prefix, "newest");
    }

    #[tokio::test]
    async fn test_preview_prefix_is_bounded_and_valid_utf8() {
        let store = Arc::new(InMemoryObjectStore::new());
        let user = Uuid::new_v4();
        let body = "ü".repeat(500);
        seed(&store, user, &body, 1).await;

        let source = ObjectStoreCountSource::new(store);
        let rows = source
            .list_previews(user, ResourceKind::GuidedJournal, &PreviewFilters::default())
            .await
            .unwrap();

        let prefix = &rows[0].content_prefix;
        assert_eq!(prefix.chars().count(), PREVIEW_MAX_CHARS + 1);
        assert!(body.starts_with(prefix.as_str()));
    }

    #[tokio::test]
    async fn test_invalid_byte_marks_preview_truncated() {
        let store = Arc::new(InMemoryObjectStore::new());
        let user = Uuid::new_v4();
        let id = Uuid::new_v4();
        let key = object_key(user, ResourceKind::GuidedJournal, id);
        store
            .put_object(&key, b"short\xffand more after it".to_vec(), Utc::now())
            .await
            .unwrap();

        let source = ObjectStoreCountSource::new(store);
        let rows = source
            .list_previews(user, ResourceKind::GuidedJournal, &PreviewFilters::default())
            .await
            .unwrap();

        assert_eq!(rows[0].content_prefix, "short");
        assert!(rows[0].source_truncated);
        let record = PreviewRecord::from_row(ResourceKind::GuidedJournal, rows[0].clone());
        assert_eq!(record.content, "short");
        assert!(record.truncated);
    }

    #[tokio::test]
    async fn test_previews_apply_filters() {
        let store = Arc::new(InMemoryObjectStore::new());
        let user = Uuid::new_v4();
        let old_rain = seed(&store, user, "Rain on the window", 120).await;
        let sunny = seed(&store, user, "Sunny", 60).await;
        let new_rain = seed(&store, user, "rain again", 5).await;
        let source = ObjectStoreCountSource::new(store);

        let search = PreviewFilters::new(1).unwrap().with_search(Some("RAIN"));
        let rows = source
            .list_previews(user, ResourceKind::GuidedJournal, &search)
            .await
            .unwrap();
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![new_rain]);

        let window = PreviewFilters::default()
            .with_date_range(None, Some(Utc::now() - Duration::minutes(30)))
            .unwrap()
            .with_order(SortOrder::OldestFirst);
        let rows = source
            .list_previews(user, ResourceKind::GuidedJournal, &window)
            .await
            .unwrap();
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![old_rain, sunny]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_distinctly() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.availability().set_available(false);

        let source = ObjectStoreCountSource::new(store);
        let err = source
            .count(Uuid::new_v4(), ResourceKind::GuidedJournal)
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }
}
