use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::journal::ResourceKind;
use crate::preview::{PreviewFilters, PreviewRow};

use super::SourceResult;

/// Counts and lists lightweight previews for one or more resource kinds.
///
/// Implementations must fail with [`super::SourceError::Unavailable`] when
/// they cannot answer, and never return a guessed count.
#[async_trait]
pub trait CountSource: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Counts a user's records of one kind.
    async fn count(&self, user_id: Uuid, kind: ResourceKind) -> SourceResult<u64>;

    /// Counts several kinds at once.
    ///
    /// The default issues one `count` per kind; relational backends override
    /// it with a single combined query.
    async fn counts(
        &self,
        user_id: Uuid,
        kinds: &[ResourceKind],
    ) -> SourceResult<BTreeMap<ResourceKind, u64>> {
        let mut counts = BTreeMap::new();
        for kind in kinds {
            counts.insert(*kind, self.count(user_id, *kind).await?);
        }
        Ok(counts)
    }

    /// Lists up to `filters.limit()` previews of one kind matching `filters`,
    /// in `filters.order()`.
    async fn list_previews(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        filters: &PreviewFilters,
    ) -> SourceResult<Vec<PreviewRow>>;
}

/// Metadata of a stored object, available from a listing without the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
    pub created_at: Option<DateTime<Utc>>,
}

/// A full object: metadata plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub meta: ObjectMeta,
    pub body: Vec<u8>,
}

/// The capabilities needed from the external object store.
///
/// Counting and previews only use `list_keys` and `get_object_prefix`; full
/// bodies are fetched by the guided-journal write path alone.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists metadata of every object whose key starts with `prefix`.
    async fn list_keys(&self, prefix: &str) -> SourceResult<Vec<ObjectMeta>>;

    /// Reads at most `max_bytes` from the start of an object.
    ///
    /// Returns `None` if the object vanished since it was listed.
    async fn get_object_prefix(&self, key: &str, max_bytes: usize)
        -> SourceResult<Option<Vec<u8>>>;

    /// Reads a whole object.
    async fn get_object(&self, key: &str) -> SourceResult<Option<StoredObject>>;

    /// Writes an object. `created_at` is recorded on first write and kept on overwrite.
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        created_at: DateTime<Utc>,
    ) -> SourceResult<()>;

    /// Deletes an object. Returns false if it did not exist.
    async fn delete_object(&self, key: &str) -> SourceResult<bool>;
}
