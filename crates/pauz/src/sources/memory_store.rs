//! In-process object store keyed by path.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use pauz_core::sources::{ObjectMeta, ObjectStore, SourceResult, StoredObject};

use super::Availability;

/// Object store backed by an ordered map, so prefix listing is a range scan.
#[derive(Debug, Clone)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
    availability: Availability,
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(BTreeMap::new())),
            availability: Availability::new("object_store"),
        }
    }

    /// Handle to simulate outages.
    pub fn availability(&self) -> &Availability {
        &self.availability
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_keys(&self, prefix: &str) -> SourceResult<Vec<ObjectMeta>> {
        self.availability.check()?;
        let objects = self.objects.read().await;
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, object)| object.meta.clone())
            .collect())
    }

    async fn get_object_prefix(
        &self,
        key: &str,
        max_bytes: usize,
    ) -> SourceResult<Option<Vec<u8>>> {
        self.availability.check()?;
        let objects = self.objects.read().await;
        Ok(objects.get(key).map(|object| {
            let end = object.body.len().min(max_bytes);
            object.body[..end].to_vec()
        }))
    }

    async fn get_object(&self, key: &str) -> SourceResult<Option<StoredObject>> {
        self.availability.check()?;
        let objects = self.objects.read().await;
        Ok(objects.get(key).cloned())
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        created_at: DateTime<Utc>,
    ) -> SourceResult<()> {
        self.availability.check()?;
        let mut objects = self.objects.write().await;
        // Overwrites keep the original creation time.
        let created_at = objects
            .get(key)
            .and_then(|existing| existing.meta.created_at)
            .unwrap_or(created_at);
        let meta = ObjectMeta {
            key: key.to_string(),
            size: body.len() as u64,
            created_at: Some(created_at),
        };
        objects.insert(key.to_string(), StoredObject { meta, body });
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> SourceResult<bool> {
        self.availability.check()?;
        let mut objects = self.objects.write().await;
        Ok(objects.remove(key).is_some())
    }
}
