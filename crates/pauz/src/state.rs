//! Application state shared by all request handlers.
//!
//! One explicitly constructed cache instance is shared by both aggregators
//! and the invalidation bus; there is no global cache.

use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use pauz_core::cache::{Cache, CacheDiagnostics};
use pauz_core::sources::CountSource;
use pauz_core::storage::{FreeJournalRepository, GardenRepository, GuidedJournalRepository};

use crate::aggregate::{PreviewAggregator, StatsAggregator};
use crate::cache::MemoryCache;
use crate::config::Config;
use crate::invalidation::InvalidationBus;
use crate::sources::{InMemoryObjectStore, ObjectStoreCountSource, SourceSet};
use crate::storage::{
    InvalidatingFreeJournalRepository, InvalidatingGardenRepository,
    InvalidatingGuidedJournalRepository, ObjectStoreGuidedJournals,
};

/// Shared application state.
///
/// Cloned for each request handler. Repositories are the invalidating
/// decorators, so handlers cannot write without evicting.
#[derive(Clone)]
pub struct AppState {
    pub free_journals: Arc<dyn FreeJournalRepository>,
    pub guided_journals: Arc<dyn GuidedJournalRepository>,
    pub garden: Arc<dyn GardenRepository>,
    pub stats: StatsAggregator,
    pub previews: PreviewAggregator,
    pub bus: InvalidationBus,
    pub cache: Arc<dyn Cache>,
    /// Shutdown signal for background tasks.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Wires a relational backend and an object store into the full read and
    /// write paths.
    fn build<R>(relational: Arc<R>, object_store: Arc<InMemoryObjectStore>, config: &Config) -> Self
    where
        R: FreeJournalRepository + GardenRepository + CountSource + 'static,
    {
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(
            config.cache_max_entries,
            config.cache_shards,
        ));
        let bus = InvalidationBus::new(cache.clone());
        let sources = SourceSet::new(
            relational.clone(),
            Arc::new(ObjectStoreCountSource::new(object_store.clone())),
        );
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            free_journals: Arc::new(InvalidatingFreeJournalRepository::new(
                relational.clone(),
                bus.clone(),
            )),
            guided_journals: Arc::new(InvalidatingGuidedJournalRepository::new(
                Arc::new(ObjectStoreGuidedJournals::new(object_store)),
                bus.clone(),
            )),
            garden: Arc::new(InvalidatingGardenRepository::new(relational, bus.clone())),
            stats: StatsAggregator::new(cache.clone(), sources.clone(), config.cache_ttl()),
            previews: PreviewAggregator::new(cache.clone(), sources, config.cache_ttl()),
            bus,
            cache,
            shutdown_tx,
        }
    }

    /// Entry count and hit rate of the shared cache.
    pub async fn cache_diagnostics(&self) -> pauz_core::cache::Result<CacheDiagnostics> {
        self.cache.diagnostics().await
    }

    /// Manual full flush of one user's cached values.
    pub async fn invalidate_user(&self, user_id: Uuid) -> pauz_core::cache::Result<usize> {
        self.bus.invalidate_user(user_id).await
    }

    /// Subscribe to shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal background tasks to shut down.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

// ============================================================================
// Factory functions for each relational backend
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory relational storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            Ok(Self::build(
                Arc::new(InMemoryRepository::new()),
                Arc::new(InMemoryObjectStore::new()),
                config,
            ))
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite_backend {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite relational storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            Ok(Self::build(
                sqlite_repo,
                Arc::new(InMemoryObjectStore::new()),
                config,
            ))
        }
    }
}

// ============================================================================
// Test support
// ============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::storage::InMemoryRepository;

    /// Handles to the raw backends behind a test `AppState`.
    pub struct TestBackends {
        pub relational: Arc<InMemoryRepository>,
        pub object_store: Arc<InMemoryObjectStore>,
    }

    impl AppState {
        /// Creates an AppState over fresh in-memory backends.
        pub fn for_tests() -> (Self, TestBackends) {
            let relational = Arc::new(InMemoryRepository::new());
            let object_store = Arc::new(InMemoryObjectStore::new());
            let state = Self::build(relational.clone(), object_store.clone(), &Config::default());
            (
                state,
                TestBackends {
                    relational,
                    object_store,
                },
            )
        }
    }
}
