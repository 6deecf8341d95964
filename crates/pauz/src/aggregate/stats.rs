//! Per-user stats summary, cached under `user:{id}:stats`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use pauz_core::cache::{deserialize_stats, serialize_stats, Cache, CacheError, CacheKey};
use pauz_core::journal::{Backing, ResourceKind};
use pauz_core::sources::SourceResult;
use pauz_core::stats::StatsSummary;

use crate::sources::SourceSet;

use super::AggregateError;

/// Merges relational and object-store counts into a [`StatsSummary`].
///
/// A source that is down contributes zero and marks the summary partial.
/// Partial summaries are cached like complete ones.
#[derive(Clone)]
pub struct StatsAggregator {
    cache: Arc<dyn Cache>,
    sources: SourceSet,
    ttl: Duration,
}

impl StatsAggregator {
    pub fn new(cache: Arc<dyn Cache>, sources: SourceSet, ttl: Duration) -> Self {
        Self {
            cache,
            sources,
            ttl,
        }
    }

    pub async fn get_user_stats(&self, user_id: Uuid) -> Result<StatsSummary, AggregateError> {
        let cache_key = CacheKey::stats(user_id).encode();

        if let Some(bytes) = self.cache.get(&cache_key).await? {
            match deserialize_stats(&bytes) {
                Ok(stats) => {
                    tracing::trace!(%user_id, "Cache hit for stats");
                    return Ok(stats);
                }
                Err(err) => {
                    tracing::warn!(%user_id, error = %err, "Cached stats unreadable, recomputing")
                }
            }
        }

        tracing::trace!(%user_id, "Cache miss for stats");
        let stats = self.compute(user_id).await;

        let bytes = serialize_stats(&stats).map_err(CacheError::from)?;
        self.cache.set(&cache_key, &bytes, Some(self.ttl)).await?;

        Ok(stats)
    }

    /// Queries both sources concurrently, without holding any cache lock.
    async fn compute(&self, user_id: Uuid) -> StatsSummary {
        let relational_kinds = SourceSet::kinds_for(Backing::Relational);
        let object_kinds = SourceSet::kinds_for(Backing::ObjectStore);

        let (relational, object_store) = tokio::join!(
            self.sources.relational().counts(user_id, &relational_kinds),
            self.sources.object_store().counts(user_id, &object_kinds),
        );

        let relational = available(user_id, self.sources.relational().name(), relational);
        let object_store = available(user_id, self.sources.object_store().name(), object_store);

        let count_of = |kind: ResourceKind| {
            let counts = match kind.backing() {
                Backing::Relational => relational.as_ref(),
                Backing::ObjectStore => object_store.as_ref(),
            };
            counts.map(|counts| counts.get(&kind).copied().unwrap_or(0))
        };

        let stats = StatsSummary::merge(
            count_of(ResourceKind::FreeJournal),
            count_of(ResourceKind::GuidedJournal),
            count_of(ResourceKind::GardenEntry),
        );
        if stats.partial {
            tracing::warn!(%user_id, ?stats, "Serving partial stats");
        }
        stats
    }
}

fn available(
    user_id: Uuid,
    source_name: &str,
    result: SourceResult<BTreeMap<ResourceKind, u64>>,
) -> Option<BTreeMap<ResourceKind, u64>> {
    match result {
        Ok(counts) => Some(counts),
        Err(err) => {
            tracing::warn!(%user_id, source = source_name, error = %err, "Count source degraded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::MockCountSource;
    use crate::cache::MemoryCache;
    use crate::invalidation::InvalidationBus;

    const TTL: Duration = Duration::from_secs(300);

    struct Fixture {
        relational: Arc<MockCountSource>,
        object_store: Arc<MockCountSource>,
        cache: Arc<MemoryCache>,
        aggregator: StatsAggregator,
    }

    fn fixture_with_ttl(ttl: Duration) -> Fixture {
        let relational = Arc::new(MockCountSource::new());
        let object_store = Arc::new(MockCountSource::new());
        let cache = Arc::new(MemoryCache::new(1000, 4));
        let sources = SourceSet::new(relational.clone(), object_store.clone());
        let aggregator = StatsAggregator::new(cache.clone(), sources, ttl);
        Fixture {
            relational,
            object_store,
            cache,
            aggregator,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_ttl(TTL)
    }

    #[tokio::test]
    async fn test_merges_both_sources_and_caches() {
        let f = fixture();
        let user = Uuid::new_v4();
        f.relational.set_count(user, ResourceKind::FreeJournal, 3);
        f.object_store.set_count(user, ResourceKind::GuidedJournal, 2);

        let first = f.aggregator.get_user_stats(user).await.unwrap();
        assert_eq!(
            first,
            StatsSummary {
                total_journals: 5,
                total_free_journals: 3,
                total_guided_journals: 2,
                total_flowers: 0,
                partial: false,
            }
        );

        let second = f.aggregator.get_user_stats(user).await.unwrap();
        assert_eq!(second, first);

        // One combined query per source, none on the cached read
        assert_eq!(f.relational.count_calls(), 1);
        assert_eq!(f.object_store.count_calls(), 1);
    }

    #[tokio::test]
    async fn test_recomputes_after_invalidation() {
        let f = fixture();
        let user = Uuid::new_v4();
        f.relational.set_count(user, ResourceKind::FreeJournal, 3);
        f.object_store.set_count(user, ResourceKind::GuidedJournal, 2);
        f.aggregator.get_user_stats(user).await.unwrap();

        f.relational.set_count(user, ResourceKind::FreeJournal, 4);
        InvalidationBus::new(f.cache.clone())
            .on_mutation(user, ResourceKind::FreeJournal)
            .await;

        let stats = f.aggregator.get_user_stats(user).await.unwrap();
        assert_eq!(stats.total_free_journals, 4);
        assert_eq!(stats.total_journals, 6);
        assert_eq!(f.relational.count_calls(), 2);
    }

    #[tokio::test]
    async fn test_object_store_down_degrades_to_zero() {
        let f = fixture();
        let user = Uuid::new_v4();
        f.relational.set_count(user, ResourceKind::FreeJournal, 3);
        f.relational.set_count(user, ResourceKind::GardenEntry, 7);
        f.object_store.set_count(user, ResourceKind::GuidedJournal, 2);
        f.object_store.set_failing(true);

        let stats = f.aggregator.get_user_stats(user).await.unwrap();

        assert!(stats.partial);
        assert_eq!(stats.total_guided_journals, 0);
        assert_eq!(stats.total_free_journals, 3);
        assert_eq!(stats.total_flowers, 7);
        assert_eq!(
            stats.total_journals,
            stats.total_free_journals + stats.total_guided_journals
        );
    }

    #[tokio::test]
    async fn test_partial_stats_are_cached() {
        let f = fixture();
        let user = Uuid::new_v4();
        f.object_store.set_count(user, ResourceKind::GuidedJournal, 2);
        f.object_store.set_failing(true);
        f.aggregator.get_user_stats(user).await.unwrap();

        f.object_store.set_failing(false);
        let stats = f.aggregator.get_user_stats(user).await.unwrap();

        assert!(stats.partial);
        assert_eq!(f.object_store.count_calls(), 1);
    }

    #[tokio::test]
    async fn test_both_sources_down() {
        let f = fixture();
        f.relational.set_failing(true);
        f.object_store.set_failing(true);

        let stats = f.aggregator.get_user_stats(Uuid::new_v4()).await.unwrap();

        assert_eq!(
            stats,
            StatsSummary {
                partial: true,
                ..StatsSummary::default()
            }
        );
    }

    #[tokio::test]
    async fn test_expired_entry_is_recomputed() {
        let f = fixture_with_ttl(Duration::from_millis(30));
        let user = Uuid::new_v4();

        f.aggregator.get_user_stats(user).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        f.aggregator.get_user_stats(user).await.unwrap();

        assert_eq!(f.relational.count_calls(), 2);
    }

    #[tokio::test]
    async fn test_users_are_cached_separately() {
        let f = fixture();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        f.relational.set_count(alice, ResourceKind::FreeJournal, 1);
        f.relational.set_count(bob, ResourceKind::FreeJournal, 9);

        assert_eq!(
            f.aggregator.get_user_stats(alice).await.unwrap().total_free_journals,
            1
        );
        assert_eq!(
            f.aggregator.get_user_stats(bob).await.unwrap().total_free_journals,
            9
        );
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_recomputed() {
        let f = fixture();
        let user = Uuid::new_v4();
        f.relational.set_count(user, ResourceKind::FreeJournal, 2);
        f.cache
            .set(&CacheKey::stats(user).encode(), b"not json", None)
            .await
            .unwrap();

        let stats = f.aggregator.get_user_stats(user).await.unwrap();

        assert_eq!(stats.total_free_journals, 2);
        assert_eq!(f.relational.count_calls(), 1);
    }
}
