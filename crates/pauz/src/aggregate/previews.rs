use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use pauz_core::cache::{deserialize_previews, serialize_previews, Cache, CacheError, CacheKey};
use pauz_core::journal::ResourceKind;
use pauz_core::preview::{PreviewFilters, PreviewRecord, PreviewSet};

use crate::sources::SourceSet;

use super::AggregateError;

/// Builds ordered preview windows per user, kind and filter set.
///
/// Only the source owning the kind is queried. An unavailable source yields
/// an empty partial set, which is returned but never cached.
#[derive(Clone)]
pub struct PreviewAggregator {
    cache: Arc<dyn Cache>,
    sources: SourceSet,
    ttl: Duration,
}

impl PreviewAggregator {
    pub fn new(cache: Arc<dyn Cache>, sources: SourceSet, ttl: Duration) -> Self {
        Self {
            cache,
            sources,
            ttl,
        }
    }

    pub async fn get_previews(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        filters: &PreviewFilters,
    ) -> Result<PreviewSet, AggregateError> {
        let cache_key = CacheKey::previews(user_id, kind, filters.signature()?).encode();

        if let Some(bytes) = self.cache.get(&cache_key).await? {
            match deserialize_previews(&bytes) {
                Ok(records) => {
                    tracing::trace!(%user_id, %kind, count = records.len(), "Cache hit for previews");
                    return Ok(PreviewSet::ordered(kind, records, false, filters.order()));
                }
                Err(err) => {
                    tracing::warn!(%user_id, %kind, error = %err, "Cached previews unreadable, recomputing")
                }
            }
        }

        tracing::trace!(%user_id, %kind, key = %cache_key, "Cache miss for previews");
        let source = self.sources.for_kind(kind);
        let rows = match source.list_previews(user_id, kind, filters).await {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(
                    %user_id,
                    %kind,
                    source = source.name(),
                    error = %err,
                    "Preview source degraded"
                );
                return Ok(PreviewSet::degraded(kind));
            }
        };

        let records = rows
            .into_iter()
            .map(|row| PreviewRecord::from_row(kind, row))
            .collect();
        let set = PreviewSet::ordered(kind, records, false, filters.order());

        let bytes = serialize_previews(set.records()).map_err(CacheError::from)?;
        self.cache.set(&cache_key, &bytes, Some(self.ttl)).await?;

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::MockCountSource;
    use crate::cache::MemoryCache;
    use crate::invalidation::InvalidationBus;
    use chrono::{DateTime, TimeZone, Utc};
    use chrono::Duration as ChronoDuration;
    use pauz_core::preview::{SortOrder, PREVIEW_MAX_CHARS};

    struct Fixture {
        relational: Arc<MockCountSource>,
        object_store: Arc<MockCountSource>,
        cache: Arc<MemoryCache>,
        aggregator: PreviewAggregator,
    }

    fn fixture() -> Fixture {
        let relational = Arc::new(MockCountSource::new());
        let object_store = Arc::new(MockCountSource::new());
        let cache = Arc::new(MemoryCache::new(1000, 4));
        let sources = SourceSet::new(relational.clone(), object_store.clone());
        let aggregator = PreviewAggregator::new(cache.clone(), sources, Duration::from_secs(300));
        Fixture {
            relational,
            object_store,
            cache,
            aggregator,
        }
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, minute, 0).unwrap()
    }

    fn ids(set: &PreviewSet) -> Vec<Uuid> {
        set.iter().map(|record| record.id).collect()
    }

    #[tokio::test]
    async fn test_newest_first_with_id_tie_break() {
        let f = fixture();
        let user = Uuid::new_v4();
        let kind = ResourceKind::FreeJournal;
        f.relational.push_row(user, kind, Uuid::from_u128(3), "c", at(5));
        f.relational.push_row(user, kind, Uuid::from_u128(1), "a", at(9));
        f.relational.push_row(user, kind, Uuid::from_u128(2), "b", at(5));

        let set = f
            .aggregator
            .get_previews(user, kind, &PreviewFilters::default())
            .await
            .unwrap();

        assert_eq!(
            ids(&set),
            vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)]
        );
        assert!(!set.is_partial());
    }

    #[tokio::test]
    async fn test_repeated_calls_identical_and_cached() {
        let f = fixture();
        let user = Uuid::new_v4();
        let kind = ResourceKind::GardenEntry;
        for i in 0..5u128 {
            f.relational
                .push_row(user, kind, Uuid::from_u128(i), "note", at(10));
        }

        let filters = PreviewFilters::default();
        let first = f.aggregator.get_previews(user, kind, &filters).await.unwrap();
        let second = f.aggregator.get_previews(user, kind, &filters).await.unwrap();

        assert_eq!(ids(&first), ids(&second));
        assert_eq!(f.relational.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_routes_guided_journals_to_object_store() {
        let f = fixture();
        let user = Uuid::new_v4();
        f.object_store.push_row(
            user,
            ResourceKind::GuidedJournal,
            Uuid::new_v4(),
            "Gratitude",
            at(1),
        );

        let set = f
            .aggregator
            .get_previews(user, ResourceKind::GuidedJournal, &PreviewFilters::default())
            .await
            .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(f.object_store.list_calls(), 1);
        assert_eq!(f.relational.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_content_is_bounded_literal_prefix() {
        let f = fixture();
        let user = Uuid::new_v4();
        let kind = ResourceKind::FreeJournal;
        let long = "é".repeat(PREVIEW_MAX_CHARS + 1);
        f.relational.push_row(user, kind, Uuid::new_v4(), &long, at(1));
        f.relational.push_row(user, kind, Uuid::new_v4(), "short", at(2));

        let set = f
            .aggregator
            .get_previews(user, kind, &PreviewFilters::default())
            .await
            .unwrap();

        let short = &set.records()[0];
        assert_eq!(short.content, "short");
        assert!(!short.truncated);

        let truncated = &set.records()[1];
        assert_eq!(truncated.content.chars().count(), PREVIEW_MAX_CHARS);
        assert!(long.starts_with(&truncated.content));
        assert!(truncated.truncated);
    }

    #[tokio::test]
    async fn test_filters_are_cached_separately() {
        let f = fixture();
        let user = Uuid::new_v4();
        let kind = ResourceKind::FreeJournal;
        for i in 0..3u128 {
            f.relational.push_row(user, kind, Uuid::from_u128(i), "x", at(i as u32));
        }

        let two = PreviewFilters::new(2).unwrap();
        let three = PreviewFilters::new(3).unwrap();
        assert_eq!(f.aggregator.get_previews(user, kind, &two).await.unwrap().len(), 2);
        assert_eq!(f.aggregator.get_previews(user, kind, &three).await.unwrap().len(), 3);
        assert_eq!(f.relational.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_every_filter_set_gets_its_own_entry() {
        let f = fixture();
        let user = Uuid::new_v4();
        let kind = ResourceKind::FreeJournal;
        f.relational.push_row(user, kind, Uuid::from_u128(1), "Rainy morning", at(1));
        f.relational.push_row(user, kind, Uuid::from_u128(2), "Sunny noon", at(20));
        f.relational.push_row(user, kind, Uuid::from_u128(3), "rain at night", at(40));

        let filter_sets = [
            PreviewFilters::default(),
            PreviewFilters::default().with_search(Some("rain")),
            PreviewFilters::default()
                .with_date_range(Some(at(10)), Some(at(30)))
                .unwrap(),
            PreviewFilters::default().with_order(SortOrder::OldestFirst),
        ];
        let mut results = Vec::new();
        for filters in &filter_sets {
            results.push(ids(&f.aggregator.get_previews(user, kind, filters).await.unwrap()));
        }
        assert_eq!(f.relational.list_calls(), filter_sets.len());
        assert_eq!(
            results,
            vec![
                vec![Uuid::from_u128(3), Uuid::from_u128(2), Uuid::from_u128(1)],
                vec![Uuid::from_u128(3), Uuid::from_u128(1)],
                vec![Uuid::from_u128(2)],
                vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)],
            ]
        );

        // Served from cache, in the order each filter set asked for.
        for (filters, expected) in filter_sets.iter().zip(&results) {
            let set = f.aggregator.get_previews(user, kind, filters).await.unwrap();
            assert_eq!(&ids(&set), expected);
            assert_eq!(set.order(), filters.order());
        }
        assert_eq!(f.relational.list_calls(), filter_sets.len());

        let evicted = InvalidationBus::new(f.cache.clone())
            .on_mutation(user, kind)
            .await;
        assert_eq!(evicted, filter_sets.len());

        for filters in &filter_sets {
            f.aggregator.get_previews(user, kind, filters).await.unwrap();
        }
        assert_eq!(f.relational.list_calls(), 2 * filter_sets.len());
    }

    #[tokio::test]
    async fn test_date_bounds_are_inclusive() {
        let f = fixture();
        let user = Uuid::new_v4();
        let kind = ResourceKind::GardenEntry;
        let start = at(10);
        let end = start + ChronoDuration::minutes(5);
        f.relational.push_row(user, kind, Uuid::from_u128(1), "start", start);
        f.relational.push_row(user, kind, Uuid::from_u128(2), "end", end);
        f.relational.push_row(
            user,
            kind,
            Uuid::from_u128(3),
            "after",
            end + ChronoDuration::seconds(1),
        );

        let filters = PreviewFilters::default()
            .with_date_range(Some(start), Some(end))
            .unwrap();
        let set = f.aggregator.get_previews(user, kind, &filters).await.unwrap();
        assert_eq!(ids(&set), vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
    }

    #[tokio::test]
    async fn test_degraded_previews_are_not_cached() {
        let f = fixture();
        let user = Uuid::new_v4();
        let kind = ResourceKind::GuidedJournal;
        f.object_store
            .push_row(user, kind, Uuid::new_v4(), "topic", at(1));
        f.object_store.set_failing(true);

        let degraded = f
            .aggregator
            .get_previews(user, kind, &PreviewFilters::default())
            .await
            .unwrap();
        assert!(degraded.is_partial());
        assert!(degraded.is_empty());

        f.object_store.set_failing(false);
        let recovered = f
            .aggregator
            .get_previews(user, kind, &PreviewFilters::default())
            .await
            .unwrap();
        assert!(!recovered.is_partial());
        assert_eq!(recovered.len(), 1);
        assert_eq!(f.object_store.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidation_forces_recompute() {
        let f = fixture();
        let user = Uuid::new_v4();
        let kind = ResourceKind::FreeJournal;
        let filters = PreviewFilters::default();
        f.aggregator.get_previews(user, kind, &filters).await.unwrap();

        f.relational.push_row(user, kind, Uuid::new_v4(), "new", at(30));
        InvalidationBus::new(f.cache.clone())
            .on_mutation(user, kind)
            .await;

        let set = f.aggregator.get_previews(user, kind, &filters).await.unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(f.relational.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_other_kinds_stay_cached_after_mutation() {
        let f = fixture();
        let user = Uuid::new_v4();
        let filters = PreviewFilters::default();
        f.aggregator
            .get_previews(user, ResourceKind::GardenEntry, &filters)
            .await
            .unwrap();

        InvalidationBus::new(f.cache.clone())
            .on_mutation(user, ResourceKind::FreeJournal)
            .await;
        f.aggregator
            .get_previews(user, ResourceKind::GardenEntry, &filters)
            .await
            .unwrap();

        assert_eq!(f.relational.list_calls(), 1);
    }
}
