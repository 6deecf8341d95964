use std::sync::Arc;

use uuid::Uuid;

use pauz_core::cache::{
    pattern_matches, Cache, InvalidationEvent, InvalidationRules, InvalidationTarget,
};
use pauz_core::journal::ResourceKind;

/// Turns committed mutations into cache evictions.
///
/// Call sites only say which user and kinds changed; the [`InvalidationRules`]
/// table decides which keys go. Calls must happen after the write commits and
/// before the request returns.
#[derive(Clone)]
pub struct InvalidationBus {
    cache: Arc<dyn Cache>,
    rules: Arc<InvalidationRules>,
}

impl InvalidationBus {
    /// Creates a bus with the default rules.
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::with_rules(cache, InvalidationRules::default())
    }

    pub fn with_rules(cache: Arc<dyn Cache>, rules: InvalidationRules) -> Self {
        Self {
            cache,
            rules: Arc::new(rules),
        }
    }

    /// Evicts everything derived from `kind` for `user_id`.
    pub async fn on_mutation(&self, user_id: Uuid, kind: ResourceKind) -> usize {
        self.publish(InvalidationEvent::single(user_id, kind)).await
    }

    /// Evicts everything derived from the event's kinds in a single pass.
    ///
    /// Never fails: the write has already committed, so a cache error is
    /// logged and the entry ages out with its TTL.
    pub async fn publish(&self, event: InvalidationEvent) -> usize {
        let patterns = self.rules.patterns_for(&event);
        if patterns.is_empty() {
            return 0;
        }

        let matches_any = |key: &str| patterns.iter().any(|pattern| pattern_matches(pattern, key));
        match self.cache.invalidate(&matches_any).await {
            Ok(removed) => {
                tracing::debug!(
                    user_id = %event.user_id,
                    kinds = ?event.kinds,
                    removed,
                    "Invalidated cache"
                );
                removed
            }
            Err(err) => {
                tracing::warn!(
                    user_id = %event.user_id,
                    kinds = ?event.kinds,
                    error = %err,
                    "Failed to invalidate cache"
                );
                0
            }
        }
    }

    /// Drops every cached value for a user.
    pub async fn invalidate_user(&self, user_id: Uuid) -> pauz_core::cache::Result<usize> {
        let pattern = InvalidationTarget::Everything.pattern(user_id);
        let removed = self.cache.delete_pattern(&pattern).await?;
        tracing::debug!(%user_id, removed, "Flushed user cache");
        Ok(removed)
    }

    /// Drops every cached value.
    pub async fn invalidate_all(&self) -> pauz_core::cache::Result<()> {
        self.cache.clear().await?;
        tracing::debug!("Flushed entire cache");
        Ok(())
    }
}
