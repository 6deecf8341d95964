use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{pattern_matches, Result};

/// Predicate over encoded cache keys, used by [`Cache::invalidate`].
pub type KeyPredicate<'a> = &'a (dyn Fn(&str) -> bool + Send + Sync);

/// Point-in-time counters describing cache effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheDiagnostics {
    /// Live (non-expired) entries.
    pub entry_count: usize,
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, or 0.0 before the first lookup.
    pub hit_rate: f64,
}

impl CacheDiagnostics {
    pub fn new(entry_count: usize, hits: u64, misses: u64) -> Self {
        let lookups = hits + misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64
        };
        Self {
            entry_count,
            hits,
            misses,
            hit_rate,
        }
    }
}

/// Keyed byte store with per-entry expiry.
///
/// Implementations must check expiry when reading: an entry older than its
/// TTL is absent, whether or not a sweep has run.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a live value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every entry whose key satisfies the predicate. Returns the number removed.
    async fn invalidate(&self, predicate: KeyPredicate<'_>) -> Result<usize>;

    /// Removes every entry whose key matches a glob pattern (e.g. `user:{id}:*`).
    async fn delete_pattern(&self, pattern: &str) -> Result<usize> {
        let matches = |key: &str| pattern_matches(pattern, key);
        self.invalidate(&matches).await
    }

    /// Removes every entry.
    async fn clear(&self) -> Result<()>;

    /// Drops expired entries eagerly. Returns the number removed.
    async fn purge_expired(&self) -> Result<usize>;

    /// Returns entry and hit/miss counters.
    async fn diagnostics(&self) -> Result<CacheDiagnostics>;
}
