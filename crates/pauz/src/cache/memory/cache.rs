//! In-memory cache implementation with TTL expiry and LRU bound.
//!
//! Keys are spread over independently locked shards chosen by the user
//! segment of the key, so requests for different users never wait on the
//! same lock. Expiry is checked on every read; the sweeper only reclaims
//! memory.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use pauz_core::cache::{Cache, CacheDiagnostics, CacheKey, KeyPredicate, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    inserted_at: Instant,
    ttl: Option<Duration>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl,
        }
    }

    /// Returns true once the entry is older than its TTL.
    fn is_expired(&self, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(self.inserted_at) > ttl)
    }
}

type Shard = RwLock<LruCache<String, CacheEntry>>;

/// Sharded in-memory cache with lazy TTL expiry.
///
/// Each shard is an `LruCache` behind its own `tokio::sync::RwLock`. The LRU
/// capacity is only a memory bound: TTL expiry is what keeps values fresh.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    shards: Arc<[Shard]>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries`, split over `shards` locks.
    ///
    /// A shard count of 0 is treated as 1.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize, shards: usize) -> Self {
        assert!(max_entries > 0, "max_entries must be > 0");
        let shard_count = shards.clamp(1, max_entries);
        let per_shard = NonZeroUsize::new(max_entries.div_ceil(shard_count))
            .unwrap_or(NonZeroUsize::MIN);

        let shards: Vec<Shard> = (0..shard_count)
            .map(|_| RwLock::new(LruCache::new(per_shard)))
            .collect();

        Self {
            shards: shards.into(),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Picks the shard owning a key. Keys of one user always share a shard.
    fn shard_for(&self, key: &str) -> &Shard {
        let mut hasher = DefaultHasher::new();
        match CacheKey::parse(key) {
            Some(parsed) => parsed.user_id().hash(&mut hasher),
            None => key.hash(&mut hasher),
        }
        let index = (hasher.finish() % self.shards.len() as u64) as usize;
        &self.shards[index]
    }

    fn record(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut shard = self.shard_for(key).write().await;
        let now = Instant::now();

        let value = match shard.get(key) {
            Some(entry) if entry.is_expired(now) => {
                shard.pop(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        };
        drop(shard);

        self.record(value.is_some());
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let entry = CacheEntry::new(value.to_vec(), ttl);
        let mut shard = self.shard_for(key).write().await;
        shard.put(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut shard = self.shard_for(key).write().await;
        shard.pop(key);
        Ok(())
    }

    async fn invalidate(&self, predicate: KeyPredicate<'_>) -> Result<usize> {
        let mut removed = 0;
        for shard in self.shards.iter() {
            let mut shard = shard.write().await;
            let keys_to_delete: Vec<String> = shard
                .iter()
                .filter(|(key, _)| predicate(key))
                .map(|(key, _)| key.clone())
                .collect();
            for key in keys_to_delete {
                shard.pop(&key);
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn clear(&self) -> Result<()> {
        for shard in self.shards.iter() {
            shard.write().await.clear();
        }
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let mut removed = 0;
        for shard in self.shards.iter() {
            let mut shard = shard.write().await;
            let now = Instant::now();
            let expired: Vec<String> = shard
                .iter()
                .filter(|(_, entry)| entry.is_expired(now))
                .map(|(key, _)| key.clone())
                .collect();
            for key in expired {
                shard.pop(&key);
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn diagnostics(&self) -> Result<CacheDiagnostics> {
        let mut entry_count = 0;
        for shard in self.shards.iter() {
            let shard = shard.read().await;
            let now = Instant::now();
            entry_count += shard
                .iter()
                .filter(|(_, entry)| !entry.is_expired(now))
                .count();
        }

        Ok(CacheDiagnostics::new(
            entry_count,
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        ))
    }
}
