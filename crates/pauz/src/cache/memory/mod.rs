//! In-memory cache backend implementation.
//!
//! Process-local TTL cache, reset to empty on restart.

mod cache;

pub use cache::MemoryCache;
