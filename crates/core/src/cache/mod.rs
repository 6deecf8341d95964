mod error;
mod invalidation;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, CacheKeyError, Result};
pub use invalidation::{InvalidationEvent, InvalidationRules, InvalidationTarget};
pub use keys::{
    previews_key, previews_pattern, stats_key, user_pattern, CacheKey, FilterSignature,
};
pub use patterns::pattern_matches;
pub use serialization::{
    deserialize_previews, deserialize_stats, serialize_previews, serialize_stats,
    SerializationError,
};
pub use traits::{Cache, CacheDiagnostics, KeyPredicate};
