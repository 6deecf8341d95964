//! Read-through aggregators over the cache and the two backing sources.

use thiserror::Error;

use pauz_core::cache::{CacheError, CacheKeyError};

mod previews;
mod stats;
#[cfg(test)]
pub(crate) mod test_support;

pub use previews::PreviewAggregator;
pub use stats::StatsAggregator;

/// Errors surfaced by an aggregate read.
///
/// Source outages never appear here: they degrade the result instead.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    InvalidKey(#[from] CacheKeyError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}
