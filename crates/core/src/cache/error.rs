use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache key could not be derived from the caller's input.
///
/// These indicate a bug or a bad request at the call site and are returned
/// to the caller, never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheKeyError {
    #[error("Invalid filter name: {0:?}")]
    InvalidFilterName(String),
    #[error("Duplicate filter: {0}")]
    DuplicateFilter(String),
    #[error("Preview limit {limit} out of range (1..={max})")]
    LimitOutOfRange { limit: usize, max: usize },
    #[error("Invalid value for filter {name}: {value:?}")]
    InvalidFilterValue { name: &'static str, value: String },
    #[error("Date range starts after it ends: {start} > {end}")]
    InvalidDateRange { start: String, end: String },
}
