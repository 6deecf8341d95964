//! JSON encoding of aggregate values for cache storage.

use thiserror::Error;

use crate::preview::PreviewRecord;
use crate::stats::StatsSummary;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

impl From<SerializationError> for super::CacheError {
    fn from(err: SerializationError) -> Self {
        super::CacheError::Serialization(err.to_string())
    }
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

pub fn serialize_stats(stats: &StatsSummary) -> Result<Vec<u8>> {
    serde_json::to_vec(stats).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

pub fn deserialize_stats(bytes: &[u8]) -> Result<StatsSummary> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

pub fn serialize_previews(records: &[PreviewRecord]) -> Result<Vec<u8>> {
    serde_json::to_vec(records).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

pub fn deserialize_previews(bytes: &[u8]) -> Result<Vec<PreviewRecord>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
