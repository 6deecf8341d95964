use thiserror::Error;

use crate::journal::JournalError;
use crate::sources::SourceError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

impl From<SourceError> for RepositoryError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Unavailable { .. } => RepositoryError::ConnectionFailed(err.to_string()),
            SourceError::UnsupportedKind { .. } => RepositoryError::QueryFailed(err.to_string()),
        }
    }
}

impl From<JournalError> for RepositoryError {
    fn from(err: JournalError) -> Self {
        RepositoryError::InvalidData(err.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
