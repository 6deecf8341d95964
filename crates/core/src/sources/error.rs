use thiserror::Error;

use crate::journal::ResourceKind;

/// Errors raised by backing data sources.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source could not answer (connectivity loss, timeout, 4xx/5xx).
    /// Distinct from an empty result.
    #[error("Source unavailable ({source_name}): {reason}")]
    Unavailable {
        source_name: &'static str,
        reason: String,
    },
    /// The source was asked for a kind it does not hold.
    #[error("{source_name} does not serve {kind}")]
    UnsupportedKind {
        source_name: &'static str,
        kind: ResourceKind,
    },
}

impl SourceError {
    pub fn unavailable(source_name: &'static str, reason: impl Into<String>) -> Self {
        SourceError::Unavailable {
            source_name,
            reason: reason.into(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceError::Unavailable { .. })
    }
}

/// Result type for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;
