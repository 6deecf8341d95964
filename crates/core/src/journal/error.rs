use thiserror::Error;

/// Returned when a string does not name a known resource kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown resource kind: {0}")]
pub struct UnknownResourceKind(pub String);

/// Errors raised by journal validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JournalError {
    #[error("Guided journal topic cannot be empty")]
    EmptyTopic,
    #[error("Garden entry {0} cannot be empty")]
    EmptyGardenField(&'static str),
    #[error("Journal content cannot be empty")]
    EmptyContent,
}
