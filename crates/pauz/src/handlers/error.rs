use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pauz_core::cache::CacheKeyError;
use pauz_core::journal::{JournalError, UnknownResourceKind};
use pauz_core::preview::{CursorError, PageSizeError};
use pauz_core::storage::{repository_error_to_status_code, RepositoryError};

use crate::aggregate::AggregateError;

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            return StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        }
        if let Some(aggregate_error) = self.0.downcast_ref::<AggregateError>() {
            return match aggregate_error {
                AggregateError::InvalidKey(_) => StatusCode::BAD_REQUEST,
                AggregateError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        if self.0.is::<CacheKeyError>()
            || self.0.is::<CursorError>()
            || self.0.is::<PageSizeError>()
            || self.0.is::<JournalError>()
        {
            return StatusCode::BAD_REQUEST;
        }
        if self.0.is::<UnknownResourceKind>() {
            return StatusCode::NOT_FOUND;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::warn!(status = %status_code, error = %self.0, "Request failed");
        }

        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pauz_core::cache::CacheError;

    fn status_of(err: impl Into<anyhow::Error>) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_repository_errors_use_core_mapping() {
        assert_eq!(
            status_of(RepositoryError::not_found("FreeJournal", "1")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RepositoryError::ConnectionFailed("down".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_invalid_key_is_bad_request() {
        let err = AggregateError::InvalidKey(CacheKeyError::LimitOutOfRange { limit: 0, max: 200 });
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(CursorError("garbage".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(PageSizeError { size: 0, max: 200 }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_cache_failure_is_internal_error() {
        let err = AggregateError::Cache(CacheError::OperationFailed("poisoned".to_string()));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            status_of(anyhow::anyhow!("anything else")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unknown_kind_is_not_found() {
        assert_eq!(
            status_of(UnknownResourceKind("notes".to_string())),
            StatusCode::NOT_FOUND
        );
    }
}
