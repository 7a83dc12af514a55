//! HTTP error types for `Folio` server.
//!
//! Expected failures (missing documents, bad names, signed-out visitors)
//! never reach this type: handlers turn them into a flash message and a
//! redirect or a re-rendered form. [`AppError`] covers what is left, the
//! store or credential file being unavailable, and renders a generic 500
//! page while the cause goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use folio_core::error::DocumentError;
use folio_core::flash;
use folio_storage::StorageError;

use crate::views;

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The document store failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    /// Any other unexpected failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        views::html_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            views::error_page(flash::SOMETHING_WENT_WRONG),
        )
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Storage(inner) => Self::StorageUnavailable(inner),
            DocumentError::NameRequired | DocumentError::UnsupportedType { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failure_is_generic_500() {
        let err = AppError::from(StorageError::List {
            root: "/srv/secret/path".to_owned(),
            reason: "permission denied".to_owned(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            views::HTML_CONTENT_TYPE
        );
    }
}
