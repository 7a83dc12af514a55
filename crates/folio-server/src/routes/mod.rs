//! HTTP route handlers.
//!
//! The route table is flat. Protected handlers run the signed-in guard
//! first and redirect home when it denies; expected failures become a flash
//! message plus a redirect or a 422 re-render.

pub mod auth;
pub mod documents;
pub mod index;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};

use folio_core::error::DocumentError;
use folio_core::flash;
use folio_core::session::Session;
use folio_storage::StorageError;

use crate::error::AppError;
use crate::state::AppState;
use crate::views::Chrome;

/// Build the application router with every route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(index::router())
        .merge(auth::router())
        .merge(documents::router())
}

/// `302 Found` back to the home page.
pub fn redirect_home() -> Response {
    (StatusCode::FOUND, [(LOCATION, "/")]).into_response()
}

/// Consume the pending flash and capture the identity for the layout.
pub fn chrome(session: &mut Session) -> Chrome {
    Chrome {
        flash: session.take_flash(),
        identity: session.identity().map(str::to_owned),
    }
}

/// Turn a failed document action into a flash and a redirect home. Store
/// outages are the exception and surface as a 500.
fn document_failure(
    session: &mut Session,
    name: &str,
    err: DocumentError,
) -> Result<Response, AppError> {
    tracing::debug!(document = %name, error = %err, "document action rejected");
    let message = match err {
        DocumentError::Storage(StorageError::NotFound { .. }) => flash::does_not_exist(name),
        DocumentError::Storage(StorageError::InvalidName { .. }) => flash::invalid_name(name),
        DocumentError::UnsupportedType { .. } => flash::cannot_display(name),
        DocumentError::NameRequired => flash::NAME_REQUIRED.to_owned(),
        DocumentError::Storage(inner) => return Err(AppError::StorageUnavailable(inner)),
    };
    session.set_flash(message);
    Ok(redirect_home())
}
