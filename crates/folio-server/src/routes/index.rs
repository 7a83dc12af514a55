//! Home page: `GET /`

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Router};

use crate::error::AppError;
use crate::middleware::SessionContext;
use crate::routes::chrome;
use crate::state::AppState;
use crate::views;

/// Build the home page router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/favicon.ico", get(favicon))
}

/// Browsers ask for this on every page; answering here keeps the request
/// from reaching the document routes and replacing the pending flash.
async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// List every document.
async fn index(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Response, AppError> {
    let names = state.documents.list().await?;
    let chrome = chrome(&mut *session.lock().await);
    Ok(views::html_response(
        StatusCode::OK,
        views::index(&chrome, &names),
    ))
}
