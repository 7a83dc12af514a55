//! Document routes: `/new_doc`, `/create_doc`, `/{file}`, `/{file}/edit`,
//! `/{file}/delete`
//!
//! Viewing is public. Everything else requires a signed-in session.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use serde::Deserialize;

use folio_core::error::DocumentError;
use folio_core::flash;
use folio_core::guard::{Guard, require_signed_in};
use folio_core::renderer::Rendered;

use crate::error::AppError;
use crate::middleware::SessionContext;
use crate::routes::{chrome, document_failure, redirect_home};
use crate::state::AppState;
use crate::views;

/// Build the document router.
///
/// Paths:
/// - `GET  /new_doc`: new document form
/// - `POST /create_doc`: create an empty document
/// - `GET  /{file}`: view
/// - `POST /{file}`: save edited content
/// - `GET  /{file}/edit`: edit form
/// - `POST /{file}/delete`: delete
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/new_doc", get(new_doc_form))
        .route("/create_doc", post(create_doc))
        .route("/{file}", get(view_doc).post(update_doc))
        .route("/{file}/edit", get(edit_form))
        .route("/{file}/delete", post(delete_doc))
}

// ── Forms ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewDocForm {
    pub new_doc_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateDocForm {
    pub content: String,
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn new_doc_form(Extension(session): Extension<SessionContext>) -> Response {
    let mut session = session.lock().await;
    if require_signed_in(&mut session) == Guard::Denied {
        return redirect_home();
    }
    let chrome = chrome(&mut session);
    views::html_response(StatusCode::OK, views::new_doc(&chrome, ""))
}

/// Create an empty document under the trimmed submitted name.
async fn create_doc(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<NewDocForm>,
) -> Result<Response, AppError> {
    let mut session = session.lock().await;
    if require_signed_in(&mut session) == Guard::Denied {
        return Ok(redirect_home());
    }

    match state.documents.create(&form.new_doc_name).await {
        Ok(name) => {
            session.set_flash(flash::created(&name));
            Ok(redirect_home())
        }
        Err(DocumentError::NameRequired) => {
            session.set_flash(flash::NAME_REQUIRED);
            let chrome = chrome(&mut session);
            Ok(views::html_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                views::new_doc(&chrome, &form.new_doc_name),
            ))
        }
        Err(err) => document_failure(&mut session, form.new_doc_name.trim(), err),
    }
}

/// Show a document: `.txt` as plain text, `.md` as HTML inside the layout.
async fn view_doc(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    let mut session = session.lock().await;
    match state.documents.view(&file).await {
        Ok(Rendered::PlainText(content)) => Ok(views::text_response(content)),
        Ok(Rendered::Html(html)) => {
            let chrome = chrome(&mut session);
            Ok(views::html_response(
                StatusCode::OK,
                views::document(&chrome, &file, &html),
            ))
        }
        Err(err) => document_failure(&mut session, &file, err),
    }
}

async fn edit_form(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    let mut session = session.lock().await;
    if require_signed_in(&mut session) == Guard::Denied {
        return Ok(redirect_home());
    }

    match state.documents.source(&file).await {
        Ok(content) => {
            let chrome = chrome(&mut session);
            Ok(views::html_response(
                StatusCode::OK,
                views::edit(&chrome, &file, &content),
            ))
        }
        Err(err) => document_failure(&mut session, &file, err),
    }
}

/// Overwrite a document with the submitted content.
async fn update_doc(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(file): Path<String>,
    Form(form): Form<UpdateDocForm>,
) -> Result<Response, AppError> {
    let mut session = session.lock().await;
    if require_signed_in(&mut session) == Guard::Denied {
        return Ok(redirect_home());
    }

    match state.documents.update(&file, &form.content).await {
        Ok(()) => {
            session.set_flash(flash::updated(&file));
            Ok(redirect_home())
        }
        Err(err) => document_failure(&mut session, &file, err),
    }
}

async fn delete_doc(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    let mut session = session.lock().await;
    if require_signed_in(&mut session) == Guard::Denied {
        return Ok(redirect_home());
    }

    match state.documents.delete(&file).await {
        Ok(()) => {
            session.set_flash(flash::deleted(&file));
            Ok(redirect_home())
        }
        Err(err) => document_failure(&mut session, &file, err),
    }
}
