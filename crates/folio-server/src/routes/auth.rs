//! Sign-in routes: `/sign_in`, `/sign_out`
//!
//! Any username present in the credential file signs the visitor in, and
//! always as the single `admin` identity.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use serde::Deserialize;

use folio_core::flash;

use crate::middleware::SessionContext;
use crate::routes::{chrome, redirect_home};
use crate::state::AppState;
use crate::views;

/// Build the sign-in router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sign_in", get(sign_in_form).post(sign_in))
        .route("/sign_out", post(sign_out))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignInForm {
    pub username: String,
    pub password: String,
}

async fn sign_in_form(Extension(session): Extension<SessionContext>) -> Response {
    let chrome = chrome(&mut *session.lock().await);
    views::html_response(StatusCode::OK, views::sign_in(&chrome, ""))
}

/// Check credentials; redirect home on success, re-render with 422 on
/// failure.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<SignInForm>,
) -> Response {
    let valid = state.credentials.verify(&form.username, &form.password).await;
    let mut session = session.lock().await;

    if valid {
        session.sign_in();
        session.set_flash(flash::WELCOME);
        tracing::info!(username = %form.username, "signed in");
        redirect_home()
    } else {
        session.set_flash(flash::INVALID_CREDENTIALS);
        tracing::warn!(username = %form.username, "sign-in rejected");
        let chrome = chrome(&mut session);
        views::html_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            views::sign_in(&chrome, &form.username),
        )
    }
}

async fn sign_out(Extension(session): Extension<SessionContext>) -> Response {
    let mut session = session.lock().await;
    session.sign_out();
    session.set_flash(flash::SIGNED_OUT);
    redirect_home()
}
