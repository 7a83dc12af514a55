//! Session middleware for `Folio`.
//!
//! Reads the `folio_session` cookie, loads the visitor's [`Session`] from
//! the session table (or starts a fresh one), and injects a
//! [`SessionContext`] into the request extensions. Once the handler has
//! produced a response the session is written back, and the cookie is set
//! when a session holding state has no cookie yet.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::{Mutex, MutexGuard};

use folio_core::session::{Session, SessionId};

use crate::state::AppState;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "folio_session";

/// The visitor's session for the duration of one request.
///
/// Cloning shares the same session; handlers lock it, read or mutate it,
/// and release it before returning.
#[derive(Debug, Clone)]
pub struct SessionContext {
    inner: Arc<Mutex<Session>>,
}

impl SessionContext {
    fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Lock the session for reading or mutation.
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().await
    }

    async fn snapshot(&self) -> Session {
        self.inner.lock().await.clone()
    }
}

/// Middleware that threads the visitor's session through the request.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_id = session_id_from_headers(req.headers());

    let loaded = match cookie_id {
        Some(id) => state.sessions.load(id).await,
        None => None,
    };
    // A stale or forged cookie gets a brand-new id rather than being revived.
    let (id, session, has_cookie) = match (cookie_id, loaded) {
        (Some(id), Some(session)) => (id, session, true),
        _ => (SessionId::generate(), Session::default(), false),
    };

    let ctx = SessionContext::new(session);
    req.extensions_mut().insert(ctx.clone());

    let mut response = next.run(req).await;

    let session = ctx.snapshot().await;
    let needs_cookie = !has_cookie && !session.is_empty();
    state.sessions.save(id, session).await;

    if needs_cookie {
        match HeaderValue::from_str(&session_cookie(id, state.secure_cookie)) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "failed to build session cookie"),
        }
    }

    response
}

/// Extract a well-formed session id from the `Cookie` headers, if any.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

fn session_cookie(id: SessionId, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
