//! Per-visitor sessions.
//!
//! A [`Session`] holds at most one signed-in identity and at most one flash
//! message. Sessions live server-side in a [`SessionStore`] keyed by a
//! random [`SessionId`]; the HTTP layer carries only the id. A session that
//! has been idle longer than the store's TTL is treated as absent and is
//! removed by [`SessionStore::purge_expired`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

/// The only identity a session can be signed in as.
pub const ADMIN_IDENTITY: &str = "admin";

/// Opaque session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// State carried across requests for one visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<String>,
    flash: Option<String>,
}

impl Session {
    /// A session already signed in as [`ADMIN_IDENTITY`].
    #[must_use]
    pub fn signed_in() -> Self {
        Self {
            identity: Some(ADMIN_IDENTITY.to_owned()),
            flash: None,
        }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Mark the session as signed in. Whatever credential matched, the
    /// identity is always [`ADMIN_IDENTITY`].
    pub fn sign_in(&mut self) {
        self.identity = Some(ADMIN_IDENTITY.to_owned());
    }

    pub fn sign_out(&mut self) {
        self.identity = None;
    }

    /// Set the message for the next rendered page, replacing any pending one.
    pub fn set_flash(&mut self, message: impl Into<String>) {
        self.flash = Some(message.into());
    }

    /// Peek at the pending message without consuming it.
    #[must_use]
    pub fn flash(&self) -> Option<&str> {
        self.flash.as_deref()
    }

    /// Consume the pending message. Called once per rendered page.
    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }

    /// A session with no identity and no flash carries nothing worth storing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identity.is_none() && self.flash.is_none()
    }
}

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

/// Server-side table of live sessions.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create an empty store whose sessions expire after `ttl` of inactivity.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch a live session. Expired sessions are dropped and reported as
    /// absent.
    pub async fn load(&self, id: SessionId) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let expired = sessions
            .get(&id)
            .is_some_and(|entry| entry.last_seen.elapsed() >= self.ttl);
        if expired {
            sessions.remove(&id);
            return None;
        }
        sessions.get(&id).map(|entry| entry.session.clone())
    }

    /// Store `session` under `id` and refresh its idle timer. An empty
    /// session removes the entry instead.
    pub async fn save(&self, id: SessionId, session: Session) {
        let mut sessions = self.sessions.write().await;
        if session.is_empty() {
            sessions.remove(&id);
        } else {
            sessions.insert(
                id,
                Entry {
                    session,
                    last_seen: Instant::now(),
                },
            );
        }
    }

    /// Store a new session under a fresh id.
    pub async fn insert(&self, session: Session) -> SessionId {
        let id = SessionId::generate();
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            id,
            Entry {
                session,
                last_seen: Instant::now(),
            },
        );
        id
    }

    /// Drop every session idle for at least the TTL. Returns how many were
    /// removed.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < self.ttl);
        before.saturating_sub(sessions.len())
    }

    /// Number of stored sessions, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
