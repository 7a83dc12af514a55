//! Signed-in check for protected actions.
//!
//! The guard never fails. It returns a [`Guard`] that every protected
//! handler inspects before touching the document store.

use crate::flash;
use crate::session::Session;

/// Outcome of [`require_signed_in`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Guard {
    /// The visitor is signed in; carry on.
    Allowed,
    /// The visitor is signed out. A flash has been set and the caller must
    /// redirect home without doing anything else.
    Denied,
}

impl Guard {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Let signed-in sessions through; for everyone else, queue the
/// "must be signed in" flash and return [`Guard::Denied`].
pub fn require_signed_in(session: &mut Session) -> Guard {
    if session.is_signed_in() {
        Guard::Allowed
    } else {
        session.set_flash(flash::SIGN_IN_REQUIRED);
        Guard::Denied
    }
}
