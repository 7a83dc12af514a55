//! Core library for `Folio`.
//!
//! Everything between the HTTP layer and the document store lives here:
//!
//! - [`renderer`]: picks a render mode from the file extension and turns
//!   markdown into HTML
//! - [`credentials`]: the YAML credential file and bcrypt verification
//! - [`session`]: per-visitor sessions with a signed-in identity and a
//!   one-shot flash message
//! - [`guard`]: the signed-in check protecting mutating actions
//! - [`documents`]: create, update, delete and view over a [`DocumentStore`]
//! - [`flash`]: the user-facing messages
//!
//! [`DocumentStore`]: folio_storage::DocumentStore

pub mod credentials;
pub mod documents;
pub mod error;
pub mod flash;
pub mod guard;
pub mod renderer;
pub mod session;
