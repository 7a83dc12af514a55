//! User-facing flash messages.
//!
//! Tests and handlers match on these exact strings.

/// Shown when a signed-out visitor attempts a protected action.
pub const SIGN_IN_REQUIRED: &str = "You must be signed in to do that.";
/// Shown after a successful sign-in.
pub const WELCOME: &str = "Welcome!";
/// Shown when the submitted credentials do not match.
pub const INVALID_CREDENTIALS: &str = "Invalid Credentials";
/// Shown after signing out.
pub const SIGNED_OUT: &str = "You have been signed out.";
/// Shown when a new document is submitted without a name.
pub const NAME_REQUIRED: &str = "A name is required";
/// Shown when the store cannot be reached.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

#[must_use]
pub fn does_not_exist(name: &str) -> String {
    format!("{name} does not exist.")
}

#[must_use]
pub fn created(name: &str) -> String {
    format!("{name} has been created")
}

#[must_use]
pub fn deleted(name: &str) -> String {
    format!("{name} has been deleted")
}

#[must_use]
pub fn updated(name: &str) -> String {
    format!("The {name} file has been updated successfully")
}

#[must_use]
pub fn cannot_display(name: &str) -> String {
    format!("{name} cannot be displayed.")
}

#[must_use]
pub fn invalid_name(name: &str) -> String {
    format!("{name} is not a valid document name.")
}
