//! Authenticated session state and the portal client.
//!
//! A [`Session`] is an immutable `{ id, username }` value. The
//! [`UnisysClient`] holds at most one, swapping it in on a successful login
//! and out on a failed one, so the id and the username are always set or
//! cleared together.

mod client;
mod config;
mod error;

use std::fmt;

pub use client::UnisysClient;
pub use config::ClientConfig;
pub use error::AuthError;

/// Marker preceding the session id in the login redirect.
pub const SESSION_ID_MARKER: &str = "session_id=";

/// An authenticated portal session.
///
/// The id is redacted in `Debug` output; avoid logging [`Session::id`].
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    username: String,
}

impl Session {
    /// Creates a session value.
    #[must_use]
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }

    /// The opaque session id issued by the portal.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The user id the session was opened for.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &"[REDACTED]")
            .field("username", &self.username)
            .finish()
    }
}

/// Extracts the session id from a login redirect `Location` value: everything
/// after the first `session_id=`, including any trailing parameters.
///
/// ```
/// use unisys_core::session::session_id_from_location;
///
/// assert_eq!(session_id_from_location("main.asp?session_id=ABC123"), Some("ABC123"));
/// assert_eq!(session_id_from_location("login.asp?err=1"), None);
/// ```
#[must_use]
pub fn session_id_from_location(location: &str) -> Option<&str> {
    location
        .split_once(SESSION_ID_MARKER)
        .map(|(_, session_id)| session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_location_takes_rest_after_first_marker() {
        assert_eq!(
            session_id_from_location("https://unisys.uii.ac.id/uii-lia/x?session_id=ABC123"),
            Some("ABC123")
        );
        assert_eq!(
            session_id_from_location("x?session_id=A&next=session_id=B"),
            Some("A&next=session_id=B")
        );
    }

    #[test]
    fn test_session_id_from_location_without_marker() {
        assert_eq!(session_id_from_location("https://unisys.uii.ac.id/"), None);
        assert_eq!(session_id_from_location(""), None);
    }

    #[test]
    fn test_session_debug_redacts_id() {
        let session = Session::new("SECRET-TOKEN", "12523001");
        let debug = format!("{session:?}");
        assert!(!debug.contains("SECRET-TOKEN"));
        assert!(debug.contains("12523001"));
    }
}
