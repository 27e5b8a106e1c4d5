//! Error types for authentication and session-gated calls.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors from authenticating or from calls that need a session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials rejected, or the login redirect carried no session id.
    /// The session is cleared when this is returned.
    #[error("not authenticated: the portal did not issue a session id")]
    NotAuthenticated,

    /// A session-only call was made before a successful authentication.
    #[error("no active session; authenticate first")]
    NoSession,

    /// The login request itself failed.
    #[error("login request failed: {0}")]
    Transport(#[from] TransportError),
}
