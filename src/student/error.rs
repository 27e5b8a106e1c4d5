//! Error types for student record extraction.

use thiserror::Error;

use crate::session::AuthError;
use crate::transport::TransportError;

/// The extracted table rows did not yield a complete record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    /// A field needed to derive other fields was not in the page.
    #[error("student record is missing `{field}`")]
    MissingField {
        /// Record key that was absent.
        field: &'static str,
    },

    /// A combined field did not contain the expected separator.
    #[error("student record field `{field}` has no \" / \" separator (got: {value:?})")]
    MissingSeparator {
        /// Record key holding the combined value.
        field: &'static str,
        /// The value as extracted.
        value: String,
    },
}

/// Errors from fetching and extracting the student record.
#[derive(Debug, Error)]
pub enum StudentDataError {
    /// No active session.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Fetching the academic status page failed.
    #[error("failed to fetch academic status page: {0}")]
    Transport(#[from] TransportError),

    /// The page did not contain a complete record.
    #[error(transparent)]
    Malformed(#[from] MalformedRecord),
}
