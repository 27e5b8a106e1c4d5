//! Error types for the transport module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while issuing a request to the portal.
///
/// Non-success HTTP statuses are not errors here: the portal signals a
/// successful login with a redirect, so responses are always handed back
/// as received.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed (session id redacted).
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out (session id redacted).
        url: String,
    },

    /// The base URL or request path did not form a valid URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
    },

    /// The configured CA bundle could not be read or parsed.
    #[error("failed to load CA bundle {path}: {reason}")]
    CaBundle {
        /// Path of the PEM bundle.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The HTTP client could not be constructed from the request options.
    #[error("HTTP client construction failed: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client builder panicked even without system proxy lookup.
    #[error("HTTP client construction panicked while initializing networking")]
    ClientPanicked,
}

impl TransportError {
    /// Classifies a reqwest send/read error for `url`.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a CA bundle error.
    pub fn ca_bundle(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CaBundle {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_display() {
        let error = TransportError::invalid_url("not a url");
        assert_eq!(error.to_string(), "invalid URL: not a url");
    }

    #[test]
    fn test_ca_bundle_display_includes_path() {
        let error = TransportError::ca_bundle("/etc/unisys/certificate", "file not found");
        let msg = error.to_string();
        assert!(msg.contains("/etc/unisys/certificate"));
        assert!(msg.contains("file not found"));
    }
}
