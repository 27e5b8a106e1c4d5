//! Per-request transport options.
//!
//! Every field is optional so a caller-supplied set can be layered over the
//! adapter defaults: whatever the caller sets wins, everything else falls
//! through to [`RequestOptions::defaults`].

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::user_agent::LEGACY_BROWSER_USER_AGENT;

/// Location of the bundled trusted-root file (PEM), relative to an
/// installation root.
pub const DEFAULT_CA_BUNDLE: &str = "libraries/certificate";

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default overall request timeout (5 minutes).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Finds the bundled trust roots: [`DEFAULT_CA_BUNDLE`] next to the running
/// executable, then under the working directory.
///
/// Returns `None` when neither exists, in which case requests use the
/// built-in root store. An explicitly configured bundle is never looked up
/// here and must exist.
#[must_use]
pub fn default_ca_bundle() -> Option<PathBuf> {
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let cwd = env::current_dir().ok();
    find_ca_bundle(exe_dir.into_iter().chain(cwd))
}

fn find_ca_bundle(roots: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    roots
        .into_iter()
        .map(|root| root.join(DEFAULT_CA_BUNDLE))
        .find(|candidate| candidate.is_file())
}

/// Transport options for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Follow `3xx` redirects automatically.
    pub follow_redirects: Option<bool>,
    /// PEM bundle of trusted roots for TLS targets. `Some(None)` disables
    /// the bundle even when the defaults name one.
    pub ca_bundle: Option<Option<PathBuf>>,
    /// `User-Agent` request header.
    pub user_agent: Option<String>,
    /// Prepend the response header section to the returned bytes.
    pub include_headers: Option<bool>,
    /// Read and return the response body.
    pub include_body: Option<bool>,
    /// Trace every response header line at debug level.
    pub verbose: Option<bool>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Overall request timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// The adapter defaults: no redirect following, the bundled CA file when
    /// one is installed (see [`default_ca_bundle`]) and the legacy browser
    /// user agent.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            follow_redirects: Some(false),
            ca_bundle: Some(default_ca_bundle()),
            user_agent: Some(LEGACY_BROWSER_USER_AGENT.to_string()),
            include_headers: Some(false),
            include_body: Some(true),
            verbose: Some(false),
            connect_timeout: Some(Duration::from_secs(CONNECT_TIMEOUT_SECS)),
            timeout: Some(Duration::from_secs(READ_TIMEOUT_SECS)),
        }
    }

    /// Flags for a body-only fetch: no header section, body included.
    #[must_use]
    pub fn body_only() -> Self {
        Self {
            include_headers: Some(false),
            include_body: Some(true),
            ..Self::default()
        }
    }

    /// Flags for a header-only fetch: header section included, no body,
    /// verbose tracing on.
    #[must_use]
    pub fn headers_only() -> Self {
        Self {
            include_headers: Some(true),
            include_body: Some(false),
            verbose: Some(true),
            ..Self::default()
        }
    }

    /// Layers `self` over `defaults`; fields set on `self` take precedence.
    #[must_use]
    pub fn merged_over(&self, defaults: &Self) -> Self {
        Self {
            follow_redirects: self.follow_redirects.or(defaults.follow_redirects),
            ca_bundle: self.ca_bundle.clone().or_else(|| defaults.ca_bundle.clone()),
            user_agent: self.user_agent.clone().or_else(|| defaults.user_agent.clone()),
            include_headers: self.include_headers.or(defaults.include_headers),
            include_body: self.include_body.or(defaults.include_body),
            verbose: self.verbose.or(defaults.verbose),
            connect_timeout: self.connect_timeout.or(defaults.connect_timeout),
            timeout: self.timeout.or(defaults.timeout),
        }
    }

    /// Effective redirect policy (off unless explicitly enabled).
    #[must_use]
    pub fn follows_redirects(&self) -> bool {
        self.follow_redirects.unwrap_or(false)
    }

    /// Effective CA bundle path, if any.
    #[must_use]
    pub fn ca_bundle_path(&self) -> Option<&PathBuf> {
        self.ca_bundle.as_ref().and_then(Option::as_ref)
    }

    /// Whether the header section is part of the returned bytes.
    #[must_use]
    pub fn includes_headers(&self) -> bool {
        self.include_headers.unwrap_or(false)
    }

    /// Whether the body is read and returned.
    #[must_use]
    pub fn includes_body(&self) -> bool {
        self.include_body.unwrap_or(true)
    }

    /// Whether verbose header tracing is on.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }
}
