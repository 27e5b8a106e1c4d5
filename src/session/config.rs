//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::endpoints::BASE_URL;
use crate::transport::{
    CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, RequestOptions, default_ca_bundle,
};
use crate::user_agent::LEGACY_BROWSER_USER_AGENT;

/// Settings the client's default request options are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Portal origin; endpoint paths are appended to it.
    pub base_url: String,
    /// PEM bundle of trusted roots for `https` targets; it replaces the
    /// built-in root store. `None` uses the built-in store. Defaults to the
    /// installed bundle, if any.
    pub ca_bundle: Option<PathBuf>,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Overall request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            ca_bundle: default_ca_bundle(),
            user_agent: LEGACY_BROWSER_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Replaces the portal origin.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces (or, with `None`, disables) the CA bundle.
    #[must_use]
    pub fn with_ca_bundle(mut self, ca_bundle: Option<PathBuf>) -> Self {
        self.ca_bundle = ca_bundle;
        self
    }

    /// Replaces the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replaces both timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout: Duration, timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.timeout = timeout;
        self
    }

    /// Default request options derived from this configuration: redirects
    /// off, configured trust roots, user agent and timeouts.
    #[must_use]
    pub fn default_options(&self) -> RequestOptions {
        RequestOptions {
            ca_bundle: Some(self.ca_bundle.clone()),
            user_agent: Some(self.user_agent.clone()),
            connect_timeout: Some(self.connect_timeout),
            timeout: Some(self.timeout),
            ..RequestOptions::defaults()
        }
    }
}
