//! Transport adapter for the portal.
//!
//! Every request goes to `base + path`, with `?session_id=<id>` appended when
//! a session is active. Caller options are layered over the adapter defaults
//! (no redirect following, bundled CA file, legacy browser user agent) and the
//! response comes back as raw bytes, exactly as received.
//!
//! The actual HTTP work is delegated to an [`HttpTransport`], so the adapter
//! can run against [`ReqwestTransport`] in production and an in-process fake
//! in tests.

mod client;
mod error;
mod options;
mod response;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use crate::header::{HeaderMap, parse_headers};

pub use client::ReqwestTransport;
pub use error::TransportError;
pub use options::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CA_BUNDLE, READ_TIMEOUT_SECS, RequestOptions, default_ca_bundle,
};
pub use response::RawResponse;

/// Query parameter carrying the session identifier.
pub const SESSION_QUERY_PARAM: &str = "session_id";

/// A fully prepared request: target URL, form fields and effective options.
#[derive(Clone)]
pub struct TransportRequest {
    /// Absolute target URL, session id already appended.
    pub url: Url,
    /// Form fields sent as a POST body when non-empty.
    pub post_fields: Vec<(String, String)>,
    /// Effective options (caller options merged over defaults).
    pub options: RequestOptions,
}

// Form fields carry the password; only their names are shown.
impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field_names: Vec<&str> = self.post_fields.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("TransportRequest")
            .field("url", &redact_session_id(self.url.as_str()))
            .field("post_fields", &field_names)
            .field("options", &self.options)
            .finish()
    }
}

/// The HTTP client capability the adapter depends on.
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Arc<dyn HttpTransport>`.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    /// Executes one request and returns the raw response bytes (header
    /// section and/or body, per the request options).
    async fn execute(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;
}

/// Issues requests against a fixed base URL.
#[derive(Debug, Clone)]
pub struct Transport {
    base_url: String,
    defaults: RequestOptions,
    http: Arc<dyn HttpTransport>,
}

impl Transport {
    /// Creates an adapter for `base_url`.
    ///
    /// A trailing `/` is added when missing so that paths are joined under it.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] when `base_url` does not parse
    /// as an absolute URL.
    pub fn new(
        base_url: &str,
        defaults: RequestOptions,
        http: Arc<dyn HttpTransport>,
    ) -> Result<Self, TransportError> {
        let parsed = Url::parse(base_url).map_err(|_| TransportError::invalid_url(base_url))?;
        let mut base_url = parsed.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self {
            base_url,
            defaults,
            http,
        })
    }

    /// The normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The default options caller options are merged over.
    #[must_use]
    pub fn defaults(&self) -> &RequestOptions {
        &self.defaults
    }

    /// Builds `base + path`, appending `?session_id=<id>` when `session_id` is set.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] when the result is not a valid URL.
    pub fn url_for(&self, path: &str, session_id: Option<&str>) -> Result<Url, TransportError> {
        let mut target = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        if let Some(id) = session_id {
            target.push('?');
            target.push_str(SESSION_QUERY_PARAM);
            target.push('=');
            target.push_str(id);
        }
        Url::parse(&target).map_err(|_| TransportError::invalid_url(redact_session_id(&target)))
    }

    /// Issues one request and returns the response as received.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the URL is invalid or the request fails.
    #[instrument(level = "debug", skip_all, fields(path = %path))]
    pub async fn request(
        &self,
        path: &str,
        post_fields: &[(&str, &str)],
        options: &RequestOptions,
        session_id: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        let request = TransportRequest {
            url: self.url_for(path, session_id)?,
            post_fields: post_fields
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
            options: options.merged_over(&self.defaults),
        };
        let response = self.http.execute(request).await?;
        debug!(bytes = response.len(), "request complete");
        Ok(response)
    }

    /// Body-only fetch: no header section in the returned bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request fails.
    pub async fn fetch_body(
        &self,
        path: &str,
        post_fields: &[(&str, &str)],
        session_id: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        self.request(path, post_fields, &RequestOptions::body_only(), session_id)
            .await
    }

    /// Header-only fetch, parsed into a [`HeaderMap`].
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request fails.
    pub async fn fetch_headers(
        &self,
        path: &str,
        post_fields: &[(&str, &str)],
        session_id: Option<&str>,
    ) -> Result<HeaderMap, TransportError> {
        let raw = self
            .request(path, post_fields, &RequestOptions::headers_only(), session_id)
            .await?;
        Ok(parse_headers(&raw.text()))
    }
}

/// Replaces the value of every `session_id=` occurrence with `[REDACTED]`.
///
/// Used wherever a URL or header line may reach logs or error messages.
#[must_use]
pub fn redact_session_id(text: &str) -> String {
    let marker = "session_id=";
    let mut redacted = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find(marker) {
        let value_start = idx + marker.len();
        redacted.push_str(&rest[..value_start]);
        redacted.push_str("[REDACTED]");
        let value_len = rest[value_start..]
            .find(['&', '#', ' ', '\r', '\n'])
            .unwrap_or(rest.len() - value_start);
        rest = &rest[value_start + value_len..];
    }
    redacted.push_str(rest);
    redacted
}
