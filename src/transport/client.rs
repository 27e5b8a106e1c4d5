//! reqwest-backed [`HttpTransport`] implementation.
//!
//! A client is built per request because redirect policy, user agent, trust
//! roots and timeouts are all per-request options.
//!
//! The header section handed back for header-only requests is rebuilt from
//! the parsed response (status line, then one `name: value` line per field)
//! rather than passed through byte for byte. Names come back lowercase and
//! folded lines arrive already joined.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, Method, StatusCode, Version};
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::TransportError;
use super::response::RawResponse;
use super::{HttpTransport, TransportRequest, redact_session_id};

/// Production transport over `reqwest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    /// Creates the transport.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(level = "debug", skip_all, fields(url = %redact_session_id(request.url.as_str())))]
    async fn execute(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let display_url = redact_session_id(request.url.as_str());
        let client = build_client(&request).await?;

        let method = request_method(&request);
        debug!(%method, post_fields = request.post_fields.len(), "sending request");

        let mut builder = client.request(method, request.url.clone());
        if !request.post_fields.is_empty() {
            builder = builder.form(&request.post_fields);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(display_url.clone(), e))?;

        let head = render_head(&response);
        debug!(status = response.status().as_u16(), "response received");
        if request.options.is_verbose() {
            for line in head.lines() {
                debug!(line = %redact_session_id(line), "response header");
            }
        }

        let mut bytes = Vec::new();
        if request.options.includes_headers() {
            bytes.extend_from_slice(head.as_bytes());
        }
        if request.options.includes_body() {
            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::from_reqwest(display_url, e))?;
            bytes.extend_from_slice(&body);
        }

        Ok(RawResponse::new(bytes))
    }
}

/// POST when form fields are present; otherwise HEAD for header-only
/// requests and GET for everything else.
fn request_method(request: &TransportRequest) -> Method {
    if !request.post_fields.is_empty() {
        Method::POST
    } else if request.options.includes_body() {
        Method::GET
    } else {
        Method::HEAD
    }
}

/// Renders the status line and header fields as CRLF-terminated text,
/// ending with the blank separator line.
fn render_head(response: &reqwest::Response) -> String {
    let status = response.status();
    let mut head = format!(
        "{} {} {}\r\n",
        version_label(response.version()),
        status.as_u16(),
        reason_phrase(status, response.extensions().get::<ReasonPhrase>())
    );
    for (name, value) in response.headers() {
        let _ = write!(
            head,
            "{}: {}\r\n",
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes())
        );
    }
    head.push_str("\r\n");
    head
}

/// The reason phrase the server sent. hyper only records it when it differs
/// from the canonical one, so the canonical text stands in otherwise.
fn reason_phrase(status: StatusCode, sent: Option<&ReasonPhrase>) -> Cow<'_, str> {
    match sent {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()),
        None => Cow::Borrowed(status.canonical_reason().unwrap_or_default()),
    }
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/1.1",
    }
}

/// Which roots a request trusts.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TrustStore {
    /// The platform/built-in root store.
    BuiltIn,
    /// Only the certificates in this PEM bundle.
    BundleOnly(PathBuf),
}

/// A configured bundle replaces the built-in roots for `https` targets;
/// plain-HTTP targets never read it.
fn trust_store(request: &TransportRequest) -> TrustStore {
    match request.options.ca_bundle_path() {
        Some(path) if uses_tls(&request.url) => TrustStore::BundleOnly(path.clone()),
        _ => TrustStore::BuiltIn,
    }
}

async fn build_client(request: &TransportRequest) -> Result<Client, TransportError> {
    let certificate = match trust_store(request) {
        TrustStore::BundleOnly(path) => Some(load_certificate(&path).await?),
        TrustStore::BuiltIn => None,
    };

    match try_build_client(request, certificate.clone(), false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed environments panic while reading system proxy
            // settings; retry without system proxy lookup.
            warn!("HTTP client builder panicked while loading system proxy settings; retrying without proxy lookup");
            match try_build_client(request, certificate, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Build(source)) => Err(TransportError::Client { source }),
                Err(BuildClientFailure::Panic) => Err(TransportError::ClientPanicked),
            }
        }
        Err(BuildClientFailure::Build(source)) => Err(TransportError::Client { source }),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(
    request: &TransportRequest,
    certificate: Option<reqwest::Certificate>,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    catch_unwind(AssertUnwindSafe(|| {
        let mut builder = base_client_builder(request, certificate);
        if disable_system_proxy_lookup {
            builder = builder.no_proxy();
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_client_builder(
    request: &TransportRequest,
    certificate: Option<reqwest::Certificate>,
) -> ClientBuilder {
    let options = &request.options;
    let redirect = if options.follows_redirects() {
        Policy::default()
    } else {
        Policy::none()
    };

    // Header-only requests skip `Accept-Encoding` so the returned header
    // section keeps the server's Content-Encoding/Content-Length.
    let mut builder = Client::builder()
        .redirect(redirect)
        .gzip(options.includes_body());
    if let Some(user_agent) = options.user_agent.as_deref() {
        builder = builder.user_agent(user_agent);
    }
    if let Some(connect_timeout) = options.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(certificate) = certificate {
        builder = builder.tls_certs_only([certificate]);
    }
    builder
}

fn uses_tls(url: &Url) -> bool {
    url.scheme() == "https"
}

async fn load_certificate(path: &Path) -> Result<reqwest::Certificate, TransportError> {
    let pem = tokio::fs::read(path)
        .await
        .map_err(|e| TransportError::ca_bundle(path, e.to_string()))?;
    reqwest::Certificate::from_pem(&pem).map_err(|e| TransportError::ca_bundle(path, e.to_string()))
}
