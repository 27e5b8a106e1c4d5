//! HTTP start-line recognition (request line and status line).

use std::sync::LazyLock;

use regex::Regex;

/// Synthetic header key holding a parsed [`RequestLine`].
pub const REQUEST_LINE_KEY: &str = "Request-Line";

/// Synthetic header key holding a parsed [`StatusLine`].
pub const STATUS_LINE_KEY: &str = "Status-Line";

/// `METHOD target HTTP/version`
#[allow(clippy::expect_used)]
static REQUEST_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+) (.*) HTTP/([\d.]+)$").expect("request line regex is valid") // Static pattern, safe to panic
});

/// `HTTP/version code reason`. The reason phrase may be empty (HTTP/2 omits it).
#[allow(clippy::expect_used)]
static STATUS_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^HTTP/([\d.]+) (\d+)(?: (.*))?$").expect("status line regex is valid") // Static pattern, safe to panic
});

/// Parsed `Request-Line` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// Request method as sent (e.g. `POST`).
    pub method: String,
    /// Request target.
    pub request_uri: String,
    /// Version digits after `HTTP/`.
    pub http_version: String,
}

impl RequestLine {
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let captures = REQUEST_LINE_PATTERN.captures(line)?;
        Some(Self {
            method: captures[1].to_string(),
            request_uri: captures[2].to_string(),
            http_version: captures[3].to_string(),
        })
    }
}

/// Parsed `Status-Line` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Version digits after `HTTP/`.
    pub http_version: String,
    /// Three-digit status code, kept as text.
    pub status_code: String,
    /// Reason phrase, empty when the server sent none.
    pub reason_phrase: String,
}

impl StatusLine {
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let captures = STATUS_LINE_PATTERN.captures(line)?;
        Some(Self {
            http_version: captures[1].to_string(),
            status_code: captures[2].to_string(),
            reason_phrase: captures
                .get(3)
                .map(|reason| reason.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    /// Status code as a number, when it parses.
    #[must_use]
    pub fn code(&self) -> Option<u16> {
        self.status_code.parse().ok()
    }
}
