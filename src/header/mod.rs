//! Raw HTTP header section parsing.
//!
//! Turns the header text returned by a header-only fetch into a
//! [`HeaderMap`] keyed by canonical (title-cased) header names. Repeated
//! header names are merged into an ordered sequence, and HTTP start lines are
//! recognized as the synthetic `Request-Line` / `Status-Line` entries.
//!
//! # Example
//!
//! ```
//! use unisys_core::header::parse_headers;
//!
//! let headers = parse_headers("HTTP/1.1 302 Found\r\nlocation: /main.asp?session_id=ABC\r\n\r\n");
//! assert_eq!(headers.first("Location"), Some("/main.asp?session_id=ABC"));
//! assert_eq!(headers.status_line().map(|s| s.status_code.as_str()), Some("302"));
//! ```

mod start_line;

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

pub use start_line::{REQUEST_LINE_KEY, RequestLine, STATUS_LINE_KEY, StatusLine};

/// CRLF followed by a run of tabs/spaces: a folded continuation line.
#[allow(clippy::expect_used)]
static FOLDED_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n[\t ]+").expect("folded header regex is valid") // Static pattern, safe to panic
});

/// A single entry of a [`HeaderMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    /// Header seen once.
    Single(String),
    /// Header seen more than once, values in arrival order.
    Multiple(Vec<String>),
    /// Parsed request line, stored under [`REQUEST_LINE_KEY`].
    RequestLine(RequestLine),
    /// Parsed status line, stored under [`STATUS_LINE_KEY`].
    StatusLine(StatusLine),
}

impl HeaderValue {
    /// Returns the first textual value, if this entry holds header text.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(values) => values.first().map(String::as_str),
            Self::RequestLine(_) | Self::StatusLine(_) => None,
        }
    }

    /// Returns every textual value in arrival order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
            Self::RequestLine(_) | Self::StatusLine(_) => Vec::new(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                let existing = std::mem::take(existing);
                *self = Self::Multiple(vec![existing, value]);
            }
            Self::Multiple(values) => values.push(value),
            // A field line whose name collides with a start-line key replaces it.
            Self::RequestLine(_) | Self::StatusLine(_) => *self = Self::Single(value),
        }
    }
}

/// Ordered mapping from canonical header name to [`HeaderValue`].
///
/// Insertion order is the order in which each name was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, HeaderValue)>,
}

impl HeaderMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an entry. `name` is canonicalized first, so any casing works.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        let key = canonical_header_name(name);
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value)
    }

    /// Returns the single value of a header, or the first of a repeated one.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(HeaderValue::first)
    }

    /// Returns all values recorded for a header (empty when absent).
    #[must_use]
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.get(name).map(HeaderValue::values).unwrap_or_default()
    }

    /// Returns `true` when an entry exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The parsed request line, when the header section contained one.
    #[must_use]
    pub fn request_line(&self) -> Option<&RequestLine> {
        match self.get(REQUEST_LINE_KEY) {
            Some(HeaderValue::RequestLine(line)) => Some(line),
            _ => None,
        }
    }

    /// The parsed status line, when the header section contained one.
    #[must_use]
    pub fn status_line(&self) -> Option<&StatusLine> {
        match self.get(STATUS_LINE_KEY) {
            Some(HeaderValue::StatusLine(line)) => Some(line),
            _ => None,
        }
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing was recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Appends a field value, merging repeats into a sequence.
    fn append(&mut self, name: String, value: String) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            existing.push(value);
        } else {
            self.entries.push((name, HeaderValue::Single(value)));
        }
    }

    /// Sets a start-line entry. A later start line overwrites an earlier one.
    fn set(&mut self, name: &str, value: HeaderValue) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(key, _)| key.as_str() == name) {
            *existing = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }
}

/// Parses a raw HTTP header section.
///
/// Folded continuation lines are joined with a single space, the text is
/// split on CRLF, and each line is tried as a `Name: value` field, then as a
/// request line, then as a status line. Anything else (the blank terminator
/// line, stray text) is ignored.
#[must_use]
pub fn parse_headers(raw: &str) -> HeaderMap {
    let unfolded = FOLDED_LINE_PATTERN.replace_all(raw, " ");
    let mut headers = HeaderMap::new();

    for line in unfolded.split("\r\n") {
        if let Some((name, value)) = split_field(line) {
            headers.append(canonical_header_name(name), value.trim().to_string());
        } else if let Some(request_line) = RequestLine::parse(line) {
            headers.set(REQUEST_LINE_KEY, HeaderValue::RequestLine(request_line));
        } else if let Some(status_line) = StatusLine::parse(line) {
            headers.set(STATUS_LINE_KEY, HeaderValue::StatusLine(status_line));
        } else if !line.is_empty() {
            trace!(line, "ignoring unrecognized header line");
        }
    }

    headers
}

/// Canonical header casing: lower-case, trimmed, and the first character of
/// each space/tab/hyphen separated word upper-cased.
///
/// ```
/// use unisys_core::header::canonical_header_name;
///
/// assert_eq!(canonical_header_name(" x-FOO-bar "), "X-Foo-Bar");
/// ```
#[must_use]
pub fn canonical_header_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut canonical = String::with_capacity(lowered.len());
    let mut at_word_start = true;

    for ch in lowered.chars() {
        if at_word_start {
            canonical.extend(ch.to_uppercase());
        } else {
            canonical.push(ch);
        }
        at_word_start = matches!(ch, '\t' | ' ' | '-');
    }

    canonical
}

/// Splits `Name: value` on the first colon. The name must be non-blank and the
/// value must contain at least one character after the colon.
fn split_field(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    if name.trim().is_empty() || value.is_empty() {
        return None;
    }
    Some((name, value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_header_name_title_cases_each_word() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("x-foo-bar"), "X-Foo-Bar");
        assert_eq!(canonical_header_name("SET-COOKIE"), "Set-Cookie");
        assert_eq!(canonical_header_name("www authenticate"), "Www Authenticate");
    }

    #[test]
    fn test_canonical_header_name_is_stable() {
        for name in ["x-FoO-bAr", "X-Foo-Bar", "x-foo-bar"] {
            let once = canonical_header_name(name);
            assert_eq!(once, "X-Foo-Bar");
            assert_eq!(canonical_header_name(&once), once);
        }
    }

    #[test]
    fn test_parse_headers_single_field() {
        let headers = parse_headers("Content-Type: text/html\r\n");
        assert_eq!(headers.len(), 1);
        assert_eq!(
            headers.get("Content-Type"),
            Some(&HeaderValue::Single("text/html".to_string()))
        );
    }

    #[test]
    fn test_parse_headers_lookup_is_case_insensitive() {
        let headers = parse_headers("LOCATION: main.asp\r\n");
        assert_eq!(headers.first("location"), Some("main.asp"));
        assert_eq!(headers.first("Location"), Some("main.asp"));
        assert!(headers.contains("lOcAtIoN"));
    }

    #[test]
    fn test_parse_headers_repeated_names_become_sequence() {
        let raw = "Set-Cookie: a=1; path=/\r\nset-cookie: b=2\r\nSet-Cookie: c=3\r\n";
        let headers = parse_headers(raw);
        assert_eq!(
            headers.get("Set-Cookie"),
            Some(&HeaderValue::Multiple(vec![
                "a=1; path=/".to_string(),
                "b=2".to_string(),
                "c=3".to_string(),
            ]))
        );
        assert_eq!(headers.first("Set-Cookie"), Some("a=1; path=/"));
        assert_eq!(headers.all("Set-Cookie").len(), 3);
    }

    #[test]
    fn test_parse_headers_folded_line_joined_with_single_space() {
        let raw = "X-Long: first part\r\n \t  second part\r\nServer: IIS\r\n";
        let headers = parse_headers(raw);
        assert_eq!(headers.first("X-Long"), Some("first part second part"));
        assert_eq!(headers.first("Server"), Some("IIS"));
    }

    #[test]
    fn test_parse_headers_value_with_colon_kept_whole() {
        let headers = parse_headers("Location: https://host:8443/x?session_id=a:b\r\n");
        assert_eq!(
            headers.first("Location"),
            Some("https://host:8443/x?session_id=a:b")
        );
    }

    #[test]
    fn test_parse_headers_status_line() {
        let headers = parse_headers("HTTP/1.1 302 Object moved\r\nLocation: x\r\n\r\n");
        let status = headers.status_line().unwrap();
        assert_eq!(status.http_version, "1.1");
        assert_eq!(status.status_code, "302");
        assert_eq!(status.reason_phrase, "Object moved");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_parse_headers_request_line() {
        let headers = parse_headers("POST /proseslogin.asp HTTP/1.0\r\nHost: unisys\r\n");
        let request = headers.request_line().unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.request_uri, "/proseslogin.asp");
        assert_eq!(request.http_version, "1.0");
        assert!(headers.status_line().is_none());
    }

    #[test]
    fn test_parse_headers_last_status_line_wins() {
        let raw = "HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 302 Found\r\nLocation: x\r\n\r\n";
        let headers = parse_headers(raw);
        assert_eq!(headers.status_line().unwrap().status_code, "302");
    }

    #[test]
    fn test_parse_headers_ignores_blank_and_garbage_lines() {
        let headers = parse_headers("\r\nnot a header line\r\n: no name\r\nEmpty:\r\n");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_parse_headers_trims_name_and_value() {
        let headers = parse_headers("  cache-control  :   no-cache   \r\n");
        assert_eq!(headers.first("Cache-Control"), Some("no-cache"));
    }

    #[test]
    fn test_parse_headers_is_idempotent() {
        let raw = "HTTP/1.1 200 OK\r\nx-foo-bar: 1\r\nSet-Cookie: a\r\nSet-Cookie: b\r\n\r\n";
        assert_eq!(parse_headers(raw), parse_headers(raw));
        let headers = parse_headers(raw);
        let keys: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(keys, vec!["Status-Line", "X-Foo-Bar", "Set-Cookie"]);
    }

    #[test]
    fn test_field_colliding_with_start_line_key_replaces_it() {
        let headers = parse_headers("HTTP/1.1 200 OK\r\nStatus-Line: custom\r\n");
        assert!(headers.status_line().is_none());
        assert_eq!(headers.first("Status-Line"), Some("custom"));
    }
}
