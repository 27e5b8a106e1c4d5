//! Raw response bytes as handed back by an [`HttpTransport`](super::HttpTransport).

use std::borrow::Cow;

/// A response exactly as received: the header section, the body, or both
/// (header section first), depending on the request flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    bytes: Vec<u8>,
}

impl RawResponse {
    /// Wraps raw response bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Borrows the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the response, returning the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Decodes the bytes as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for an empty response.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for RawResponse {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for RawResponse {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }
}
