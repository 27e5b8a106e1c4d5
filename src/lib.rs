//! Unisys Core Library
//!
//! Client for the Universitas Islam Indonesia academic records portal:
//! logs a student in, scrapes the cumulative credits/GPA summary from the
//! academic status page and saves the student photo.
//!
//! # Architecture
//!
//! - [`transport`] - Request building against the portal base URL, raw
//!   responses, and the injectable [`HttpTransport`] capability
//! - [`header`] - Parser for raw HTTP header sections
//! - [`session`] - Session value and the [`UnisysClient`] operations
//! - [`student`] - Extraction of the [`StudentRecord`] from the status page
//! - [`photo`] - No-overwrite persistence of the student photo

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod endpoints;
pub mod header;
pub mod photo;
pub mod session;
pub mod student;
pub mod transport;
pub mod user_agent;

// Re-export commonly used types
pub use header::{HeaderMap, HeaderValue, RequestLine, StatusLine, parse_headers};
pub use photo::PhotoError;
pub use session::{AuthError, ClientConfig, Session, UnisysClient};
pub use student::{MalformedRecord, StudentDataError, StudentRecord, extract_student_record};
pub use transport::{
    HttpTransport, RawResponse, RequestOptions, ReqwestTransport, Transport, TransportError,
    TransportRequest,
};
