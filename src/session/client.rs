//! The portal client: session manager plus the session-gated operations.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::config::ClientConfig;
use super::error::AuthError;
use super::{Session, session_id_from_location};
use crate::endpoints::{
    ACADEMIC_STATUS_PATH, LOGIN_PATH, PASSWORD_FIELD, PHOTO_PATH, USER_ID_FIELD,
};
use crate::header::HeaderMap;
use crate::photo::{self, PhotoError};
use crate::student::{StudentDataError, StudentRecord, extract_student_record};
use crate::transport::{
    HttpTransport, RawResponse, ReqwestTransport, Transport, TransportError,
};

/// Client for the academic records portal.
///
/// Owns the current [`Session`]. Authentication and session reset take
/// `&mut self`; share a client across tasks only behind your own lock.
///
/// # Example
///
/// ```no_run
/// use unisys_core::UnisysClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = UnisysClient::new()?;
/// client.authenticate("12523001", "secret").await?;
/// let record = client.student_record().await?;
/// println!("{} has {} credits", record.name.unwrap_or_default(), record.sks);
/// client.fetch_photo("photo.jpg").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UnisysClient {
    transport: Transport,
    session: Option<Session>,
}

impl UnisysClient {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if the base URL is invalid.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client over the reqwest transport with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if `config.base_url` is invalid.
    pub fn with_config(config: ClientConfig) -> Result<Self, TransportError> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Creates a client over a caller-supplied HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if `config.base_url` is invalid.
    pub fn with_transport(
        config: ClientConfig,
        http: Arc<dyn HttpTransport>,
    ) -> Result<Self, TransportError> {
        let transport = Transport::new(&config.base_url, config.default_options(), http)?;
        Ok(Self {
            transport,
            session: None,
        })
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The active session id, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(Session::id)
    }

    /// The logged-in user id, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(Session::username)
    }

    /// Returns `true` while a session is active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Drops the active session.
    pub fn clear_session(&mut self) {
        if self.session.take().is_some() {
            debug!("session cleared");
        }
    }

    /// The underlying transport adapter.
    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Logs in and stores the issued session.
    ///
    /// Posts the credentials to the login endpoint (header-only) and reads
    /// the session id from the `Location` redirect header. Returns `user_id`
    /// on success.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] when there is no `Location` header or
    ///   it carries no `session_id=`; the session is cleared.
    /// - [`AuthError::Transport`] when the request fails; the session is left
    ///   as it was.
    #[instrument(level = "debug", skip(self, password))]
    pub async fn authenticate(&mut self, user_id: &str, password: &str) -> Result<String, AuthError> {
        let headers = self
            .transport
            .fetch_headers(
                LOGIN_PATH,
                &[(USER_ID_FIELD, user_id), (PASSWORD_FIELD, password)],
                self.session_id(),
            )
            .await?;

        let Some(location) = headers.first("Location") else {
            debug!("login response has no Location header");
            self.clear_session();
            return Err(AuthError::NotAuthenticated);
        };

        let Some(session_id) = session_id_from_location(location) else {
            debug!("login redirect carries no session id");
            self.clear_session();
            return Err(AuthError::NotAuthenticated);
        };

        self.session = Some(Session::new(session_id, user_id));
        debug!("authenticated");
        Ok(user_id.to_string())
    }

    /// Fetches the academic status page and extracts the student record.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NoSession`] (wrapped) without an active session; no
    ///   request is made.
    /// - [`StudentDataError::Transport`] when the fetch fails.
    /// - [`StudentDataError::Malformed`] when the page lacks a usable
    ///   `SKS/IP kumulatif` row.
    #[instrument(level = "debug", skip(self))]
    pub async fn student_record(&self) -> Result<StudentRecord, StudentDataError> {
        let session = self.require_session()?;
        let body = self
            .transport
            .fetch_body(ACADEMIC_STATUS_PATH, &[], Some(session.id()))
            .await?;
        Ok(extract_student_record(&body.text())?)
    }

    /// Fetches the student photo and writes it to a new file at `destination`.
    ///
    /// # Errors
    ///
    /// - [`PhotoError::NoSession`] without an active session.
    /// - [`PhotoError::AlreadyExists`] when `destination` exists.
    ///
    /// Neither guard makes a request. Otherwise [`PhotoError::Transport`] or
    /// [`PhotoError::Io`].
    #[instrument(level = "debug", skip(self, destination), fields(destination = %destination.as_ref().display()))]
    pub async fn fetch_photo(&self, destination: impl AsRef<Path>) -> Result<(), PhotoError> {
        let destination = destination.as_ref();
        let Some(session) = self.session.as_ref() else {
            return Err(PhotoError::NoSession);
        };
        photo::ensure_absent(destination).await?;

        let body = self
            .transport
            .fetch_body(PHOTO_PATH, &[], Some(session.id()))
            .await?;
        photo::write_new_file(destination, body.as_bytes()).await
    }

    /// Body-only fetch of any portal path, with the session attached when
    /// one is active.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request fails.
    pub async fn fetch_body(
        &self,
        path: &str,
        post_fields: &[(&str, &str)],
    ) -> Result<RawResponse, TransportError> {
        self.transport
            .fetch_body(path, post_fields, self.session_id())
            .await
    }

    /// Header-only fetch of any portal path, with the session attached when
    /// one is active.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request fails.
    pub async fn fetch_headers(
        &self,
        path: &str,
        post_fields: &[(&str, &str)],
    ) -> Result<HeaderMap, TransportError> {
        self.transport
            .fetch_headers(path, post_fields, self.session_id())
            .await
    }

    fn require_session(&self) -> Result<&Session, AuthError> {
        self.session.as_ref().ok_or(AuthError::NoSession)
    }
}
