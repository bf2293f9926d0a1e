//! Request-scoped storage of the parsed [`LoginRequest`].

use gatehouse_auth::{BoxError, LoginRequest};
use thiserror::Error;
use tracing::debug;
use url::form_urlencoded;

use crate::http::submission::LoginSubmission;

/// Associates a parsed [`LoginRequest`] with an in-flight submission.
pub trait LoginRequestStore: Send + Sync {
    /// Extract credentials from the submission and attach them to it.
    ///
    /// # Errors
    ///
    /// Returns any failure to read or parse the submission. The adapter
    /// normalizes it into `AuthenticationError::InternalService`.
    fn associate(&self, submission: &mut LoginSubmission) -> Result<(), BoxError>;

    /// The login request previously associated with this submission, if any.
    fn lookup(&self, submission: &LoginSubmission) -> Option<LoginRequest>;
}

/// Failures raised while turning a login body into a [`LoginRequest`].
#[derive(Debug, Error)]
pub enum LoginRequestError {
    /// The body used a media type the store cannot parse.
    #[error("unsupported login content type: {content_type}")]
    UnsupportedContentType {
        /// Offending `Content-Type` value (empty when absent).
        content_type: String,
    },
    /// The body claimed to be JSON but did not parse.
    #[error("malformed login body")]
    MalformedJson {
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// The declared body exceeds the configured limit.
    #[error("login body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Limit in bytes.
        limit: usize,
    },
    /// The body could not be read from the connection.
    #[error("failed to read login body")]
    BodyRead {
        /// Transport error.
        #[source]
        source: axum::Error,
    },
}

/// Default store: parses JSON or form bodies and keeps the result in the
/// submission's extensions.
#[derive(Debug, Clone)]
pub struct RequestAttributeStore {
    username_parameter: String,
    password_parameter: String,
}

impl Default for RequestAttributeStore {
    fn default() -> Self {
        Self::new("username", "password")
    }
}

impl RequestAttributeStore {
    /// Store reading form fields with the given names.
    #[must_use]
    pub fn new(username_parameter: impl Into<String>, password_parameter: impl Into<String>) -> Self {
        Self {
            username_parameter: username_parameter.into(),
            password_parameter: password_parameter.into(),
        }
    }

    fn parse(&self, submission: &LoginSubmission) -> Result<LoginRequest, LoginRequestError> {
        let content_type = submission.content_type().unwrap_or_default();
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if media_type == "application/json" || media_type.ends_with("+json") {
            return serde_json::from_slice(submission.body())
                .map_err(|source| LoginRequestError::MalformedJson { source });
        }
        if media_type == "application/x-www-form-urlencoded" {
            return Ok(self.parse_form(submission.body()));
        }
        Err(LoginRequestError::UnsupportedContentType {
            content_type: content_type.to_string(),
        })
    }

    fn parse_form(&self, body: &[u8]) -> LoginRequest {
        let mut username = None;
        let mut password = None;
        for (key, value) in form_urlencoded::parse(body) {
            if username.is_none() && key == self.username_parameter.as_str() {
                username = Some(value.into_owned());
            } else if password.is_none() && key == self.password_parameter.as_str() {
                password = Some(value.into_owned());
            }
        }
        LoginRequest::new(username.unwrap_or_default(), password.unwrap_or_default())
    }
}

impl LoginRequestStore for RequestAttributeStore {
    fn associate(&self, submission: &mut LoginSubmission) -> Result<(), BoxError> {
        if submission.body().is_empty() {
            debug!("empty login body; no credentials associated");
            return Ok(());
        }
        let login = self.parse(submission)?;
        submission.extensions_mut().insert(login);
        Ok(())
    }

    fn lookup(&self, submission: &LoginSubmission) -> Option<LoginRequest> {
        submission.extensions().get::<LoginRequest>().cloned()
    }
}
