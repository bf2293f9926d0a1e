//! # Design
//!
//! - Rejections (`BadCredentials`, `Disabled`, `Locked`) describe the outcome
//!   of a completed credential check and travel to failure handlers untouched.
//! - Everything else collapses into `InternalService`, which keeps the original
//!   message and error as its source so callers can still downcast.

use argon2::password_hash::Error as PasswordHashError;
use thiserror::Error;

/// Boxed error accepted from pluggable collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single authentication attempt.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// Username unknown or password mismatch.
    #[error("bad credentials")]
    BadCredentials,
    /// Account exists but is disabled.
    #[error("account disabled")]
    Disabled {
        /// Account name.
        username: String,
    },
    /// Account exists but is locked.
    #[error("account locked")]
    Locked {
        /// Account name.
        username: String,
    },
    /// The submission used an HTTP method the login endpoint does not accept.
    #[error("authentication method not supported")]
    MethodNotSupported {
        /// Offending HTTP method.
        method: String,
    },
    /// Unexpected failure while extracting credentials or calling the service.
    #[error("{message}")]
    InternalService {
        /// Message of the original error.
        message: String,
        /// Original error.
        source: BoxError,
    },
}

impl AuthenticationError {
    /// Wrap an arbitrary error as [`AuthenticationError::InternalService`],
    /// preserving its message.
    #[must_use]
    pub fn internal(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self::InternalService {
            message: source.to_string(),
            source,
        }
    }

    /// Whether the credentials were checked and refused.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::BadCredentials | Self::Disabled { .. } | Self::Locked { .. }
        )
    }

    /// Collapse every non-rejection into [`AuthenticationError::InternalService`].
    ///
    /// Rejections and already-normalized errors are returned unchanged.
    #[must_use]
    pub fn normalize(self) -> Self {
        if self.is_rejection() || matches!(self, Self::InternalService { .. }) {
            self
        } else {
            Self::internal(self)
        }
    }

    /// Stable machine-readable identifier for logs and problem documents.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BadCredentials => "bad_credentials",
            Self::Disabled { .. } => "disabled",
            Self::Locked { .. } => "locked",
            Self::MethodNotSupported { .. } => "method_not_supported",
            Self::InternalService { .. } => "internal_service",
        }
    }
}

/// Errors raised while hashing or verifying passwords.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash secret material.
    #[error("failed to hash password")]
    HashFailed {
        /// Hashing error detail.
        #[source]
        detail: PasswordHashError,
    },
    /// Stored hash payload was invalid.
    #[error("invalid stored password hash")]
    StoredHashInvalid {
        /// Hash parsing error detail.
        #[source]
        detail: PasswordHashError,
    },
    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password")]
    VerifyFailed {
        /// Verification error detail.
        #[source]
        detail: PasswordHashError,
    },
}
