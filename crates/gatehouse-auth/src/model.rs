//! Login request and authentication result types.

use std::fmt;
use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Username and password submitted with a single login request.
///
/// Missing and `null` fields deserialize to empty strings.
#[derive(Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    password: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl LoginRequest {
    /// Build a login request from raw credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Submitted username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Submitted password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request metadata recorded alongside an authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationDetails {
    /// Peer address of the submitting client, when known.
    pub remote_addr: Option<SocketAddr>,
    /// Request identifier propagated through `x-request-id`.
    pub request_id: Option<String>,
}

/// Unauthenticated credentials handed to an [`AuthenticationService`](crate::AuthenticationService).
#[derive(Clone)]
pub struct UsernamePasswordToken {
    principal: String,
    credentials: String,
    details: AuthenticationDetails,
}

impl UsernamePasswordToken {
    /// Build a token for the given principal and credentials.
    #[must_use]
    pub fn new(
        principal: impl Into<String>,
        credentials: impl Into<String>,
        details: AuthenticationDetails,
    ) -> Self {
        Self {
            principal: principal.into(),
            credentials: credentials.into(),
            details,
        }
    }

    /// Principal (username) being authenticated.
    #[must_use]
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// Raw credentials (password).
    #[must_use]
    pub fn credentials(&self) -> &str {
        &self.credentials
    }

    /// Request metadata.
    #[must_use]
    pub const fn details(&self) -> &AuthenticationDetails {
        &self.details
    }

    /// Consume the token, keeping only its request metadata.
    #[must_use]
    pub fn into_details(self) -> AuthenticationDetails {
        self.details
    }
}

impl fmt::Debug for UsernamePasswordToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsernamePasswordToken")
            .field("principal", &self.principal)
            .field("credentials", &"<redacted>")
            .field("details", &self.details)
            .finish()
    }
}

/// Successful authentication result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    /// Authenticated principal name.
    pub principal: String,
    /// Authorities granted to the principal.
    pub authorities: Vec<String>,
    /// Request metadata captured at login time.
    pub details: AuthenticationDetails,
    /// Time the credentials were verified.
    pub authenticated_at: DateTime<Utc>,
}

impl Authentication {
    /// Build an authentication stamped with the current time.
    #[must_use]
    pub fn new(
        principal: impl Into<String>,
        authorities: Vec<String>,
        details: AuthenticationDetails,
    ) -> Self {
        Self {
            principal: principal.into(),
            authorities,
            details,
            authenticated_at: Utc::now(),
        }
    }
}
