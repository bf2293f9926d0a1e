//! Wire models returned by the Gatehouse HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// RFC9457 problem document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short, human-readable summary.
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Occurrence-specific explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Body returned by [`JsonSuccessHandler`](crate::JsonSuccessHandler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSuccessResponse {
    /// Authenticated principal.
    pub username: String,
    /// Authorities granted to the principal.
    pub authorities: Vec<String>,
    /// When the credentials were verified.
    pub authenticated_at: DateTime<Utc>,
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server is answering.
    pub status: &'static str,
    /// Build identifier of the running binary.
    pub build: &'static str,
    /// Login counters since start-up.
    pub logins: gatehouse_telemetry::MetricsSnapshot,
}
