//! # Design
//!
//! - Centralize application-level errors for bootstrap.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration operations failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: gatehouse_config::ConfigError,
    },
    /// Password directory could not be built.
    #[error("password directory operation failed")]
    Password {
        /// Operation identifier.
        operation: &'static str,
        /// Source password error.
        source: gatehouse_auth::PasswordError,
    },
    /// Login adapter wiring was rejected.
    #[error("login adapter configuration failed")]
    Adapter {
        /// Operation identifier.
        operation: &'static str,
        /// Source adapter error.
        source: gatehouse_api::AdapterConfigError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: gatehouse_api::ApiServerError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: gatehouse_telemetry::TelemetryError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: gatehouse_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn password(
        operation: &'static str,
        source: gatehouse_auth::PasswordError,
    ) -> Self {
        Self::Password { operation, source }
    }

    pub(crate) const fn adapter(
        operation: &'static str,
        source: gatehouse_api::AdapterConfigError,
    ) -> Self {
        Self::Adapter { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: gatehouse_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: gatehouse_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }
}
