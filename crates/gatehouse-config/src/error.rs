//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Environment variable or file field that failed validation.
        field: String,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The user seed file could not be read.
    #[error("failed to read user seed file")]
    UsersFileRead {
        /// Path that could not be read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The user seed file did not contain valid JSON.
    #[error("failed to parse user seed file")]
    UsersFileParse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Source serde error.
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, value: Option<&str>, reason: &'static str) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            value: value.map(str::to_string),
            reason,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_field_carries_context() {
        let err = ConfigError::invalid("GATEHOUSE_LOGIN_PATH", Some("login"), "must start with '/'");
        assert_eq!(err.to_string(), "invalid configuration field");
        match err {
            ConfigError::InvalidField {
                field,
                value,
                reason,
            } => {
                assert_eq!(field, "GATEHOUSE_LOGIN_PATH");
                assert_eq!(value.as_deref(), Some("login"));
                assert_eq!(reason, "must start with '/'");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn users_file_errors_expose_source() {
        let err = ConfigError::UsersFileRead {
            path: PathBuf::from("users.json"),
            source: io::Error::other("missing"),
        };
        assert!(err.source().is_some());
    }
}
