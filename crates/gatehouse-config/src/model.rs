//! Typed configuration models.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

/// Default socket address the gateway binds to.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7070";
/// Default path intercepted by the login filter.
pub const DEFAULT_LOGIN_PATH: &str = "/login";
/// Default ceiling for buffered login bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;
/// Default form field carrying the username.
pub const DEFAULT_USERNAME_PARAMETER: &str = "username";
/// Default form field carrying the password.
pub const DEFAULT_PASSWORD_PARAMETER: &str = "password";

/// Fully resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Login interception settings.
    pub login: LoginSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Optional JSON file with user accounts to seed the password directory.
    pub users_file: Option<PathBuf>,
}

/// Settings for the login filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSettings {
    /// Path the filter listens on.
    pub path: String,
    /// Reject submissions that are not `POST`.
    pub post_only: bool,
    /// Maximum number of body bytes buffered per submission.
    pub max_body_bytes: usize,
    /// Form field carrying the username.
    pub username_parameter: String,
    /// Form field carrying the password.
    pub password_parameter: String,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            path: DEFAULT_LOGIN_PATH.to_string(),
            post_only: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            username_parameter: DEFAULT_USERNAME_PARAMETER.to_string(),
            password_parameter: DEFAULT_PASSWORD_PARAMETER.to_string(),
        }
    }
}

/// Settings for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Level directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Requested output format (`json` or `pretty`), if any.
    pub format: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: None,
        }
    }
}

/// User account entry read from the seed file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSeed {
    /// Login name.
    pub username: String,
    /// Argon2 PHC string of the password.
    pub password_hash: String,
    /// Authorities granted on successful login.
    #[serde(default)]
    pub authorities: Vec<String>,
    /// Whether the account may log in.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Whether the account is locked.
    #[serde(default)]
    pub locked: bool,
}

const fn default_enabled() -> bool {
    true
}
