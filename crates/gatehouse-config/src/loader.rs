//! Environment loading for [`AppConfig`] and the user seed file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{AppConfig, DEFAULT_BIND_ADDR, LoggingSettings, LoginSettings, UserSeed};
use crate::validate::{
    parse_bind_addr, parse_body_limit, parse_bool, parse_login_path, parse_parameter_name,
};

const BIND_ADDR: &str = "GATEHOUSE_BIND_ADDR";
const LOGIN_PATH: &str = "GATEHOUSE_LOGIN_PATH";
const LOGIN_POST_ONLY: &str = "GATEHOUSE_LOGIN_POST_ONLY";
const LOGIN_MAX_BODY_BYTES: &str = "GATEHOUSE_LOGIN_MAX_BODY_BYTES";
const USERNAME_PARAMETER: &str = "GATEHOUSE_USERNAME_PARAMETER";
const PASSWORD_PARAMETER: &str = "GATEHOUSE_PASSWORD_PARAMETER";
const LOG_LEVEL: &str = "GATEHOUSE_LOG_LEVEL";
const LOG_FORMAT: &str = "GATEHOUSE_LOG_FORMAT";
const USERS_FILE: &str = "GATEHOUSE_USERS_FILE";

/// Load configuration from the process environment.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when a variable is present but malformed.
pub fn load_from_env() -> ConfigResult<AppConfig> {
    load_with(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
///
/// Unset and blank variables fall back to defaults.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when a variable is present but malformed.
pub fn load_with<F>(lookup: F) -> ConfigResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let bind_addr = parse_bind_addr(
        BIND_ADDR,
        get(BIND_ADDR).as_deref().unwrap_or(DEFAULT_BIND_ADDR),
    )?;

    let mut login = LoginSettings::default();
    if let Some(raw) = get(LOGIN_PATH) {
        login.path = parse_login_path(LOGIN_PATH, &raw)?;
    }
    if let Some(raw) = get(LOGIN_POST_ONLY) {
        login.post_only = parse_bool(LOGIN_POST_ONLY, &raw)?;
    }
    if let Some(raw) = get(LOGIN_MAX_BODY_BYTES) {
        login.max_body_bytes = parse_body_limit(LOGIN_MAX_BODY_BYTES, &raw)?;
    }
    if let Some(raw) = get(USERNAME_PARAMETER) {
        login.username_parameter = parse_parameter_name(USERNAME_PARAMETER, &raw)?;
    }
    if let Some(raw) = get(PASSWORD_PARAMETER) {
        login.password_parameter = parse_parameter_name(PASSWORD_PARAMETER, &raw)?;
    }
    if login.username_parameter == login.password_parameter {
        return Err(ConfigError::invalid(
            PASSWORD_PARAMETER,
            Some(login.password_parameter.as_str()),
            "must differ from the username parameter",
        ));
    }

    let mut logging = LoggingSettings::default();
    if let Some(level) = get(LOG_LEVEL) {
        logging.level = level.trim().to_string();
    }
    logging.format = get(LOG_FORMAT).map(|value| value.trim().to_ascii_lowercase());

    let users_file = get(USERS_FILE).map(PathBuf::from);

    let config = AppConfig {
        bind_addr,
        login,
        logging,
        users_file,
    };
    debug!(
        bind_addr = %config.bind_addr,
        login_path = %config.login.path,
        post_only = config.login.post_only,
        "configuration loaded"
    );
    Ok(config)
}

/// Read user accounts from a JSON array on disk.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, or when a
/// username is blank or repeated.
pub fn load_users_file(path: &Path) -> ConfigResult<Vec<UserSeed>> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::UsersFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let users: Vec<UserSeed> =
        serde_json::from_str(&raw).map_err(|source| ConfigError::UsersFileParse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut seen = std::collections::HashSet::new();
    for user in &users {
        if user.username.trim().is_empty() {
            return Err(ConfigError::invalid("username", None, "must not be empty"));
        }
        if !seen.insert(user.username.as_str()) {
            return Err(ConfigError::invalid(
                "username",
                Some(user.username.as_str()),
                "must be unique",
            ));
        }
    }
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write as _;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() -> anyhow::Result<()> {
        let config = load_with(lookup(&[]))?;
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.login, LoginSettings::default());
        assert_eq!(config.logging, LoggingSettings::default());
        assert!(config.users_file.is_none());
        Ok(())
    }

    #[test]
    fn overrides_are_parsed() -> anyhow::Result<()> {
        let config = load_with(lookup(&[
            (BIND_ADDR, "0.0.0.0:9000"),
            (LOGIN_PATH, "/api/login"),
            (LOGIN_POST_ONLY, "false"),
            (LOGIN_MAX_BODY_BYTES, "1024"),
            (USERNAME_PARAMETER, "email"),
            (LOG_FORMAT, "JSON"),
            (USERS_FILE, "/etc/gatehouse/users.json"),
        ]))?;
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.login.path, "/api/login");
        assert!(!config.login.post_only);
        assert_eq!(config.login.max_body_bytes, 1024);
        assert_eq!(config.login.username_parameter, "email");
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert_eq!(
            config.users_file,
            Some(PathBuf::from("/etc/gatehouse/users.json"))
        );
        Ok(())
    }

    #[test]
    fn blank_values_fall_back_to_defaults() -> anyhow::Result<()> {
        let config = load_with(lookup(&[(LOGIN_PATH, "   ")]))?;
        assert_eq!(config.login.path, "/login");
        Ok(())
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = load_with(lookup(&[(LOGIN_PATH, "login")])).expect_err("path must fail");
        assert!(matches!(
            err,
            ConfigError::InvalidField { ref field, .. } if field == LOGIN_PATH
        ));
    }

    #[test]
    fn identical_parameter_names_are_rejected() {
        let err = load_with(lookup(&[(PASSWORD_PARAMETER, "username")]))
            .expect_err("parameters must differ");
        assert!(matches!(err, ConfigError::InvalidField { .. }));
    }

    #[test]
    fn users_file_parses_defaults_and_flags() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"username":"alice","password_hash":"$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA","authorities":["ROLE_USER"]}},
               {{"username":"bob","password_hash":"x","enabled":false,"locked":true}}]"#
        )?;
        let users = load_users_file(file.path())?;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].authorities, vec!["ROLE_USER".to_string()]);
        assert!(users[0].enabled);
        assert!(!users[1].enabled);
        assert!(users[1].locked);
        Ok(())
    }

    #[test]
    fn users_file_rejects_duplicates_and_bad_json() -> anyhow::Result<()> {
        let mut duplicate = tempfile::NamedTempFile::new()?;
        write!(
            duplicate,
            r#"[{{"username":"a","password_hash":"x"}},{{"username":"a","password_hash":"y"}}]"#
        )?;
        assert!(matches!(
            load_users_file(duplicate.path()),
            Err(ConfigError::InvalidField { .. })
        ));

        let mut broken = tempfile::NamedTempFile::new()?;
        write!(broken, "not json")?;
        assert!(matches!(
            load_users_file(broken.path()),
            Err(ConfigError::UsersFileParse { .. })
        ));

        assert!(matches!(
            load_users_file(Path::new("/definitely/missing/users.json")),
            Err(ConfigError::UsersFileRead { .. })
        ));
        Ok(())
    }
}
