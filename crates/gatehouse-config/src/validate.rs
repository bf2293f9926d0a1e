//! Validation helpers and parsing utilities for configuration values.

use std::net::SocketAddr;

use crate::error::{ConfigError, ConfigResult};

pub(crate) fn parse_bind_addr(field: &str, raw: &str) -> ConfigResult<SocketAddr> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, Some(raw), "must be a socket address"))
}

pub(crate) fn parse_login_path(field: &str, raw: &str) -> ConfigResult<String> {
    let path = raw.trim();
    if !path.starts_with('/') {
        return Err(ConfigError::invalid(field, Some(raw), "must start with '/'"));
    }
    if path.contains(['?', '#']) {
        return Err(ConfigError::invalid(
            field,
            Some(raw),
            "must not contain a query or fragment",
        ));
    }
    Ok(path.to_string())
}

pub(crate) fn parse_bool(field: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(field, Some(raw), "must be a boolean")),
    }
}

pub(crate) fn parse_body_limit(field: &str, raw: &str) -> ConfigResult<usize> {
    let limit: usize = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, Some(raw), "must be an integer"))?;
    if limit == 0 {
        return Err(ConfigError::invalid(field, Some(raw), "must be positive"));
    }
    Ok(limit)
}

pub(crate) fn parse_parameter_name(field: &str, raw: &str) -> ConfigResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ConfigError::invalid(field, Some(raw), "must not be empty"));
    }
    Ok(name.to_string())
}
