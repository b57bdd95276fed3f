//! Parsing helpers for individual invoker settings.

use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::RefreshStrategy;

/// Return the trimmed value, or `None` when it is absent or blank.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Require a non-blank value for `field`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingSetting`] when the value is absent or blank.
pub fn require<'a>(value: Option<&'a str>, field: &'static str) -> ConfigResult<&'a str> {
    non_blank(value).ok_or_else(|| ConfigError::missing(field))
}

/// Parse a yes/no style toggle.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for anything other than
/// `yes`/`no`, `true`/`false` or `1`/`0` (case-insensitive).
pub fn parse_flag(value: &str, field: &'static str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(ConfigError::invalid(field, "expected yes or no", value)),
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
#[must_use]
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the refresh strategy label.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for labels other than Auto, Custom or Both.
pub fn parse_strategy(value: &str, field: &'static str) -> ConfigResult<RefreshStrategy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(RefreshStrategy::Auto),
        "custom" => Ok(RefreshStrategy::Custom),
        "both" => Ok(RefreshStrategy::Both),
        _ => Err(ConfigError::invalid(
            field,
            "expected Auto, Custom or Both",
            value,
        )),
    }
}

/// Parse a TCP port, falling back to `default` when unset.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not in `1..=65535`.
pub fn parse_port(value: Option<&str>, default: u16, field: &'static str) -> ConfigResult<u16> {
    let Some(raw) = non_blank(value) else {
        return Ok(default);
    };
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(ConfigError::invalid(
            field,
            "must be between 1 and 65535",
            raw,
        )),
        Ok(port) => Ok(port),
    }
}

/// Parse a positive number of seconds, falling back to `default` when unset.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for zero or non-numeric values.
pub fn parse_timeout_secs(
    value: Option<&str>,
    default: u64,
    field: &'static str,
) -> ConfigResult<u64> {
    let Some(raw) = non_blank(value) else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::invalid(
            field,
            "must be a positive number of seconds",
            raw,
        )),
        Ok(secs) => Ok(secs),
    }
}

/// Parse the media server location.
///
/// Accepts either `host:port` (plain HTTP is assumed) or a full base URL. The
/// returned URL's path always ends with `/` so relative endpoints join onto it.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not a usable HTTP(S) URL.
pub fn parse_server_url(value: &str, field: &'static str) -> ConfigResult<Url> {
    let raw = value.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    let mut url = parse_http_url(&candidate, field, raw)?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::invalid(field, "must include a host", raw));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Parse an absolute HTTP(S) URL.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not an HTTP(S) URL.
pub fn parse_http_url(value: &str, field: &'static str, shown: &str) -> ConfigResult<Url> {
    let url = Url::parse(value.trim())
        .map_err(|_| ConfigError::invalid(field, "must be a valid URL", shown))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            field,
            "URL scheme must be http or https",
            shown,
        ));
    }
    Ok(url)
}

/// Parse a list of section identifiers used verbatim in request paths.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when an identifier contains URL delimiters.
pub fn parse_section_ids(value: &str, field: &'static str) -> ConfigResult<Vec<String>> {
    let ids = parse_list(value);
    if let Some(bad) = ids
        .iter()
        .find(|id| id.contains(['/', '?', '#', '%', ' ']))
    {
        return Err(ConfigError::invalid(
            field,
            "section identifiers must not contain URL delimiters",
            bad,
        ));
    }
    Ok(ids)
}
