//! Builds a [`RunConfig`] from the raw settings handed over by the invoker.
//!
//! # Design
//! - Every setting arrives as an optional string; validation happens here once.
//! - The category and the category lists may legitimately be empty, so an
//!   absent value reads as empty rather than missing.
//! - Settings scoped to a disabled phase are not required.
//! - No network activity happens before this succeeds.

use std::time::Duration;

use crate::defaults::{DEFAULT_CLIENT_PORT, DEFAULT_SIGNIN_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{
    CategoryMapping, Credentials, JobMetadata, JobOutcome, NotifySettings, PlexServer,
    RefreshSettings, RefreshStrategy, RunConfig,
};
use crate::validate::{
    non_blank, parse_flag, parse_http_url, parse_list, parse_port, parse_section_ids,
    parse_server_url, parse_strategy, parse_timeout_secs, require,
};

/// Setting names as exported by the downloader.
pub mod keys {
    /// Job status string.
    pub const STATUS: &str = "NZBPP_STATUS";
    /// Job category.
    pub const CATEGORY: &str = "NZBPP_CATEGORY";
    /// Job display name.
    pub const DISPLAY_NAME: &str = "NZBPP_NZBNAME";
    /// Proper title header.
    pub const PROPER_TITLE: &str = "NZBPR__DNZB_PROPERNAME";
    /// Episode label header.
    pub const EPISODE: &str = "NZBPR__DNZB_EPISODENAME";
    /// Release year header.
    pub const YEAR: &str = "NZBPR__DNZB_MOVIEYEAR";
    /// Silent failure toggle.
    pub const SILENT_FAILURE: &str = "NZBPO_SILENTFAILURE";
    /// Library refresh toggle.
    pub const REFRESH_LIBRARY: &str = "NZBPO_REFRESHLIBRARY";
    /// Refresh strategy.
    pub const REFRESH_MODE: &str = "NZBPO_REFRESHMODE";
    /// Movie categories.
    pub const MOVIE_CATEGORIES: &str = "NZBPO_MOVIESCAT";
    /// TV categories.
    pub const TV_CATEGORIES: &str = "NZBPO_TVCAT";
    /// Explicit section identifiers.
    pub const CUSTOM_SECTIONS: &str = "NZBPO_CUSTOMPLEXSECTION";
    /// Media server host.
    pub const PLEX_HOST: &str = "NZBPO_PLEXIP";
    /// Media server token.
    pub const PLEX_TOKEN: &str = "NZBPO_PLEXTOKEN";
    /// Account login.
    pub const PLEX_USER: &str = "NZBPO_PLEXUSER";
    /// Account password.
    pub const PLEX_PASSWORD: &str = "NZBPO_PLEXPASS";
    /// Sign-in endpoint override.
    pub const PLEX_SIGNIN_URL: &str = "NZBPO_PLEXSIGNINURL";
    /// GUI notification toggle.
    pub const GUI_SHOW: &str = "NZBPO_GUISHOW";
    /// Direct-header toggle.
    pub const DIRECT_HEADERS: &str = "NZBPO_DHEADERS";
    /// Client addresses.
    pub const CLIENTS: &str = "NZBPO_CLIENTSIP";
    /// Client JSON-RPC port.
    pub const CLIENT_PORT: &str = "NZBPO_CLIENTSPORT";
    /// Request timeout in seconds.
    pub const HTTP_TIMEOUT_SECS: &str = "PLEXHOOK_HTTP_TIMEOUT_SECS";
}

/// Unvalidated settings exactly as supplied by the invoker.
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    /// See [`keys::STATUS`].
    pub status: Option<String>,
    /// See [`keys::CATEGORY`].
    pub category: Option<String>,
    /// See [`keys::DISPLAY_NAME`].
    pub display_name: Option<String>,
    /// See [`keys::PROPER_TITLE`].
    pub proper_title: Option<String>,
    /// See [`keys::EPISODE`].
    pub episode: Option<String>,
    /// See [`keys::YEAR`].
    pub year: Option<String>,
    /// See [`keys::SILENT_FAILURE`].
    pub silent_failure: Option<String>,
    /// See [`keys::REFRESH_LIBRARY`].
    pub refresh_library: Option<String>,
    /// See [`keys::REFRESH_MODE`].
    pub refresh_mode: Option<String>,
    /// See [`keys::MOVIE_CATEGORIES`].
    pub movie_categories: Option<String>,
    /// See [`keys::TV_CATEGORIES`].
    pub tv_categories: Option<String>,
    /// See [`keys::CUSTOM_SECTIONS`].
    pub custom_sections: Option<String>,
    /// See [`keys::PLEX_HOST`].
    pub plex_host: Option<String>,
    /// See [`keys::PLEX_TOKEN`].
    pub plex_token: Option<String>,
    /// See [`keys::PLEX_USER`].
    pub plex_user: Option<String>,
    /// See [`keys::PLEX_PASSWORD`].
    pub plex_password: Option<String>,
    /// See [`keys::PLEX_SIGNIN_URL`].
    pub plex_signin_url: Option<String>,
    /// See [`keys::GUI_SHOW`].
    pub gui_show: Option<String>,
    /// See [`keys::DIRECT_HEADERS`].
    pub direct_headers: Option<String>,
    /// See [`keys::CLIENTS`].
    pub clients: Option<String>,
    /// See [`keys::CLIENT_PORT`].
    pub client_port: Option<String>,
    /// See [`keys::HTTP_TIMEOUT_SECS`].
    pub http_timeout_secs: Option<String>,
}

impl RunConfig {
    /// Validate raw settings into an immutable run configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first missing or invalid setting.
    pub fn from_raw(raw: &RawSettings) -> ConfigResult<Self> {
        let status = require(raw.status.as_deref(), keys::STATUS)?;
        let category = raw.category.as_deref().unwrap_or_default().trim().to_string();
        let display_name = require(raw.display_name.as_deref(), keys::DISPLAY_NAME)?.to_string();

        let silent_failure = parse_flag(
            require(raw.silent_failure.as_deref(), keys::SILENT_FAILURE)?,
            keys::SILENT_FAILURE,
        )?;
        let refresh_enabled = parse_flag(
            require(raw.refresh_library.as_deref(), keys::REFRESH_LIBRARY)?,
            keys::REFRESH_LIBRARY,
        )?;
        let strategy = parse_strategy(
            require(raw.refresh_mode.as_deref(), keys::REFRESH_MODE)?,
            keys::REFRESH_MODE,
        )?;
        let movie_categories = raw.movie_categories.as_deref().unwrap_or_default();
        let tv_categories = raw.tv_categories.as_deref().unwrap_or_default();
        let gui_show = parse_flag(
            require(raw.gui_show.as_deref(), keys::GUI_SHOW)?,
            keys::GUI_SHOW,
        )?;
        let direct_headers = parse_flag(
            require(raw.direct_headers.as_deref(), keys::DIRECT_HEADERS)?,
            keys::DIRECT_HEADERS,
        )?;
        let timeout_secs = parse_timeout_secs(
            raw.http_timeout_secs.as_deref(),
            DEFAULT_TIMEOUT_SECS,
            keys::HTTP_TIMEOUT_SECS,
        )?;

        let refresh = if refresh_enabled {
            let mapping = CategoryMapping {
                movie_categories: parse_list(movie_categories),
                tv_categories: parse_list(tv_categories),
                custom_sections: match non_blank(raw.custom_sections.as_deref()) {
                    Some(value) => parse_section_ids(value, keys::CUSTOM_SECTIONS)?,
                    None => Vec::new(),
                },
            };
            Some(build_refresh_settings(raw, strategy, mapping)?)
        } else {
            None
        };

        let notify = if gui_show {
            Some(build_notify_settings(raw, direct_headers)?)
        } else {
            None
        };

        Ok(Self {
            outcome: JobOutcome::from_status(status),
            job: JobMetadata {
                category,
                display_name,
                proper_title: non_blank(raw.proper_title.as_deref()).map(str::to_string),
                episode: non_blank(raw.episode.as_deref()).map(str::to_string),
                year: non_blank(raw.year.as_deref()).map(str::to_string),
            },
            silent_failure,
            refresh,
            notify,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn build_refresh_settings(
    raw: &RawSettings,
    strategy: RefreshStrategy,
    mapping: CategoryMapping,
) -> ConfigResult<RefreshSettings> {
    if strategy.includes_auto()
        && mapping.movie_categories.is_empty()
        && mapping.tv_categories.is_empty()
    {
        return Err(ConfigError::InvalidField {
            field: keys::TV_CATEGORIES,
            reason: "at least one movie or TV category is required for Auto refresh",
            value: None,
        });
    }
    if strategy.includes_custom() && mapping.custom_sections.is_empty() {
        return Err(ConfigError::missing(keys::CUSTOM_SECTIONS));
    }

    let host = require(raw.plex_host.as_deref(), keys::PLEX_HOST)?;
    let base_url = parse_server_url(host, keys::PLEX_HOST)?;
    let signin_url = match non_blank(raw.plex_signin_url.as_deref()) {
        Some(value) => parse_http_url(value, keys::PLEX_SIGNIN_URL, value)?,
        None => parse_http_url(DEFAULT_SIGNIN_URL, keys::PLEX_SIGNIN_URL, DEFAULT_SIGNIN_URL)?,
    };

    Ok(RefreshSettings {
        strategy,
        mapping,
        server: PlexServer {
            base_url,
            signin_url,
        },
        credentials: resolve_credentials(raw)?,
    })
}

fn resolve_credentials(raw: &RawSettings) -> ConfigResult<Credentials> {
    if let Some(token) = non_blank(raw.plex_token.as_deref()) {
        return Ok(Credentials::Token(token.to_string()));
    }
    let username = require(raw.plex_user.as_deref(), keys::PLEX_USER)?;
    // Passwords may legitimately carry surrounding whitespace.
    let password = raw
        .plex_password
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::missing(keys::PLEX_PASSWORD))?;
    Ok(Credentials::Login {
        username: username.to_string(),
        password: password.to_string(),
    })
}

fn build_notify_settings(raw: &RawSettings, direct_headers: bool) -> ConfigResult<NotifySettings> {
    let clients = parse_list(require(raw.clients.as_deref(), keys::CLIENTS)?);
    if clients.is_empty() {
        return Err(ConfigError::missing(keys::CLIENTS));
    }
    Ok(NotifySettings {
        clients,
        default_port: parse_port(
            raw.client_port.as_deref(),
            DEFAULT_CLIENT_PORT,
            keys::CLIENT_PORT,
        )?,
        direct_headers,
    })
}
