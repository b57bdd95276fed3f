//! Calls against the Plex Media Server and the Plex sign-in service.
//!
//! # Design
//! - Borrows the shared HTTP client and server settings; holds no state.
//! - Paths are appended segment by segment so identifiers are always
//!   percent-encoded.
//! - The token travels as an `X-Plex-Token` query parameter and never appears
//!   in logs or error messages.

mod auth;
mod refresh;
mod sections;

use std::fmt;

use plexhook_config::PlexServer;
use reqwest::{Client, Url};

pub use sections::{LibrarySection, SectionKind};

pub(crate) const TOKEN_QUERY_PARAM: &str = "X-Plex-Token";

/// Media server client for a single run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlexClient<'a> {
    http: &'a Client,
    server: &'a PlexServer,
}

impl<'a> PlexClient<'a> {
    pub(crate) const fn new(http: &'a Client, server: &'a PlexServer) -> Self {
        Self { http, server }
    }

    /// URL for `segments` under the server's base path.
    fn endpoint(&self, segments: &[&str]) -> Option<Url> {
        let mut url = self.server.base_url.clone();
        url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
        Some(url)
    }
}

/// Access token for the media server.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct AuthToken(String);

impl AuthToken {
    pub(crate) const fn new(value: String) -> Self {
        Self(value)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("AuthToken(<redacted>)")
    }
}
