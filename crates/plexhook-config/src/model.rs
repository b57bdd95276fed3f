//! Immutable configuration for a single hook run.
//!
//! A [`RunConfig`] is built once at startup and passed by reference into every
//! phase of the run; nothing downstream reads the environment directly.

use std::fmt;
use std::time::Duration;

use url::Url;

/// Outcome of the download job that triggered the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job completed successfully.
    Success,
    /// The job failed, was deleted, or finished with warnings.
    Failure,
}

impl JobOutcome {
    /// Derive the outcome from the upstream status string (`SUCCESS/ALL`, `FAILURE/PAR`, ...).
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        if status.trim().starts_with("SUCCESS/") {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Read-only description of the completed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobMetadata {
    /// Category label assigned by the downloader.
    pub category: String,
    /// Raw display name of the job.
    pub display_name: String,
    /// Proper title from direct-download headers.
    pub proper_title: Option<String>,
    /// Episode label from direct-download headers.
    pub episode: Option<String>,
    /// Release year from direct-download headers.
    pub year: Option<String>,
}

/// Strategy used to choose which library sections get refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStrategy {
    /// Detect sections from the job category.
    Auto,
    /// Refresh only the explicitly listed sections.
    Custom,
    /// Detected sections followed by the explicit list.
    Both,
}

impl RefreshStrategy {
    /// Whether category-based detection runs for this strategy.
    #[must_use]
    pub const fn includes_auto(self) -> bool {
        matches!(self, Self::Auto | Self::Both)
    }

    /// Whether the explicit section list is used for this strategy.
    #[must_use]
    pub const fn includes_custom(self) -> bool {
        matches!(self, Self::Custom | Self::Both)
    }

    /// Canonical label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Custom => "Custom",
            Self::Both => "Both",
        }
    }
}

/// Category lists and explicit section targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMapping {
    /// Categories whose jobs land in movie sections.
    pub movie_categories: Vec<String>,
    /// Categories whose jobs land in show sections.
    pub tv_categories: Vec<String>,
    /// Section identifiers refreshed by the Custom strategy.
    pub custom_sections: Vec<String>,
}

/// How the hook authenticates against the media server.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A token supplied directly by the operator.
    Token(String),
    /// Account credentials exchanged for a token at sign-in.
    Login {
        /// Account login.
        username: String,
        /// Account password.
        password: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => formatter.debug_tuple("Token").field(&"<redacted>").finish(),
            Self::Login { username, .. } => formatter
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Location of the media server and its identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlexServer {
    /// Base URL of the media server; the path always ends with `/`.
    pub base_url: Url,
    /// Sign-in endpoint used for credential exchange.
    pub signin_url: Url,
}

/// Settings that only matter when library refresh is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSettings {
    /// Targeting strategy.
    pub strategy: RefreshStrategy,
    /// Category lists and explicit targets.
    pub mapping: CategoryMapping,
    /// Media server location.
    pub server: PlexServer,
    /// Authentication material.
    pub credentials: Credentials,
}

/// Settings that only matter when GUI notifications are enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifySettings {
    /// Client addresses, `host` or `host:port`.
    pub clients: Vec<String>,
    /// Port appended to addresses that do not carry one.
    pub default_port: u16,
    /// Prefer direct-download header metadata over the raw display name.
    pub direct_headers: bool,
}

/// Complete, validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Outcome of the triggering job.
    pub outcome: JobOutcome,
    /// Metadata describing the triggering job.
    pub job: JobMetadata,
    /// Report success even when a gated call fails.
    pub silent_failure: bool,
    /// Present when library refresh is enabled.
    pub refresh: Option<RefreshSettings>,
    /// Present when GUI notifications are enabled.
    pub notify: Option<NotifySettings>,
    /// Timeout applied to each outbound request.
    pub http_timeout: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_requires_success_prefix() {
        assert_eq!(JobOutcome::from_status("SUCCESS/ALL"), JobOutcome::Success);
        assert_eq!(JobOutcome::from_status(" SUCCESS/UNPACK "), JobOutcome::Success);
        assert_eq!(JobOutcome::from_status("SUCCESS"), JobOutcome::Failure);
        assert_eq!(JobOutcome::from_status("FAILURE/PAR"), JobOutcome::Failure);
        assert_eq!(JobOutcome::from_status("WARNING/SCRIPT"), JobOutcome::Failure);
        assert_eq!(JobOutcome::from_status("SUCCESSFUL"), JobOutcome::Failure);
        assert_eq!(JobOutcome::from_status(""), JobOutcome::Failure);
    }

    #[test]
    fn strategy_membership() {
        assert!(RefreshStrategy::Auto.includes_auto());
        assert!(!RefreshStrategy::Auto.includes_custom());
        assert!(RefreshStrategy::Custom.includes_custom());
        assert!(!RefreshStrategy::Custom.includes_auto());
        assert!(RefreshStrategy::Both.includes_auto());
        assert!(RefreshStrategy::Both.includes_custom());
    }

    #[test]
    fn credentials_debug_hides_secrets() {
        let token = format!("{:?}", Credentials::Token("abc123".into()));
        assert!(!token.contains("abc123"));

        let login = format!(
            "{:?}",
            Credentials::Login {
                username: "alice".into(),
                password: "hunter2".into(),
            }
        );
        assert!(login.contains("alice"));
        assert!(!login.contains("hunter2"));
    }
}
