//! Failure policy applied to gated errors.
//!
//! # Design
//! - The policy is decided once from the silent-failure setting.
//! - Silent mode downgrades a failure to a warning and reports success so the
//!   downloader does not mark the job as failed.

use tracing::{error, warn};

use crate::error::GatedError;
use crate::outcome::RunResult;

/// Maps gated failures to a run result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailurePolicy {
    silent: bool,
}

impl FailurePolicy {
    /// Policy for the given silent-failure setting.
    #[must_use]
    pub const fn new(silent: bool) -> Self {
        Self { silent }
    }

    /// Log `err` at the policy's severity and return the resulting outcome.
    #[must_use]
    pub fn resolve(self, err: &GatedError) -> RunResult {
        if self.silent {
            warn!(phase = err.phase(), error = %err, "silent failure mode active, reporting success");
            RunResult::ProceedSuccess
        } else {
            error!(phase = err.phase(), error = %err, "library refresh failed");
            RunResult::ProceedError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, TargetingError, XmlError};

    fn auth_failure() -> GatedError {
        AuthError::Malformed {
            url: "https://plex.example/sign_in.xml".into(),
            source: XmlError::MissingAttribute("authToken"),
        }
        .into()
    }

    #[test]
    fn silent_policy_reports_success() {
        let policy = FailurePolicy::new(true);
        assert_eq!(policy.resolve(&auth_failure()), RunResult::ProceedSuccess);
    }

    #[test]
    fn strict_policy_reports_error() {
        let policy = FailurePolicy::new(false);
        assert_eq!(policy.resolve(&auth_failure()), RunResult::ProceedError);
        let mismatch = GatedError::from(TargetingError::CategoryMismatch {
            category: "music".into(),
        });
        assert_eq!(policy.resolve(&mismatch), RunResult::ProceedError);
    }
}
