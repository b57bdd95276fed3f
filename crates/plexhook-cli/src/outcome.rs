//! Final result of a run and its process exit code.

/// Exit code reported when post-processing succeeded.
pub const EXIT_SUCCESS: i32 = 93;
/// Exit code reported when post-processing failed.
pub const EXIT_ERROR: i32 = 94;
/// Exit code reported when the hook had nothing to do.
pub const EXIT_NONE: i32 = 95;

/// Outcome handed back to the downloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    /// All enabled phases completed, or a failure was silenced.
    ProceedSuccess,
    /// A gated call failed, or the settings were unusable.
    ProceedError,
    /// The job itself failed, so no action was taken.
    Skipped,
}

impl RunResult {
    /// Process exit code understood by the downloader.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::ProceedSuccess => EXIT_SUCCESS,
            Self::ProceedError => EXIT_ERROR,
            Self::Skipped => EXIT_NONE,
        }
    }

    /// Short label for log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProceedSuccess => "success",
            Self::ProceedError => "error",
            Self::Skipped => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_downloader_protocol() {
        assert_eq!(RunResult::ProceedSuccess.exit_code(), 93);
        assert_eq!(RunResult::ProceedError.exit_code(), 94);
        assert_eq!(RunResult::Skipped.exit_code(), 95);
    }
}
