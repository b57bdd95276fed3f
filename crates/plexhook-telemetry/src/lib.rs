#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Logging setup shared by the plexhook binaries.
//!
//! The downloader that launches the hook reads its standard output line by
//! line and classifies each line by a bracketed severity prefix. The default
//! [`LogFormat::Nzbget`] output follows that convention; pretty and JSON
//! output remain available for running the hook by hand.

pub mod error;
pub mod format;
pub mod init;

pub use error::{Result, TelemetryError};
pub use format::{NzbgetFormat, severity_marker};
pub use init::{DEFAULT_LOG_LEVEL, LOG_PREFIX, LogFormat, LoggingConfig, init_logging};
