#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(
    dead_code,
    unused,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::redundant_pub_crate)]

//! Download post-processing hook that refreshes Plex library sections and
//! sends on-screen notifications to media-center clients.
//!
//! Layout:
//! - `cli.rs`: argument parsing and the process-level run
//! - `controller.rs`: phase sequencing for one run
//! - `plex/`: sign-in, section catalog, and refresh calls
//! - `targeting.rs`: which sections a job refreshes
//! - `notify.rs`: JSON-RPC notifications to clients
//! - `gate.rs`: silent-failure policy
//! - `client.rs`: shared HTTP client and identity headers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod controller;
pub(crate) mod error;
pub(crate) mod gate;
pub(crate) mod notify;
pub(crate) mod outcome;
pub(crate) mod plex;
pub(crate) mod targeting;

pub use cli::run;
pub use client::build_http_client;
pub use controller::execute;
pub use error::{
    AuthError, CatalogError, GatedError, NotificationError, RefreshError, TargetingError, XmlError,
};
pub use gate::FailurePolicy;
pub use notify::{NotifySummary, compose_message};
pub use outcome::{EXIT_ERROR, EXIT_NONE, EXIT_SUCCESS, RunResult};
pub use plex::{LibrarySection, SectionKind};
pub use targeting::{TargetPlan, classify_category, compute_targets};
