#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Typed run configuration for the plexhook post-processing hook.
//!
//! Layout: `model.rs` (immutable run configuration), `loader.rs` (building a
//! [`RunConfig`] from raw invoker settings), `validate.rs` (parsing helpers),
//! `defaults.rs` (fallback values), `error.rs` (configuration errors).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::RawSettings;
pub use model::{
    CategoryMapping, Credentials, JobMetadata, JobOutcome, NotifySettings, PlexServer,
    RefreshSettings, RefreshStrategy, RunConfig,
};
