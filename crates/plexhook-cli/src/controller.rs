//! Run controller: sequences the notification and refresh phases.
//!
//! # Design
//! - A run moves `Start -> Notify -> Refresh -> Done`; disabled phases are
//!   skipped and a failed job goes straight to `Done(Skipped)`.
//! - Calls are awaited one after another; nothing runs concurrently.
//! - Gated errors go through the [`FailurePolicy`] at the point of failure, and
//!   no later call is attempted.

use plexhook_config::{JobOutcome, RefreshSettings, RunConfig};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::GatedError;
use crate::gate::FailurePolicy;
use crate::notify::notify_clients;
use crate::outcome::RunResult;
use crate::plex::PlexClient;
use crate::targeting::TargetPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Notify,
    Refresh,
    Done(RunResult),
}

/// Execute one run against the configured services.
pub async fn execute(config: &RunConfig, http: &Client) -> RunResult {
    let mut phase = Phase::Start;
    loop {
        phase = match phase {
            Phase::Start => start(config),
            Phase::Notify => notify_phase(config, http).await,
            Phase::Refresh => refresh_phase(config, http).await,
            Phase::Done(result) => return result,
        };
    }
}

fn start(config: &RunConfig) -> Phase {
    if config.outcome == JobOutcome::Failure {
        warn!(
            job = %config.job.display_name,
            "download did not succeed, skipping library refresh and notifications"
        );
        return Phase::Done(RunResult::Skipped);
    }
    if config.notify.is_some() {
        Phase::Notify
    } else {
        Phase::Refresh
    }
}

async fn notify_phase(config: &RunConfig, http: &Client) -> Phase {
    if let Some(settings) = &config.notify {
        let summary = notify_clients(http, settings, &config.job).await;
        debug!(
            delivered = summary.delivered,
            failed = summary.failed,
            "GUI notifications finished"
        );
    }
    Phase::Refresh
}

async fn refresh_phase(config: &RunConfig, http: &Client) -> Phase {
    let Some(settings) = &config.refresh else {
        debug!("library refresh disabled");
        return Phase::Done(RunResult::ProceedSuccess);
    };
    let result = match refresh_library(http, settings, &config.job.category).await {
        Ok(refreshed) => {
            info!(sections = refreshed, strategy = settings.strategy.as_str(), "library refresh finished");
            RunResult::ProceedSuccess
        }
        Err(err) => FailurePolicy::new(config.silent_failure).resolve(&err),
    };
    Phase::Done(result)
}

async fn refresh_library(
    http: &Client,
    settings: &RefreshSettings,
    category: &str,
) -> Result<usize, GatedError> {
    let plan = TargetPlan::new(settings.strategy, category, &settings.mapping)?;
    debug!(
        kind = ?plan.auto_kind(),
        catalog = plan.needs_catalog(),
        "planned library refresh targets"
    );
    let plex = PlexClient::new(http, &settings.server);
    let token = plex.resolve_token(&settings.credentials).await?;
    let catalog = if plan.needs_catalog() {
        plex.fetch_sections(&token).await?
    } else {
        Vec::new()
    };

    let targets = plan.resolve(&catalog);
    if targets.is_empty() {
        warn!(%category, "no library sections matched, nothing to refresh");
        return Ok(0);
    }
    Ok(plex.refresh_sections(&token, &targets).await?)
}
