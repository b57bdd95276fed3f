//! Best-effort on-screen notifications sent to media-center clients.
//!
//! # Design
//! - Each client receives a JSON-RPC `GUI.ShowNotification` call in turn.
//! - A failed client is logged at WARN and never changes the run result.

use std::net::{Ipv6Addr, SocketAddr};

use plexhook_config::{JobMetadata, NotifySettings};
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::NotificationError;

const NOTIFICATION_TITLE: &str = "Downloaded";
const NOTIFICATION_METHOD: &str = "GUI.ShowNotification";
const JSONRPC_PATH: &str = "/jsonrpc";

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    id: u32,
    jsonrpc: &'static str,
    method: &'static str,
    params: RpcParams<'a>,
}

#[derive(Debug, Serialize)]
struct RpcParams<'a> {
    title: &'static str,
    message: &'a str,
}

/// Delivery counts for one notification phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifySummary {
    /// Clients that acknowledged the notification.
    pub delivered: usize,
    /// Clients that could not be reached or answered with an error.
    pub failed: usize,
}

/// Notification text for a job.
///
/// Without direct headers the display name is used. With them, the proper
/// title is combined with the episode label or the year when present; an
/// episode label without a title yields empty text.
#[must_use]
pub fn compose_message(job: &JobMetadata, direct_headers: bool) -> String {
    if !direct_headers {
        return job.display_name.clone();
    }
    match (&job.proper_title, &job.episode, &job.year) {
        (Some(title), Some(episode), _) => format!("{title} - {episode}"),
        (Some(title), None, Some(year)) => format!("{title} ({year})"),
        (Some(title), None, None) => title.clone(),
        (None, Some(_), _) => String::new(),
        (None, None, _) => job.display_name.clone(),
    }
}

/// JSON-RPC endpoint for a configured client address.
///
/// Addresses may carry a port (`host:port`, `[v6]:port`); otherwise
/// `default_port` is used.
pub(crate) fn client_endpoint(address: &str, default_port: u16) -> Result<Url, NotificationError> {
    let authority = if has_explicit_port(address) {
        address.to_string()
    } else if address.parse::<Ipv6Addr>().is_ok() {
        format!("[{address}]:{default_port}")
    } else {
        format!("{address}:{default_port}")
    };
    Url::parse(&format!("http://{authority}{JSONRPC_PATH}"))
        .ok()
        .filter(|url| url.host_str().is_some_and(|host| !host.is_empty()))
        .ok_or_else(|| NotificationError::InvalidAddress {
            address: address.to_string(),
        })
}

fn has_explicit_port(address: &str) -> bool {
    if address.parse::<SocketAddr>().is_ok() {
        return true;
    }
    matches!(
        address.rsplit_once(':'),
        Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok()
    )
}

/// Send the job's notification to every configured client.
pub(crate) async fn notify_clients(
    http: &Client,
    settings: &NotifySettings,
    job: &JobMetadata,
) -> NotifySummary {
    let message = compose_message(job, settings.direct_headers);
    let mut summary = NotifySummary::default();
    for address in &settings.clients {
        match notify_client(http, address, settings.default_port, &message).await {
            Ok(()) => {
                info!(client = %address, "GUI notification sent");
                summary.delivered += 1;
            }
            Err(err) => {
                warn!(client = %address, error = %err, "GUI notification failed");
                summary.failed += 1;
            }
        }
    }
    summary
}

async fn notify_client(
    http: &Client,
    address: &str,
    default_port: u16,
    message: &str,
) -> Result<(), NotificationError> {
    let url = client_endpoint(address, default_port)?;
    let payload = RpcRequest {
        id: 1,
        jsonrpc: "2.0",
        method: NOTIFICATION_METHOD,
        params: RpcParams {
            title: NOTIFICATION_TITLE,
            message,
        },
    };
    let response = http
        .post(url)
        .json(&payload)
        .send()
        .await
        .map_err(|err| NotificationError::Transport {
            address: address.to_string(),
            source: err.without_url(),
        })?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(NotificationError::Status {
            address: address.to_string(),
            status: status.as_u16(),
        })
    }
}
