//! Per-section refresh requests.

use tracing::info;

use super::{AuthToken, PlexClient, TOKEN_QUERY_PARAM};
use crate::error::RefreshError;

impl PlexClient<'_> {
    /// Refresh each section in order, stopping at the first failure.
    ///
    /// Duplicate identifiers are refreshed once per occurrence. Returns the
    /// number of refreshes issued.
    pub(crate) async fn refresh_sections(
        &self,
        token: &AuthToken,
        ids: &[String],
    ) -> Result<usize, RefreshError> {
        for id in ids {
            self.refresh_section(token, id).await?;
            info!(section = %id, "targeted library refresh complete");
        }
        Ok(ids.len())
    }

    async fn refresh_section(&self, token: &AuthToken, id: &str) -> Result<(), RefreshError> {
        let url = self
            .endpoint(&["library", "sections", id, "refresh"])
            .ok_or_else(|| RefreshError::Endpoint {
                section: id.to_string(),
            })?;
        let response = self
            .http
            .get(url)
            .query(&[(TOKEN_QUERY_PARAM, token.as_str())])
            .send()
            .await
            .map_err(|err| RefreshError::Transport {
                section: id.to_string(),
                source: err.without_url(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RefreshError::Status {
                section: id.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plex::test_support::server_for;
    use anyhow::{Result, anyhow};
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use reqwest::Client;

    #[tokio::test]
    async fn duplicate_ids_refresh_twice() -> Result<()> {
        let mock_server = MockServer::start_async().await;
        let mock = mock_server.mock(|when, then| {
            when.method(GET)
                .path("/library/sections/3/refresh")
                .query_param("X-Plex-Token", "tok");
            then.status(200);
        });
        let http = Client::new();
        let server = server_for(&mock_server)?;
        let plex = PlexClient::new(&http, &server);

        let issued = plex
            .refresh_sections(&AuthToken::new("tok".into()), &["3".into(), "3".into()])
            .await?;
        assert_eq!(issued, 2);
        mock.assert_calls(2);
        Ok(())
    }

    #[tokio::test]
    async fn first_failure_halts_remaining_refreshes() -> Result<()> {
        let mock_server = MockServer::start_async().await;
        let failing = mock_server.mock(|when, then| {
            when.method(GET).path("/library/sections/1/refresh");
            then.status(404);
        });
        let untouched = mock_server.mock(|when, then| {
            when.method(GET).path("/library/sections/2/refresh");
            then.status(200);
        });
        let http = Client::new();
        let server = server_for(&mock_server)?;
        let plex = PlexClient::new(&http, &server);

        let err = plex
            .refresh_sections(&AuthToken::new("tok".into()), &["1".into(), "2".into()])
            .await
            .err()
            .ok_or_else(|| anyhow!("expected refresh failure"))?;
        assert!(matches!(
            err,
            RefreshError::Status { ref section, status: 404 } if section == "1"
        ));
        failing.assert();
        untouched.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn empty_target_list_makes_no_calls() -> Result<()> {
        let mock_server = MockServer::start_async().await;
        let mock = mock_server.mock(|when, then| {
            when.method(GET);
            then.status(200);
        });
        let http = Client::new();
        let server = server_for(&mock_server)?;
        let plex = PlexClient::new(&http, &server);

        let issued = plex
            .refresh_sections(&AuthToken::new("tok".into()), &[])
            .await?;
        assert_eq!(issued, 0);
        mock.assert_calls(0);
        Ok(())
    }
}
