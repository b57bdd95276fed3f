//! Token resolution: a configured token or a username/password sign-in.

use plexhook_config::Credentials;
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info};

use super::{AuthToken, PlexClient};
use crate::client::plex_identity_headers;
use crate::error::{AuthError, XmlError};

const TOKEN_ATTRIBUTES: [&str; 2] = ["authToken", "authenticationToken"];

impl PlexClient<'_> {
    /// Produce an access token for the configured credentials.
    ///
    /// A configured token is used as-is and makes no network call.
    pub(crate) async fn resolve_token(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthToken, AuthError> {
        match credentials {
            Credentials::Token(token) => {
                debug!("using configured media server token");
                Ok(AuthToken::new(token.clone()))
            }
            Credentials::Login { username, password } => self.sign_in(username, password).await,
        }
    }

    async fn sign_in(&self, username: &str, password: &str) -> Result<AuthToken, AuthError> {
        let url = self.server.signin_url.clone();
        let shown = url.to_string();
        let response = self
            .http
            .post(url)
            .headers(plex_identity_headers())
            .form(&[("user[login]", username), ("user[password]", password)])
            .send()
            .await
            .map_err(|err| AuthError::Transport {
                url: shown.clone(),
                source: err.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status {
                url: shown,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|err| AuthError::Transport {
            url: shown.clone(),
            source: err.without_url(),
        })?;
        let token = parse_auth_token(&body).map_err(|source| AuthError::Malformed {
            url: shown,
            source,
        })?;
        info!("signed in to Plex");
        Ok(AuthToken::new(token))
    }
}

/// Extract the token attribute from the root element of a sign-in response.
pub(crate) fn parse_auth_token(xml: &str) -> Result<String, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                let mut fallback = None;
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr.unescape_value()?.trim().to_string();
                    if value.is_empty() {
                        continue;
                    }
                    if key == TOKEN_ATTRIBUTES[0] {
                        return Ok(value);
                    }
                    if key == TOKEN_ATTRIBUTES[1] {
                        fallback = Some(value);
                    }
                }
                return fallback.ok_or(XmlError::MissingAttribute(TOKEN_ATTRIBUTES[0]));
            }
            Event::Eof => return Err(XmlError::Empty),
            _ => {}
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
    use std::time::Duration;

    const SIGN_IN_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<user email="viewer@example.com" id="1" authenticationToken="legacy" authToken="abc123">
  <subscription active="1" status="Active"/>
</user>"#;

    #[test]
    fn token_is_read_from_root_element() -> Result<()> {
        assert_eq!(parse_auth_token(SIGN_IN_BODY)?, "abc123");
        assert_eq!(
            parse_auth_token(r#"<user authenticationToken="legacy"/>"#)?,
            "legacy"
        );
        Ok(())
    }

    #[test]
    fn escaped_token_is_decoded() -> Result<()> {
        assert_eq!(parse_auth_token(r#"<user authToken="a&amp;b&lt;c"/>"#)?, "a&b<c");
        Ok(())
    }

    #[test]
    fn missing_or_empty_token_is_rejected() {
        assert!(matches!(
            parse_auth_token(r#"<user id="1"><authToken>x</authToken></user>"#),
            Err(XmlError::MissingAttribute("authToken"))
        ));
        assert!(matches!(
            parse_auth_token(r#"<user authToken=""/>"#),
            Err(XmlError::MissingAttribute(_))
        ));
        assert!(matches!(parse_auth_token(""), Err(XmlError::Empty)));
    }

    #[tokio::test]
    async fn configured_token_skips_sign_in() -> Result<()> {
        let mock_server = MockServer::start_async().await;
        let mock = mock_server.mock(|when, then| {
            when.method(POST).path("/users/sign_in.xml");
            then.status(500);
        });
        let http = Client::new();
        let server = server_for(&mock_server)?;
        let plex = PlexClient::new(&http, &server);

        let token = plex
            .resolve_token(&Credentials::Token("tok".into()))
            .await?;
        assert_eq!(token.as_str(), "tok");
        mock.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_posts_identity_headers() -> Result<()> {
        let mock_server = MockServer::start_async().await;
        let mock = mock_server.mock(|when, then| {
            when.method(POST)
                .path("/users/sign_in.xml")
                .header("x-plex-product", "plexhook")
                .header("x-plex-provides", "controller");
            then.status(201)
                .header("content-type", "application/xml")
                .body(SIGN_IN_BODY);
        });
        let http = Client::new();
        let server = server_for(&mock_server)?;
        let plex = PlexClient::new(&http, &server);

        let token = plex
            .resolve_token(&Credentials::Login {
                username: "viewer".into(),
                password: "hunter2".into(),
            })
            .await?;
        assert_eq!(token.as_str(), "abc123");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials_surface_status() -> Result<()> {
        let mock_server = MockServer::start_async().await;
        mock_server.mock(|when, then| {
            when.method(POST).path("/users/sign_in.xml");
            then.status(401);
        });
        let http = Client::new();
        let server = server_for(&mock_server)?;
        let plex = PlexClient::new(&http, &server);

        let err = plex
            .resolve_token(&Credentials::Login {
                username: "viewer".into(),
                password: "wrong".into(),
            })
            .await
            .err()
            .ok_or_else(|| anyhow!("expected sign-in failure"))?;
        assert!(matches!(err, AuthError::Status { status: 401, .. }));
        Ok(())
    }

    #[tokio::test]
    async fn slow_sign_in_times_out() -> Result<()> {
        let mock_server = MockServer::start_async().await;
        mock_server.mock(|when, then| {
            when.method(POST).path("/users/sign_in.xml");
            then.status(200)
                .delay(Duration::from_millis(500))
                .body(SIGN_IN_BODY);
        });
        let http = Client::builder()
            .timeout(Duration::from_millis(50))
            .build()?;
        let server = server_for(&mock_server)?;
        let plex = PlexClient::new(&http, &server);

        let err = plex
            .resolve_token(&Credentials::Login {
                username: "viewer".into(),
                password: "hunter2".into(),
            })
            .await
            .err()
            .ok_or_else(|| anyhow!("expected timeout"))?;
        match err {
            AuthError::Transport { source, .. } => assert!(source.is_timeout()),
            other => return Err(anyhow!("unexpected error: {other}")),
        }
        Ok(())
    }
}
