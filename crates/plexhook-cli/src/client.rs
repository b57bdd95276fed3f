//! Shared HTTP client and the identity headers sent to Plex.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

const PLEX_IDENTITY: [(&str, &str); 7] = [
    ("x-plex-platform", "NZBGet"),
    ("x-plex-platform-version", env!("CARGO_PKG_VERSION")),
    ("x-plex-provides", "controller"),
    ("x-plex-product", "plexhook"),
    ("x-plex-version", env!("CARGO_PKG_VERSION")),
    ("x-plex-device", "NZBGet"),
    ("x-plex-client-identifier", "plexhook-nzbget"),
];

/// Build the HTTP client used for every call in a run.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised or `request_id`
/// is not a valid header value.
pub fn build_http_client(timeout: Duration, request_id: &str) -> anyhow::Result<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(request_id)
        .map_err(|_| anyhow::anyhow!("run identifier contains invalid characters"))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("plexhook/", env!("CARGO_PKG_VERSION")))
        .default_headers(default_headers)
        .build()
        .map_err(|err| anyhow::anyhow!("failed to build HTTP client: {err}"))
}

/// Headers identifying this product to the Plex sign-in service.
pub(crate) fn plex_identity_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(PLEX_IDENTITY.len());
    for (name, value) in PLEX_IDENTITY {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;

    #[test]
    fn identity_headers_name_the_product() {
        let headers = plex_identity_headers();
        assert_eq!(headers.len(), PLEX_IDENTITY.len());
        assert_eq!(
            headers.get("x-plex-product").and_then(|v| v.to_str().ok()),
            Some("plexhook")
        );
        assert_eq!(
            headers.get("x-plex-provides").and_then(|v| v.to_str().ok()),
            Some("controller")
        );
    }

    #[test]
    fn request_id_must_be_header_safe() {
        assert!(build_http_client(Duration::from_secs(1), "bad\nid").is_err());
    }

    #[tokio::test]
    async fn client_sends_request_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ping")
                .header(HEADER_REQUEST_ID, "run-1");
            then.status(200);
        });

        let client = build_http_client(Duration::from_secs(5), "run-1")?;
        let response = client.get(server.url("/ping")).send().await?;
        assert!(response.status().is_success());
        mock.assert();
        Ok(())
    }
}
