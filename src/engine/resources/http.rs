//! `http://` and `https://` resource resolution.

use crate::error::EngineError;
use std::time::Duration;

const USER_AGENT: &str = concat!("mcp-engine/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch a resource over HTTP(S) with a fixed User-Agent and 30 second
/// timeout. Non-2xx responses are reported as `UpstreamHttp`, not silently
/// returned as content.
pub async fn resolve(client: &reqwest::Client, uri: &str) -> Result<(String, Vec<u8>), EngineError> {
    let response = client
        .get(uri)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .timeout(TIMEOUT)
        .send()
        .await
        .map_err(|e| EngineError::UpstreamHttp(format!("request to {uri} failed: {e}")))?;

    if !response.status().is_success() {
        return Err(EngineError::UpstreamHttp(format!(
            "{uri} returned status {}",
            response.status()
        )));
    }

    let mime_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = response
        .bytes()
        .await
        .map_err(|e| EngineError::UpstreamHttp(format!("failed to read body of {uri}: {e}")))?;

    Ok((mime_type, bytes.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetches_successful_response_with_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("payload")
                    .insert_header("content-type", "text/plain"),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let (mime, bytes) = resolve(&client, &format!("{}/thing", server.uri()))
            .await
            .unwrap();
        assert_eq!(mime, "text/plain");
        assert_eq!(bytes, b"payload");
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = resolve(&client, &format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::UpstreamHttp(_)));
    }
}
