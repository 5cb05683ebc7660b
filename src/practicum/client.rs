//! HTTP client for the Practicum homework status API.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::error::BotError;

/// Client for the single homework status endpoint.
pub struct PracticumClient {
    /// HTTP client for API requests.
    client: Client,

    /// Full endpoint URL.
    endpoint: String,

    /// OAuth token sent in the `Authorization` header.
    token: String,
}

impl PracticumClient {
    /// Creates a client for `endpoint` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BotError::Transport)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    /// Requests homework statuses changed since `cursor` (Unix seconds).
    ///
    /// Only HTTP 200 counts as success. The body is returned as untyped JSON
    /// so its shape can be checked separately.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::EndpointUnavailable`] for any other status,
    /// [`BotError::Transport`] if the request itself fails, and
    /// [`BotError::Decode`] if the body is not JSON.
    pub async fn fetch(&self, cursor: i64) -> Result<Value, BotError> {
        debug!("Requesting {} with from_date={}", self.endpoint, cursor);

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", cursor)])
            .send()
            .await
            .map_err(BotError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let reason = status.canonical_reason().unwrap_or("Unknown").to_owned();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::EndpointUnavailable {
                status: status.as_u16(),
                reason,
                body,
            });
        }

        let body = response.text().await.map_err(BotError::Transport)?;
        serde_json::from_str(&body).map_err(|e| BotError::Decode(e.to_string()))
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> PracticumClient {
        PracticumClient::new(
            format!("{}/api/user_api/homework_statuses/", server.uri()),
            "practicum-token",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_token_and_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user_api/homework_statuses/"))
            .and(header("Authorization", "OAuth practicum-token"))
            .and(query_param("from_date", "1700000000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "homeworks": [],
                "current_date": 1_700_000_600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server).fetch(1_700_000_000).await.unwrap();
        assert_eq!(body["current_date"], 1_700_000_600);
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_endpoint_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Endpoint);
        match err {
            BotError::EndpointUnavailable {
                status,
                reason,
                body,
            } => {
                assert_eq!(status, 503);
                assert_eq!(reason, "Service Unavailable");
                assert_eq!(body, "maintenance");
            }
            other => panic!("Expected EndpointUnavailable, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_non_json_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(0).await.unwrap_err();
        assert!(matches!(err, BotError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/api/", listener.local_addr().unwrap());
        drop(listener);

        let client = PracticumClient::new(endpoint, "token", Duration::from_secs(1)).unwrap();
        let err = client.fetch(0).await.unwrap_err();
        assert!(matches!(err, BotError::Transport(_)));
    }
}
