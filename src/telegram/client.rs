//! Telegram Bot API client for outgoing messages.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::MessageSender;
use crate::config::MAX_MESSAGE_LENGTH;

/// Errors that can occur during Telegram operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Request to Telegram failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Telegram API error {code}: {description}")]
    Api { code: u16, description: String },

    #[error("Flood wait required: {0} seconds")]
    FloodWait(u32),
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<TgResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct TgResponseParameters {
    #[serde(default)]
    retry_after: Option<u32>,
}

/// Minimal Bot API client that can send text messages.
pub struct TelegramBot {
    /// HTTP client for API requests.
    client: Client,

    /// Bot API base URL, without trailing slash.
    api_url: String,

    /// Bot token.
    token: String,
}

impl TelegramBot {
    /// Creates a client for the Bot API at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_url: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_owned(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_url, self.token)
    }
}

#[async_trait]
impl MessageSender for TelegramBot {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TelegramError> {
        let text = truncate_message(text, MAX_MESSAGE_LENGTH);
        debug!("Sending to chat {}: \"{}\"", chat_id, truncate_for_log(&text, 30));

        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body: TgResponse = response.json().await?;
        if body.ok {
            return Ok(());
        }

        if let Some(seconds) = body.parameters.and_then(|p| p.retry_after) {
            warn!("Flood wait triggered: {} seconds", seconds);
            return Err(TelegramError::FloodWait(seconds));
        }

        Err(TelegramError::Api {
            code: body.error_code.unwrap_or_else(|| status.as_u16()),
            description: body
                .description
                .unwrap_or_else(|| "sendMessage failed".to_owned()),
        })
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

/// Cuts a message to the Telegram length limit.
fn truncate_message(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_owned()
    } else {
        text.chars().take(max_chars).collect()
    }
}

/// Truncates a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bot_for(server: &MockServer) -> TelegramBot {
        TelegramBot::new(&format!("{}/", server.uri()), "123:abc", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("Hello", 10), "Hello");
        assert_eq!(truncate_for_log("Hello, World!", 5), "Hello...");
    }

    #[test]
    fn test_truncate_message_counts_chars() {
        let text = "ы".repeat(10);
        assert_eq!(truncate_message(&text, 4).chars().count(), 4);
        assert_eq!(truncate_message("short", 4096), "short");
    }

    #[tokio::test]
    async fn test_send_message_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(serde_json::json!({"chat_id": "42", "text": "привет"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {"message_id": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        bot_for(&server).send_message("42", "привет").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_message_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = bot_for(&server).send_message("42", "hi").await.unwrap_err();
        match err {
            TelegramError::Api { code, description } => {
                assert_eq!(code, 400);
                assert!(description.contains("chat not found"));
            }
            other => panic!("Expected Api error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_message_flood_wait() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 429,
                "description": "Too Many Requests: retry after 17",
                "parameters": {"retry_after": 17}
            })))
            .mount(&server)
            .await;

        let err = bot_for(&server).send_message("42", "hi").await.unwrap_err();
        assert!(matches!(err, TelegramError::FloodWait(17)));
    }
}
