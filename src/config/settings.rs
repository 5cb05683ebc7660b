//! Credentials and runtime settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Default Practicum homework status endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Names of the environment variables that must be set before polling starts.
pub const TOKEN_NAMES: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Secrets required to talk to the review API and to Telegram.
#[derive(Clone, Default)]
pub struct Credentials {
    /// OAuth token for the Practicum API.
    pub practicum_token: String,

    /// Telegram bot token.
    pub telegram_token: String,

    /// Chat that receives notifications.
    pub chat_id: String,
}

impl Credentials {
    /// Creates credentials from explicit values.
    #[must_use]
    pub fn new(
        practicum_token: impl Into<String>,
        telegram_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            practicum_token: practicum_token.into(),
            telegram_token: telegram_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Reads credentials from the environment.
    ///
    /// Unset variables become empty strings; use [`Self::check_tokens`]
    /// before starting the bot.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self {
            practicum_token: var("PRACTICUM_TOKEN"),
            telegram_token: var("TELEGRAM_TOKEN"),
            chat_id: var("TELEGRAM_CHAT_ID"),
        }
    }

    /// Returns the names of the credentials that are empty.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let values = [&self.practicum_token, &self.telegram_token, &self.chat_id];
        TOKEN_NAMES
            .into_iter()
            .zip(values)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Checks that every credential is present, logging the missing ones.
    pub fn check_tokens(&self) -> bool {
        let missing = self.missing();
        if missing.is_empty() {
            debug!("All tokens are present");
            true
        } else {
            error!("Missing required tokens: {}", missing.join(", "));
            false
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// Bot-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Review API endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Telegram Bot API base URL.
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Pause between polling iterations in seconds.
    #[serde(default = "default_retry_period")]
    pub retry_period_secs: u64,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Start the cursor at the current time instead of the epoch.
    #[serde(default)]
    pub start_from_now: bool,

    /// Optional verdict table file. The built-in table is used when unset.
    #[serde(default)]
    pub verdicts_path: Option<PathBuf>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn default_telegram_api_url() -> String {
    DEFAULT_TELEGRAM_API_URL.to_owned()
}

fn default_retry_period() -> u64 {
    600 // 10 minutes between polls
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            telegram_api_url: default_telegram_api_url(),
            retry_period_secs: default_retry_period(),
            request_timeout_secs: default_request_timeout(),
            start_from_now: false,
            verdicts_path: None,
        }
    }
}

impl BotSettings {
    /// Creates bot settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self {
            endpoint: std::env::var("ENDPOINT").unwrap_or_else(|_| default_endpoint()),
            telegram_api_url: std::env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| default_telegram_api_url()),
            retry_period_secs: parse_secs(std::env::var("RETRY_PERIOD").ok().as_deref())
                .unwrap_or_else(default_retry_period),
            request_timeout_secs: parse_secs(std::env::var("REQUEST_TIMEOUT").ok().as_deref())
                .unwrap_or_else(default_request_timeout),
            start_from_now: std::env::var("START_FROM_NOW")
                .ok()
                .is_some_and(|s| parse_flag(&s)),
            verdicts_path: std::env::var("VERDICTS_PATH").ok().map(PathBuf::from),
        }
    }

    /// Pause between polling iterations, never shorter than one second.
    #[must_use]
    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs.max(1))
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Cursor value for the first poll.
    #[must_use]
    pub fn initial_cursor(&self) -> i64 {
        if self.start_from_now {
            chrono::Utc::now().timestamp()
        } else {
            0
        }
    }
}

/// Parses a positive number of seconds; zero and garbage yield `None`.
fn parse_secs(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|s| s.trim().parse().ok())
        .filter(|&secs| secs > 0)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
