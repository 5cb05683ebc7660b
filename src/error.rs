//! Error types shared by the polling pipeline.
//!
//! Every failure the poller can observe is a [`BotError`] variant, and each
//! variant belongs to exactly one [`ErrorKind`]. The poller matches on the
//! kind to decide whether an iteration is aborted, a single record is
//! skipped, or the operator should be alerted.

use thiserror::Error;

use crate::telegram::TelegramError;

/// Broad classification of a [`BotError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credentials or invalid settings. Fatal at startup.
    Configuration,
    /// The review API could not be reached or answered with a non-200 status.
    Endpoint,
    /// The API response does not have the expected shape.
    Structural,
    /// A homework record carries an unknown status or lacks required fields.
    UndefinedStatus,
    /// The Telegram message could not be delivered.
    Delivery,
    /// Anything the pipeline does not expect to happen in normal operation.
    Unexpected,
}

/// Errors produced while polling the review API and dispatching notifications.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Configuration(Vec<&'static str>),

    #[error("Endpoint unavailable: status {status} ({reason}), body: {body}")]
    EndpointUnavailable {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Request to the review API failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Unexpected response structure: {0}")]
    Structure(String),

    #[error("Missing field in API response: {0}")]
    MissingField(&'static str),

    #[error("Undocumented homework status: {0}")]
    UndefinedStatus(String),

    #[error("Homework record has no valid `{field}` field")]
    MalformedRecord { field: &'static str },

    #[error("Failed to deliver message: {0}")]
    Delivery(#[from] TelegramError),

    #[error("Failed to decode API response: {0}")]
    Decode(String),
}

impl BotError {
    /// Returns the classification used by the poller.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::EndpointUnavailable { .. } | Self::Transport(_) => ErrorKind::Endpoint,
            Self::Structure(_) | Self::MissingField(_) => ErrorKind::Structural,
            Self::UndefinedStatus(_) | Self::MalformedRecord { .. } => ErrorKind::UndefinedStatus,
            Self::Delivery(_) => ErrorKind::Delivery,
            Self::Decode(_) => ErrorKind::Unexpected,
        }
    }
}
