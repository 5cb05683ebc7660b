//! Configuration module for the homework bot.
//!
//! Handles credentials, runtime settings loaded from the environment,
//! and the verdict table that maps review statuses to messages.

mod settings;
mod verdicts;

pub use settings::{
    BotSettings, Credentials, DEFAULT_ENDPOINT, DEFAULT_TELEGRAM_API_URL, TOKEN_NAMES,
};
pub use verdicts::{VerdictError, VerdictTable};

/// Maximum length of a single Telegram text message.
pub const MAX_MESSAGE_LENGTH: usize = 4096;
