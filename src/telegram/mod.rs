//! Telegram messaging module.
//!
//! Provides the Bot API client and the notifier used by the poller.

mod client;
mod notifier;

pub use client::{TelegramBot, TelegramError};
pub use notifier::{MessageSender, Notifier};
