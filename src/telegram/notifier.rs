//! Failure-isolating notification wrapper.

use async_trait::async_trait;
use tracing::{debug, error};

use super::TelegramError;
use crate::error::BotError;

/// Anything that can deliver a text message to a chat.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Sends `text` to `chat_id`.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TelegramError>;
}

/// Sends messages to one fixed chat and never propagates delivery errors.
#[derive(Debug)]
pub struct Notifier<S> {
    sender: S,
    chat_id: String,
}

impl<S: MessageSender> Notifier<S> {
    /// Creates a notifier bound to `chat_id`.
    pub fn new(sender: S, chat_id: impl Into<String>) -> Self {
        Self {
            sender,
            chat_id: chat_id.into(),
        }
    }

    /// Sends `message`, returning whether delivery succeeded.
    pub async fn notify(&self, message: &str) -> bool {
        match self.sender.send_message(&self.chat_id, message).await {
            Ok(()) => {
                debug!("Message sent: {}", message);
                true
            }
            Err(e) => {
                let err = BotError::from(e);
                error!(kind = ?err.kind(), "Message not sent: {}", err);
                false
            }
        }
    }

    /// Returns the underlying sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl MessageSender for Recorder {
        async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TelegramError> {
            if self.fail {
                return Err(TelegramError::FloodWait(5));
            }
            self.sent
                .lock()
                .unwrap()
                .push((chat_id.to_owned(), text.to_owned()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_notify_success() {
        let notifier = Notifier::new(Recorder::default(), "42");
        assert!(notifier.notify("hello").await);
        assert_eq!(
            *notifier.sender().sent.lock().unwrap(),
            vec![("42".to_owned(), "hello".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_notify_failure_returns_false() {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let notifier = Notifier::new(recorder, "42");
        assert!(!notifier.notify("hello").await);
    }
}
