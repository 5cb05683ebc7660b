//! Homework polling loop.
//!
//! Every cycle follows the same steps:
//! 1. Fetch statuses changed since the cursor
//! 2. Check the response shape and extract homework records
//! 3. Translate each record and skip those already delivered
//! 4. Notify the chat about every changed record
//! 5. Advance the cursor if nothing in the batch failed
//! 6. Sleep for the retry period, whatever happened above
//!
//! Errors from steps 1-2 abort the cycle but never the loop. Errors in
//! step 3-4 only affect the record they belong to.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::PollState;
use crate::config::{BotSettings, Credentials, VerdictTable};
use crate::error::{BotError, ErrorKind};
use crate::practicum::{PracticumClient, extract_homeworks, next_cursor, parse_status};
use crate::telegram::{MessageSender, Notifier, TelegramBot};

/// Summary of a single successful poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IterationOutcome {
    /// Notifications delivered.
    pub delivered: usize,
    /// Records whose report was already delivered.
    pub unchanged: usize,
    /// Records that could not be translated or delivered.
    pub failed: usize,
    /// Whether the cursor moved.
    pub cursor_advanced: bool,
}

/// Polls the review API and reports status changes to one chat.
pub struct HomeworkPoller<S> {
    /// Review API client.
    client: PracticumClient,

    /// Notification channel.
    notifier: Notifier<S>,

    /// Status code to verdict mapping.
    verdicts: VerdictTable,

    /// Cursor and delivered reports.
    state: PollState,

    /// Pause between cycles.
    retry_period: Duration,
}

impl HomeworkPoller<TelegramBot> {
    /// Builds the production poller from credentials and settings.
    ///
    /// Credentials are checked first, so nothing is contacted when a
    /// token is missing.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Configuration`] naming the missing credentials,
    /// or an error if an HTTP client cannot be built.
    pub fn from_config(
        credentials: &Credentials,
        settings: &BotSettings,
        verdicts: VerdictTable,
    ) -> Result<Self, BotError> {
        if !credentials.check_tokens() {
            return Err(BotError::Configuration(credentials.missing()));
        }

        let client = PracticumClient::new(
            settings.endpoint.clone(),
            credentials.practicum_token.clone(),
            settings.request_timeout(),
        )?;
        let bot = TelegramBot::new(
            &settings.telegram_api_url,
            credentials.telegram_token.clone(),
            settings.request_timeout(),
        )?;

        Ok(Self::new(
            client,
            Notifier::new(bot, credentials.chat_id.clone()),
            verdicts,
            settings.initial_cursor(),
            settings.retry_period(),
        ))
    }
}

impl<S: MessageSender> HomeworkPoller<S> {
    /// Creates a poller starting at `initial_cursor`.
    #[must_use]
    pub fn new(
        client: PracticumClient,
        notifier: Notifier<S>,
        verdicts: VerdictTable,
        initial_cursor: i64,
        retry_period: Duration,
    ) -> Self {
        Self {
            client,
            notifier,
            verdicts,
            state: PollState::new(initial_cursor),
            retry_period,
        }
    }

    /// Runs the polling loop forever.
    pub async fn run(&mut self) {
        self.run_until(std::future::pending()).await;
    }

    /// Runs the polling loop until `shutdown` completes.
    pub async fn run_until(&mut self, shutdown: impl Future<Output = ()>) {
        info!(
            "Homework poller started (endpoint: {}, cursor: {}, retry period: {:?})",
            self.client.endpoint(),
            self.state.cursor,
            self.retry_period
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Homework poller stopped");
                    break;
                }
                () = self.cycle() => {}
            }
        }
    }

    /// One iteration followed by the unconditional sleep.
    async fn cycle(&mut self) {
        self.iteration().await;
        sleep(self.retry_period).await;
    }

    /// Polls once and handles any error, never failing.
    pub async fn iteration(&mut self) {
        match self.poll_once().await {
            Ok(outcome) => {
                debug!("Poll finished: {:?}", outcome);
                self.state.clear_alert();
            }
            Err(e) => self.handle_error(e).await,
        }
    }

    /// Fetches statuses once and notifies about changes.
    ///
    /// # Errors
    ///
    /// Returns endpoint, structural, or unexpected errors that abort the
    /// iteration. Per-record errors are logged and counted instead.
    pub async fn poll_once(&mut self) -> Result<IterationOutcome, BotError> {
        let response = self.client.fetch(self.state.cursor).await?;
        let homeworks = extract_homeworks(&response)?;
        let next = next_cursor(&response, self.state.cursor);

        let mut outcome = IterationOutcome::default();

        if homeworks.is_empty() {
            debug!("No changes in homework statuses");
            outcome.cursor_advanced = self.state.advance_cursor(next);
            return Ok(outcome);
        }

        for record in homeworks {
            let report = match parse_status(record, &self.verdicts) {
                Ok(report) => report,
                Err(e) => {
                    error!("Skipping homework record: {}", e);
                    outcome.failed += 1;
                    continue;
                }
            };

            if self.state.is_unchanged(&report) {
                debug!("No changes for homework \"{}\"", report.name);
                outcome.unchanged += 1;
                continue;
            }

            if self.notifier.notify(&report.message).await {
                self.state.record_delivered(report);
                outcome.delivered += 1;
            } else {
                outcome.failed += 1;
            }
        }

        if outcome.failed > 0 {
            warn!(
                "{} homework record(s) failed, cursor held at {}",
                outcome.failed, self.state.cursor
            );
        } else if outcome.delivered > 0 {
            outcome.cursor_advanced = self.state.advance_cursor(next);
        }

        Ok(outcome)
    }

    async fn handle_error(&mut self, err: BotError) {
        match err.kind() {
            ErrorKind::Endpoint => error!("Review API unavailable: {}", err),
            ErrorKind::Structural => error!("Unexpected API response: {}", err),
            ErrorKind::Configuration | ErrorKind::UndefinedStatus | ErrorKind::Delivery => {
                error!("Poll failed: {}", err);
            }
            ErrorKind::Unexpected => {
                let alert = format!("Сбой в работе программы: {err}");
                error!("{}", alert);
                if self.state.is_new_alert(&alert) && self.notifier.notify(&alert).await {
                    self.state.record_alert(alert);
                }
            }
        }
    }

    /// Gets a reference to the poller state.
    #[must_use]
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Gets a reference to the notifier.
    #[must_use]
    pub fn notifier(&self) -> &Notifier<S> {
        &self.notifier
    }
}

impl<S> std::fmt::Debug for HomeworkPoller<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomeworkPoller")
            .field("client", &self.client)
            .field("state", &self.state)
            .field("retry_period", &self.retry_period)
            .finish_non_exhaustive()
    }
}
