//! Homework polling module.
//!
//! Periodically queries the review API and notifies the chat
//! about homework status changes.

mod runner;
mod state;

pub use runner::{HomeworkPoller, IterationOutcome};
pub use state::PollState;
