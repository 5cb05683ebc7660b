//! Poller state: time cursor and delivered reports.

use std::collections::HashMap;

use crate::practicum::Report;

/// In-memory state of the homework poller. Nothing here survives a restart.
#[derive(Debug, Default)]
pub struct PollState {
    /// Lower bound (Unix seconds) of the next query window.
    pub cursor: i64,

    /// Last delivered message per homework name.
    delivered: HashMap<String, String>,

    /// Most recently delivered report.
    last_report: Option<Report>,

    /// Last alert sent about a failed iteration.
    last_alert: Option<String>,
}

impl PollState {
    /// Creates state starting at `cursor`.
    #[must_use]
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    /// Checks whether `report` was already delivered for its homework.
    #[must_use]
    pub fn is_unchanged(&self, report: &Report) -> bool {
        self.delivered.get(&report.name) == Some(&report.message)
    }

    /// Remembers a delivered report.
    pub fn record_delivered(&mut self, report: Report) {
        self.delivered
            .insert(report.name.clone(), report.message.clone());
        self.last_report = Some(report);
    }

    /// Returns the most recently delivered report.
    #[must_use]
    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }

    /// Moves the cursor, returning whether it changed.
    pub fn advance_cursor(&mut self, cursor: i64) -> bool {
        let changed = self.cursor != cursor;
        self.cursor = cursor;
        changed
    }

    /// Checks whether `alert` differs from the previous alert.
    #[must_use]
    pub fn is_new_alert(&self, alert: &str) -> bool {
        self.last_alert.as_deref() != Some(alert)
    }

    /// Remembers an alert so it is not repeated.
    pub fn record_alert(&mut self, alert: String) {
        self.last_alert = Some(alert);
    }

    /// Forgets the last alert after a successful iteration.
    pub fn clear_alert(&mut self) {
        self.last_alert = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, message: &str) -> Report {
        Report {
            name: name.to_owned(),
            message: message.to_owned(),
        }
    }

    #[test]
    fn test_default_state() {
        let state = PollState::default();
        assert_eq!(state.cursor, 0);
        assert!(state.last_report().is_none());
    }

    #[test]
    fn test_unchanged_compares_by_value() {
        let mut state = PollState::new(0);
        assert!(!state.is_unchanged(&report("hw1", "approved")));

        state.record_delivered(report("hw1", "reviewing"));
        assert!(state.is_unchanged(&report("hw1", "reviewing")));
        assert!(!state.is_unchanged(&report("hw1", "approved")));
        assert!(!state.is_unchanged(&report("hw2", "reviewing")));
        assert_eq!(state.last_report(), Some(&report("hw1", "reviewing")));
    }

    #[test]
    fn test_advance_cursor() {
        let mut state = PollState::new(100);
        assert!(!state.advance_cursor(100));
        assert!(state.advance_cursor(200));
        assert_eq!(state.cursor, 200);
    }

    #[test]
    fn test_alerts_are_deduplicated_until_cleared() {
        let mut state = PollState::new(0);
        assert!(state.is_new_alert("boom"));
        state.record_alert("boom".to_owned());
        assert!(!state.is_new_alert("boom"));
        state.clear_alert();
        assert!(state.is_new_alert("boom"));
    }
}
