//! Verdict table: maps review status codes to human-readable text.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::MAX_MESSAGE_LENGTH;

/// Errors that can occur while loading or validating a verdict table.
#[derive(Debug, Error)]
pub enum VerdictError {
    #[error("Verdict table is empty")]
    NoVerdicts,

    #[error("Verdict table contains an empty status code")]
    EmptyStatus,

    #[error("Verdict for status `{status}` is empty")]
    EmptyVerdict { status: String },

    #[error("Verdict for status `{status}` is too long: {length} > {max_length}")]
    TooLong {
        status: String,
        length: usize,
        max_length: usize,
    },

    #[error("Failed to read verdict file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse verdict file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Mapping from homework status code to the verdict shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerdictTable {
    /// Status code to verdict text.
    pub verdicts: BTreeMap<String, String>,
}

impl Default for VerdictTable {
    fn default() -> Self {
        Self::from_pairs([
            ("approved", "Работа проверена: ревьюеру всё понравилось. Ура!"),
            ("reviewing", "Работа взята на проверку ревьюером."),
            ("rejected", "Работа проверена: у ревьюера есть замечания."),
        ])
    }
}

impl VerdictTable {
    /// Builds a table from `(status, verdict)` pairs.
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            verdicts: pairs
                .into_iter()
                .map(|(status, verdict)| (status.to_owned(), verdict.to_owned()))
                .collect(),
        }
    }

    /// Loads a verdict table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, VerdictError> {
        let content = std::fs::read_to_string(path)?;
        let table: Self = serde_json::from_str(&content)?;
        Ok(table)
    }

    /// Saves the verdict table to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), VerdictError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the table, stopping at the first problem.
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), VerdictError> {
        if self.verdicts.is_empty() {
            return Err(VerdictError::NoVerdicts);
        }
        self.verdicts
            .iter()
            .try_for_each(|(status, verdict)| check_entry(status, verdict))
    }

    /// Returns one validation result per entry, in status order.
    #[must_use]
    pub fn validate_all(&self) -> Vec<(String, Result<(), VerdictError>)> {
        if self.verdicts.is_empty() {
            return vec![(String::new(), Err(VerdictError::NoVerdicts))];
        }
        self.verdicts
            .iter()
            .map(|(status, verdict)| (status.clone(), check_entry(status, verdict)))
            .collect()
    }

    /// Looks up the verdict for a status code.
    #[must_use]
    pub fn get(&self, status: &str) -> Option<&str> {
        self.verdicts.get(status).map(String::as_str)
    }

    /// Returns the number of known statuses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// Checks if the table has no statuses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

fn check_entry(status: &str, verdict: &str) -> Result<(), VerdictError> {
    if status.trim().is_empty() {
        return Err(VerdictError::EmptyStatus);
    }
    if verdict.trim().is_empty() {
        return Err(VerdictError::EmptyVerdict {
            status: status.to_owned(),
        });
    }
    // Leave room for the message prefix and the homework name.
    let max_length = MAX_MESSAGE_LENGTH / 2;
    let length = verdict.chars().count();
    if length > max_length {
        return Err(VerdictError::TooLong {
            status: status.to_owned(),
            length,
            max_length,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = VerdictTable::default();
        assert_eq!(table.len(), 3);
        assert!(table.validate().is_ok());
        assert_eq!(
            table.get("approved"),
            Some("Работа проверена: ревьюеру всё понравилось. Ура!")
        );
        assert!(table.get("unknown").is_none());
    }

    #[test]
    fn test_validation_empty_table() {
        let table = VerdictTable::from_pairs([]);
        assert!(matches!(table.validate(), Err(VerdictError::NoVerdicts)));
    }

    #[test]
    fn test_validation_empty_verdict() {
        let table = VerdictTable::from_pairs([("approved", "ok"), ("rejected", " ")]);
        assert!(matches!(
            table.validate(),
            Err(VerdictError::EmptyVerdict { status }) if status == "rejected"
        ));
    }

    #[test]
    fn test_validation_too_long() {
        let long = "я".repeat(MAX_MESSAGE_LENGTH);
        let table = VerdictTable::from_pairs([("approved", long.as_str())]);
        assert!(matches!(table.validate(), Err(VerdictError::TooLong { .. })));
    }

    #[test]
    fn test_validate_all_reports_each_entry() {
        let table = VerdictTable::from_pairs([("", "text"), ("approved", "ok")]);
        let results = table.validate_all();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].1, Err(VerdictError::EmptyStatus)));
        assert!(results[1].1.is_ok());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verdicts.json");

        let table = VerdictTable::from_pairs([("approved", "Ревьюеру всё понравилось!")]);
        table.save_to_file(&path).unwrap();

        let loaded = VerdictTable::load_from_file(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verdicts.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(matches!(
            VerdictTable::load_from_file(&path),
            Err(VerdictError::ParseError(_))
        ));
    }
}
