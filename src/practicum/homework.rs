//! Response shape checks and status translation.

use serde_json::Value;

use crate::config::VerdictTable;
use crate::error::BotError;

/// A notification about one homework: its name and the rendered message.
///
/// Compared by value to suppress duplicate notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Homework name as returned by the API.
    pub name: String,

    /// Full text sent to the chat.
    pub message: String,
}

/// Returns the `homeworks` list of an API response.
///
/// # Errors
///
/// Returns [`BotError::Structure`] if the response is not an object or the
/// field is not a list, and [`BotError::MissingField`] if it is absent.
pub fn extract_homeworks(response: &Value) -> Result<&[Value], BotError> {
    let Some(object) = response.as_object() else {
        return Err(BotError::Structure(format!(
            "expected a JSON object, got {}",
            type_name(response)
        )));
    };

    let homeworks = object
        .get("homeworks")
        .ok_or(BotError::MissingField("homeworks"))?;

    homeworks.as_array().map(Vec::as_slice).ok_or_else(|| {
        BotError::Structure(format!(
            "`homeworks` must be a list, got {}",
            type_name(homeworks)
        ))
    })
}

/// Returns the `current_date` of a response, or `fallback` if it is absent.
#[must_use]
pub fn next_cursor(response: &Value, fallback: i64) -> i64 {
    response
        .get("current_date")
        .and_then(Value::as_i64)
        .unwrap_or(fallback)
}

/// Translates a homework record into a [`Report`].
///
/// # Errors
///
/// Returns [`BotError::MalformedRecord`] if `homework_name` or `status` is
/// missing, and [`BotError::UndefinedStatus`] if the status is not in the
/// verdict table.
pub fn parse_status(record: &Value, verdicts: &VerdictTable) -> Result<Report, BotError> {
    let name = string_field(record, "homework_name")?;
    let status = string_field(record, "status")?;

    let verdict = verdicts
        .get(status)
        .ok_or_else(|| BotError::UndefinedStatus(status.to_owned()))?;

    Ok(Report {
        name: name.to_owned(),
        message: format!("Изменился статус проверки работы \"{name}\". {verdict}"),
    })
}

fn string_field<'a>(record: &'a Value, field: &'static str) -> Result<&'a str, BotError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or(BotError::MalformedRecord { field })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
