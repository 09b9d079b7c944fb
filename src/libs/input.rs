//! Validation and normalisation of command-line input before it reaches the
//! record store.

use super::messages::Message;
use super::record::{truncate_details, DETAILS_MAX_CHARS};
use crate::{msg_error_anyhow, msg_warning};
use anyhow::Result;
use chrono::{Local, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Accepts `YYYY-MM-DD` and returns it in canonical zero-padded form.
pub fn parse_date(input: &str) -> Result<String> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .map_err(|_| msg_error_anyhow!(Message::InvalidDate(input.to_string())))
}

/// Parses an inclusive date range. Either bound may be omitted and defaults
/// to today.
pub fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<(String, String)> {
    let from = from.map(parse_date).transpose()?.unwrap_or_else(today);
    let to = to.map(parse_date).transpose()?.unwrap_or_else(today);
    if from > to {
        return Err(msg_error_anyhow!(Message::InvalidDateRange(from, to)));
    }
    Ok((from, to))
}

/// Resolves the task argument.
///
/// A plain number selects a configured main task by 1-based index; anything
/// else is taken verbatim.
pub fn resolve_task(input: &str, main_tasks: &[String]) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(msg_error_anyhow!(Message::EmptyTaskDescription));
    }

    match input.parse::<usize>() {
        Ok(index) => index
            .checked_sub(1)
            .and_then(|i| main_tasks.get(i))
            .cloned()
            .ok_or_else(|| msg_error_anyhow!(Message::TaskIndexOutOfRange(index, main_tasks.len()))),
        Err(_) => Ok(input.to_string()),
    }
}

/// Trims free text; blank becomes `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Like [`optional_text`], and caps the result at the details limit.
pub fn clean_details(details: Option<String>) -> Option<String> {
    optional_text(details).map(|details| {
        if details.chars().count() > DETAILS_MAX_CHARS {
            msg_warning!(Message::DetailsTruncated(DETAILS_MAX_CHARS));
            truncate_details(&details)
        } else {
            details
        }
    })
}

/// Checks `status` against the configured list.
pub fn validate_status(status: &str, statuses: &[String]) -> Result<String> {
    let status = status.trim();
    statuses
        .iter()
        .find(|s| s.eq_ignore_ascii_case(status))
        .cloned()
        .ok_or_else(|| msg_error_anyhow!(Message::UnknownStatus(status.to_string())))
}
