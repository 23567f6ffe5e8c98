// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{DayOfWeek, WorkingHoursRule, parse_time_of_day};
use crate::validity::{ValidityWindow, parse_instant};
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;

/// Minimum target URL length, in characters.
pub const TARGET_URL_MIN_LEN: usize = 10;

/// Maximum target URL length, in characters.
pub const TARGET_URL_MAX_LEN: usize = 500;

/// Validates admin input for a working-hours rule.
///
/// # Arguments
///
/// * `day_of_week` - Weekday index (Monday = 0)
/// * `start_time` - Opening time, `HH:MM`
/// * `end_time` - Closing time, `HH:MM`
/// * `enabled` - Whether the day is a working day
///
/// # Errors
///
/// Returns an error if:
/// - `day_of_week` is outside `0..=6`
/// - Either time does not match `HH:MM`
/// - `start_time` is not strictly before `end_time`
pub fn validate_working_hours(
    day_of_week: i64,
    start_time: &str,
    end_time: &str,
    enabled: bool,
) -> Result<WorkingHoursRule, DomainError> {
    let day: DayOfWeek = DayOfWeek::new(day_of_week)?;
    let start: NaiveTime = parse_time_of_day("start_time", start_time)?;
    let end: NaiveTime = parse_time_of_day("end_time", end_time)?;

    // Equal bounds would leave a single-instant window
    if start >= end {
        return Err(DomainError::InvalidHoursRange {
            start: start_time.to_string(),
            end: end_time.to_string(),
        });
    }

    Ok(WorkingHoursRule::new(
        day,
        start_time.to_string(),
        end_time.to_string(),
        enabled,
    ))
}

/// Validates a redirect destination URL.
///
/// # Errors
///
/// Returns an error if the URL is outside the allowed length, contains
/// whitespace or control characters, or is not `http`/`https`.
pub fn validate_target_url(target_url: &str) -> Result<(), DomainError> {
    let length: usize = target_url.chars().count();
    if !(TARGET_URL_MIN_LEN..=TARGET_URL_MAX_LEN).contains(&length) {
        return Err(DomainError::InvalidTargetUrl(format!(
            "length must be between {TARGET_URL_MIN_LEN} and {TARGET_URL_MAX_LEN}, got {length}"
        )));
    }

    if target_url.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidTargetUrl(String::from(
            "must not contain whitespace",
        )));
    }

    // A control character cannot be sent in a Location header
    if target_url.chars().any(char::is_control) {
        return Err(DomainError::InvalidTargetUrl(String::from(
            "must not contain control characters",
        )));
    }

    let lowered: String = target_url.to_ascii_lowercase();
    if !(lowered.starts_with("http://") || lowered.starts_with("https://")) {
        return Err(DomainError::InvalidTargetUrl(String::from(
            "scheme must be http or https",
        )));
    }

    Ok(())
}

/// Parses and validates a redirect validity window from admin input.
///
/// Offset-less values are interpreted in `tz`.
///
/// # Errors
///
/// Returns an error if either bound cannot be parsed, or if
/// `valid_from >= valid_until`.
pub fn validate_validity_window(
    valid_from: &str,
    valid_until: &str,
    tz: Tz,
) -> Result<ValidityWindow, DomainError> {
    let from: DateTime<Utc> = parse_instant("valid_from", valid_from, tz)?;
    let until: DateTime<Utc> = parse_instant("valid_until", valid_until, tz)?;
    ValidityWindow::new(from, until)
}
