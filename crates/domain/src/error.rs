// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Day of week is outside `0..=6`.
    InvalidDayOfWeek(i64),
    /// A time-of-day value does not match `HH:MM`.
    InvalidTimeFormat {
        /// The field that carried the value.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// Working hours start is not strictly before the end.
    InvalidHoursRange {
        /// The requested start time.
        start: String,
        /// The requested end time.
        end: String,
    },
    /// Redirect target URL is rejected.
    InvalidTargetUrl(String),
    /// A timestamp could not be parsed or resolved in the configured zone.
    InvalidTimestamp {
        /// The field that carried the value.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// `valid_from` is not strictly before `valid_until`.
    InvalidValidityWindow {
        /// Window start (RFC 3339).
        valid_from: String,
        /// Window end (RFC 3339).
        valid_until: String,
    },
    /// Activation requested before the window opens.
    NotYetValid {
        /// Window start, rendered in the configured zone.
        valid_from: String,
    },
    /// Activation requested after the window closed.
    Expired {
        /// Window end, rendered in the configured zone.
        valid_until: String,
    },
    /// The configured timezone name is unknown.
    InvalidTimezone(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDayOfWeek(day) => {
                write!(f, "Invalid day of week: {day}. Must be between 0 and 6")
            }
            Self::InvalidTimeFormat { field, value } => {
                write!(f, "Invalid time format for {field}: '{value}'. Use HH:MM")
            }
            Self::InvalidHoursRange { start, end } => {
                write!(f, "Working hours start {start} must be before end {end}")
            }
            Self::InvalidTargetUrl(msg) => write!(f, "Invalid target URL: {msg}"),
            Self::InvalidTimestamp {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid timestamp for {field}: '{value}' ({reason})")
            }
            Self::InvalidValidityWindow {
                valid_from,
                valid_until,
            } => {
                write!(
                    f,
                    "valid_from ({valid_from}) must be before valid_until ({valid_until})"
                )
            }
            Self::NotYetValid { valid_from } => {
                write!(f, "Redirect is not yet valid until {valid_from}")
            }
            Self::Expired { valid_until } => {
                write!(f, "Redirect expired at {valid_until}")
            }
            Self::InvalidTimezone(tz) => write!(f, "Unknown timezone: {tz}"),
        }
    }
}

impl std::error::Error for DomainError {}
