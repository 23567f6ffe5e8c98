// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validity::ValidityWindow;
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Display names indexed by `DayOfWeek::index()`.
const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// A weekday in the Monday = 0 convention.
///
/// Construction is the only place the `0..=6` range is checked; every
/// `DayOfWeek` in circulation is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    /// All weekdays, Monday first.
    pub const ALL: [Self; 7] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
    ];

    /// Creates a weekday from its index.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is outside `0..=6`.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        u8::try_from(value)
            .ok()
            .filter(|day| *day <= 6)
            .map(Self)
            .ok_or(DomainError::InvalidDayOfWeek(value))
    }

    /// Maps a chrono weekday onto the Monday = 0 convention.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_weekday(weekday: Weekday) -> Self {
        // num_days_from_monday is always 0..=6
        Self(weekday.num_days_from_monday() as u8)
    }

    /// Returns the numeric index (Monday = 0).
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the English display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        DAY_NAMES[self.0 as usize]
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a wall-clock `HH:MM` value.
///
/// The format is strict: two digits, a colon, two digits. Seconds are
/// always zero.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimeFormat` if the value does not match
/// the pattern or names an impossible time.
pub fn parse_time_of_day(field: &'static str, value: &str) -> Result<NaiveTime, DomainError> {
    let invalid = || DomainError::InvalidTimeFormat {
        field,
        value: value.to_string(),
    };

    let bytes: &[u8] = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(invalid());
    }
    if ![0, 1, 3, 4].iter().all(|i| bytes[*i].is_ascii_digit()) {
        return Err(invalid());
    }

    let hour: u32 = value[0..2].parse().map_err(|_| invalid())?;
    let minute: u32 = value[3..5].parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// The working-hours rule for a single weekday.
///
/// Times are kept exactly as stored. A rule read back from the store is
/// not trusted to be well-formed; `window()` re-parses on every use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingHoursRule {
    /// Store identifier, once persisted.
    rule_id: Option<i64>,
    day: DayOfWeek,
    start_time: String,
    end_time: String,
    enabled: bool,
}

impl WorkingHoursRule {
    /// Creates a rule without validating the time strings.
    ///
    /// Use `validate_working_hours` for admin input.
    #[must_use]
    pub const fn new(day: DayOfWeek, start_time: String, end_time: String, enabled: bool) -> Self {
        Self {
            rule_id: None,
            day,
            start_time,
            end_time,
            enabled,
        }
    }

    /// Creates a rule with a store identifier.
    #[must_use]
    pub const fn with_id(
        rule_id: i64,
        day: DayOfWeek,
        start_time: String,
        end_time: String,
        enabled: bool,
    ) -> Self {
        Self {
            rule_id: Some(rule_id),
            day,
            start_time,
            end_time,
            enabled,
        }
    }

    #[must_use]
    pub const fn rule_id(&self) -> Option<i64> {
        self.rule_id
    }

    #[must_use]
    pub const fn day(&self) -> DayOfWeek {
        self.day
    }

    #[must_use]
    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    #[must_use]
    pub fn end_time(&self) -> &str {
        &self.end_time
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Parses the stored start and end into times of day.
    ///
    /// # Errors
    ///
    /// Returns an error if either stored value is malformed.
    pub fn window(&self) -> Result<(NaiveTime, NaiveTime), DomainError> {
        let start: NaiveTime = parse_time_of_day("start_time", &self.start_time)?;
        let end: NaiveTime = parse_time_of_day("end_time", &self.end_time)?;
        Ok((start, end))
    }

    /// Human-readable hours, e.g. `09:00 - 18:00`.
    #[must_use]
    pub fn hours_label(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }
}

/// A configured redirect destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    /// Store identifier.
    pub redirect_id: i64,
    /// Destination URL.
    pub target_url: String,
    /// Validity window, normalized to UTC.
    pub window: ValidityWindow,
    /// Whether this is the active record.
    pub is_active: bool,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl RedirectTarget {
    /// Returns true when this record may be served at `now`.
    ///
    /// Both the active flag and the validity window must hold; an active
    /// record whose window has lapsed is not servable.
    #[must_use]
    pub fn is_servable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.window.contains(now)
    }
}
