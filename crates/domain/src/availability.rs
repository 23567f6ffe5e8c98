// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Working-hours availability.
//!
//! ## Invariants
//!
//! - The weekday and time of day are taken in the configured zone
//! - Bounds are inclusive: a visit at exactly closing time is served
//! - A malformed stored rule degrades to closed, never to an error

use crate::types::{DayOfWeek, WorkingHoursRule};
use chrono::{DateTime, Datelike, NaiveTime, Utc};
use chrono_tz::Tz;

/// Why the gateway is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosedReason {
    /// No rule, or a disabled rule, for today.
    DayOff {
        /// Today, in the configured zone.
        day: DayOfWeek,
    },
    /// Today has hours, but now is outside them.
    OutsideHours {
        /// Stored start (`HH:MM`).
        start: String,
        /// Stored end (`HH:MM`).
        end: String,
    },
    /// Today's stored rule cannot be parsed.
    ConfigurationError {
        /// Today, in the configured zone.
        day: DayOfWeek,
        /// Parse failure, for operators only.
        detail: String,
    },
}

impl std::fmt::Display for ClosedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DayOff { day } => write!(f, "Today ({day}) is not a working day"),
            Self::OutsideHours { start, end } => write!(f, "Working hours: {start} - {end}"),
            Self::ConfigurationError { .. } => {
                write!(f, "Working hours configuration error")
            }
        }
    }
}

/// Result of evaluating the schedule at an instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Inside today's working hours.
    Open,
    /// Closed, with the reason.
    Closed(ClosedReason),
}

impl Availability {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// The closed reason, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<&ClosedReason> {
        match self {
            Self::Open => None,
            Self::Closed(reason) => Some(reason),
        }
    }
}

/// Returns the weekday of `now` in the configured zone.
///
/// This is the key used to look up today's rule.
#[must_use]
pub fn local_day_of_week(now: DateTime<Utc>, tz: Tz) -> DayOfWeek {
    DayOfWeek::from_weekday(now.with_timezone(&tz).weekday())
}

/// Evaluates whether `now` falls inside today's working hours.
///
/// # Arguments
///
/// * `now` - The instant being evaluated
/// * `tz` - The configured zone
/// * `rule` - The stored rule for `local_day_of_week(now, tz)`, if any
#[must_use]
pub fn evaluate_availability(
    now: DateTime<Utc>,
    tz: Tz,
    rule: Option<&WorkingHoursRule>,
) -> Availability {
    let local: DateTime<Tz> = now.with_timezone(&tz);
    let day: DayOfWeek = DayOfWeek::from_weekday(local.weekday());

    let Some(rule) = rule.filter(|rule| rule.is_enabled()) else {
        return Availability::Closed(ClosedReason::DayOff { day });
    };

    let (start, end): (NaiveTime, NaiveTime) = match rule.window() {
        Ok(window) => window,
        Err(err) => {
            return Availability::Closed(ClosedReason::ConfigurationError {
                day,
                detail: err.to_string(),
            });
        }
    };

    let current: NaiveTime = local.time();
    if start <= current && current <= end {
        Availability::Open
    } else {
        Availability::Closed(ClosedReason::OutsideHours {
            start: rule.start_time().to_string(),
            end: rule.end_time().to_string(),
        })
    }
}
