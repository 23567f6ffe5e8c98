// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Redirect validity windows and instant normalization.
//!
//! ## Invariants
//!
//! - Every instant is normalized to UTC before comparison
//! - Values without an offset are wall-clock times in the configured zone,
//!   never UTC
//! - Window bounds are inclusive on both ends

use crate::error::DomainError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// Naive layouts accepted when a value carries no offset.
///
/// The `datetime-local` form of browsers (`2026-03-02T09:00`) is included.
const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns an error if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Parses an instant, treating offset-less values as local to `tz`.
///
/// # Errors
///
/// Returns an error if the value matches no accepted layout, or if a naive
/// value does not exist in `tz` (skipped by a DST transition).
pub fn parse_instant(field: &'static str, raw: &str, tz: Tz) -> Result<DateTime<Utc>, DomainError> {
    let raw: &str = raw.trim();

    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Ok(aware.with_timezone(&Utc));
    }

    let naive: NaiveDateTime = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| DomainError::InvalidTimestamp {
            field,
            value: raw.to_string(),
            reason: String::from("expected RFC 3339 or YYYY-MM-DDTHH:MM[:SS]"),
        })?;

    // Ambiguous wall-clock times (DST fall-back) resolve to the earlier instant.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| DomainError::InvalidTimestamp {
            field,
            value: raw.to_string(),
            reason: format!("does not exist in {tz}"),
        })
}

/// Formats an instant for storage (RFC 3339, UTC, second precision).
#[must_use]
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Formats an instant as wall-clock time in `tz` for messages.
#[must_use]
pub fn format_local(instant: DateTime<Utc>, tz: Tz) -> String {
    instant
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

/// The half of a window an instant falls outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    /// Before `valid_from`.
    Before,
    /// Within `[valid_from, valid_until]`.
    Within,
    /// After `valid_until`.
    After,
}

/// The period during which a redirect target may be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
}

impl ValidityWindow {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns an error unless `valid_from < valid_until`.
    pub fn new(valid_from: DateTime<Utc>, valid_until: DateTime<Utc>) -> Result<Self, DomainError> {
        if valid_from >= valid_until {
            return Err(DomainError::InvalidValidityWindow {
                valid_from: format_instant(valid_from),
                valid_until: format_instant(valid_until),
            });
        }
        Ok(Self {
            valid_from,
            valid_until,
        })
    }

    /// Rebuilds a window from stored bounds without re-checking ordering.
    ///
    /// Stored windows were validated at creation.
    #[must_use]
    pub const fn from_persisted(valid_from: DateTime<Utc>, valid_until: DateTime<Utc>) -> Self {
        Self {
            valid_from,
            valid_until,
        }
    }

    #[must_use]
    pub const fn valid_from(&self) -> DateTime<Utc> {
        self.valid_from
    }

    #[must_use]
    pub const fn valid_until(&self) -> DateTime<Utc> {
        self.valid_until
    }

    /// Locates `now` relative to the window.
    #[must_use]
    pub fn position(&self, now: DateTime<Utc>) -> WindowPosition {
        if now < self.valid_from {
            WindowPosition::Before
        } else if now > self.valid_until {
            WindowPosition::After
        } else {
            WindowPosition::Within
        }
    }

    /// Returns true when `valid_from <= now <= valid_until`.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.position(now) == WindowPosition::Within
    }

    /// Checks that a record with this window may be activated at `now`.
    ///
    /// # Errors
    ///
    /// Returns `NotYetValid` or `Expired`, naming the violated bound in `tz`.
    pub fn check_activation(&self, now: DateTime<Utc>, tz: Tz) -> Result<(), DomainError> {
        match self.position(now) {
            WindowPosition::Within => Ok(()),
            WindowPosition::Before => Err(DomainError::NotYetValid {
                valid_from: format_local(self.valid_from, tz),
            }),
            WindowPosition::After => Err(DomainError::Expired {
                valid_until: format_local(self.valid_until, tz),
            }),
        }
    }
}
