// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A command represents admin intent as data only.
///
/// Commands carry raw input; `apply` validates and normalizes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create or replace the working-hours rule for one weekday.
    UpsertWorkingHours {
        /// Weekday index (Monday = 0).
        day_of_week: i64,
        /// Opening time, `HH:MM`.
        start_time: String,
        /// Closing time, `HH:MM`.
        end_time: String,
        /// Whether the day is a working day.
        enabled: bool,
    },
    /// Create a new redirect target, which becomes the only active one.
    CreateRedirect {
        /// Destination URL.
        target_url: String,
        /// Window start; offset-less values are local to the configured zone.
        valid_from: String,
        /// Window end; offset-less values are local to the configured zone.
        valid_until: String,
        /// Optional free-text notes.
        notes: Option<String>,
    },
}
