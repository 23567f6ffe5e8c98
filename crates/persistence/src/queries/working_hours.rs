// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule Store queries.
//!
//! Stored `start_time`/`end_time` values are returned verbatim. A malformed
//! value is not an error here; availability evaluation reports it as a
//! configuration error.

use diesel::SqliteConnection;
use diesel::prelude::*;
use paygate_domain::{DayOfWeek, WorkingHoursRule};
use tracing::debug;

use crate::diesel_schema::working_hours;
use crate::error::PersistenceError;

/// Diesel Queryable struct for working hours rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = working_hours)]
struct WorkingHoursRow {
    working_hours_id: i64,
    day_of_week: i32,
    start_time: String,
    end_time: String,
    is_enabled: i32,
}

impl TryFrom<WorkingHoursRow> for WorkingHoursRule {
    type Error = PersistenceError;

    fn try_from(row: WorkingHoursRow) -> Result<Self, Self::Error> {
        let day: DayOfWeek = DayOfWeek::new(i64::from(row.day_of_week)).map_err(|e| {
            PersistenceError::CorruptRecord(format!(
                "working_hours {}: {e}",
                row.working_hours_id
            ))
        })?;

        Ok(Self::with_id(
            row.working_hours_id,
            day,
            row.start_time,
            row.end_time,
            row.is_enabled != 0,
        ))
    }
}

/// Retrieves the rule for one weekday.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no rule exists for `day`.
pub fn get_working_hours(
    conn: &mut SqliteConnection,
    day: DayOfWeek,
) -> Result<Option<WorkingHoursRule>, PersistenceError> {
    debug!(day = %day, "Looking up working hours");

    let row: Option<WorkingHoursRow> = working_hours::table
        .filter(working_hours::day_of_week.eq(i32::from(day.index())))
        .select(WorkingHoursRow::as_select())
        .first(conn)
        .optional()?;

    row.map(WorkingHoursRule::try_from).transpose()
}

/// Lists every stored rule ordered Monday to Sunday.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_working_hours(
    conn: &mut SqliteConnection,
) -> Result<Vec<WorkingHoursRule>, PersistenceError> {
    debug!("Listing working hours");

    working_hours::table
        .order(working_hours::day_of_week.asc())
        .select(WorkingHoursRow::as_select())
        .load::<WorkingHoursRow>(conn)?
        .into_iter()
        .map(WorkingHoursRule::try_from)
        .collect()
}
