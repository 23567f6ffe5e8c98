// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::Utc;
use diesel::SqliteConnection;
use diesel::prelude::*;
use paygate_domain::{WorkingHoursRule, format_instant};
use tracing::info;

use crate::diesel_schema::working_hours;
use crate::error::PersistenceError;
use crate::queries::working_hours::get_working_hours;

/// Inserts or updates the rule for the rule's weekday.
///
/// A single `INSERT ... ON CONFLICT(day_of_week) DO UPDATE` statement,
/// so two concurrent upserts for one weekday can never both insert.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `rule` - A validated rule
///
/// # Returns
///
/// The stored rule, including its row ID.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn upsert_working_hours(
    conn: &mut SqliteConnection,
    rule: &WorkingHoursRule,
) -> Result<WorkingHoursRule, PersistenceError> {
    let day_of_week: i32 = i32::from(rule.day().index());
    let is_enabled: i32 = i32::from(rule.is_enabled());
    let updated_at: String = format_instant(Utc::now());

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(working_hours::table)
            .values((
                working_hours::day_of_week.eq(day_of_week),
                working_hours::start_time.eq(rule.start_time()),
                working_hours::end_time.eq(rule.end_time()),
                working_hours::is_enabled.eq(is_enabled),
                working_hours::updated_at.eq(&updated_at),
            ))
            .on_conflict(working_hours::day_of_week)
            .do_update()
            .set((
                working_hours::start_time.eq(rule.start_time()),
                working_hours::end_time.eq(rule.end_time()),
                working_hours::is_enabled.eq(is_enabled),
                working_hours::updated_at.eq(&updated_at),
            ))
            .execute(conn)?;

        let stored: WorkingHoursRule = get_working_hours(conn, rule.day())?.ok_or_else(|| {
            PersistenceError::NotFound(format!("Working hours for {} after upsert", rule.day()))
        })?;

        info!(
            day = %stored.day(),
            hours = %stored.hours_label(),
            enabled = stored.is_enabled(),
            "Working hours saved"
        );

        Ok(stored)
    })
}
