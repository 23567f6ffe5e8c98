// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Redirect Store queries.
//!
//! Instants are written as RFC 3339 UTC. Rows written without an offset
//! are read as wall-clock time in the configured zone, never as UTC.

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use diesel::prelude::*;
use num_traits::ToPrimitive;
use paygate_domain::{RedirectTarget, Tz, ValidityWindow, parse_instant};
use tracing::debug;

use crate::diesel_schema::redirect_targets;
use crate::error::PersistenceError;

/// Diesel Queryable struct for redirect target rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = redirect_targets)]
struct RedirectRow {
    redirect_id: i64,
    target_url: String,
    valid_from: String,
    valid_until: String,
    is_active: i32,
    notes: Option<String>,
    created_at: String,
}

fn parse_stored_instant(
    redirect_id: i64,
    field: &'static str,
    raw: &str,
    tz: Tz,
) -> Result<DateTime<Utc>, PersistenceError> {
    parse_instant(field, raw, tz)
        .map_err(|e| PersistenceError::CorruptRecord(format!("redirect {redirect_id}: {e}")))
}

fn row_to_target(row: RedirectRow, tz: Tz) -> Result<RedirectTarget, PersistenceError> {
    let valid_from: DateTime<Utc> =
        parse_stored_instant(row.redirect_id, "valid_from", &row.valid_from, tz)?;
    let valid_until: DateTime<Utc> =
        parse_stored_instant(row.redirect_id, "valid_until", &row.valid_until, tz)?;
    let created_at: DateTime<Utc> =
        parse_stored_instant(row.redirect_id, "created_at", &row.created_at, tz)?;

    Ok(RedirectTarget {
        redirect_id: row.redirect_id,
        target_url: row.target_url,
        window: ValidityWindow::from_persisted(valid_from, valid_until),
        is_active: row.is_active != 0,
        notes: row.notes,
        created_at,
    })
}

/// Retrieves a redirect target by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the target is not found.
pub fn get_redirect(
    conn: &mut SqliteConnection,
    redirect_id: i64,
    tz: Tz,
) -> Result<Option<RedirectTarget>, PersistenceError> {
    debug!(redirect_id, "Looking up redirect target");

    let row: Option<RedirectRow> = redirect_targets::table
        .filter(redirect_targets::redirect_id.eq(redirect_id))
        .select(RedirectRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| row_to_target(row, tz)).transpose()
}

/// Lists redirect targets newest-first, capped at `limit`.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_redirects(
    conn: &mut SqliteConnection,
    limit: usize,
    tz: Tz,
) -> Result<Vec<RedirectTarget>, PersistenceError> {
    debug!(limit, "Listing redirect targets");

    let limit: i64 = limit
        .to_i64()
        .ok_or_else(|| PersistenceError::QueryFailed(format!("Limit out of range: {limit}")))?;

    redirect_targets::table
        .order(redirect_targets::redirect_id.desc())
        .limit(limit)
        .select(RedirectRow::as_select())
        .load::<RedirectRow>(conn)?
        .into_iter()
        .map(|row| row_to_target(row, tz))
        .collect()
}

/// Lists targets carrying the active flag, newest-first.
///
/// The flag alone does not make a record servable; callers still check
/// the validity window against now.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_active_redirects(
    conn: &mut SqliteConnection,
    tz: Tz,
) -> Result<Vec<RedirectTarget>, PersistenceError> {
    debug!("Listing active redirect targets");

    redirect_targets::table
        .filter(redirect_targets::is_active.eq(1))
        .order(redirect_targets::redirect_id.desc())
        .select(RedirectRow::as_select())
        .load::<RedirectRow>(conn)?
        .into_iter()
        .map(|row| row_to_target(row, tz))
        .collect()
}
