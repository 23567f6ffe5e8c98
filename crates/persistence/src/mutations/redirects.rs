// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Redirect Store mutations.
//!
//! ## Invariants
//!
//! - At most one row has `is_active = 1` after every committed transaction
//! - Creation is the only path that inserts an active row
//! - Toggle re-reads the row and decides inside the same transaction

use chrono::Utc;
use diesel::SqliteConnection;
use diesel::prelude::*;
use paygate::{CoreError, NewRedirect, ToggleAction};
use paygate_domain::{RedirectTarget, Tz, format_instant};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::redirect_targets;
use crate::error::PersistenceError;
use crate::queries::redirects::get_redirect;

/// Clears the active flag on every row except `keep`.
fn deactivate_others(
    conn: &mut SqliteConnection,
    keep: Option<i64>,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = match keep {
        Some(redirect_id) => diesel::update(
            redirect_targets::table
                .filter(redirect_targets::is_active.eq(1))
                .filter(redirect_targets::redirect_id.ne(redirect_id)),
        )
        .set(redirect_targets::is_active.eq(0))
        .execute(conn)?,
        None => diesel::update(redirect_targets::table.filter(redirect_targets::is_active.eq(1)))
            .set(redirect_targets::is_active.eq(0))
            .execute(conn)?,
    };
    Ok(rows_affected)
}

/// Deactivates every target, then inserts `redirect` as the active one.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `redirect` - A validated redirect
/// * `tz` - The configured zone, for reading the row back
///
/// # Returns
///
/// The stored target.
///
/// # Errors
///
/// Returns an error if the transaction fails; nothing is written then.
pub fn create_redirect(
    conn: &mut SqliteConnection,
    redirect: &NewRedirect,
    tz: Tz,
) -> Result<RedirectTarget, PersistenceError> {
    let valid_from: String = format_instant(redirect.window.valid_from());
    let valid_until: String = format_instant(redirect.window.valid_until());
    let created_at: String = format_instant(Utc::now());

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let deactivated: usize = deactivate_others(conn, None)?;

        diesel::insert_into(redirect_targets::table)
            .values((
                redirect_targets::target_url.eq(&redirect.target_url),
                redirect_targets::valid_from.eq(&valid_from),
                redirect_targets::valid_until.eq(&valid_until),
                redirect_targets::is_active.eq(1),
                redirect_targets::notes.eq(redirect.notes.as_deref()),
                redirect_targets::created_at.eq(&created_at),
            ))
            .execute(conn)?;

        let redirect_id: i64 = get_last_insert_rowid(conn)?;

        info!(
            redirect_id,
            deactivated,
            target_url = %redirect.target_url,
            "Redirect target created"
        );

        get_redirect(conn, redirect_id, tz)?.ok_or(PersistenceError::RedirectNotFound(redirect_id))
    })
}

/// Flips the active flag of one target.
///
/// `decide` sees the row as read inside the transaction. Its rejection
/// rolls the transaction back and surfaces as `ActivationRejected`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `redirect_id` - The target to toggle
/// * `tz` - The configured zone, for reading the row
/// * `decide` - Chooses the action for the current row
///
/// # Returns
///
/// The target after the toggle.
///
/// # Errors
///
/// Returns an error if:
/// - The target does not exist
/// - `decide` rejects the activation
/// - The database write fails
pub fn toggle_redirect<F>(
    conn: &mut SqliteConnection,
    redirect_id: i64,
    tz: Tz,
    decide: F,
) -> Result<RedirectTarget, PersistenceError>
where
    F: FnOnce(&RedirectTarget) -> Result<ToggleAction, CoreError>,
{
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let target: RedirectTarget = get_redirect(conn, redirect_id, tz)?
            .ok_or(PersistenceError::RedirectNotFound(redirect_id))?;

        let action: ToggleAction = decide(&target).map_err(|err| match err {
            CoreError::DomainViolation(err) => PersistenceError::ActivationRejected(err),
        })?;

        match action {
            ToggleAction::Deactivate => {
                diesel::update(
                    redirect_targets::table.filter(redirect_targets::redirect_id.eq(redirect_id)),
                )
                .set(redirect_targets::is_active.eq(0))
                .execute(conn)?;
                info!(redirect_id, "Redirect target deactivated");
            }
            ToggleAction::Activate => {
                let deactivated: usize = deactivate_others(conn, Some(redirect_id))?;
                diesel::update(
                    redirect_targets::table.filter(redirect_targets::redirect_id.eq(redirect_id)),
                )
                .set(redirect_targets::is_active.eq(1))
                .execute(conn)?;
                info!(redirect_id, deactivated, "Redirect target activated");
            }
        }

        get_redirect(conn, redirect_id, tz)?.ok_or(PersistenceError::RedirectNotFound(redirect_id))
    })
}
