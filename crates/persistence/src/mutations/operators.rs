// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::OperatorData;
use crate::diesel_schema::{operators, sessions};
use crate::error::PersistenceError;
use crate::queries::operators::{get_operator_by_login, normalize_login, verify_password};

/// What `sync_operator` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorSync {
    /// The operator did not exist and was created.
    Created(i64),
    /// The stored hash did not match and was replaced.
    PasswordUpdated(i64),
    /// The stored hash already matched.
    Unchanged(i64),
}

impl OperatorSync {
    #[must_use]
    pub const fn operator_id(self) -> i64 {
        match self {
            Self::Created(id) | Self::PasswordUpdated(id) | Self::Unchanged(id) => id,
        }
    }
}

fn hash_password(password: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))
}

/// Creates a new operator.
///
/// The `login_name` is normalized to lowercase for case-insensitive uniqueness.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `login_name` - The login name (will be normalized)
/// * `password` - The plain-text password (will be hashed)
///
/// # Errors
///
/// Returns an error if the operator cannot be created or if the login name
/// already exists.
pub fn create_operator(
    conn: &mut SqliteConnection,
    login_name: &str,
    password: &str,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = normalize_login(login_name);

    info!("Creating operator with login_name: {}", normalized_login);

    let password_hash: String = hash_password(password)?;

    diesel::insert_into(operators::table)
        .values((
            operators::login_name.eq(&normalized_login),
            operators::password_hash.eq(&password_hash),
        ))
        .execute(conn)?;

    let operator_id: i64 = get_last_insert_rowid(conn)?;

    info!(operator_id, "Operator created successfully");

    Ok(operator_id)
}

/// Updates an operator's password.
///
/// # Errors
///
/// Returns an error if the password cannot be hashed or the update fails.
pub fn update_password(
    conn: &mut SqliteConnection,
    operator_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    info!("Updating password for operator ID: {}", operator_id);

    let password_hash: String = hash_password(new_password)?;

    let rows_affected: usize = diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set(operators::password_hash.eq(&password_hash))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::OperatorNotFound(format!(
            "Operator with ID {operator_id} not found"
        )));
    }

    Ok(())
}

/// Creates the operator, or brings its password hash in line with `password`.
///
/// Replacing the hash also drops the operator's sessions.
///
/// # Errors
///
/// Returns an error if hashing, verification, or a database write fails.
pub fn sync_operator(
    conn: &mut SqliteConnection,
    login_name: &str,
    password: &str,
) -> Result<OperatorSync, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let existing: Option<OperatorData> = get_operator_by_login(conn, login_name)?;

        let Some(operator) = existing else {
            return create_operator(conn, login_name, password).map(OperatorSync::Created);
        };

        if verify_password(password, &operator.password_hash)? {
            debug!(operator_id = operator.operator_id, "Operator password unchanged");
            return Ok(OperatorSync::Unchanged(operator.operator_id));
        }

        update_password(conn, operator.operator_id, password)?;
        delete_sessions_for_operator(conn, operator.operator_id)?;
        Ok(OperatorSync::PasswordUpdated(operator.operator_id))
    })
}

/// Updates the last login timestamp for an operator.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for operator ID: {}", operator_id);

    diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set(operators::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}

/// Creates a new session for an operator.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `operator_id` - The operator ID
/// * `expires_at` - The expiration timestamp (ISO 8601 format)
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    operator_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(operator_id, expires_at, "Creating session");

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::operator_id.eq(operator_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = get_last_insert_rowid(conn)?;

    debug!(session_id, operator_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    debug!("Updating last_activity_at for session ID: {}", session_id);

    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token.
///
/// # Returns
///
/// Whether a session was removed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<bool, PersistenceError> {
    debug!("Deleting session by token");

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(rows_affected > 0)
}

/// Deletes sessions whose expiry is before `now`.
///
/// Both sides are ISO 8601 UTC text, so string order matches time order.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    info!("Deleted {} expired sessions", rows_affected);
    Ok(rows_affected)
}

/// Deletes all sessions for a specific operator.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_sessions_for_operator(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<usize, PersistenceError> {
    info!("Deleting all sessions for operator ID: {}", operator_id);

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::operator_id.eq(operator_id))
        .execute(conn)?;

    Ok(rows_affected)
}
