// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` bootstrap for the gateway database.
//!
//! Opening a store means: connect, switch on foreign keys, apply the
//! embedded schema (working hours, redirect targets, operators and
//! sessions), then tune the pragmas the redirect toggle relies on.
//! Anything Diesel has no DSL for (PRAGMA, `last_insert_rowid()`) is
//! kept here so the store modules stay plain Diesel.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Gateway schema, applied on every open.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(QueryableByName)]
struct ForeignKeysRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[derive(QueryableByName)]
struct JournalModeRow {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

/// Returns the ID `SQLite` assigned to the last row inserted on `conn`.
///
/// Operator and session inserts read their key back through this.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Checks that foreign keys are enforced on `conn`.
///
/// Sessions reference their operator with `ON DELETE CASCADE`; without
/// enforcement a removed operator would leave live bearer tokens behind.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if the pragma reads 0.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysRow = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;

    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    debug!(foreign_keys = row.foreign_keys, "Foreign keys enforced");
    Ok(())
}

/// Opens the gateway database at `database_url` and applies the schema.
///
/// `database_url` is a file path or a `file:` URI for shared in-memory
/// stores.
///
/// # Errors
///
/// Returns an error if the connection, the pragma or a migration fails.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!(database = database_url, "Opening gateway database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    let migrations = conn.run_pending_migrations(MIGRATIONS);
    let applied: usize = migrations
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?
        .len();
    info!(database = database_url, applied, "Gateway schema is current");

    Ok(conn)
}

/// Switches `conn` to WAL journaling and returns the mode `SQLite` reports.
///
/// Visitors keep reading the schedule and the active redirect while an
/// admin write is in flight. In-memory stores report `memory`.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<String, PersistenceError> {
    let row: JournalModeRow = diesel::sql_query("PRAGMA journal_mode = WAL")
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    debug!(journal_mode = %row.journal_mode, "Journal mode set");
    Ok(row.journal_mode)
}

/// Sets how long a writer waits on a locked database before failing.
///
/// Concurrent toggles and redirect creations each take an immediate
/// transaction; with a timeout they queue instead of failing with
/// `SQLITE_BUSY`.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn set_busy_timeout(
    conn: &mut SqliteConnection,
    busy_timeout_ms: u32,
) -> Result<(), PersistenceError> {
    diesel::sql_query(format!("PRAGMA busy_timeout = {busy_timeout_ms}"))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    debug!(busy_timeout_ms, "Busy timeout set");
    Ok(())
}
