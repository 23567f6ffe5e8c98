// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the payment gateway.
//!
//! This crate holds the Schedule Store, the Redirect Store, and the
//! operator/session store. It is built on Diesel over `SQLite`.
//!
//! ## Stores
//!
//! - **Schedule Store**: at most one working-hours rule per weekday,
//!   enforced by a `UNIQUE` column and an upsert statement
//! - **Redirect Store**: history of redirect targets; at most one carries
//!   the active flag, enforced by immediate transactions
//! - **Operators**: admin credentials (bcrypt) and bearer sessions
//!
//! ## Time
//!
//! Instants are stored as RFC 3339 UTC text. Each adapter carries the
//! configured zone and reads offset-less stored values in that zone.
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated in-memory `SQLite` databases
//! - File databases use WAL journaling and a busy timeout

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use paygate::{CoreError, Mutation, ToggleAction, select_servable};
use paygate_domain::{DayOfWeek, RedirectTarget, Tz, WorkingHoursRule};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Milliseconds a writer waits on a locked file database.
const BUSY_TIMEOUT_MS: u32 = 5_000;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{OperatorData, SessionData};
pub use error::PersistenceError;
pub use mutations::OperatorSync;

/// Default cap on `list_redirects`.
pub const DEFAULT_REDIRECT_LIST_LIMIT: usize = 100;

/// What a persisted mutation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The stored working-hours rule.
    WorkingHours(WorkingHoursRule),
    /// The newly created, active redirect target.
    Redirect(RedirectTarget),
}

/// Persistence adapter for the gateway stores.
pub struct Persistence {
    conn: SqliteConnection,
    tz: Tz,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so tests are
    /// isolated from each other. The zone defaults to UTC.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn, tz: Tz::UTC })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        let journal_mode: String = backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::set_busy_timeout(&mut conn, BUSY_TIMEOUT_MS)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        info!(
            database = path_str,
            journal_mode = %journal_mode,
            busy_timeout_ms = BUSY_TIMEOUT_MS,
            "Gateway database ready"
        );

        Ok(Self { conn, tz: Tz::UTC })
    }

    /// Sets the zone used to read offset-less stored instants.
    #[must_use]
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Persists a validated mutation atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; nothing is written then.
    pub fn apply_mutation(
        &mut self,
        mutation: &Mutation,
    ) -> Result<MutationOutcome, PersistenceError> {
        match mutation {
            Mutation::UpsertWorkingHours(rule) => {
                mutations::working_hours::upsert_working_hours(&mut self.conn, rule)
                    .map(MutationOutcome::WorkingHours)
            }
            Mutation::CreateRedirect(redirect) => {
                mutations::redirects::create_redirect(&mut self.conn, redirect, self.tz)
                    .map(MutationOutcome::Redirect)
            }
        }
    }

    /// Inserts or updates one weekday's rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub fn upsert_working_hours(
        &mut self,
        rule: &WorkingHoursRule,
    ) -> Result<WorkingHoursRule, PersistenceError> {
        mutations::working_hours::upsert_working_hours(&mut self.conn, rule)
    }

    /// Toggles a redirect target's active flag in one transaction.
    ///
    /// # Arguments
    ///
    /// * `redirect_id` - The target to toggle
    /// * `decide` - Chooses the action for the row as read in the transaction
    ///
    /// # Errors
    ///
    /// Returns `RedirectNotFound`, `ActivationRejected`, or a database error.
    pub fn toggle_redirect<F>(
        &mut self,
        redirect_id: i64,
        decide: F,
    ) -> Result<RedirectTarget, PersistenceError>
    where
        F: FnOnce(&RedirectTarget) -> Result<ToggleAction, CoreError>,
    {
        mutations::redirects::toggle_redirect(&mut self.conn, redirect_id, self.tz, decide)
    }

    // ========================================================================
    // Schedule Store
    // ========================================================================

    /// Retrieves the rule for one weekday.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_working_hours(
        &mut self,
        day: DayOfWeek,
    ) -> Result<Option<WorkingHoursRule>, PersistenceError> {
        queries::working_hours::get_working_hours(&mut self.conn, day)
    }

    /// Lists all rules, Monday first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_working_hours(&mut self) -> Result<Vec<WorkingHoursRule>, PersistenceError> {
        queries::working_hours::list_working_hours(&mut self.conn)
    }

    // ========================================================================
    // Redirect Store
    // ========================================================================

    /// Retrieves a redirect target by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_redirect(
        &mut self,
        redirect_id: i64,
    ) -> Result<Option<RedirectTarget>, PersistenceError> {
        queries::redirects::get_redirect(&mut self.conn, redirect_id, self.tz)
    }

    /// Lists redirect targets newest-first, capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_redirects(
        &mut self,
        limit: usize,
    ) -> Result<Vec<RedirectTarget>, PersistenceError> {
        queries::redirects::list_redirects(&mut self.conn, limit, self.tz)
    }

    /// Lists targets carrying the active flag, newest-first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_active_redirects(&mut self) -> Result<Vec<RedirectTarget>, PersistenceError> {
        queries::redirects::list_active_redirects(&mut self.conn, self.tz)
    }

    /// Returns the target that may be served at `now`, if any.
    ///
    /// A record qualifies only if it is active and its window covers `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_servable_redirect(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Option<RedirectTarget>, PersistenceError> {
        let candidates: Vec<RedirectTarget> = self.list_active_redirects()?;
        Ok(select_servable(&candidates, now).cloned())
    }

    // ========================================================================
    // Operator Management
    // ========================================================================

    /// Creates the operator or re-synchronizes its password hash.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing or a database write fails.
    pub fn sync_operator(
        &mut self,
        login_name: &str,
        password: &str,
    ) -> Result<OperatorSync, PersistenceError> {
        mutations::operators::sync_operator(&mut self.conn, login_name, password)
    }

    /// Retrieves an operator by login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_operator_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::operators::get_operator_by_login(&mut self.conn, login_name)
    }

    /// Retrieves an operator by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_operator_by_id(
        &mut self,
        operator_id: i64,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::operators::get_operator_by_id(&mut self.conn, operator_id)
    }

    /// Updates the last login timestamp for an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_last_login(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::update_last_login(&mut self.conn, operator_id)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if password verification fails.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::operators::verify_password(password, password_hash)
    }

    // ========================================================================
    // Session Management
    // ========================================================================

    /// Creates a new session for an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        operator_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::operators::create_session(&mut self.conn, session_token, operator_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::operators::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token, reporting whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<bool, PersistenceError> {
        mutations::operators::delete_session(&mut self.conn, session_token)
    }

    /// Deletes sessions that expired before `now` (ISO 8601 UTC).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::operators::delete_expired_sessions(&mut self.conn, now)
    }
}
