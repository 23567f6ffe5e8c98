// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer-session authentication for admin endpoints.

use paygate_persistence::{OperatorData, Persistence, PersistenceError, SessionData};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// An authenticated admin operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The operator's row ID.
    pub operator_id: i64,
    /// The operator's login name.
    pub username: String,
}

impl AuthenticatedActor {
    #[must_use]
    pub const fn new(operator_id: i64, username: String) -> Self {
        Self {
            operator_id,
            username,
        }
    }
}

/// A newly issued session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    /// The opaque bearer token.
    pub token: String,
    /// The operator the session belongs to.
    pub actor: AuthenticatedActor,
    /// Expiration timestamp (RFC 3339, UTC).
    pub expires_at: String,
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Message for any credential mismatch; never says which half was wrong.
    const INVALID_CREDENTIALS: &'static str = "Incorrect username or password";

    /// Checks credentials and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `username` - The operator login name
    /// * `password` - The plain-text password
    /// * `lifetime` - How long the session stays valid
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong or the session cannot
    /// be stored.
    pub fn login(
        persistence: &mut Persistence,
        username: &str,
        password: &str,
        lifetime: Duration,
    ) -> Result<IssuedSession, AuthError> {
        let operator: OperatorData = persistence
            .get_operator_by_login(username)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                warn!(username, "Login attempt for unknown operator");
                AuthError::AuthenticationFailed {
                    reason: String::from(Self::INVALID_CREDENTIALS),
                }
            })?;

        let password_matches: bool = persistence
            .verify_password(password, &operator.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_matches {
            warn!(username, "Login attempt with wrong password");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from(Self::INVALID_CREDENTIALS),
            });
        }

        let now: OffsetDateTime = Self::now_utc();
        persistence
            .delete_expired_sessions(&Self::format_timestamp(now)?)
            .map_err(Self::map_persistence_error)?;

        let token: String = Self::generate_session_token();
        let Some(expiry) = now.checked_add(lifetime) else {
            return Err(AuthError::Store {
                message: format!("Session lifetime {lifetime} is out of range"),
            });
        };
        let expires_at: String = Self::format_timestamp(expiry)?;

        persistence
            .create_session(&token, operator.operator_id, &expires_at)
            .map_err(Self::map_persistence_error)?;

        persistence
            .update_last_login(operator.operator_id)
            .map_err(Self::map_persistence_error)?;

        info!(operator_id = operator.operator_id, "Operator logged in");

        Ok(IssuedSession {
            token,
            actor: AuthenticatedActor::new(operator.operator_id, operator.login_name),
            expires_at,
        })
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown, expired, or orphaned.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedActor, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Rfc3339)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            debug!(session_id = session.session_id, "Session expired");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let operator: OperatorData = persistence
            .get_operator_by_id(session.operator_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Operator not found"),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok(AuthenticatedActor::new(
            operator.operator_id,
            operator.login_name,
        ))
    }

    /// Logs out by deleting the session.
    ///
    /// Unknown tokens are not an error; the session is gone either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        let removed: bool = persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)?;

        debug!(removed, "Session logout");
        Ok(())
    }

    /// Current UTC time at whole-second precision.
    fn now_utc() -> OffsetDateTime {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        now.replace_nanosecond(0).unwrap_or(now)
    }

    fn format_timestamp(instant: OffsetDateTime) -> Result<String, AuthError> {
        instant.format(&Rfc3339).map_err(|e| AuthError::Store {
            message: format!("Failed to format timestamp: {e}"),
        })
    }

    /// Generates an opaque 128-bit session token.
    fn generate_session_token() -> String {
        format!(
            "{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    /// Maps persistence errors to authentication errors.
    ///
    /// Only missing sessions and operators are the caller's fault; anything
    /// else is a store failure.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionNotFound(msg) | PersistenceError::OperatorNotFound(msg) => {
                AuthError::AuthenticationFailed { reason: msg }
            }
            other => AuthError::Store {
                message: other.to_string(),
            },
        }
    }
}
