// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer session extraction for admin endpoints.
//!
//! This module provides an Axum extractor that validates the session token
//! at the server boundary.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use paygate_api::{ApiError, AuthenticatedActor, authenticate};
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Extractor for authenticated operators.
///
/// Carries the actor and the raw token, which logout needs.
///
/// # Errors
///
/// Rejects with HTTP 401 if:
/// - The Authorization header is missing
/// - The header is not `Bearer <token>`
/// - The session is unknown or expired
///
/// A session store failure is a 500 instead.
pub struct SessionOperator(pub AuthenticatedActor, pub String);

impl FromRequestParts<AppState> for SessionOperator {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token: &str = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                warn!("Authorization header is not a bearer token");
                SessionError::InvalidAuthorizationHeader
            })?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor = authenticate(&mut persistence, token).map_err(|e| {
            if let ApiError::AuthenticationFailed { .. } = e {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidSession(e.to_string())
            } else {
                SessionError::Unavailable(e)
            }
        })?;
        drop(persistence);

        debug!(username = %actor.username, "Session validated");

        Ok(Self(actor, token.to_string()))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
    /// The session could not be checked.
    Unavailable(ApiError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingAuthorizationHeader => String::from("Not authenticated"),
            Self::InvalidAuthorizationHeader => String::from(
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(reason) => reason,
            Self::Unavailable(err) => return HttpError::from(err).into_response(),
        };

        HttpError {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
        .into_response()
    }
}
