// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for visitor resolution and admin operations.
//!
//! Handlers are synchronous and take the persistence layer by `&mut`; the
//! server serializes access behind a mutex.

use chrono::{DateTime, Utc};
use paygate::{Command, Mutation, RedirectOutcome, apply, plan_toggle, resolve_outcome};
use paygate_domain::{
    Availability, ClosedReason, DayOfWeek, RedirectTarget, Tz, WorkingHoursRule,
    evaluate_availability, format_instant, format_local, local_day_of_week,
};
use paygate_persistence::{DEFAULT_REDIRECT_LIST_LIMIT, MutationOutcome, OperatorSync, Persistence};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::{AuthenticatedActor, AuthenticationService, IssuedSession};
use crate::error::{ApiError, translate_core_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ClosedNotice, CreateRedirectRequest, CreateRedirectResponse, CreatedRedirectData,
    CurrentRedirectInfo, CurrentRedirectResponse, GenerateQrResponse, HealthResponse,
    ListRedirectsResponse, ListWorkingHoursResponse, LoginRequest, LoginResponse, LogoutResponse,
    PaymentLinkResponse, PaymentStatusResponse, QrCodeInfo, RedirectInfo, ToggleRedirectResponse,
    UpsertWorkingHoursRequest, UpsertWorkingHoursResponse, VerifyResponse, WorkingHoursData,
    WorkingHoursInfo,
};
use crate::settings::GatewaySettings;

/// Message shown to visitors when resolution failed internally.
pub const GENERIC_ERROR_MESSAGE: &str = "The payment service is temporarily unavailable";

/// Message shown to visitors when no redirect is configured.
pub const MAINTENANCE_MESSAGE: &str = "The payment system is under maintenance";

/// Application name reported by the health check.
pub const APP_NAME: &str = "Payment Gateway";

/// Reports that the service is up.
///
/// Does not touch the store, so it answers even while the database is busy.
#[must_use]
pub fn health(version: &str) -> HealthResponse {
    HealthResponse {
        status: String::from("healthy"),
        app: String::from(APP_NAME),
        version: version.to_string(),
    }
}

// ============================================================================
// Visitor Resolution
// ============================================================================

/// Resolves one visit to the gateway.
///
/// Never fails: store and configuration problems degrade to `Closed` or
/// `Error` and are logged here with full detail.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `settings` - Gateway settings (zone)
/// * `now` - The visit instant
pub fn resolve_visit(
    persistence: &mut Persistence,
    settings: &GatewaySettings,
    now: DateTime<Utc>,
) -> RedirectOutcome {
    let day: DayOfWeek = local_day_of_week(now, settings.timezone);

    let rule: Option<WorkingHoursRule> = match persistence.get_working_hours(day) {
        Ok(rule) => rule,
        Err(err) => {
            error!(day = %day, error = %err, "Failed to load working hours");
            return RedirectOutcome::Error(err.to_string());
        }
    };

    let availability: Availability = evaluate_availability(now, settings.timezone, rule.as_ref());
    if let Availability::Closed(ClosedReason::ConfigurationError { day, detail }) = &availability {
        warn!(day = %day, detail = %detail, "Stored working hours are malformed");
    }

    let outcome: RedirectOutcome =
        resolve_outcome(availability, now, || persistence.list_active_redirects());

    match &outcome {
        RedirectOutcome::Redirect(target_url) => {
            info!(target_url = %target_url, "Visit redirected");
        }
        RedirectOutcome::Closed(reason) => info!(reason = %reason, "Visit outside working hours"),
        RedirectOutcome::Maintenance => warn!("Visit with no servable redirect"),
        RedirectOutcome::Error(detail) => error!(detail = %detail, "Visit resolution failed"),
    }

    outcome
}

/// Reports whether a payment would currently succeed.
///
/// Internal error detail is never exposed here.
pub fn payment_status(
    persistence: &mut Persistence,
    settings: &GatewaySettings,
    now: DateTime<Utc>,
) -> PaymentStatusResponse {
    let outcome: RedirectOutcome = resolve_visit(persistence, settings, now);
    let (available, message): (bool, String) = match &outcome {
        RedirectOutcome::Redirect(_) => (true, String::from("The payment system is available")),
        RedirectOutcome::Closed(reason) => (false, reason.to_string()),
        RedirectOutcome::Maintenance => (false, String::from(MAINTENANCE_MESSAGE)),
        RedirectOutcome::Error(_) => (false, String::from(GENERIC_ERROR_MESSAGE)),
    };

    PaymentStatusResponse {
        available,
        reason: (!available).then(|| outcome.kind().to_string()),
        message,
    }
}

/// Issues a tracked gateway URL for a QR code.
#[must_use]
pub fn generate_qr(settings: &GatewaySettings) -> GenerateQrResponse {
    let session_id: String = Uuid::new_v4().to_string();
    let url: String = settings.session_link(&session_id);
    info!(session_id = %session_id, "Generated QR link");

    GenerateQrResponse {
        success: true,
        qr_code: QrCodeInfo { url, session_id },
        message: String::from("QR code generated"),
    }
}

/// Issues a tracked gateway URL as a plain link.
#[must_use]
pub fn payment_link(settings: &GatewaySettings) -> PaymentLinkResponse {
    let session_id: String = Uuid::new_v4().to_string();
    let link: String = settings.session_link(&session_id);
    info!(session_id = %session_id, "Generated payment link");

    PaymentLinkResponse {
        success: true,
        session_id,
        link,
        message: String::from("Payment link created"),
    }
}

/// Builds what the closed page shows for a closed visit.
#[must_use]
pub fn closed_notice(
    settings: &GatewaySettings,
    now: DateTime<Utc>,
    reason: &ClosedReason,
) -> ClosedNotice {
    let day: DayOfWeek = local_day_of_week(now, settings.timezone);
    let hours: Option<String> = match reason {
        ClosedReason::OutsideHours { start, end } => Some(format!("{start} - {end}")),
        ClosedReason::DayOff { .. } | ClosedReason::ConfigurationError { .. } => None,
    };

    ClosedNotice {
        day_name: day.name().to_string(),
        hours,
        timezone: settings.timezone.name().to_string(),
        local_time: format_local(now, settings.timezone),
        reason: reason.to_string(),
    }
}

// ============================================================================
// Working Hours
// ============================================================================

/// Sets one weekday's working hours.
///
/// # Errors
///
/// Returns an error if:
/// - The weekday is outside 0..=6
/// - A time is not `HH:MM`
/// - The start is not before the end
/// - The database write fails
pub fn upsert_working_hours(
    persistence: &mut Persistence,
    settings: &GatewaySettings,
    request: UpsertWorkingHoursRequest,
    actor: &AuthenticatedActor,
) -> Result<UpsertWorkingHoursResponse, ApiError> {
    info!(
        actor = %actor.username,
        day_of_week = request.day_of_week,
        work_start = %request.work_start,
        work_end = %request.work_end,
        is_enabled = request.is_enabled,
        "Handling upsert_working_hours request"
    );

    let command: Command = Command::UpsertWorkingHours {
        day_of_week: request.day_of_week,
        start_time: request.work_start,
        end_time: request.work_end,
        enabled: request.is_enabled,
    };
    let mutation: Mutation = apply(command, settings.timezone).map_err(translate_core_error)?;

    let rule: WorkingHoursRule = match persistence
        .apply_mutation(&mutation)
        .map_err(translate_persistence_error)?
    {
        MutationOutcome::WorkingHours(rule) => rule,
        MutationOutcome::Redirect(_) => {
            return Err(ApiError::Internal {
                message: String::from("Unexpected mutation outcome for working hours"),
            });
        }
    };

    info!(day = %rule.day(), hours = %rule.hours_label(), "Working hours updated");

    Ok(UpsertWorkingHoursResponse {
        success: true,
        message: format!(
            "Working hours for {} updated: {}",
            rule.day(),
            rule.hours_label()
        ),
        data: WorkingHoursData {
            day_of_week: rule.day().index(),
            work_start: rule.start_time().to_string(),
            work_end: rule.end_time().to_string(),
        },
    })
}

/// Lists all working-hours rules, Monday first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_working_hours(
    persistence: &mut Persistence,
) -> Result<ListWorkingHoursResponse, ApiError> {
    let rules: Vec<WorkingHoursRule> = persistence
        .list_working_hours()
        .map_err(translate_persistence_error)?;

    Ok(ListWorkingHoursResponse {
        working_hours: rules.iter().map(working_hours_info).collect(),
    })
}

fn working_hours_info(rule: &WorkingHoursRule) -> WorkingHoursInfo {
    WorkingHoursInfo {
        id: rule.rule_id(),
        day_of_week: rule.day().index(),
        day_name: rule.day().name().to_string(),
        work_start: rule.start_time().to_string(),
        work_end: rule.end_time().to_string(),
        is_enabled: rule.is_enabled(),
    }
}

// ============================================================================
// Redirect Targets
// ============================================================================

/// Creates a redirect target and makes it the only active one.
///
/// # Errors
///
/// Returns an error if:
/// - The target URL is rejected
/// - A timestamp cannot be parsed
/// - `valid_from` is not before `valid_until`
/// - The database transaction fails
pub fn create_redirect(
    persistence: &mut Persistence,
    settings: &GatewaySettings,
    request: CreateRedirectRequest,
    actor: &AuthenticatedActor,
) -> Result<CreateRedirectResponse, ApiError> {
    info!(
        actor = %actor.username,
        target_url = %request.target_url,
        valid_from = %request.valid_from,
        valid_until = %request.valid_until,
        "Handling create_redirect request"
    );

    let command: Command = Command::CreateRedirect {
        target_url: request.target_url,
        valid_from: request.valid_from,
        valid_until: request.valid_until,
        notes: request.notes,
    };
    let mutation: Mutation = apply(command, settings.timezone).map_err(translate_core_error)?;

    let target: RedirectTarget = match persistence
        .apply_mutation(&mutation)
        .map_err(translate_persistence_error)?
    {
        MutationOutcome::Redirect(target) => target,
        MutationOutcome::WorkingHours(_) => {
            return Err(ApiError::Internal {
                message: String::from("Unexpected mutation outcome for redirect"),
            });
        }
    };

    info!(redirect_id = target.redirect_id, "Redirect created and activated");

    Ok(CreateRedirectResponse {
        success: true,
        message: format!(
            "Redirect created and active from {} until {}",
            format_local(target.window.valid_from(), settings.timezone),
            format_local(target.window.valid_until(), settings.timezone)
        ),
        data: CreatedRedirectData {
            id: target.redirect_id,
            gateway_url: settings.gateway_url(),
            target_url: target.target_url,
        },
    })
}

/// Flips a redirect target's active flag.
///
/// Activation is only allowed while `now` is inside the target's window.
///
/// # Errors
///
/// Returns an error if:
/// - The target does not exist
/// - Activation falls outside the validity window
/// - The database transaction fails
pub fn toggle_redirect(
    persistence: &mut Persistence,
    settings: &GatewaySettings,
    redirect_id: i64,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<ToggleRedirectResponse, ApiError> {
    info!(actor = %actor.username, redirect_id, "Handling toggle_redirect request");

    let tz: Tz = settings.timezone;
    let target: RedirectTarget = persistence
        .toggle_redirect(redirect_id, |target| plan_toggle(target, now, tz))
        .map_err(translate_persistence_error)?;

    let state: &str = if target.is_active {
        "activated"
    } else {
        "deactivated"
    };
    info!(redirect_id, state, "Redirect toggled");

    Ok(ToggleRedirectResponse {
        success: true,
        message: format!("Redirect {redirect_id} {state}"),
        id: target.redirect_id,
        is_active: target.is_active,
    })
}

/// Lists redirect targets, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_redirects(
    persistence: &mut Persistence,
    limit: Option<usize>,
) -> Result<ListRedirectsResponse, ApiError> {
    let targets: Vec<RedirectTarget> = persistence
        .list_redirects(limit.unwrap_or(DEFAULT_REDIRECT_LIST_LIMIT))
        .map_err(translate_persistence_error)?;

    Ok(ListRedirectsResponse {
        redirects: targets.into_iter().map(redirect_info).collect(),
    })
}

fn redirect_info(target: RedirectTarget) -> RedirectInfo {
    RedirectInfo {
        id: target.redirect_id,
        valid_from: format_instant(target.window.valid_from()),
        valid_until: format_instant(target.window.valid_until()),
        created_at: format_instant(target.created_at),
        target_url: target.target_url,
        is_active: target.is_active,
        notes: target.notes,
    }
}

/// Returns the redirect the resolver would serve at `now`.
///
/// Uses the same predicate as visit resolution but ignores working hours.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn current_redirect(
    persistence: &mut Persistence,
    settings: &GatewaySettings,
    now: DateTime<Utc>,
) -> Result<CurrentRedirectResponse, ApiError> {
    let servable: Option<RedirectTarget> = persistence
        .get_servable_redirect(now)
        .map_err(translate_persistence_error)?;

    Ok(servable.map_or_else(
        || CurrentRedirectResponse {
            success: false,
            redirect: None,
            error: Some(String::from("No active redirect configured")),
        },
        |target| CurrentRedirectResponse {
            success: true,
            redirect: Some(CurrentRedirectInfo {
                id: target.redirect_id,
                gateway_url: settings.gateway_url(),
                valid_from: format_instant(target.window.valid_from()),
                valid_until: format_instant(target.window.valid_until()),
                target_url: target.target_url,
                notes: target.notes,
            }),
            error: None,
        },
    ))
}

// ============================================================================
// Authentication
// ============================================================================

/// Authenticates an operator and issues a bearer session.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the session cannot be
/// stored.
pub fn login(
    persistence: &mut Persistence,
    settings: &GatewaySettings,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let session: IssuedSession = AuthenticationService::login(
        persistence,
        &request.username,
        &request.password,
        settings.session_lifetime,
    )?;

    Ok(LoginResponse {
        access_token: session.token,
        token_type: String::from("bearer"),
        username: session.actor.username,
        expires_at: session.expires_at,
    })
}

/// Resolves a bearer token to the operator it belongs to.
///
/// # Errors
///
/// Returns an error if the token is unknown or expired.
pub fn authenticate(
    persistence: &mut Persistence,
    session_token: &str,
) -> Result<AuthenticatedActor, ApiError> {
    Ok(AuthenticationService::validate_session(
        persistence,
        session_token,
    )?)
}

/// Confirms the caller's token is valid.
#[must_use]
pub fn verify(actor: &AuthenticatedActor) -> VerifyResponse {
    VerifyResponse {
        authenticated: true,
        username: actor.username.clone(),
    }
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(
    persistence: &mut Persistence,
    session_token: &str,
) -> Result<LogoutResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(LogoutResponse {
        message: String::from("Logged out successfully"),
    })
}

/// Creates the configured admin operator or re-synchronizes its password.
///
/// A password failing the policy is accepted with a warning.
///
/// # Errors
///
/// Returns an error if the login name is blank or the store write fails.
pub fn ensure_admin_operator(
    persistence: &mut Persistence,
    username: &str,
    password: &str,
) -> Result<OperatorSync, ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("admin_username"),
            message: String::from("Admin username must not be empty"),
        });
    }

    if let Err(err) = PasswordPolicy::default().validate(password, username) {
        warn!(username, error = %err, "Admin password does not meet the password policy");
    }

    let sync: OperatorSync = persistence
        .sync_operator(username, password)
        .map_err(translate_persistence_error)?;

    match sync {
        OperatorSync::Created(operator_id) => info!(operator_id, "Admin operator created"),
        OperatorSync::PasswordUpdated(operator_id) => {
            info!(operator_id, "Admin operator password re-synchronized");
        }
        OperatorSync::Unchanged(operator_id) => info!(operator_id, "Admin operator unchanged"),
    }

    Ok(sync)
}
