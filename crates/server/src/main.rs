// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod pages;
mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::{DateTime, Utc};
use clap::Parser;
use paygate_api::{
    ApiError, ClosedNotice, CreateRedirectRequest, CreateRedirectResponse, CurrentRedirectResponse,
    GENERIC_ERROR_MESSAGE, GatewaySettings, GenerateQrResponse, HealthResponse,
    ListRedirectsResponse, ListWorkingHoursResponse, LoginRequest, LoginResponse, LogoutResponse,
    MAINTENANCE_MESSAGE, PaymentLinkResponse, PaymentStatusResponse, RedirectOutcome,
    ToggleRedirectResponse, UpsertWorkingHoursRequest, UpsertWorkingHoursResponse, VerifyResponse,
    closed_notice, create_redirect, current_redirect, ensure_admin_operator, generate_qr, health,
    list_redirects, list_working_hours, login, logout, payment_link, payment_status, resolve_visit,
    toggle_redirect, upsert_working_hours, verify,
};
use paygate_domain::{Tz, parse_timezone};
use paygate_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::SessionOperator;

/// Payment gateway server - stable payment links with scheduled redirects
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "PAYGATE_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "PAYGATE_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "PAYGATE_PORT", default_value_t = 8000)]
    port: u16,

    /// IANA zone for working hours and offset-less timestamps
    #[arg(long, env = "PAYGATE_TIMEZONE", default_value = "Europe/Moscow")]
    timezone: String,

    /// Public base URL used to build gateway links
    #[arg(
        long,
        env = "PAYGATE_PUBLIC_URL",
        default_value = "http://localhost:8000"
    )]
    public_url: String,

    /// Login name of the admin operator
    #[arg(long, env = "PAYGATE_ADMIN_USERNAME", default_value = "admin")]
    admin_username: String,

    /// Password of the admin operator. Without it, no operator is synced.
    #[arg(long, env = "PAYGATE_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,

    /// Lifetime of admin sessions, in hours (at most one year)
    #[arg(
        long,
        env = "PAYGATE_SESSION_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(u32).range(1..=8760)
    )]
    session_hours: u32,

    /// Attempts to open the database before giving up
    #[arg(long, env = "PAYGATE_DB_CONNECT_ATTEMPTS", default_value_t = 10)]
    db_connect_attempts: u32,

    /// Seconds to wait between database attempts
    #[arg(long, env = "PAYGATE_DB_RETRY_SECONDS", default_value_t = 2)]
    db_retry_seconds: u64,
}

/// Source of the current instant.
type Clock = fn() -> DateTime<Utc>;

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex; handlers hold the lock only
/// for the duration of one API call.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    settings: Arc<GatewaySettings>,
    clock: Clock,
}

impl AppState {
    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

/// Query parameters for listing redirect targets.
#[derive(Debug, Deserialize)]
struct ListRedirectsQuery {
    /// Maximum number of records, newest first.
    limit: Option<usize>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::DomainRuleViolation { .. } | ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("Internal server error"),
                }
            }
        }
    }
}

// ============================================================================
// Visitor Handlers
// ============================================================================

/// Builds the 307 response for a resolved target.
///
/// A target that cannot be carried in a `Location` header falls back to the
/// error page.
fn redirect_response(target_url: &str) -> Response {
    match HeaderValue::try_from(target_url) {
        Ok(location) => {
            let headers = [(header::LOCATION, location)];
            (StatusCode::TEMPORARY_REDIRECT, headers).into_response()
        }
        Err(err) => {
            error!(error = %err, "Active redirect target is not a valid Location header");
            error_page_response()
        }
    }
}

fn error_page_response() -> Response {
    let page = pages::render_error(GENERIC_ERROR_MESSAGE);
    (StatusCode::SERVICE_UNAVAILABLE, page).into_response()
}

/// Handler for GET `/pay` and `/pay/{session_id}`.
///
/// The session placeholder only makes each scanned link unique; it does not
/// affect resolution.
async fn handle_pay(AxumState(app_state): AxumState<AppState>) -> Response {
    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let outcome: RedirectOutcome = resolve_visit(&mut persistence, &app_state.settings, now);
    drop(persistence);

    match outcome {
        RedirectOutcome::Redirect(target_url) => redirect_response(&target_url),
        RedirectOutcome::Closed(reason) => {
            let notice: ClosedNotice = closed_notice(&app_state.settings, now, &reason);
            pages::render_closed(&notice).into_response()
        }
        RedirectOutcome::Maintenance => (
            StatusCode::SERVICE_UNAVAILABLE,
            pages::render_maintenance(MAINTENANCE_MESSAGE),
        )
            .into_response(),
        RedirectOutcome::Error(_) => error_page_response(),
    }
}

/// Handler for GET `/api/payment-status` endpoint.
async fn handle_payment_status(
    AxumState(app_state): AxumState<AppState>,
) -> Json<PaymentStatusResponse> {
    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    Json(payment_status(&mut persistence, &app_state.settings, now))
}

/// Handler for GET `/api/generate-qr` endpoint.
#[allow(clippy::unused_async)]
async fn handle_generate_qr(AxumState(app_state): AxumState<AppState>) -> Json<GenerateQrResponse> {
    Json(generate_qr(&app_state.settings))
}

/// Handler for GET `/api/payment-link` endpoint.
#[allow(clippy::unused_async)]
async fn handle_payment_link(
    AxumState(app_state): AxumState<AppState>,
) -> Json<PaymentLinkResponse> {
    Json(payment_link(&app_state.settings))
}

/// Handler for GET `/health` endpoint.
#[allow(clippy::unused_async)]
async fn handle_health() -> Json<HealthResponse> {
    Json(health(env!("CARGO_PKG_VERSION")))
}

// ============================================================================
// Authentication Handlers
// ============================================================================

/// Handler for POST `/api/auth/login` endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(username = %req.username, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(&mut persistence, &app_state.settings, &req)?;
    drop(persistence);

    info!(username = %response.username, "Login succeeded");
    Ok(Json(response))
}

/// Handler for GET `/api/auth/verify` endpoint.
#[allow(clippy::unused_async)]
async fn handle_verify(SessionOperator(actor, _token): SessionOperator) -> Json<VerifyResponse> {
    Json(verify(&actor))
}

/// Handler for POST `/api/auth/logout` endpoint.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, token): SessionOperator,
) -> Result<Json<LogoutResponse>, HttpError> {
    info!(username = %actor.username, "Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LogoutResponse = logout(&mut persistence, &token)?;
    Ok(Json(response))
}

// ============================================================================
// Admin Handlers
// ============================================================================

/// Handler for GET `/admin/working-hours` endpoint.
async fn handle_list_working_hours(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(_actor, _token): SessionOperator,
) -> Result<Json<ListWorkingHoursResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_working_hours(&mut persistence)?))
}

/// Handler for PUT `/admin/working-hours` endpoint.
async fn handle_upsert_working_hours(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _token): SessionOperator,
    Json(req): Json<UpsertWorkingHoursRequest>,
) -> Result<Json<UpsertWorkingHoursResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: UpsertWorkingHoursResponse =
        upsert_working_hours(&mut persistence, &app_state.settings, req, &actor)?;
    Ok(Json(response))
}

/// Handler for POST `/admin/dynamic-redirect` endpoint.
async fn handle_create_redirect(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _token): SessionOperator,
    Json(req): Json<CreateRedirectRequest>,
) -> Result<Json<CreateRedirectResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CreateRedirectResponse =
        create_redirect(&mut persistence, &app_state.settings, req, &actor)?;
    Ok(Json(response))
}

/// Handler for PATCH `/admin/dynamic-redirect/{redirect_id}/toggle` endpoint.
async fn handle_toggle_redirect(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _token): SessionOperator,
    Path(redirect_id): Path<i64>,
) -> Result<Json<ToggleRedirectResponse>, HttpError> {
    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    let response: ToggleRedirectResponse = toggle_redirect(
        &mut persistence,
        &app_state.settings,
        redirect_id,
        &actor,
        now,
    )?;
    Ok(Json(response))
}

/// Handler for GET `/admin/dynamic-redirects` endpoint.
async fn handle_list_redirects(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(_actor, _token): SessionOperator,
    Query(query): Query<ListRedirectsQuery>,
) -> Result<Json<ListRedirectsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_redirects(&mut persistence, query.limit)?))
}

/// Handler for GET `/admin/current-redirect` endpoint.
async fn handle_current_redirect(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(_actor, _token): SessionOperator,
) -> Result<Json<CurrentRedirectResponse>, HttpError> {
    let now: DateTime<Utc> = app_state.now();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(current_redirect(
        &mut persistence,
        &app_state.settings,
        now,
    )?))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/pay", get(handle_pay))
        .route("/pay/{session_id}", get(handle_pay))
        .route("/api/payment-status", get(handle_payment_status))
        .route("/api/generate-qr", get(handle_generate_qr))
        .route("/api/payment-link", get(handle_payment_link))
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/verify", get(handle_verify))
        .route("/api/auth/logout", post(handle_logout))
        .route(
            "/admin/working-hours",
            get(handle_list_working_hours).put(handle_upsert_working_hours),
        )
        .route("/admin/dynamic-redirect", post(handle_create_redirect))
        .route(
            "/admin/dynamic-redirect/{redirect_id}/toggle",
            patch(handle_toggle_redirect),
        )
        .route("/admin/dynamic-redirects", get(handle_list_redirects))
        .route("/admin/current-redirect", get(handle_current_redirect))
        .with_state(app_state)
}

/// Opens the store, retrying a bounded number of times.
///
/// # Errors
///
/// Returns the last error once every attempt has failed.
async fn open_persistence(args: &Args, tz: Tz) -> Result<Persistence, PersistenceError> {
    let attempts: u32 = args.db_connect_attempts.max(1);
    let mut attempt: u32 = 1;

    loop {
        let opened: Result<Persistence, PersistenceError> = if let Some(db_path) = &args.database
        {
            Persistence::new_with_file(db_path)
        } else {
            Persistence::new_in_memory()
        };

        match opened {
            Ok(persistence) => {
                info!(attempt, "Database ready");
                return Ok(persistence.with_timezone(tz));
            }
            Err(err) if attempt < attempts => {
                warn!(
                    attempt,
                    attempts,
                    retry_seconds = args.db_retry_seconds,
                    error = %err,
                    "Database not ready, retrying"
                );
                tokio::time::sleep(std::time::Duration::from_secs(args.db_retry_seconds)).await;
                attempt += 1;
            }
            Err(err) => {
                error!(attempts, error = %err, "Database unavailable, giving up");
                return Err(err);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing payment gateway server");

    let tz: Tz = parse_timezone(&args.timezone)?;
    let settings: GatewaySettings = GatewaySettings::new(tz, &args.public_url)
        .with_session_lifetime(time::Duration::hours(i64::from(args.session_hours)));
    info!(
        timezone = %tz,
        public_url = %settings.public_url,
        database = args.database.as_deref().unwrap_or(":memory:"),
        "Configuration loaded"
    );

    let mut persistence: Persistence = open_persistence(&args, tz).await?;

    if let Some(password) = &args.admin_password {
        ensure_admin_operator(&mut persistence, &args.admin_username, password)?;
    } else {
        warn!("No admin password configured; admin endpoints are unreachable");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        settings: Arc::new(settings),
        clock: Utc::now,
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
