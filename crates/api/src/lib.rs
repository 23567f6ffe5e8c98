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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;
mod settings;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, IssuedSession};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    APP_NAME, GENERIC_ERROR_MESSAGE, MAINTENANCE_MESSAGE, authenticate, closed_notice,
    create_redirect, current_redirect, ensure_admin_operator, generate_qr, health, list_redirects,
    list_working_hours, login, logout, payment_link, payment_status, resolve_visit, toggle_redirect,
    upsert_working_hours, verify,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    ClosedNotice, CreateRedirectRequest, CreateRedirectResponse, CreatedRedirectData,
    CurrentRedirectInfo, CurrentRedirectResponse, GenerateQrResponse, HealthResponse,
    ListRedirectsResponse, ListWorkingHoursResponse, LoginRequest, LoginResponse, LogoutResponse,
    PaymentLinkResponse, PaymentStatusResponse, QrCodeInfo, RedirectInfo, ToggleRedirectResponse,
    UpsertWorkingHoursRequest, UpsertWorkingHoursResponse, VerifyResponse, WorkingHoursData,
    WorkingHoursInfo,
};
pub use settings::GatewaySettings;

// Re-exported so the server names the same outcome type.
pub use paygate::RedirectOutcome;
