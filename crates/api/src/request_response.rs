// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};

const fn default_enabled() -> bool {
    true
}

// ============================================================================
// Working Hours
// ============================================================================

/// API request to set one weekday's working hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertWorkingHoursRequest {
    /// Weekday index, Monday = 0.
    pub day_of_week: i64,
    /// Opening time (`HH:MM`).
    pub work_start: String,
    /// Closing time (`HH:MM`).
    pub work_end: String,
    /// Whether the day is a working day.
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

/// A stored working-hours rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursInfo {
    pub id: Option<i64>,
    pub day_of_week: u8,
    pub day_name: String,
    pub work_start: String,
    pub work_end: String,
    pub is_enabled: bool,
}

/// Echo of the rule that was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursData {
    pub day_of_week: u8,
    pub work_start: String,
    pub work_end: String,
}

/// API response for a successful working-hours upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertWorkingHoursResponse {
    pub success: bool,
    /// Names the weekday and the new hours.
    pub message: String,
    pub data: WorkingHoursData,
}

/// API response listing all rules, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWorkingHoursResponse {
    pub working_hours: Vec<WorkingHoursInfo>,
}

// ============================================================================
// Redirect Targets
// ============================================================================

/// API request to create a redirect target.
///
/// Timestamps may carry an offset; offset-less values are read in the
/// configured zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRedirectRequest {
    pub target_url: String,
    pub valid_from: String,
    pub valid_until: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Summary of a newly created target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRedirectData {
    pub id: i64,
    /// The stable public URL visitors scan.
    pub gateway_url: String,
    pub target_url: String,
}

/// API response for a successful redirect creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRedirectResponse {
    pub success: bool,
    pub message: String,
    pub data: CreatedRedirectData,
}

/// A stored redirect target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectInfo {
    pub id: i64,
    pub target_url: String,
    /// RFC 3339, UTC.
    pub valid_from: String,
    /// RFC 3339, UTC.
    pub valid_until: String,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: String,
}

/// API response listing redirect targets, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRedirectsResponse {
    pub redirects: Vec<RedirectInfo>,
}

/// API response for a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleRedirectResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
    pub is_active: bool,
}

/// The redirect the resolver would serve right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentRedirectInfo {
    pub id: i64,
    pub gateway_url: String,
    pub target_url: String,
    pub valid_from: String,
    pub valid_until: String,
    pub notes: Option<String>,
}

/// API response for the current-redirect lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentRedirectResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<CurrentRedirectInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Visitor Endpoints
// ============================================================================

/// API response for the payment-status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub available: bool,
    /// One of `closed`, `maintenance`, `error` when unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub message: String,
}

/// A tracked gateway link encoded into a QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCodeInfo {
    pub url: String,
    pub session_id: String,
}

/// API response for QR generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQrResponse {
    pub success: bool,
    pub qr_code: QrCodeInfo,
    pub message: String,
}

/// API response for a plain payment link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLinkResponse {
    pub success: bool,
    pub session_id: String,
    pub link: String,
    pub message: String,
}

/// What the closed page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedNotice {
    /// Today's weekday name.
    pub day_name: String,
    /// Today's hours (`HH:MM - HH:MM`), or `None` when not yet announced.
    pub hours: Option<String>,
    /// Configured zone name.
    pub timezone: String,
    /// Local time of the visit.
    pub local_time: String,
    /// Why the gateway is closed.
    pub reason: String,
}

// ============================================================================
// Authentication
// ============================================================================

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// API response for successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token (opaque).
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    pub username: String,
    /// Session expiration timestamp (RFC 3339).
    pub expires_at: String,
}

/// API response for token verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub authenticated: bool,
    pub username: String,
}

/// Liveness report for load balancers and uptime checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: String,
    pub app: String,
    pub version: String,
}

/// API response for logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}
