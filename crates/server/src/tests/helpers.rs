// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use crate::{AppState, Clock, build_router};
use paygate_api::{GatewaySettings, LoginResponse, ensure_admin_operator};
use paygate_domain::{Tz, parse_timezone};
use paygate_persistence::Persistence;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const TEST_ADMIN: &str = "admin";
pub const TEST_PASSWORD: &str = "Gateway-Secret-42";

pub fn moscow() -> Tz {
    parse_timezone("Europe/Moscow").unwrap()
}

/// Monday 2026-03-02, 12:00 Moscow.
pub fn monday_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

/// Monday 2026-03-02, 20:00 Moscow.
pub fn monday_evening() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 0).unwrap()
}

/// Creates app state over an in-memory store with the admin operator synced.
pub fn create_test_app_state(clock: Clock) -> AppState {
    let mut persistence: Persistence = Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_timezone(moscow());
    ensure_admin_operator(&mut persistence, TEST_ADMIN, TEST_PASSWORD).unwrap();

    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        settings: Arc::new(GatewaySettings::new(moscow(), "https://gateway.example.com")),
        clock,
    }
}

pub fn create_test_app(clock: Clock) -> Router {
    build_router(create_test_app_state(clock))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn json_request<T: Serialize>(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &T,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

pub async fn read_text(response: Response<Body>) -> String {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body_bytes.to_vec()).unwrap()
}

/// Logs in as the test admin and returns the bearer token.
pub async fn login_as_admin(app: &Router) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({"username": TEST_ADMIN, "password": TEST_PASSWORD}),
        ),
    )
    .await;
    let login: LoginResponse = read_json(response).await;
    login.access_token
}

/// Opens Monday 09:00-18:00 and publishes a redirect valid all Monday.
pub async fn configure_open_monday(app: &Router, token: &str) {
    send(
        app,
        json_request(
            "PUT",
            "/admin/working-hours",
            Some(token),
            &serde_json::json!({"day_of_week": 0, "work_start": "09:00", "work_end": "18:00"}),
        ),
    )
    .await;
    send(
        app,
        json_request(
            "POST",
            "/admin/dynamic-redirect",
            Some(token),
            &serde_json::json!({
                "target_url": "https://qr.nspk.ru/AS10000001",
                "valid_from": "2026-03-02T00:00",
                "valid_until": "2026-03-02T23:59",
            }),
        ),
    )
    .await;
}
