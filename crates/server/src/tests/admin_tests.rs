// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use paygate_api::{
    CreateRedirectResponse, CurrentRedirectResponse, ListRedirectsResponse,
    ListWorkingHoursResponse, ToggleRedirectResponse, UpsertWorkingHoursResponse,
};

use crate::ErrorResponse;
use crate::tests::helpers::{
    configure_open_monday, create_test_app, empty_request, json_request, login_as_admin,
    monday_noon, read_json, send,
};

#[tokio::test]
async fn test_put_working_hours_round_trip() {
    let app = create_test_app(monday_noon);
    let token = login_as_admin(&app).await;

    let response = send(
        &app,
        json_request(
            "PUT",
            "/admin/working-hours",
            Some(&token),
            &serde_json::json!({"day_of_week": 2, "work_start": "10:00", "work_end": "19:00"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: UpsertWorkingHoursResponse = read_json(response).await;
    assert_eq!(
        updated.message,
        "Working hours for Wednesday updated: 10:00 - 19:00"
    );

    let response = send(&app, empty_request("GET", "/admin/working-hours", Some(&token))).await;
    let listed: ListWorkingHoursResponse = read_json(response).await;
    assert_eq!(listed.working_hours.len(), 1);
    assert_eq!(listed.working_hours[0].day_name, "Wednesday");
}

#[tokio::test]
async fn test_put_working_hours_rejects_invalid_input() {
    let app = create_test_app(monday_noon);
    let token = login_as_admin(&app).await;

    for body in [
        serde_json::json!({"day_of_week": 7, "work_start": "09:00", "work_end": "18:00"}),
        serde_json::json!({"day_of_week": 1, "work_start": "9:00", "work_end": "18:00"}),
        serde_json::json!({"day_of_week": 1, "work_start": "18:00", "work_end": "09:00"}),
    ] {
        let response = send(
            &app,
            json_request("PUT", "/admin/working-hours", Some(&token), &body),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let error: ErrorResponse = read_json(response).await;
        assert!(error.error);
    }
}

#[tokio::test]
async fn test_create_redirect_reports_gateway_url() {
    let app = create_test_app(monday_noon);
    let token = login_as_admin(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/admin/dynamic-redirect",
            Some(&token),
            &serde_json::json!({
                "target_url": "https://qr.nspk.ru/AS10000001",
                "valid_from": "2026-03-02T09:00",
                "valid_until": "2026-03-02T18:00",
                "notes": "monday",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let created: CreateRedirectResponse = read_json(response).await;
    assert!(created.success);
    assert_eq!(created.data.gateway_url, "https://gateway.example.com/pay");
    assert!(created.message.contains("2026-03-02 09:00:00 MSK"));
}

#[tokio::test]
async fn test_create_redirect_rejects_inverted_window() {
    let app = create_test_app(monday_noon);
    let token = login_as_admin(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/admin/dynamic-redirect",
            Some(&token),
            &serde_json::json!({
                "target_url": "https://qr.nspk.ru/AS10000001",
                "valid_from": "2026-03-02T18:00",
                "valid_until": "2026-03-02T09:00",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_toggle_flow() {
    let app = create_test_app(monday_noon);
    let token = login_as_admin(&app).await;
    configure_open_monday(&app, &token).await;

    let response = send(
        &app,
        empty_request("GET", "/admin/dynamic-redirects", Some(&token)),
    )
    .await;
    let listed: ListRedirectsResponse = read_json(response).await;
    let redirect_id = listed.redirects[0].id;
    assert!(listed.redirects[0].is_active);

    let uri = format!("/admin/dynamic-redirect/{redirect_id}/toggle");
    let response = send(&app, empty_request("PATCH", &uri, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let toggled: ToggleRedirectResponse = read_json(response).await;
    assert!(!toggled.is_active);

    let response = send(
        &app,
        empty_request("GET", "/admin/current-redirect", Some(&token)),
    )
    .await;
    let current: CurrentRedirectResponse = read_json(response).await;
    assert!(!current.success);

    let response = send(&app, empty_request("PATCH", &uri, Some(&token))).await;
    let toggled: ToggleRedirectResponse = read_json(response).await;
    assert!(toggled.is_active);
}

#[tokio::test]
async fn test_toggle_outside_window_is_rejected() {
    let app = create_test_app(monday_noon);
    let token = login_as_admin(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/admin/dynamic-redirect",
            Some(&token),
            &serde_json::json!({
                "target_url": "https://qr.nspk.ru/AS10000001",
                "valid_from": "2026-03-03T09:00",
                "valid_until": "2026-03-03T18:00",
            }),
        ),
    )
    .await;
    let created: CreateRedirectResponse = read_json(response).await;
    let uri = format!("/admin/dynamic-redirect/{}/toggle", created.data.id);

    send(&app, empty_request("PATCH", &uri, Some(&token))).await;
    let response = send(&app, empty_request("PATCH", &uri, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = read_json(response).await;
    assert_eq!(
        error.message,
        "Redirect is not yet valid until 2026-03-03 09:00:00 MSK"
    );
}

#[tokio::test]
async fn test_toggle_unknown_redirect_is_not_found() {
    let app = create_test_app(monday_noon);
    let token = login_as_admin(&app).await;

    let response = send(
        &app,
        empty_request("PATCH", "/admin/dynamic-redirect/999/toggle", Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_current_redirect_returns_servable_record() {
    let app = create_test_app(monday_noon);
    let token = login_as_admin(&app).await;
    configure_open_monday(&app, &token).await;

    let response = send(
        &app,
        empty_request("GET", "/admin/current-redirect", Some(&token)),
    )
    .await;
    let current: CurrentRedirectResponse = read_json(response).await;
    assert!(current.success);
    assert_eq!(
        current.redirect.unwrap().target_url,
        "https://qr.nspk.ru/AS10000001"
    );
}
