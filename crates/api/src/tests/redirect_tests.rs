// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::Duration;

use crate::tests::helpers::{
    create_redirect_request, create_test_actor, create_test_persistence, create_test_settings,
    monday_at,
};
use crate::{
    ApiError, CreateRedirectRequest, create_redirect, current_redirect, list_redirects,
    toggle_redirect,
};

#[test]
fn test_create_redirect_returns_gateway_url() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    let now = monday_at(12, 0);

    let response = create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("https://qr.nspk.ru/AS10000001", now, 0),
        &create_test_actor(),
    )
    .unwrap();

    assert!(response.success);
    assert_eq!(response.data.gateway_url, "https://gateway.example.com/pay");
    assert_eq!(response.data.target_url, "https://qr.nspk.ru/AS10000001");
    assert_eq!(
        response.message,
        "Redirect created and active from 2026-03-02 11:00:00 MSK until 2026-03-02 13:00:00 MSK"
    );
}

#[test]
fn test_create_redirect_reads_naive_times_in_configured_zone() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();

    let request = CreateRedirectRequest {
        target_url: String::from("https://pay.example.com/link"),
        valid_from: String::from("2026-03-02T09:00"),
        valid_until: String::from("2026-03-02T18:00"),
        notes: Some(String::from("  morning shift  ")),
    };
    create_redirect(&mut persistence, &settings, request, &create_test_actor()).unwrap();

    let listed = list_redirects(&mut persistence, None).unwrap();
    let info = &listed.redirects[0];
    assert_eq!(info.valid_from, "2026-03-02T06:00:00Z");
    assert_eq!(info.valid_until, "2026-03-02T15:00:00Z");
    assert_eq!(info.notes.as_deref(), Some("morning shift"));
    assert!(info.is_active);
}

#[test]
fn test_create_redirect_rejects_empty_window() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();

    let request = CreateRedirectRequest {
        target_url: String::from("https://pay.example.com/link"),
        valid_from: String::from("2026-03-02T18:00"),
        valid_until: String::from("2026-03-02T09:00"),
        notes: None,
    };
    let err = create_redirect(&mut persistence, &settings, request, &create_test_actor())
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "valid_from_before_valid_until"
    ));
    let listed = list_redirects(&mut persistence, None).unwrap();
    assert!(listed.redirects.is_empty());
}

#[test]
fn test_create_redirect_rejects_bad_url() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    let now = monday_at(12, 0);

    let err = create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("ftp://files.example.com/pay", now, 0),
        &create_test_actor(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "target_url"));
}

#[test]
fn test_each_create_leaves_exactly_one_active() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    let actor = create_test_actor();
    let now = monday_at(12, 0);

    for index in 0..3 {
        create_redirect(
            &mut persistence,
            &settings,
            create_redirect_request(&format!("https://pay.example.com/link/{index}"), now, 0),
            &actor,
        )
        .unwrap();

        let listed = list_redirects(&mut persistence, None).unwrap();
        let active: Vec<_> = listed.redirects.iter().filter(|r| r.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, listed.redirects[0].id);
    }
}

#[test]
fn test_toggle_switches_active_record() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    let actor = create_test_actor();
    let now = monday_at(12, 0);

    let first = create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("https://pay.example.com/link/a", now, 0),
        &actor,
    )
    .unwrap();
    let second = create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("https://pay.example.com/link/b", now, 0),
        &actor,
    )
    .unwrap();

    let response =
        toggle_redirect(&mut persistence, &settings, first.data.id, &actor, now).unwrap();
    assert!(response.is_active);
    assert_eq!(response.message, format!("Redirect {} activated", first.data.id));

    let listed = list_redirects(&mut persistence, None).unwrap();
    let second_info = listed
        .redirects
        .iter()
        .find(|r| r.id == second.data.id)
        .unwrap();
    assert!(!second_info.is_active);
}

#[test]
fn test_toggle_off_leaves_no_active_record() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    let actor = create_test_actor();
    let now = monday_at(12, 0);

    let created = create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("https://pay.example.com/link/a", now, 0),
        &actor,
    )
    .unwrap();

    let response =
        toggle_redirect(&mut persistence, &settings, created.data.id, &actor, now).unwrap();
    assert!(!response.is_active);

    let current = current_redirect(&mut persistence, &settings, now).unwrap();
    assert!(!current.success);
    assert_eq!(current.error.as_deref(), Some("No active redirect configured"));
}

#[test]
fn test_toggle_on_outside_window_names_bound() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    let actor = create_test_actor();
    let now = monday_at(12, 0);

    let created = create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("https://pay.example.com/link/a", now, 0),
        &actor,
    )
    .unwrap();
    toggle_redirect(&mut persistence, &settings, created.data.id, &actor, now).unwrap();

    let later = now + Duration::hours(3);
    let err = toggle_redirect(&mut persistence, &settings, created.data.id, &actor, later)
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::DomainRuleViolation {
            rule: String::from("activation_within_window"),
            message: String::from("Redirect expired at 2026-03-02 13:00:00 MSK"),
        }
    );

    let earlier = now - Duration::hours(3);
    let err = toggle_redirect(&mut persistence, &settings, created.data.id, &actor, earlier)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Redirect is not yet valid until 2026-03-02 11:00:00 MSK"
    );
}

#[test]
fn test_toggle_unknown_redirect_is_not_found() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();

    let err = toggle_redirect(
        &mut persistence,
        &settings,
        404,
        &create_test_actor(),
        monday_at(12, 0),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_current_redirect_ignores_lapsed_active_record() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    let now = monday_at(12, 0);

    create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("https://pay.example.com/link/a", now, 0),
        &create_test_actor(),
    )
    .unwrap();

    let current = current_redirect(&mut persistence, &settings, now).unwrap();
    assert!(current.success);
    let info = current.redirect.unwrap();
    assert_eq!(info.target_url, "https://pay.example.com/link/a");
    assert_eq!(info.gateway_url, "https://gateway.example.com/pay");

    let lapsed = current_redirect(&mut persistence, &settings, now + Duration::hours(2)).unwrap();
    assert!(!lapsed.success);
    assert!(lapsed.redirect.is_none());
}

#[test]
fn test_list_redirects_respects_limit() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    let actor = create_test_actor();
    let now = monday_at(12, 0);

    for index in 0..4 {
        create_redirect(
            &mut persistence,
            &settings,
            create_redirect_request(&format!("https://pay.example.com/link/{index}"), now, 0),
            &actor,
        )
        .unwrap();
    }

    let listed = list_redirects(&mut persistence, Some(2)).unwrap();
    assert_eq!(listed.redirects.len(), 2);
    assert_eq!(listed.redirects[0].target_url, "https://pay.example.com/link/3");
}
