// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::Duration;
use paygate_domain::{ClosedReason, DayOfWeek};

use crate::tests::helpers::{
    create_hours_request, create_redirect_request, create_test_actor, create_test_persistence,
    create_test_settings, monday_at,
};
use crate::{
    GENERIC_ERROR_MESSAGE, MAINTENANCE_MESSAGE, RedirectOutcome, UpsertWorkingHoursRequest,
    closed_notice, create_redirect, generate_qr, health, payment_link, payment_status,
    resolve_visit, toggle_redirect, upsert_working_hours,
};

fn open_monday(persistence: &mut paygate_persistence::Persistence) {
    upsert_working_hours(
        persistence,
        &create_test_settings(),
        create_hours_request(0, "09:00", "18:00"),
        &create_test_actor(),
    )
    .unwrap();
}

#[test]
fn test_resolve_without_rule_is_day_off() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();

    let outcome = resolve_visit(&mut persistence, &settings, monday_at(12, 0));
    assert_eq!(
        outcome,
        RedirectOutcome::Closed(ClosedReason::DayOff {
            day: DayOfWeek::new(0).unwrap()
        })
    );
    if let RedirectOutcome::Closed(reason) = outcome {
        assert!(reason.to_string().contains("Monday"));
    }
}

#[test]
fn test_resolve_disabled_day_is_day_off() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    upsert_working_hours(
        &mut persistence,
        &settings,
        UpsertWorkingHoursRequest {
            is_enabled: false,
            ..create_hours_request(0, "09:00", "18:00")
        },
        &create_test_actor(),
    )
    .unwrap();

    let outcome = resolve_visit(&mut persistence, &settings, monday_at(12, 0));
    assert!(matches!(
        outcome,
        RedirectOutcome::Closed(ClosedReason::DayOff { .. })
    ));
}

#[test]
fn test_resolve_bounds_are_inclusive() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    open_monday(&mut persistence);

    let all_day = crate::CreateRedirectRequest {
        target_url: String::from("https://pay.example.com/link/day"),
        valid_from: String::from("2026-03-02T00:00"),
        valid_until: String::from("2026-03-02T23:59"),
        notes: None,
    };
    create_redirect(&mut persistence, &settings, all_day, &create_test_actor()).unwrap();

    for (hour, minute) in [(9, 0), (12, 0), (18, 0)] {
        assert_eq!(
            resolve_visit(&mut persistence, &settings, monday_at(hour, minute)),
            RedirectOutcome::Redirect(String::from("https://pay.example.com/link/day")),
            "{hour:02}:{minute:02} should be open"
        );
    }

    for (hour, minute) in [(8, 59), (18, 1)] {
        let outcome = resolve_visit(&mut persistence, &settings, monday_at(hour, minute));
        let RedirectOutcome::Closed(reason) = outcome else {
            panic!("{hour:02}:{minute:02} should be closed");
        };
        assert!(reason.to_string().contains("09:00 - 18:00"));
    }
}

#[test]
fn test_resolve_closed_ignores_redirect_state() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    open_monday(&mut persistence);
    let evening = monday_at(20, 0);
    create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("https://pay.example.com/link/a", evening, 0),
        &create_test_actor(),
    )
    .unwrap();

    assert!(matches!(
        resolve_visit(&mut persistence, &settings, evening),
        RedirectOutcome::Closed(ClosedReason::OutsideHours { .. })
    ));
}

#[test]
fn test_resolve_open_without_redirect_is_maintenance() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    open_monday(&mut persistence);

    assert_eq!(
        resolve_visit(&mut persistence, &settings, monday_at(12, 0)),
        RedirectOutcome::Maintenance
    );
}

#[test]
fn test_resolve_skips_lapsed_active_record() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    open_monday(&mut persistence);
    let now = monday_at(10, 0);
    create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("https://pay.example.com/link/a", now, 0),
        &create_test_actor(),
    )
    .unwrap();

    assert_eq!(
        resolve_visit(&mut persistence, &settings, now),
        RedirectOutcome::Redirect(String::from("https://pay.example.com/link/a"))
    );
    assert_eq!(
        resolve_visit(&mut persistence, &settings, now + Duration::hours(3)),
        RedirectOutcome::Maintenance
    );
}

#[test]
fn test_resolve_after_toggle_off_is_maintenance() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();
    let actor = create_test_actor();
    open_monday(&mut persistence);
    let now = monday_at(12, 0);
    let created = create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("https://pay.example.com/link/a", now, 0),
        &actor,
    )
    .unwrap();

    toggle_redirect(&mut persistence, &settings, created.data.id, &actor, now).unwrap();
    assert_eq!(
        resolve_visit(&mut persistence, &settings, now),
        RedirectOutcome::Maintenance
    );
}

#[test]
fn test_payment_status_reports_reason() {
    let mut persistence = create_test_persistence();
    let settings = create_test_settings();

    let closed = payment_status(&mut persistence, &settings, monday_at(12, 0));
    assert!(!closed.available);
    assert_eq!(closed.reason.as_deref(), Some("closed"));

    open_monday(&mut persistence);
    let maintenance = payment_status(&mut persistence, &settings, monday_at(12, 0));
    assert_eq!(maintenance.reason.as_deref(), Some("maintenance"));
    assert_eq!(maintenance.message, MAINTENANCE_MESSAGE);

    create_redirect(
        &mut persistence,
        &settings,
        create_redirect_request("https://pay.example.com/link/a", monday_at(12, 0), 0),
        &create_test_actor(),
    )
    .unwrap();
    let available = payment_status(&mut persistence, &settings, monday_at(12, 0));
    assert!(available.available);
    assert!(available.reason.is_none());
    assert_ne!(available.message, GENERIC_ERROR_MESSAGE);
}

#[test]
fn test_generated_links_are_unique_session_urls() {
    let settings = create_test_settings();

    let qr = generate_qr(&settings);
    assert!(qr.success);
    assert_eq!(
        qr.qr_code.url,
        format!("https://gateway.example.com/pay/{}", qr.qr_code.session_id)
    );

    let first = payment_link(&settings);
    let second = payment_link(&settings);
    assert_ne!(first.session_id, second.session_id);
    assert!(first.link.ends_with(&first.session_id));
}

#[test]
fn test_closed_notice_shows_hours_or_nothing() {
    let settings = create_test_settings();
    let now = monday_at(20, 15);

    let notice = closed_notice(
        &settings,
        now,
        &ClosedReason::OutsideHours {
            start: String::from("09:00"),
            end: String::from("18:00"),
        },
    );
    assert_eq!(notice.day_name, "Monday");
    assert_eq!(notice.hours.as_deref(), Some("09:00 - 18:00"));
    assert_eq!(notice.timezone, "Europe/Moscow");
    assert_eq!(notice.local_time, "2026-03-02 20:15:00 MSK");

    let notice = closed_notice(
        &settings,
        now,
        &ClosedReason::DayOff {
            day: DayOfWeek::new(0).unwrap(),
        },
    );
    assert!(notice.hours.is_none());
}

#[test]
fn test_health_reports_given_version() {
    let response = health("1.2.3");
    assert_eq!(response.status, "healthy");
    assert_eq!(response.app, crate::APP_NAME);
    assert_eq!(response.version, "1.2.3");
}
