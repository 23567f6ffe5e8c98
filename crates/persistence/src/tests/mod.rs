// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;

use chrono::{DateTime, Duration, Utc};
use paygate::NewRedirect;
use paygate_domain::{DayOfWeek, Tz, ValidityWindow, WorkingHoursRule, parse_timezone};

use crate::Persistence;

pub fn moscow() -> Tz {
    parse_timezone("Europe/Moscow").unwrap()
}

pub fn create_test_persistence() -> Persistence {
    let persistence = Persistence::new_in_memory().unwrap();
    persistence.with_timezone(moscow())
}

pub fn create_test_rule(day: i64, start: &str, end: &str, enabled: bool) -> WorkingHoursRule {
    WorkingHoursRule::new(
        DayOfWeek::new(day).unwrap(),
        start.to_string(),
        end.to_string(),
        enabled,
    )
}

/// A redirect whose window is centred `offset_hours` from `now`, one hour each way.
pub fn create_test_redirect(url: &str, now: DateTime<Utc>, offset_hours: i64) -> NewRedirect {
    let centre: DateTime<Utc> = now + Duration::hours(offset_hours);
    NewRedirect {
        target_url: url.to_string(),
        window: ValidityWindow::new(centre - Duration::hours(1), centre + Duration::hours(1))
            .unwrap(),
        notes: None,
    }
}
