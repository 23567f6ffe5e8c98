// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Duration, TimeZone, Utc};
use paygate_domain::{
    DayOfWeek, RedirectTarget, Tz, ValidityWindow, WorkingHoursRule, parse_timezone,
};

use crate::Command;

pub fn moscow() -> Tz {
    parse_timezone("Europe/Moscow").unwrap()
}

/// Monday 2026-03-02 at the given Moscow wall-clock time.
pub fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    moscow()
        .with_ymd_and_hms(2026, 3, 2, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn create_test_monday_rule() -> WorkingHoursRule {
    WorkingHoursRule::new(
        DayOfWeek::new(0).unwrap(),
        String::from("09:00"),
        String::from("18:00"),
        true,
    )
}

pub fn create_test_target(
    redirect_id: i64,
    now: DateTime<Utc>,
    is_active: bool,
    offset_hours: i64,
) -> RedirectTarget {
    let centre: DateTime<Utc> = now + Duration::hours(offset_hours);
    RedirectTarget {
        redirect_id,
        target_url: format!("https://pay.example.com/link/{redirect_id}"),
        window: ValidityWindow::new(centre - Duration::hours(1), centre + Duration::hours(1))
            .unwrap(),
        is_active,
        notes: None,
        created_at: now,
    }
}

pub fn create_test_redirect_command() -> Command {
    Command::CreateRedirect {
        target_url: String::from("https://qr.nspk.ru/AS10000001"),
        valid_from: String::from("2026-03-02T09:00"),
        valid_until: String::from("2026-03-09T09:00"),
        notes: Some(String::from("  march link  ")),
    }
}
