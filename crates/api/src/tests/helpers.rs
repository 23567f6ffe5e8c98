// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use chrono::{DateTime, Duration, TimeZone, Utc};
use paygate_domain::{Tz, format_instant, parse_timezone};
use paygate_persistence::Persistence;

use crate::{AuthenticatedActor, CreateRedirectRequest, GatewaySettings, UpsertWorkingHoursRequest};

pub const TEST_ADMIN: &str = "admin";
pub const TEST_PASSWORD: &str = "Gateway-Secret-42";

pub fn moscow() -> Tz {
    parse_timezone("Europe/Moscow").unwrap()
}

pub fn create_test_settings() -> GatewaySettings {
    GatewaySettings::new(moscow(), "https://gateway.example.com/")
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_timezone(moscow())
}

pub fn create_test_actor() -> AuthenticatedActor {
    AuthenticatedActor::new(1, String::from(TEST_ADMIN))
}

/// Monday 2026-03-02 at the given Moscow wall-clock time.
pub fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    moscow()
        .with_ymd_and_hms(2026, 3, 2, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn create_hours_request(day: i64, start: &str, end: &str) -> UpsertWorkingHoursRequest {
    UpsertWorkingHoursRequest {
        day_of_week: day,
        work_start: start.to_string(),
        work_end: end.to_string(),
        is_enabled: true,
    }
}

/// A redirect request whose window is centred `offset_hours` from `now`.
pub fn create_redirect_request(
    target_url: &str,
    now: DateTime<Utc>,
    offset_hours: i64,
) -> CreateRedirectRequest {
    let centre: DateTime<Utc> = now + Duration::hours(offset_hours);
    CreateRedirectRequest {
        target_url: target_url.to_string(),
        valid_from: format_instant(centre - Duration::hours(1)),
        valid_until: format_instant(centre + Duration::hours(1)),
        notes: None,
    }
}
