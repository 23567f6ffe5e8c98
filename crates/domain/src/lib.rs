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

mod availability;
mod error;
mod types;
mod validation;
mod validity;

#[cfg(test)]
mod tests;

pub use availability::{Availability, ClosedReason, evaluate_availability, local_day_of_week};
pub use error::DomainError;
pub use types::{DayOfWeek, RedirectTarget, WorkingHoursRule, parse_time_of_day};
pub use validation::{
    TARGET_URL_MAX_LEN, TARGET_URL_MIN_LEN, validate_target_url, validate_validity_window,
    validate_working_hours,
};
pub use validity::{
    ValidityWindow, WindowPosition, format_instant, format_local, parse_instant, parse_timezone,
};

/// Re-exported so downstream crates name the same zone type.
pub use chrono_tz::Tz;
