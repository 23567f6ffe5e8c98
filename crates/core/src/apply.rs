// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Mutation, NewRedirect, ToggleAction};
use chrono::{DateTime, Utc};
use paygate_domain::{
    RedirectTarget, Tz, ValidityWindow, WorkingHoursRule, validate_target_url,
    validate_validity_window, validate_working_hours,
};

/// Validates a command and produces the mutation to persist.
///
/// # Arguments
///
/// * `command` - The admin command to apply
/// * `tz` - The configured zone, used for offset-less timestamps
///
/// # Returns
///
/// * `Ok(Mutation)` ready to hand to the store
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - Working hours fail format, range, or ordering checks
/// - The target URL is rejected
/// - The validity window is unparseable or empty
pub fn apply(command: Command, tz: Tz) -> Result<Mutation, CoreError> {
    match command {
        Command::UpsertWorkingHours {
            day_of_week,
            start_time,
            end_time,
            enabled,
        } => {
            let rule: WorkingHoursRule =
                validate_working_hours(day_of_week, &start_time, &end_time, enabled)?;
            Ok(Mutation::UpsertWorkingHours(rule))
        }
        Command::CreateRedirect {
            target_url,
            valid_from,
            valid_until,
            notes,
        } => {
            let target_url: String = target_url.trim().to_string();
            validate_target_url(&target_url)?;

            let window: ValidityWindow = validate_validity_window(&valid_from, &valid_until, tz)?;

            let notes: Option<String> = notes
                .map(|notes| notes.trim().to_string())
                .filter(|notes| !notes.is_empty());

            Ok(Mutation::CreateRedirect(NewRedirect {
                target_url,
                window,
                notes,
            }))
        }
    }
}

/// Decides what a toggle does to `target` at `now`.
///
/// Deactivation is unconditional. Activation re-validates the window at
/// toggle time, not just at creation time.
///
/// # Errors
///
/// Returns `NotYetValid` or `Expired` when activating outside the window.
pub fn plan_toggle(
    target: &RedirectTarget,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<ToggleAction, CoreError> {
    if target.is_active {
        return Ok(ToggleAction::Deactivate);
    }

    target.window.check_activation(now, tz)?;
    Ok(ToggleAction::Activate)
}
