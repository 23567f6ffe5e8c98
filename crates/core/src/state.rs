// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use paygate_domain::{ValidityWindow, WorkingHoursRule};

/// A validated redirect target, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRedirect {
    /// Destination URL.
    pub target_url: String,
    /// Validity window, normalized to UTC.
    pub window: ValidityWindow,
    /// Trimmed notes; blank notes become `None`.
    pub notes: Option<String>,
}

/// The validated result of applying a command.
///
/// The store executes each variant as one atomic unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Insert or update the rule for its weekday.
    UpsertWorkingHours(WorkingHoursRule),
    /// Deactivate every record, then insert this one as active.
    CreateRedirect(NewRedirect),
}

/// What a toggle does to the targeted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// Clear the active flag; zero active records is a valid state.
    Deactivate,
    /// Deactivate every other record, then set the active flag.
    Activate,
}
