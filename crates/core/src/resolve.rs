// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visit resolution.
//!
//! ## Invariants
//!
//! - A closed schedule short-circuits: no redirect lookup is performed
//! - A record is served only if it is active and its window covers now
//! - Lookup failures become `Error`, never a panic or propagated error

use chrono::{DateTime, Utc};
use paygate_domain::{Availability, ClosedReason, RedirectTarget};

/// The decision for one inbound visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Send the visitor to this URL.
    Redirect(String),
    /// Outside working hours.
    Closed(ClosedReason),
    /// Open, but nothing is servable.
    Maintenance,
    /// The store could not be consulted.
    Error(String),
}

impl RedirectOutcome {
    /// Short machine-readable tag used by the status endpoint.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Redirect(_) => "redirect",
            Self::Closed(_) => "closed",
            Self::Maintenance => "maintenance",
            Self::Error(_) => "error",
        }
    }
}

/// Picks the record to serve at `now` from the candidate set.
///
/// Candidates are expected newest-first; the first servable one wins.
/// The store keeps at most one active record, so ordering only matters
/// if that invariant was broken externally.
#[must_use]
pub fn select_servable(
    candidates: &[RedirectTarget],
    now: DateTime<Utc>,
) -> Option<&RedirectTarget> {
    candidates
        .iter()
        .find(|candidate| candidate.is_servable_at(now))
}

/// Resolves a visit.
///
/// # Arguments
///
/// * `availability` - The schedule evaluated at `now`
/// * `now` - The visit instant
/// * `lookup` - Loads the active candidates; only called when open
pub fn resolve_outcome<F, E>(
    availability: Availability,
    now: DateTime<Utc>,
    lookup: F,
) -> RedirectOutcome
where
    F: FnOnce() -> Result<Vec<RedirectTarget>, E>,
    E: std::fmt::Display,
{
    if let Availability::Closed(reason) = availability {
        return RedirectOutcome::Closed(reason);
    }

    match lookup() {
        Ok(candidates) => match select_servable(&candidates, now) {
            Some(target) => RedirectOutcome::Redirect(target.target_url.clone()),
            None => RedirectOutcome::Maintenance,
        },
        Err(err) => RedirectOutcome::Error(err.to_string()),
    }
}
