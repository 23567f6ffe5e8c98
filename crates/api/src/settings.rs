// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use paygate_domain::Tz;
use time::Duration;

/// Deployment settings the handlers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Zone for working hours and offset-less timestamps.
    pub timezone: Tz,
    /// Public base URL, without a trailing slash.
    pub public_url: String,
    /// Lifetime of issued bearer sessions.
    pub session_lifetime: Duration,
}

impl GatewaySettings {
    /// Default session lifetime (24 hours).
    pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::hours(24);

    #[must_use]
    pub fn new(timezone: Tz, public_url: &str) -> Self {
        Self {
            timezone,
            public_url: public_url.trim_end_matches('/').to_string(),
            session_lifetime: Self::DEFAULT_SESSION_LIFETIME,
        }
    }

    #[must_use]
    pub fn with_session_lifetime(mut self, session_lifetime: Duration) -> Self {
        self.session_lifetime = session_lifetime;
        self
    }

    /// The stable public gateway URL.
    #[must_use]
    pub fn gateway_url(&self) -> String {
        format!("{}/pay", self.public_url)
    }

    /// A tracked gateway URL for one visitor session.
    #[must_use]
    pub fn session_link(&self, session_id: &str) -> String {
        format!("{}/pay/{session_id}", self.public_url)
    }
}
