//! Issued credential type

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

use super::Grants;

/// A signed, time-bounded session credential
///
/// Immutable; a refresh produces a new `Credential` that replaces this one
/// wholesale. A credential is valid from `issued_at` until `issued_at + ttl`;
/// consumers must check [`Credential::is_valid_at`] rather than trusting that
/// a present credential is still usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Opaque signed token
    pub token: String,
    /// When the credential was issued
    pub issued_at: DateTime<Utc>,
    /// Lifetime in seconds from `issued_at`
    pub ttl_seconds: u64,
    /// Capabilities the token grants
    pub grants: Grants,
}

impl Credential {
    /// The instant this credential stops being valid
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + ChronoDuration::seconds(self.ttl_seconds as i64)
    }

    /// Whether the credential is inside its validity window at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.issued_at && now < self.expires_at()
    }

    /// Seconds of validity left at `now`, zero when expired
    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at() - now).num_seconds().max(0)
    }
}
