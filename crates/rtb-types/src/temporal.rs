use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Insertion instant of an entry, held at millisecond precision.
///
/// The textual form is ISO-8601 in UTC with exactly three fractional digits
/// (`2025-09-14T08:30:00.123Z`). Parsing accepts any RFC 3339 instant and
/// truncates it to milliseconds, so re-encoding a parsed value is stable.
///
/// Values are confined to years 0001 through 9999 in UTC, the range whose
/// text form [`parse`](Timestamp::parse) reads back.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// `0001-01-01T00:00:00.000Z`
    pub const MIN_MILLIS: i64 = -62_135_596_800_000;
    /// `9999-12-31T23:59:59.999Z`
    pub const MAX_MILLIS: i64 = 253_402_300_799_999;

    /// The current wall-clock instant.
    pub fn now() -> Self {
        let now = Utc::now();
        Self::from_millis(now.timestamp_millis()).unwrap_or(Self(now))
    }

    /// Build from milliseconds since the Unix epoch.
    ///
    /// Returns `None` outside `MIN_MILLIS..=MAX_MILLIS`.
    pub fn from_millis(millis: i64) -> Option<Self> {
        if !(Self::MIN_MILLIS..=Self::MAX_MILLIS).contains(&millis) {
            return None;
        }
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Parse an RFC 3339 / ISO-8601 instant.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let invalid = |reason: String| TypeError::InvalidTimestamp {
            value: s.to_string(),
            reason,
        };
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| invalid(e.to_string()))?;
        Self::from_millis(dt.timestamp_millis())
            .ok_or_else(|| invalid("outside years 0001-9999 in UTC".into()))
    }

    /// Milliseconds since the Unix epoch.
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The next representable millisecond, or `None` past `MAX_MILLIS`.
    pub fn next_millisecond(self) -> Option<Self> {
        Self::from_millis(self.as_millis().checked_add(1)?)
    }

    /// Canonical ISO-8601 text.
    pub fn to_iso(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.to_iso())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl TryFrom<String> for Timestamp {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_iso()
    }
}
