//! Backend timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A backend timestamp: nanoseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a timestamp from nanoseconds since the Unix epoch.
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Nanoseconds since the Unix epoch.
    #[must_use]
    pub const fn as_nanos(&self) -> i64 {
        self.0
    }

    /// Convert to a UTC datetime for display.
    #[must_use]
    pub fn to_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(nanos: i64) -> Self {
        Self(nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_utc() {
        // 2021-01-01T00:00:00Z in nanoseconds
        let ts = Timestamp::from_nanos(1_609_459_200_000_000_000);
        assert_eq!(ts.to_utc().to_rfc3339(), "2021-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_ordering() {
        assert!(Timestamp::from_nanos(2) > Timestamp::from_nanos(1));
    }
}
