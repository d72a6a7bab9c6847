// crates/custodian-core/src/core/time.rs
// ============================================================================
// Module: Custodian Time Model
// Description: Canonical timestamp representation for governed records.
// Purpose: Provide explicit, comparable time values with an RFC 3339 wire form.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Custodian stamps records with explicit timestamps carried as RFC 3339
//! strings on the wire. Policy functions never read wall-clock time directly;
//! callers supply `now` so every decision is deterministic and replayable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as DeError;
use time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Milliseconds per day, used for retention arithmetic.
const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1_000;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Canonical timestamp stored as unix epoch milliseconds.
///
/// # Invariants
/// - Serializes as an RFC 3339 string; unparseable strings are wire errors.
/// - Comparison order matches chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Returns the current wall-clock time.
    ///
    /// Only intake boundaries call this; policy functions take `now` as an
    /// explicit argument.
    #[must_use]
    pub fn now() -> Self {
        let now = OffsetDateTime::now_utc();
        Self(now.unix_timestamp() * 1_000 + i64::from(now.millisecond()))
    }

    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Parses an RFC 3339 string into a timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError`] when the input is not valid RFC 3339.
    pub fn parse_rfc3339(input: &str) -> Result<Self, TimeParseError> {
        let parsed = OffsetDateTime::parse(input, &Rfc3339)
            .map_err(|source| TimeParseError { input: input.to_string(), source })?;
        Ok(Self(parsed.unix_timestamp() * 1_000 + i64::from(parsed.millisecond())))
    }

    /// Formats the timestamp as an RFC 3339 string.
    #[must_use]
    pub fn to_rfc3339(self) -> String {
        let seconds = self.0.div_euclid(1_000);
        let millis = self.0.rem_euclid(1_000);
        // Rfc3339 formatting only fails for out-of-range datetimes; those
        // collapse to the epoch string rather than panicking.
        OffsetDateTime::from_unix_timestamp(seconds)
            .ok()
            .map(|base| base + Duration::milliseconds(millis))
            .and_then(|value| value.format(&Rfc3339).ok())
            .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string())
    }

    /// Returns true when `self` is strictly before `other`.
    #[must_use]
    pub const fn is_before(self, other: Self) -> bool {
        self.0 < other.0
    }

    /// Returns the timestamp advanced by the given number of days.
    #[must_use]
    pub const fn plus_days(self, days: u32) -> Self {
        Self(self.0 + (days as i64) * MILLIS_PER_DAY)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_rfc3339(&raw).map_err(DeError::custom)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error returned when an RFC 3339 timestamp fails to parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid rfc3339 timestamp: {input}")]
pub struct TimeParseError {
    /// The rejected input string.
    pub input: String,
    /// Underlying parse error from the `time` crate.
    #[source]
    pub source: time::error::Parse,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::unwrap_used,
        reason = "Test-only assertions favor direct unwrap/expect for clarity."
    )]

    use super::*;

    #[test]
    fn rfc3339_round_trip_preserves_millisecond_precision() {
        let stamp = Timestamp::from_unix_millis(1_700_000_000_123);
        let wire = stamp.to_rfc3339();
        let parsed = Timestamp::parse_rfc3339(&wire).unwrap();
        assert_eq!(parsed, stamp);
    }

    #[test]
    fn parse_rejects_non_rfc3339_input() {
        assert!(Timestamp::parse_rfc3339("not a date").is_err());
        assert!(Timestamp::parse_rfc3339("2024-13-01T00:00:00Z").is_err());
    }

    #[test]
    fn plus_days_advances_by_whole_days() {
        let base = Timestamp::from_unix_millis(0);
        assert_eq!(base.plus_days(2).as_unix_millis(), 2 * 24 * 60 * 60 * 1_000);
    }

    #[test]
    fn ordering_matches_chronology() {
        let earlier = Timestamp::from_unix_millis(1_000);
        let later = Timestamp::from_unix_millis(2_000);
        assert!(earlier.is_before(later));
        assert!(!later.is_before(earlier));
    }
}
