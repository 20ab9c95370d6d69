//! Point-in-time value stored as seconds plus nanoseconds since the epoch.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// `0001-01-01T00:00:00Z`
const MIN_SECONDS: i64 = -62_135_596_800;
/// `9999-12-31T23:59:59Z`
const MAX_SECONDS: i64 = 253_402_300_799;
const NANOS_PER_SECOND: i32 = 1_000_000_000;
const NANOS_PER_MILLI: i32 = 1_000_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp seconds out of range: {0}")]
    SecondsOutOfRange(i64),
    #[error("timestamp nanoseconds out of range: {0}")]
    NanosecondsOutOfRange(i64),
    #[error("cannot parse `{input}` as a date: {reason}")]
    Parse { input: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    seconds: i64,
    nanoseconds: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanoseconds: i32) -> Result<Self, TimestampError> {
        if !(0..NANOS_PER_SECOND).contains(&nanoseconds) {
            return Err(TimestampError::NanosecondsOutOfRange(nanoseconds as i64));
        }
        if !(MIN_SECONDS..=MAX_SECONDS).contains(&seconds) {
            return Err(TimestampError::SecondsOutOfRange(seconds));
        }
        Ok(Self {
            seconds,
            nanoseconds,
        })
    }

    pub fn now() -> Self {
        // The wall clock is always inside the representable range.
        Self::from_date(Utc::now()).unwrap_or(Self {
            seconds: 0,
            nanoseconds: 0,
        })
    }

    pub fn from_date(date: DateTime<Utc>) -> Result<Self, TimestampError> {
        // Leap seconds report nanos >= 1e9; fold them into the last nanosecond.
        let nanos = date.timestamp_subsec_nanos().min(NANOS_PER_SECOND as u32 - 1);
        Self::new(date.timestamp(), nanos as i32)
    }

    pub fn from_millis(millis: i64) -> Result<Self, TimestampError> {
        let seconds = millis.div_euclid(1000);
        let nanos = millis.rem_euclid(1000) as i32 * NANOS_PER_MILLI;
        Self::new(seconds, nanos)
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanoseconds(&self) -> i32 {
        self.nanoseconds
    }

    pub fn to_date(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds as u32)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn to_millis(&self) -> i64 {
        self.seconds * 1000 + (self.nanoseconds / NANOS_PER_MILLI) as i64
    }

    /// Drops everything below millisecond resolution.
    pub fn truncate_to_millis(&self) -> Self {
        Self {
            seconds: self.seconds,
            nanoseconds: self.nanoseconds - self.nanoseconds % NANOS_PER_MILLI,
        }
    }

    /// ISO-8601 UTC text with exactly three fractional digits, e.g.
    /// `2020-04-19T15:17:33.856Z`. Sub-millisecond digits are truncated.
    pub fn to_iso8601(&self) -> String {
        self.to_date().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parses an RFC 3339 date, falling back to RFC 2822.
    pub fn parse_iso8601(input: &str) -> Result<Self, TimestampError> {
        let trimmed = input.trim();
        let date = DateTime::parse_from_rfc3339(trimmed)
            .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
            .map_err(|e| TimestampError::Parse {
                input: input.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_date(date.with_timezone(&Utc))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timestamp(seconds={}, nanoseconds={})",
            self.seconds, self.nanoseconds
        )
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = TimestampError;

    fn try_from(date: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_date(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso8601_has_millisecond_precision() {
        let ts = Timestamp::new(1_587_309_453, 856_123_456).unwrap();
        assert_eq!(ts.to_iso8601(), "2020-04-19T15:17:33.856Z");
    }

    #[test]
    fn iso8601_pads_zero_millis() {
        let ts = Timestamp::new(0, 0).unwrap();
        assert_eq!(ts.to_iso8601(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn parse_iso8601_keeps_instant() {
        let ts = Timestamp::parse_iso8601("2020-04-19T15:17:33.856Z").unwrap();
        assert_eq!(ts.seconds(), 1_587_309_453);
        assert_eq!(ts.nanoseconds(), 856_000_000);
    }

    #[test]
    fn parse_honors_offsets() {
        let a = Timestamp::parse_iso8601("2020-04-19T17:17:33.856+02:00").unwrap();
        let b = Timestamp::parse_iso8601("2020-04-19T15:17:33.856Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_rfc2822_fallback() {
        let ts = Timestamp::parse_iso8601("Sun, 19 Apr 2020 15:17:33 +0000").unwrap();
        assert_eq!(ts.seconds(), 1_587_309_453);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = Timestamp::parse_iso8601("yesterday").unwrap_err();
        assert!(matches!(err, TimestampError::Parse { ref input, .. } if input == "yesterday"));
    }

    #[test]
    fn millis_conversions_before_epoch() {
        let ts = Timestamp::from_millis(-1).unwrap();
        assert_eq!(ts.seconds(), -1);
        assert_eq!(ts.nanoseconds(), 999_000_000);
        assert_eq!(ts.to_millis(), -1);
    }

    #[test]
    fn range_checks() {
        assert_eq!(
            Timestamp::new(0, 1_000_000_000),
            Err(TimestampError::NanosecondsOutOfRange(1_000_000_000))
        );
        assert_eq!(
            Timestamp::new(0, -1),
            Err(TimestampError::NanosecondsOutOfRange(-1))
        );
        assert_eq!(
            Timestamp::new(MAX_SECONDS + 1, 0),
            Err(TimestampError::SecondsOutOfRange(MAX_SECONDS + 1))
        );
        assert!(Timestamp::new(MIN_SECONDS, 0).is_ok());
    }

    #[test]
    fn truncation() {
        let ts = Timestamp::new(10, 123_456_789).unwrap();
        assert_eq!(ts.truncate_to_millis().nanoseconds(), 123_000_000);
    }

    #[test]
    fn date_roundtrip() {
        let ts = Timestamp::new(1_587_309_453, 856_000_001).unwrap();
        assert_eq!(Timestamp::from_date(ts.to_date()).unwrap(), ts);
    }
}
