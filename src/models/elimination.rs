//! Elimination events and the match-relative clock they carry.

use std::fmt;

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{null_as_default, PlayerId};

/// A timestamp that is not of the form `mm:ss`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid match time '{0}', expected mm:ss")]
pub struct ClockParseError(pub String);

/// Time since match start, as printed by the decoder (`mm:ss`).
///
/// Backed by a time of day so offsets follow ordinary clock arithmetic:
/// results wrap around the hour instead of going negative.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatchClock(NaiveTime);

impl MatchClock {
    pub fn from_min_sec(minutes: u32, seconds: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(0, minutes, seconds).map(Self)
    }

    /// Parse `m:ss`/`mm:ss` with minutes and seconds in 0..=59.
    pub fn parse(s: &str) -> Result<Self, ClockParseError> {
        let err = || ClockParseError(s.to_string());
        let (min, sec) = s.trim().split_once(':').ok_or_else(err)?;
        let field = |part: &str| -> Option<u32> {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse().ok()
        };
        let minutes = field(min).ok_or_else(err)?;
        let seconds = field(sec).ok_or_else(err)?;
        Self::from_min_sec(minutes, seconds).ok_or_else(err)
    }

    /// Apply an offset in seconds, wrapping around the hour.
    pub fn shifted(self, offset_secs: i64) -> Self {
        let delta = Duration::seconds(offset_secs.rem_euclid(86_400));
        let (time, _) = self.0.overflowing_add_signed(delta);
        Self(time)
    }

    pub fn minutes(&self) -> u32 {
        self.0.minute()
    }

    pub fn seconds(&self) -> u32 {
        self.0.second()
    }
}

impl fmt::Display for MatchClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes(), self.seconds())
    }
}

impl fmt::Debug for MatchClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchClock({})", self)
    }
}

impl TryFrom<String> for MatchClock {
    type Error = ClockParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<MatchClock> for String {
    fn from(clock: MatchClock) -> Self {
        clock.to_string()
    }
}

/// One player eliminating another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationEvent {
    #[serde(rename = "Eliminator", default, deserialize_with = "null_as_default")]
    pub eliminator: PlayerId,

    #[serde(rename = "Eliminated", default, deserialize_with = "null_as_default")]
    pub eliminated: PlayerId,

    #[serde(rename = "Time")]
    pub time: MatchClock,
}

impl EliminationEvent {
    pub fn new(eliminator: &str, eliminated: &str, time: MatchClock) -> Self {
        Self {
            eliminator: PlayerId::new(eliminator),
            eliminated: PlayerId::new(eliminated),
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(s: &str) -> MatchClock {
        MatchClock::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(clock("07:05").to_string(), "07:05");
        assert_eq!(clock("7:05").to_string(), "07:05");
        assert_eq!(clock("59:59").to_string(), "59:59");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "1205", "12:5x", "60:00", "12:60", "1:2:3", "123:00", "-1:00", "ab:cd"] {
            assert!(MatchClock::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_positive_offset() {
        assert_eq!(clock("00:30").shifted(5).to_string(), "00:35");
        assert_eq!(clock("12:50").shifted(15).to_string(), "13:05");
    }

    #[test]
    fn test_negative_offset_wraps_around_the_hour() {
        assert_eq!(clock("00:30").shifted(-40).to_string(), "59:50");
        assert_eq!(clock("05:00").shifted(-60).to_string(), "04:00");
    }

    #[test]
    fn test_large_offsets_wrap() {
        assert_eq!(clock("59:50").shifted(20).to_string(), "00:10");
        assert_eq!(clock("10:00").shifted(3600).to_string(), "10:00");
        assert_eq!(clock("10:00").shifted(-25 * 3600).to_string(), "10:00");
        // Must not overflow the underlying duration type.
        let _ = clock("10:00").shifted(i64::MIN);
    }

    #[test]
    fn test_deserialize_event() {
        let json = r#"{"Eliminator":"aa11","Eliminated":"BB22","Time":"03:07","Knocked":false}"#;
        let e: EliminationEvent = serde_json::from_str(json).unwrap();
        assert_eq!(e.eliminator, PlayerId::new("AA11"));
        assert_eq!(e.eliminated.as_str(), "BB22");
        assert_eq!(e.time, clock("03:07"));
    }

    #[test]
    fn test_deserialize_malformed_time_fails() {
        let json = r#"{"Eliminator":"a","Eliminated":"b","Time":"3 minutes"}"#;
        let err = serde_json::from_str::<EliminationEvent>(json).unwrap_err();
        assert!(err.to_string().contains("expected mm:ss"));
    }
}
