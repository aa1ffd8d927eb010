//! Utilities to deal with calendar days and the current date.
//!
//! All dates handled by the filter engine have day granularity and are interpreted in UTC. The
//! current date is never read directly; it is obtained through a [`Clock`] so that callers can
//! freeze time.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The canonical textual format of a [`Day`].
const DAY_FORMAT: &str = "%Y-%m-%d";

/// A calendar date in UTC, without a time component.
///
/// The textual representation is always `YYYY-MM-DD`, both for [`Display`](fmt::Display) and
/// serialization, so that values round-trip identically through query strings.
///
/// # Example
///
/// ```
/// use explorer_common::Day;
///
/// let day: Day = "2024-01-10".parse().unwrap();
/// assert_eq!(day.to_string(), "2024-01-10");
/// assert_eq!(day.next().to_string(), "2024-01-11");
/// ```
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Day(NaiveDate);

impl Day {
    /// Creates a day from its calendar components.
    ///
    /// Returns `None` if the components do not form a valid date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns the current day in UTC according to the system clock.
    pub fn today_utc() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Returns the following calendar day.
    ///
    /// Saturates at the last representable date.
    pub fn next(self) -> Self {
        self.0.succ_opt().map(Self).unwrap_or(self)
    }
}

impl fmt::Debug for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day({self})")
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

/// An error returned from parsing [`Day`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid date {0:?}, expected YYYY-MM-DD")]
pub struct ParseDayError(String);

impl FromStr for Day {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let canonical = bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            });

        if !canonical {
            return Err(ParseDayError(s.to_owned()));
        }

        NaiveDate::parse_from_str(s, DAY_FORMAT)
            .map(Self)
            .map_err(|_| ParseDayError(s.to_owned()))
    }
}

impl Serialize for Day {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let string = Cow::<str>::deserialize(deserializer)?;
        string.parse().map_err(serde::de::Error::custom)
    }
}

/// Source of the current date.
///
/// The date-range validators compare against "tomorrow" in UTC. Measurement ingestion lags
/// behind, so results for today may still be arriving and tomorrow is the latest permitted day.
pub trait Clock {
    /// Returns the current day in UTC.
    fn today(&self) -> Day;

    /// Returns the day after [`today`](Self::today).
    fn tomorrow(&self) -> Day {
        self.today().next()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> Day {
        (**self).today()
    }
}

/// A [`Clock`] reading the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Day {
        Day::today_utc()
    }
}

/// A [`Clock`] that always reports the same day.
///
/// # Example
///
/// ```
/// use explorer_common::{Clock, Day, FixedClock};
///
/// let clock = FixedClock(Day::from_ymd(2024, 2, 28).unwrap());
/// assert_eq!(clock.tomorrow().to_string(), "2024-02-29");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixedClock(pub Day);

impl Clock for FixedClock {
    fn today(&self) -> Day {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_canonical() {
        assert_eq!(day("2024-01-05").to_string(), "2024-01-05");
        assert_eq!(Day::from_ymd(2024, 1, 5), Some(day("2024-01-05")));
    }

    #[test]
    fn test_parse_rejects_non_canonical() {
        for input in [
            "",
            "2024-1-05",
            "2024/01/05",
            "05-01-2024",
            "2024-02-30",
            "2024-01-05T00",
            "2024-01- 5",
            " 024-01-05",
            "2024-01-+5",
            "+024-01-05",
        ] {
            assert!(input.parse::<Day>().is_err(), "parsed {input:?}");
        }
    }

    #[test]
    fn test_next_crosses_boundaries() {
        assert_eq!(day("2023-12-31").next(), day("2024-01-01"));
        assert_eq!(day("2024-02-28").next(), day("2024-02-29"));
    }

    #[test]
    fn test_ordering() {
        assert!(day("2024-01-05") < day("2024-01-10"));
        assert!(day("2023-12-31") < day("2024-01-01"));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&day("2024-03-01")).unwrap();
        assert_eq!(json, r#""2024-03-01""#);

        let back: Day = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day("2024-03-01"));

        assert!(serde_json::from_str::<Day>(r#""tomorrow""#).is_err());
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(day("2024-12-31"));
        assert_eq!(clock.today(), day("2024-12-31"));
        assert_eq!(clock.tomorrow(), day("2025-01-01"));
        assert_eq!((&clock).tomorrow(), day("2025-01-01"));
    }

    #[test]
    fn test_system_clock_is_recent() {
        assert!(SystemClock.today() > day("2024-01-01"));
    }
}
