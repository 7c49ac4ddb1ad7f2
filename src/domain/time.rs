//! Business-local time primitives.
//!
//! Dates and `HH:MM` times on the wire are business-local. A [`LocalDay`]
//! pins a calendar date to the configured UTC offset so minutes-since-midnight
//! can be turned into absolute instants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::MINUTES_PER_DAY;

/// Rejected `HH:MM` input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time '{0}', expected HH:MM")]
pub struct ParseClockTimeError(String);

/// A time of day as minutes since local midnight, rendered `HH:MM`.
///
/// `24:00` is accepted as the end-of-day bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Build from minutes since midnight, `None` past 24:00.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseClockTimeError(s.to_string());

        let (h, m) = s.split_once(':').ok_or_else(err)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(err());
        }
        let hours: u16 = h.parse().map_err(|_| err())?;
        let minutes: u16 = m.parse().map_err(|_| err())?;
        if minutes >= 60 || hours > 24 || (hours == 24 && minutes != 0) {
            return Err(err());
        }
        Ok(Self(hours * 60 + minutes))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Half-open absolute interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// A calendar date in business-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDay {
    date: NaiveDate,
    offset: FixedOffset,
}

impl LocalDay {
    pub fn new(date: NaiveDate, offset: FixedOffset) -> Self {
        Self { date, offset }
    }

    /// The local day containing `instant`.
    pub fn containing(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self::new(instant.with_timezone(&offset).date_naive(), offset)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// 0 = Sunday .. 6 = Saturday
    pub fn weekday(&self) -> u8 {
        self.date.weekday().num_days_from_sunday() as u8
    }

    /// Absolute instant `minutes` after local midnight.
    pub fn at(&self, minutes: u16) -> DateTime<Utc> {
        self.midnight() + Duration::minutes(i64::from(minutes))
    }

    /// `[00:00, next day 00:00)` of this day in UTC.
    pub fn bounds(&self) -> TimeSpan {
        TimeSpan::new(self.midnight(), self.midnight() + Duration::days(1))
    }

    /// The day `days` after this one (negative goes back).
    pub fn shift(&self, days: i64) -> Self {
        Self::new(self.date + Duration::days(days), self.offset)
    }

    fn midnight(&self) -> DateTime<Utc> {
        let local = self.date.and_time(NaiveTime::MIN);
        Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(self.offset.local_minus_utc()))))
    }
}
