//! Timetable clock times and service days.
//!
//! Timetables publish times as "HH:MM:SS" strings relative to the start of
//! the service day. Trips that run past midnight keep counting upwards
//! ("24:15:00", "25:02:30"), so a [`ClockTime`] is stored as seconds since
//! the start of the service day rather than as a wall-clock `NaiveTime`.

use chrono::{Duration, Weekday};
use std::fmt;
use std::ops::Add;

/// Latest hour a timetable may publish (trips started before midnight).
const MAX_TIMETABLE_HOUR: u32 = 47;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of the service day, with one-second resolution.
///
/// # Examples
///
/// ```
/// use transit_server::domain::ClockTime;
///
/// let t = ClockTime::parse_hms("14:30:05").unwrap();
/// assert_eq!(t.to_string(), "14:30:05");
///
/// // Past-midnight service times are allowed
/// assert!(ClockTime::parse_hms("25:10:00").is_ok());
///
/// assert!(ClockTime::parse_hms("14:30").is_err());
/// assert!(ClockTime::parse_hms("14:60:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Midnight at the start of the service day.
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Create a time from seconds since the start of the service day.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Create a time from hour, minute and second components.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        if hour > MAX_TIMETABLE_HOUR || minute > 59 || second > 59 {
            return None;
        }
        Some(Self(hour * 3600 + minute * 60 + second))
    }

    /// Parse a time from "HH:MM:SS" format.
    pub fn parse_hms(s: &str) -> Result<Self, TimeError> {
        if s.len() != 8 {
            return Err(TimeError::new("expected HH:MM:SS format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' || bytes[5] != b':' {
            return Err(TimeError::new("expected colons at positions 2 and 5"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > MAX_TIMETABLE_HOUR {
            return Err(TimeError::new("hour must be 0-47"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let second = parse_two_digits(&bytes[6..8])
            .ok_or_else(|| TimeError::new("invalid second digits"))?;
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Ok(Self(hour * 3600 + minute * 60 + second))
    }

    /// Parse a departure time, which must fall within the calendar day.
    pub fn parse_departure(s: &str) -> Result<Self, TimeError> {
        let time = Self::parse_hms(s)?;
        if time.hour() > 23 {
            return Err(TimeError::new("departure hour must be 0-23"));
        }
        Ok(time)
    }

    /// Seconds since the start of the service day.
    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Returns the hour (may exceed 23 for past-midnight trips).
    pub fn hour(&self) -> u32 {
        self.0 / 3600
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        (self.0 / 60) % 60
    }

    /// Returns the second (0-59).
    pub fn second(&self) -> u32 {
        self.0 % 60
    }

    /// Add a duration, returning `None` if the result is before midnight or
    /// overflows.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let secs = i64::from(self.0).checked_add(duration.num_seconds())?;
        u32::try_from(secs).ok().map(Self)
    }

    /// Fractional minutes elapsed since `other`.
    pub fn minutes_since(&self, other: Self) -> f64 {
        (f64::from(self.0) - f64::from(other.0)) / 60.0
    }
}

/// Saturates at midnight and at the largest representable time.
impl Add<Duration> for ClockTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        let secs = i64::from(self.0).saturating_add(rhs.num_seconds());
        Self(secs.clamp(0, i64::from(u32::MAX)) as u32)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({self})")
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Error returned for a day number outside 1..=7.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("day of week must be between 1 and 7, got {0}")]
pub struct InvalidDay(pub i64);

/// ISO day of the week: 1 = Monday through 7 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    /// Create a day from its ISO number.
    pub fn new(day: i64) -> Result<Self, InvalidDay> {
        match u8::try_from(day) {
            Ok(d @ 1..=7) => Ok(Self(d)),
            _ => Err(InvalidDay(day)),
        }
    }

    /// The ISO day number (1-7).
    pub fn number(&self) -> u8 {
        self.0
    }

    /// The chrono weekday.
    pub fn weekday(&self) -> Weekday {
        match self.0 {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weekday())
    }
}
