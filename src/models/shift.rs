//! Shift type model and related types.
//!
//! This module defines [`ShiftType`], the time-of-day type [`ClockTime`]
//! used by shift and rule windows, and the [`ShiftCode`] newtype that the
//! rotation pattern refers to.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{Interval, minute_of};

/// Number of minutes in a calendar day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// A time of day with minute precision, from `00:00` up to and including `24:00`.
///
/// `24:00` denotes midnight at the end of the day and only makes sense as
/// the end of a window.
///
/// # Example
///
/// ```
/// use ob_engine::models::ClockTime;
///
/// let t: ClockTime = "22:30".parse().unwrap();
/// assert_eq!(t.minutes(), 22 * 60 + 30);
/// assert!("24:00".parse::<ClockTime>().unwrap().is_end_of_day());
/// assert!("24:01".parse::<ClockTime>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// `00:00`.
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    /// `24:00`.
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY as u16);

    /// Builds a time from hour and minute, used for compile-time tables.
    ///
    /// Callers must pass a valid time; use [`ClockTime::new`] for untrusted input.
    pub const fn at(hour: u16, minute: u16) -> Self {
        ClockTime(hour * 60 + minute)
    }

    /// Builds a validated time. Returns `None` for anything past `24:00`.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        match (hour, minute) {
            (24, 0) => Some(Self::END_OF_DAY),
            (h, m) if h < 24 && m < 60 => Some(ClockTime((h * 60 + m) as u16)),
            _ => None,
        }
    }

    /// Minutes since the start of the day.
    pub fn minutes(self) -> i64 {
        i64::from(self.0)
    }

    /// Returns true for `24:00`.
    pub fn is_end_of_day(self) -> bool {
        self == Self::END_OF_DAY
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got '{}'", s))?;
        let hour: u32 = hour
            .trim()
            .parse()
            .map_err(|_| format!("invalid hour in '{}'", s))?;
        let minute: u32 = minute
            .trim()
            .parse()
            .map_err(|_| format!("invalid minute in '{}'", s))?;
        ClockTime::new(hour, minute).ok_or_else(|| format!("time out of range: '{}'", s))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// The code a rotation cell, absence or record refers to (e.g. "N1", "SEM").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftCode(String);

impl ShiftCode {
    /// Creates a shift code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShiftCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// What a shift type represents for pay and statistics purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftKind {
    /// A rotation work shift, paid OB for its inconvenient minutes.
    Work,
    /// A day off.
    Off,
    /// Vacation ("SEM").
    Vacation,
    /// Sick leave, VAB or unpaid leave.
    Absence,
    /// A 24-hour on-call day, priced by the on-call table.
    OnCall,
    /// An overtime marker; overtime is priced from overtime records.
    Overtime,
}

/// A shift type as configured in `shift_types.yaml`.
///
/// # Example
///
/// ```
/// use ob_engine::models::{ClockTime, ShiftCode, ShiftKind, ShiftType};
/// use chrono::NaiveDate;
///
/// let night = ShiftType {
///     code: ShiftCode::from("N3"),
///     label: "Night".to_string(),
///     start: "22:00".parse().unwrap(),
///     end: "06:30".parse().unwrap(),
///     kind: ShiftKind::Work,
/// };
/// let date = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
/// let span = night.span_on(date).unwrap();
/// assert_eq!(span.minutes(), 8 * 60 + 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftType {
    /// Unique code referenced by the rotation pattern.
    pub code: ShiftCode,
    /// Human-readable label.
    pub label: String,
    /// Nominal start time.
    pub start: ClockTime,
    /// Nominal end time; at or before `start` means the following day.
    pub end: ClockTime,
    /// What the shift represents.
    pub kind: ShiftKind,
}

impl ShiftType {
    /// Returns true when the shift has no duration (`00:00`-`00:00`).
    pub fn is_zero_duration(&self) -> bool {
        self.start == ClockTime::MIDNIGHT && self.end == ClockTime::MIDNIGHT
    }

    /// The absolute span of this shift when it starts on `date`.
    ///
    /// The span always lies within `[date 00:00, date+1 24:00)`. Returns
    /// `None` for zero-duration shifts.
    pub fn span_on(&self, date: NaiveDate) -> Option<Interval> {
        if self.is_zero_duration() {
            return None;
        }
        let start = minute_of(date, self.start);
        let mut end = minute_of(date, self.end);
        if end <= start {
            end += MINUTES_PER_DAY;
        }
        Interval::new(start, end)
    }

    /// Nominal duration in hours.
    pub fn hours(&self) -> Decimal {
        let minutes = match self.span_on(NaiveDate::MIN) {
            Some(span) => span.minutes(),
            None => 0,
        };
        Decimal::new(minutes, 0) / Decimal::new(60, 0)
    }
}
