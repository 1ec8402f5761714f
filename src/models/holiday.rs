//! Holiday window model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calculation::Interval;

/// Priority tier of a holiday window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayTier {
    /// Ordinary public holiday ("helgdag").
    Holiday,
    /// Major holiday ("storhelg").
    MajorHoliday,
}

impl HolidayTier {
    /// The overlay priority of this tier.
    pub fn priority(self) -> u8 {
        match self {
            HolidayTier::Holiday => 4,
            HolidayTier::MajorHoliday => 5,
        }
    }
}

/// A date-specific high-priority window produced by the holiday calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayWindow {
    /// Name of the holiday, or the names of merged holidays joined by " / ".
    pub name: String,
    /// Priority tier.
    pub tier: HolidayTier,
    /// Window start.
    pub start: NaiveDateTime,
    /// Window end (exclusive).
    pub end: NaiveDateTime,
}

impl HolidayWindow {
    /// The window as a minute interval.
    pub fn interval(&self) -> Option<Interval> {
        Interval::from_datetimes(self.start, self.end)
    }
}
