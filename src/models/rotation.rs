//! The ten-week rotation pattern.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::ShiftCode;

/// Number of weeks in a rotation cycle.
pub const ROTATION_WEEKS: u8 = 10;

/// A week number in the rotation cycle, always in `1..=10`.
///
/// # Example
///
/// ```
/// use ob_engine::models::RotationWeek;
///
/// assert_eq!(RotationWeek::new(3).unwrap().get(), 3);
/// assert!(RotationWeek::new(0).is_none());
/// assert!(RotationWeek::new(11).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RotationWeek(u8);

impl RotationWeek {
    /// Creates a week number, or `None` outside `1..=10`.
    pub fn new(week: u8) -> Option<Self> {
        (1..=ROTATION_WEEKS).contains(&week).then_some(Self(week))
    }

    /// Week number for an arbitrary (possibly negative) cycle position.
    ///
    /// Position 0 is week 1.
    pub fn from_position(position: i64) -> Self {
        Self(position.rem_euclid(i64::from(ROTATION_WEEKS)) as u8 + 1)
    }

    /// The week number.
    pub fn get(self) -> u8 {
        self.0
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for RotationWeek {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        RotationWeek::new(value)
            .ok_or_else(|| format!("rotation week must be 1..={}, got {}", ROTATION_WEEKS, value))
    }
}

impl From<RotationWeek> for u8 {
    fn from(value: RotationWeek) -> Self {
        value.0
    }
}

impl fmt::Display for RotationWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exactly ten weeks of seven shift codes, Monday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPattern {
    weeks: Vec<[ShiftCode; 7]>,
}

impl RotationPattern {
    /// Builds a pattern from the `"1".."10"` keyed map used in `rotation.yaml`.
    ///
    /// Every week must be present with exactly seven codes.
    pub fn from_keyed(keyed: &BTreeMap<String, Vec<ShiftCode>>) -> EngineResult<Self> {
        if keyed.len() != usize::from(ROTATION_WEEKS) {
            return Err(EngineError::configuration(format!(
                "rotation must define {} weeks, found {}",
                ROTATION_WEEKS,
                keyed.len()
            )));
        }
        let mut weeks = Vec::with_capacity(usize::from(ROTATION_WEEKS));
        for week in 1..=ROTATION_WEEKS {
            let key = week.to_string();
            let days = keyed.get(&key).ok_or_else(|| {
                EngineError::configuration(format!("rotation week '{}' is missing", key))
            })?;
            let days: [ShiftCode; 7] = days.clone().try_into().map_err(|v: Vec<ShiftCode>| {
                EngineError::configuration(format!(
                    "rotation week '{}' has {} days, expected 7",
                    key,
                    v.len()
                ))
            })?;
            weeks.push(days);
        }
        Ok(Self { weeks })
    }

    /// Code for `week` and weekday index (Monday = 0).
    pub fn code(&self, week: RotationWeek, weekday: usize) -> &ShiftCode {
        &self.weeks[week.index()][weekday % 7]
    }

    /// Every code used anywhere in the pattern, with its week number.
    pub fn cells(&self) -> impl Iterator<Item = (u8, &ShiftCode)> {
        self.weeks
            .iter()
            .zip(1u8..)
            .flat_map(|(days, week)| days.iter().map(move |code| (week, code)))
    }
}

/// Why a date got the shift code it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    /// Taken straight from the rotation pattern.
    Rotation,
    /// Replaced by `SEM` because the date is in a vacation week.
    Vacation,
    /// Replaced by the counterpart's shift in an accepted swap.
    Swap,
    /// Replaced by an absence record.
    Absence,
}

/// The resolved shift for one person on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    /// The date.
    pub date: chrono::NaiveDate,
    /// Rotation week the date falls in for this person.
    pub week: RotationWeek,
    /// Resolved shift code.
    pub code: ShiftCode,
    /// What decided the code.
    pub source: AssignmentSource,
}
