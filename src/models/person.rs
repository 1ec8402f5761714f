//! Person model.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RotationWeek;

/// Identifier of a person on the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u32);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team member following the rotation.
///
/// # Example
///
/// ```
/// use ob_engine::models::{Person, PersonId, RotationWeek};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let mut person = Person {
///     id: PersonId(1),
///     name: "Anna".to_string(),
///     monthly_wage: Decimal::new(38000, 0),
///     cycle_offset: RotationWeek::new(1).unwrap(),
///     vacation: BTreeMap::new(),
///     employment_start: None,
///     vacation_saved: BTreeMap::new(),
/// };
/// person.vacation.entry(2026).or_default().insert(29);
///
/// // 2026-07-15 is in ISO week 29
/// assert!(person.is_on_vacation(NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier.
    pub id: PersonId,
    /// Display name.
    pub name: String,
    /// Current monthly wage in SEK.
    pub monthly_wage: Decimal,
    /// Rotation week this person is on in the rotation start week.
    pub cycle_offset: RotationWeek,
    /// Vacation ISO weeks keyed by ISO year.
    #[serde(default)]
    pub vacation: BTreeMap<i32, BTreeSet<u32>>,
    /// First day of employment; vacation is pro-rated in the first year.
    #[serde(default)]
    pub employment_start: Option<NaiveDate>,
    /// Unused days saved from each closed vacation year.
    #[serde(default)]
    pub vacation_saved: BTreeMap<i32, u32>,
}

impl Person {
    /// Returns true if `date` falls in one of the person's vacation weeks.
    ///
    /// Weeks are ISO weeks of the ISO year, so the first days of January can
    /// belong to week 52 or 53 of the previous year.
    pub fn is_on_vacation(&self, date: NaiveDate) -> bool {
        let iso = date.iso_week();
        self.vacation
            .get(&iso.year())
            .is_some_and(|weeks| weeks.contains(&iso.week()))
    }
}
