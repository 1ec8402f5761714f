//! Absence deductions.
//!
//! Sick days are grouped into periods. The first sick day of a period is a
//! qualifying day (karensdag) with a full deduction; later days of the same
//! period deduct a reduced share. A run of days without sickness ends the
//! period.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::AbsenceSettings;
use crate::models::AbsenceKind;

/// Where a sick day falls in its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SickDay {
    /// First day of a new period.
    Qualifying,
    /// A later day of the current period.
    Continuing,
}

/// Tracks sick periods for one person while walking dates in order.
#[derive(Debug, Clone, Default)]
pub struct SickPeriodTracker {
    last_sick_day: Option<NaiveDate>,
    gap_days: i64,
}

impl SickPeriodTracker {
    /// Creates a tracker; `gap_days` sick-free days end a period.
    pub fn new(gap_days: i64) -> Self {
        Self {
            last_sick_day: None,
            gap_days,
        }
    }

    /// Seeds the tracker with sick days that precede the calculated range.
    pub fn seed<I: IntoIterator<Item = NaiveDate>>(&mut self, earlier_sick_days: I) {
        for date in earlier_sick_days {
            self.observe(date);
        }
    }

    /// Records a sick day and classifies it.
    ///
    /// # Example
    ///
    /// ```
    /// use ob_engine::calculation::{SickDay, SickPeriodTracker};
    /// use chrono::NaiveDate;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2026, 2, d).unwrap();
    /// let mut tracker = SickPeriodTracker::new(5);
    /// assert_eq!(tracker.observe(day(2)), SickDay::Qualifying);
    /// assert_eq!(tracker.observe(day(3)), SickDay::Continuing);
    /// // Five sick-free days (4th..8th) start a new period.
    /// assert_eq!(tracker.observe(day(9)), SickDay::Qualifying);
    /// ```
    pub fn observe(&mut self, date: NaiveDate) -> SickDay {
        let kind = match self.last_sick_day {
            Some(last) if (date - last).num_days() - 1 < self.gap_days => SickDay::Continuing,
            _ => SickDay::Qualifying,
        };
        self.last_sick_day = Some(date);
        kind
    }

    /// How far back records are needed to seed the tracker for a range.
    pub fn lookback_days(&self) -> i64 {
        self.gap_days
    }
}

/// Share of the scheduled pay deducted for an absence, in percent.
pub fn deduction_percent(
    kind: AbsenceKind,
    sick_day: Option<SickDay>,
    settings: &AbsenceSettings,
) -> Decimal {
    match kind {
        AbsenceKind::Sick => match sick_day {
            Some(SickDay::Continuing) => settings.sick_percent,
            _ => settings.first_sick_day_percent,
        },
        AbsenceKind::Vab | AbsenceKind::Leave => Decimal::ONE_HUNDRED,
        AbsenceKind::Vacation | AbsenceKind::Off => Decimal::ZERO,
    }
}

/// Deduction for an absence given the scheduled pay it replaces.
pub fn deduction(
    kind: AbsenceKind,
    sick_day: Option<SickDay>,
    scheduled_pay: Decimal,
    settings: &AbsenceSettings,
) -> Decimal {
    scheduled_pay * deduction_percent(kind, sick_day, settings) / Decimal::ONE_HUNDRED
}
