//! Pay-rate rules: OB rules, priority tiers and rate forms.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{Interval, minute_of};

use super::ClockTime;
use super::shift::MINUTES_PER_DAY;

/// How a rule's minutes are turned into money.
///
/// # Example
///
/// ```
/// use ob_engine::models::PayRate;
///
/// let rate: PayRate = serde_yaml::from_str("type: divisor\ndivisor: 600").unwrap();
/// assert!(matches!(rate, PayRate::Divisor { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayRate {
    /// A percentage of the person's hourly wage.
    Percent {
        /// Percentage, e.g. `50` for half the hourly wage.
        percent: Decimal,
    },
    /// `monthly_wage / divisor` per hour.
    Divisor {
        /// The divisor, e.g. `600` for evening OB.
        divisor: Decimal,
    },
    /// A fixed amount per hour, independent of wage.
    FlatPerHour {
        /// SEK per hour.
        amount: Decimal,
    },
    /// A fixed amount once per shift the rule touches.
    FlatPerShift {
        /// SEK per shift.
        amount: Decimal,
    },
}

impl PayRate {
    /// Returns true if the rate can be priced (no zero divisor, no negative amount).
    pub fn is_valid(&self) -> bool {
        match self {
            PayRate::Percent { percent } => !percent.is_sign_negative(),
            PayRate::Divisor { divisor } => divisor > &Decimal::ZERO,
            PayRate::FlatPerHour { amount } | PayRate::FlatPerShift { amount } => {
                !amount.is_sign_negative()
            }
        }
    }
}

/// A priority tier of the OB table.
///
/// Tiers 4 and 5 price the holiday windows produced by the holiday calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObTier {
    /// Priority, higher wins.
    pub priority: u8,
    /// Tier code used in breakdowns, e.g. "OB1".
    pub code: String,
    /// Human-readable label.
    pub label: String,
    /// Rate for holiday windows of this tier; ordinary rules carry their own.
    #[serde(default)]
    pub rate: Option<PayRate>,
}

/// A configured pay-rate window.
///
/// A rule applies on dates whose weekday is listed in `days` (Monday = 0)
/// or that are listed in `dates`. Its window runs from `start` to `end` on
/// that date; an `end` at or before `start` continues into the next day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObRule {
    /// Rule code.
    pub code: String,
    /// Human-readable label.
    pub label: String,
    /// Priority, higher wins.
    pub priority: u8,
    /// Weekdays (Monday = 0 ... Sunday = 6) the rule applies on.
    #[serde(default)]
    pub days: BTreeSet<u8>,
    /// Explicit dates the rule applies on.
    #[serde(default)]
    pub dates: BTreeSet<NaiveDate>,
    /// Window start on an applicable date.
    pub start: ClockTime,
    /// Window end.
    pub end: ClockTime,
    /// Rate paid for covered minutes.
    pub rate: PayRate,
}

impl ObRule {
    /// Returns true if the rule is active on `date`.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().num_days_from_monday() as u8;
        self.days.contains(&weekday) || self.dates.contains(&date)
    }

    /// The rule's window starting on `date`, if the rule applies that day.
    pub fn window_on(&self, date: NaiveDate) -> Option<Interval> {
        if !self.applies_on(date) {
            return None;
        }
        let start = minute_of(date, self.start);
        let mut end = minute_of(date, self.end);
        if end <= start {
            end += MINUTES_PER_DAY;
        }
        Interval::new(start, end)
    }
}

/// A preliminary-tax bracket. The first bracket whose `up_to` is open or at
/// least the taxable amount applies to the whole amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Upper bound of the bracket, `None` for the last one.
    #[serde(default)]
    pub up_to: Option<Decimal>,
    /// Tax rate as a fraction, e.g. `0.30`.
    pub rate: Decimal,
}
