//! Calculation result models.
//!
//! Day results keep full precision. Month and year totals are rounded to two
//! decimals when they are built.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AbsenceKind, PersonId, ShiftAssignment, ShiftCode, ShiftKind};

/// Rounds a money amount to öre, midpoint away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One piece of a resolved shift or on-call span.
///
/// # Example
///
/// ```
/// use ob_engine::models::PaySegment;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let segment = PaySegment {
///     start: NaiveDateTime::parse_from_str("2026-01-14 18:00", "%Y-%m-%d %H:%M").unwrap(),
///     end: NaiveDateTime::parse_from_str("2026-01-14 22:00", "%Y-%m-%d %H:%M").unwrap(),
///     code: Some("OB1".to_string()),
///     label: Some("Evening".to_string()),
///     priority: Some(1),
///     hours: Decimal::new(4, 0),
///     amount: Decimal::new(25333, 2),
/// };
/// assert!(!segment.is_untagged());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaySegment {
    /// Segment start.
    pub start: NaiveDateTime,
    /// Segment end (exclusive).
    pub end: NaiveDateTime,
    /// Code of the winning rule's tier, `None` for untagged time.
    pub code: Option<String>,
    /// Label of the winning rule or holiday.
    pub label: Option<String>,
    /// Priority of the winning rule.
    pub priority: Option<u8>,
    /// Length in hours.
    pub hours: Decimal,
    /// Amount paid for the segment.
    pub amount: Decimal,
}

impl PaySegment {
    /// Returns true if no rule covered this segment.
    pub fn is_untagged(&self) -> bool {
        self.code.is_none()
    }
}

/// Full breakdown of one person's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayResult {
    /// The date.
    pub date: NaiveDate,
    /// Resolved assignment; `None` before the rotation start date.
    pub assignment: Option<ShiftAssignment>,
    /// Kind of the resolved shift.
    pub kind: Option<ShiftKind>,
    /// OB overlay of the shift span.
    pub segments: Vec<PaySegment>,
    /// OB hours per tier code.
    pub ob_hours: BTreeMap<String, Decimal>,
    /// Total OB pay.
    pub ob_pay: Decimal,
    /// On-call overlay, empty if the day is not on call.
    pub on_call_segments: Vec<PaySegment>,
    /// On-call hours.
    pub on_call_hours: Decimal,
    /// On-call pay.
    pub on_call_pay: Decimal,
    /// Overtime hours.
    pub overtime_hours: Decimal,
    /// Overtime pay.
    pub overtime_pay: Decimal,
    /// Absence recorded for the day.
    pub absence: Option<AbsenceKind>,
    /// Deduction for the absence.
    pub absence_deduction: Decimal,
}

impl DayResult {
    /// An empty result for a date with no assignment.
    pub fn unscheduled(date: NaiveDate) -> Self {
        Self {
            date,
            assignment: None,
            kind: None,
            segments: Vec::new(),
            ob_hours: BTreeMap::new(),
            ob_pay: Decimal::ZERO,
            on_call_segments: Vec::new(),
            on_call_hours: Decimal::ZERO,
            on_call_pay: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            overtime_pay: Decimal::ZERO,
            absence: None,
            absence_deduction: Decimal::ZERO,
        }
    }

    /// The resolved shift code, if any.
    pub fn shift_code(&self) -> Option<&ShiftCode> {
        self.assignment.as_ref().map(|a| &a.code)
    }
}

/// Money and hour totals for a month or a year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Fixed monthly wage(s).
    pub wage: Decimal,
    /// OB hours per tier code.
    pub ob_hours: BTreeMap<String, Decimal>,
    /// OB pay.
    pub ob_pay: Decimal,
    /// On-call hours.
    pub on_call_hours: Decimal,
    /// On-call pay.
    pub on_call_pay: Decimal,
    /// Overtime hours.
    pub overtime_hours: Decimal,
    /// Overtime pay.
    pub overtime_pay: Decimal,
    /// Wage plus OB, on-call and overtime pay.
    pub gross: Decimal,
    /// Absence deductions.
    pub absence_deduction: Decimal,
    /// Gross minus deductions.
    pub gross_after_deductions: Decimal,
    /// Preliminary tax.
    pub tax: Decimal,
    /// Net pay.
    pub net: Decimal,
    /// Number of work-kind shifts.
    pub work_shifts: u32,
}

impl PeriodTotals {
    /// Rounds every money and hour field to two decimals.
    pub fn rounded(mut self) -> Self {
        for hours in self.ob_hours.values_mut() {
            *hours = round_money(*hours);
        }
        for field in [
            &mut self.wage,
            &mut self.ob_pay,
            &mut self.on_call_hours,
            &mut self.on_call_pay,
            &mut self.overtime_hours,
            &mut self.overtime_pay,
            &mut self.gross,
            &mut self.absence_deduction,
            &mut self.gross_after_deductions,
            &mut self.tax,
            &mut self.net,
        ] {
            *field = round_money(*field);
        }
        self
    }

    /// Adds `other` field by field.
    pub fn accumulate(&mut self, other: &PeriodTotals) {
        for (code, hours) in &other.ob_hours {
            *self.ob_hours.entry(code.clone()).or_default() += *hours;
        }
        self.wage += other.wage;
        self.ob_pay += other.ob_pay;
        self.on_call_hours += other.on_call_hours;
        self.on_call_pay += other.on_call_pay;
        self.overtime_hours += other.overtime_hours;
        self.overtime_pay += other.overtime_pay;
        self.gross += other.gross;
        self.absence_deduction += other.absence_deduction;
        self.gross_after_deductions += other.gross_after_deductions;
        self.tax += other.tax;
        self.net += other.net;
        self.work_shifts += other.work_shifts;
    }
}

/// Summary of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthResult {
    /// Unique identifier of this calculation.
    pub calculation_id: Uuid,
    /// When the calculation ran.
    pub calculated_at: DateTime<Utc>,
    /// The person.
    pub person_id: PersonId,
    /// Year.
    pub year: i32,
    /// Month (1-12).
    pub month: u32,
    /// Per-day breakdown.
    pub days: Vec<DayResult>,
    /// Rounded totals.
    pub totals: PeriodTotals,
}

/// One month's line in a year summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthLine {
    /// Month (1-12).
    pub month: u32,
    /// Rounded totals of the month.
    pub totals: PeriodTotals,
}

/// Number of days two persons shared the same work shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoworkCount {
    /// The other person.
    pub person_id: PersonId,
    /// The other person's name.
    pub name: String,
    /// Total shared days.
    pub total: u32,
    /// Shared days per shift code.
    pub by_code: BTreeMap<String, u32>,
}

/// A single shared day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoworkDay {
    /// The date.
    pub date: NaiveDate,
    /// The shared shift code.
    pub code: ShiftCode,
}

/// Summary of a whole year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearResult {
    /// Unique identifier of this calculation.
    pub calculation_id: Uuid,
    /// When the calculation ran.
    pub calculated_at: DateTime<Utc>,
    /// The person.
    pub person_id: PersonId,
    /// Year.
    pub year: i32,
    /// Month-by-month rollup.
    pub months: Vec<MonthLine>,
    /// Sum of the rounded monthly totals.
    pub totals: PeriodTotals,
    /// Co-working counts with every other person.
    pub cowork: Vec<CoworkCount>,
}

/// Vacation supplement (semestertillägg) and payout rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationPay {
    /// Monthly wage the rates are based on.
    pub monthly_wage: Decimal,
    /// Fixed part per vacation day, a share of the monthly wage.
    pub fixed_per_day: Decimal,
    /// OB, on-call and overtime pay earned during the earning year.
    pub variable_total: Decimal,
    /// Variable part per vacation day, a share of `variable_total`.
    pub variable_per_day: Decimal,
    /// Fixed plus variable part.
    pub supplement_per_day: Decimal,
    /// Supplement for every entitled day.
    pub supplement_total: Decimal,
    /// Paid per unused day that is not saved (semesterersättning).
    pub payout_per_day: Decimal,
}

/// What happens to the remaining days when the vacation year closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationProjection {
    /// Days carried over to later years.
    pub days_to_save: u32,
    /// Days paid out.
    pub days_to_pay_out: u32,
    /// Payout for those days.
    pub payout_total: Decimal,
}

/// Vacation balance for one vacation year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationBalance {
    /// The person.
    pub person_id: PersonId,
    /// Calendar year the vacation year starts in.
    pub year: i32,
    /// First day of the vacation year.
    pub year_start: NaiveDate,
    /// Last day of the vacation year.
    pub year_end: NaiveDate,
    /// First day of the earning year.
    pub earning_year_start: NaiveDate,
    /// Last day of the earning year.
    pub earning_year_end: NaiveDate,
    /// True when employment began after the earning year started.
    pub is_first_year: bool,
    /// Days earned, pro-rated in the first year.
    pub entitled_days: u32,
    /// Weekdays inside vacation weeks.
    pub week_based_used: u32,
    /// Single vacation days recorded as absences.
    pub day_level_used: u32,
    /// All days used.
    pub used_days: u32,
    /// Days saved from earlier years that are still valid.
    pub saved_from_previous: u32,
    /// Entitled plus saved days.
    pub total_available: u32,
    /// Available minus used; negative when overdrawn.
    pub remaining_days: i64,
    /// Supplement and payout rates.
    pub pay: VacationPay,
    /// Outcome at year end.
    pub projection: VacationProjection,
}
