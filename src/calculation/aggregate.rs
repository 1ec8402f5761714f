//! Day and period aggregation.
//!
//! A day is priced in four independent parts: OB for a work shift, on-call
//! for an on-call day, overtime records, and the deduction for an absence.
//! Record hours are checked once, when a range is fetched.
//! Day amounts keep full precision; month totals round each component to
//! öre before deriving gross, tax and net.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AbsenceKind, AbsenceRecord, DayResult, HolidayWindow, OnCallRecord, OvertimeRecord,
    PaySegment, PeriodTotals, Person, RecordSource, ShiftAssignment, ShiftKind, ShiftSwap,
    round_money,
};

use super::absence::{SickPeriodTracker, deduction};
use super::overlay::resolve;
use super::pay::{WageBasis, price_hours, price_segments};
use super::rotation::{with_absence, with_swap};
use super::tax::tax_for;
use super::windows::{ob_windows, on_call_span, on_call_windows};

/// Records for a single day.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayRecords<'a> {
    /// The day's absence, if any.
    pub absence: Option<&'a AbsenceRecord>,
    /// Overtime worked that day.
    pub overtime: &'a [OvertimeRecord],
    /// The day's on-call record, if any.
    pub on_call: Option<&'a OnCallRecord>,
    /// An accepted shift swap covering the day, if any.
    pub swap: Option<&'a ShiftSwap>,
}

/// Longest on-call record accepted, in hours.
const MAX_ON_CALL_HOURS: i64 = 48;

fn check_hours(
    what: &str,
    person: &Person,
    date: NaiveDate,
    hours: Option<Decimal>,
    max: i64,
) -> EngineResult<()> {
    match hours {
        Some(h) if h.is_sign_negative() || h > Decimal::new(max, 0) => {
            Err(EngineError::input_range(format!(
                "{} hours {} for person {} on {} must be within 0..={}",
                what, h, person.id, date, max
            )))
        }
        _ => Ok(()),
    }
}

/// Records for a date range, indexed by date.
#[derive(Debug, Default)]
pub struct RangeRecords {
    absences: HashMap<NaiveDate, AbsenceRecord>,
    overtime: HashMap<NaiveDate, Vec<OvertimeRecord>>,
    on_call: HashMap<NaiveDate, OnCallRecord>,
    swaps: HashMap<NaiveDate, ShiftSwap>,
    earlier_sick_days: Vec<NaiveDate>,
}

impl RangeRecords {
    /// Fetches and indexes records for `person` over `from..=to`.
    ///
    /// Sick days in the `lookback_days` before `from` are kept separately to
    /// seed the sick-period tracker. Two absences, two on-call records or two
    /// swaps on the same date are rejected, as are absence and overtime hours
    /// outside 0..=24 and on-call hours that do not form a span of at most 48
    /// hours.
    pub fn fetch(
        source: &dyn RecordSource,
        person: &Person,
        from: NaiveDate,
        to: NaiveDate,
        lookback_days: i64,
    ) -> EngineResult<Self> {
        let mut records = RangeRecords::default();

        let lookback_from = from - Duration::days(lookback_days);
        for absence in source.absences(person.id, lookback_from, to) {
            if absence.date < from {
                if absence.kind == AbsenceKind::Sick {
                    records.earlier_sick_days.push(absence.date);
                }
                continue;
            }
            let date = absence.date;
            check_hours("absence", person, date, absence.hours, 24)?;
            if records.absences.insert(date, absence).is_some() {
                return Err(EngineError::input_range(format!(
                    "more than one absence for person {} on {}",
                    person.id, date
                )));
            }
        }
        records.earlier_sick_days.sort();

        for overtime in source.overtime(person.id, from, to) {
            check_hours("overtime", person, overtime.date, overtime.hours, 24)?;
            records.overtime.entry(overtime.date).or_default().push(overtime);
        }

        for on_call in source.on_call(person.id, from, to) {
            let date = on_call.date;
            check_hours("on-call", person, date, on_call.hours, MAX_ON_CALL_HOURS)?;
            if let Some(hours) = on_call.hours.filter(|h| on_call_span(date, *h).is_none()) {
                return Err(EngineError::input_range(format!(
                    "on-call hours {} for person {} on {} must be positive",
                    hours, person.id, date
                )));
            }
            if records.on_call.insert(date, on_call).is_some() {
                return Err(EngineError::input_range(format!(
                    "more than one on-call record for person {} on {}",
                    person.id, date
                )));
            }
        }

        for swap in source.swaps(person.id, from, to) {
            for date in swap.dates().filter(|d| (from..=to).contains(d)) {
                if !swap.applies_to(person.id, date) {
                    continue;
                }
                if records.swaps.insert(date, swap.clone()).is_some() {
                    return Err(EngineError::input_range(format!(
                        "more than one shift swap for person {} on {}",
                        person.id, date
                    )));
                }
            }
        }

        Ok(records)
    }

    /// Sick days before the range, oldest first.
    pub fn earlier_sick_days(&self) -> &[NaiveDate] {
        &self.earlier_sick_days
    }

    /// Records for one date.
    pub fn day(&self, date: NaiveDate) -> DayRecords<'_> {
        DayRecords {
            absence: self.absences.get(&date),
            overtime: self.overtime.get(&date).map(Vec::as_slice).unwrap_or(&[]),
            on_call: self.on_call.get(&date),
            swap: self.swaps.get(&date),
        }
    }
}

/// Prices days for one person against one configuration snapshot.
#[derive(Debug)]
pub struct Aggregator<'a> {
    config: &'a EngineConfig,
    person: &'a Person,
    holidays: &'a [HolidayWindow],
    wage: WageBasis,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator. `holidays` must cover every date priced plus
    /// the day before and after.
    pub fn new(config: &'a EngineConfig, person: &'a Person, holidays: &'a [HolidayWindow]) -> Self {
        let wage = WageBasis::new(
            person.monthly_wage,
            config.settings().standard_monthly_hours,
        );
        Self {
            config,
            person,
            holidays,
            wage,
        }
    }

    /// A sick-period tracker configured for this aggregator.
    pub fn sick_tracker(&self) -> SickPeriodTracker {
        SickPeriodTracker::new(self.config.settings().absence.new_period_gap_days)
    }

    /// Prices one day.
    ///
    /// `scheduled` is the rotation/vacation assignment before any swap or
    /// absence override; `None` marks a date before the rotation start,
    /// which is returned empty. An absence deducts the hours of the shift
    /// the person would have worked after the swap.
    pub fn day(
        &self,
        date: NaiveDate,
        scheduled: Option<&ShiftAssignment>,
        records: DayRecords<'_>,
        tracker: &mut SickPeriodTracker,
    ) -> EngineResult<DayResult> {
        let Some(scheduled) = scheduled else {
            debug!(person_id = %self.person.id, %date, "Date before rotation start");
            return Ok(DayResult::unscheduled(date));
        };

        let scheduled = with_swap(self.config, self.person, scheduled.clone(), records.swap)?;
        let assignment = with_absence(self.config, self.person, scheduled.clone(), records.absence)?;
        let shift_type = self.config.shift_type(&assignment.code)?;
        let mut result = DayResult::unscheduled(date);
        result.kind = Some(shift_type.kind);

        if shift_type.kind == ShiftKind::Work {
            if let Some(span) = shift_type.span_on(date) {
                let windows = ob_windows(self.config, &span, self.holidays)?;
                let pieces = resolve(span, &windows)?;
                result.segments = price_segments(&pieces, &windows, &self.wage);
                let (hours, pay) = tagged_totals(&result.segments);
                result.ob_hours = hours;
                result.ob_pay = pay;
            }
        }

        if shift_type.kind == ShiftKind::OnCall || records.on_call.is_some() {
            let hours = records
                .on_call
                .and_then(|r| r.hours)
                .unwrap_or(self.config.on_call().default_hours);
            let span = on_call_span(date, hours).ok_or_else(|| {
                EngineError::input_range(format!(
                    "on-call hours {} for person {} on {} do not form a span",
                    hours, self.person.id, date
                ))
            })?;
            let windows = on_call_windows(self.config, &span, self.holidays)?;
            let pieces = resolve(span, &windows)?;
            result.on_call_segments = price_segments(&pieces, &windows, &self.wage);
            result.on_call_hours = span.hours();
            result.on_call_pay = result.on_call_segments.iter().map(|s| s.amount).sum();
        }

        let overtime = &self.config.settings().overtime;
        for record in records.overtime {
            let hours = record.hours.unwrap_or(overtime.default_hours);
            result.overtime_hours += hours;
            result.overtime_pay += price_hours(&overtime.rate, hours, &self.wage);
        }

        if let Some(absence) = records.absence {
            let sick_day = (absence.kind == AbsenceKind::Sick).then(|| tracker.observe(date));
            let hours = match absence.hours {
                Some(hours) => hours,
                None => self.scheduled_hours(&scheduled)?,
            };
            result.absence = Some(absence.kind);
            result.absence_deduction = deduction(
                absence.kind,
                sick_day,
                self.wage.scheduled_pay(hours),
                &self.config.settings().absence,
            );
        }

        result.assignment = Some(assignment);
        Ok(result)
    }

    fn scheduled_hours(&self, scheduled: &ShiftAssignment) -> EngineResult<Decimal> {
        let shift_type = self.config.shift_type(&scheduled.code)?;
        Ok(match shift_type.kind {
            ShiftKind::Work => shift_type.hours(),
            _ => Decimal::ZERO,
        })
    }

    /// Prices every date in `from..=to`.
    ///
    /// `scheduled_on` supplies the scheduled assignment per date.
    pub fn range<F>(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        records: &RangeRecords,
        scheduled_on: F,
    ) -> EngineResult<Vec<DayResult>>
    where
        F: Fn(NaiveDate) -> EngineResult<Option<ShiftAssignment>>,
    {
        let mut tracker = self.sick_tracker();
        tracker.seed(records.earlier_sick_days().iter().copied());

        from.iter_days()
            .take_while(|d| *d <= to)
            .map(|date| {
                let scheduled = scheduled_on(date)?;
                self.day(date, scheduled.as_ref(), records.day(date), &mut tracker)
            })
            .collect()
    }

    /// Rounded totals for a month of day results.
    pub fn month_totals(&self, days: &[DayResult]) -> PeriodTotals {
        let mut totals = PeriodTotals {
            wage: self.person.monthly_wage,
            ..Default::default()
        };
        for day in days {
            for (code, hours) in &day.ob_hours {
                *totals.ob_hours.entry(code.clone()).or_default() += *hours;
            }
            totals.ob_pay += day.ob_pay;
            totals.on_call_hours += day.on_call_hours;
            totals.on_call_pay += day.on_call_pay;
            totals.overtime_hours += day.overtime_hours;
            totals.overtime_pay += day.overtime_pay;
            totals.absence_deduction += day.absence_deduction;
            if day.kind == Some(ShiftKind::Work) {
                totals.work_shifts += 1;
            }
        }

        let mut totals = totals.rounded();
        totals.gross = totals.wage + totals.ob_pay + totals.on_call_pay + totals.overtime_pay;
        totals.gross_after_deductions = totals.gross - totals.absence_deduction;
        totals.tax = round_money(tax_for(
            self.config.tax_brackets(),
            totals.gross_after_deductions,
        ));
        totals.net = totals.gross_after_deductions - totals.tax;
        totals
    }
}

fn tagged_totals(segments: &[PaySegment]) -> (BTreeMap<String, Decimal>, Decimal) {
    let mut hours = BTreeMap::new();
    let mut pay = Decimal::ZERO;
    for segment in segments {
        if let Some(code) = &segment.code {
            *hours.entry(code.clone()).or_insert(Decimal::ZERO) += segment.hours;
            pay += segment.amount;
        }
    }
    (hours, pay)
}
