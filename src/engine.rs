//! The engine facade: one validated configuration snapshot plus memo caches.
//!
//! Every operation takes the current snapshot once and computes against it,
//! so a concurrent [`Engine::reload`] never mixes two configurations within
//! a single result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::{CalendarCache, YearSchedule};
use crate::calculation::{
    Aggregator, RangeRecords, count_for, entitled_days, holiday_windows_for, merge_same_tier,
    projection, rank, saved_days, scheduled_assignment, shared_shifts, vacation_pay,
    vacation_year_bounds, week_based_days_used,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AbsenceKind, CoworkCount, CoworkDay, DayResult, HolidayWindow, MonthLine, MonthResult,
    PeriodTotals, Person, PersonId, RecordSource, ShiftAssignment, ShiftCode, VacationBalance,
    YearResult,
};

/// Earliest year the calendar supports (first Gregorian Easter table year).
pub const MIN_YEAR: i32 = 1583;
/// Latest supported year.
pub const MAX_YEAR: i32 = 9999;

/// A configuration together with the version it was installed under.
#[derive(Debug)]
pub struct Snapshot {
    version: u64,
    config: EngineConfig,
}

impl Snapshot {
    /// Monotonic version, bumped on every reload.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The validated configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Schedule and pay engine.
///
/// # Example
///
/// ```no_run
/// use ob_engine::config::ConfigLoader;
/// use ob_engine::engine::Engine;
/// use ob_engine::models::PersonId;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/sweden").unwrap();
/// let engine = Engine::new(loader.into_config());
/// let date = NaiveDate::from_ymd_opt(2026, 6, 19).unwrap();
/// let code = engine.shift_for(date, PersonId(1)).unwrap();
/// println!("{code}");
/// ```
#[derive(Debug)]
pub struct Engine {
    snapshot: RwLock<Arc<Snapshot>>,
    next_version: AtomicU64,
    cache: Arc<CalendarCache>,
}

impl Engine {
    /// Creates an engine with a private cache.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_cache(config, Arc::new(CalendarCache::new()))
    }

    /// Creates an engine that memoizes into `cache`.
    pub fn with_cache(config: EngineConfig, cache: Arc<CalendarCache>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot { version: 1, config })),
            next_version: AtomicU64::new(2),
            cache,
        }
    }

    /// The current snapshot. Calls already holding an older one keep it.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The cache this engine memoizes into.
    pub fn cache(&self) -> &Arc<CalendarCache> {
        &self.cache
    }

    /// Installs a new configuration and returns its version.
    pub fn reload(&self, config: EngineConfig) -> u64 {
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        {
            let mut current = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
            *current = Arc::new(Snapshot { version, config });
        }
        self.cache.retire_before(version);
        info!(version, "Configuration reloaded");
        version
    }

    /// Holiday windows starting in `year`, sorted by start.
    pub fn holiday_windows_for(&self, year: i32) -> EngineResult<Arc<Vec<HolidayWindow>>> {
        check_year(year)?;
        let snapshot = self.snapshot();
        self.holidays(&snapshot, year)
    }

    /// The scheduled assignment (rotation and vacation) on `date`.
    pub fn assignment_for(&self, date: NaiveDate, person_id: PersonId) -> EngineResult<ShiftAssignment> {
        check_year(date.year())?;
        let snapshot = self.snapshot();
        let person = snapshot.config.person(person_id)?;
        self.scheduled_on(&snapshot, person, date)?.ok_or_else(|| {
            EngineError::input_range(format!(
                "{} is before the rotation start {}",
                date,
                snapshot.config.settings().rotation_start_date
            ))
        })
    }

    /// The scheduled shift code on `date`.
    pub fn shift_for(&self, date: NaiveDate, person_id: PersonId) -> EngineResult<ShiftCode> {
        self.assignment_for(date, person_id).map(|a| a.code)
    }

    /// Full breakdown of one day.
    pub fn day_breakdown(
        &self,
        date: NaiveDate,
        person_id: PersonId,
        records: &dyn RecordSource,
    ) -> EngineResult<DayResult> {
        check_year(date.year())?;
        let snapshot = self.snapshot();
        let person = snapshot.config.person(person_id)?;
        let holidays = self.holidays_around(&snapshot, date.year(), date.year())?;
        let aggregator = Aggregator::new(&snapshot.config, person, &holidays);

        let range = RangeRecords::fetch(
            records,
            person,
            date,
            date,
            aggregator.sick_tracker().lookback_days(),
        )?;
        let mut days = aggregator.range(date, date, &range, |d| {
            self.scheduled_on(&snapshot, person, d)
        })?;
        days.pop()
            .ok_or_else(|| EngineError::input_range(format!("no result for {}", date)))
    }

    /// Day results and rounded totals for one calendar month.
    pub fn month_summary(
        &self,
        year: i32,
        month: u32,
        person_id: PersonId,
        records: &dyn RecordSource,
    ) -> EngineResult<MonthResult> {
        let start_time = Instant::now();
        let (from, to) = month_bounds(year, month)?;
        let snapshot = self.snapshot();
        let person = snapshot.config.person(person_id)?;
        let holidays = self.holidays_around(&snapshot, year, year)?;
        let aggregator = Aggregator::new(&snapshot.config, person, &holidays);

        let range = RangeRecords::fetch(
            records,
            person,
            from,
            to,
            aggregator.sick_tracker().lookback_days(),
        )?;
        let days = aggregator.range(from, to, &range, |d| {
            self.scheduled_on(&snapshot, person, d)
        })?;
        let totals = aggregator.month_totals(&days);

        debug!(
            person_id = %person_id,
            year,
            month,
            net = %totals.net,
            duration_us = start_time.elapsed().as_micros() as u64,
            "Month summarised"
        );
        Ok(MonthResult {
            calculation_id: Uuid::new_v4(),
            calculated_at: Utc::now(),
            person_id,
            year,
            month,
            days,
            totals,
        })
    }

    /// Month-by-month totals for a year plus co-working counts.
    ///
    /// Year totals are the sum of the rounded month totals.
    pub fn year_summary(
        &self,
        year: i32,
        person_id: PersonId,
        records: &dyn RecordSource,
    ) -> EngineResult<YearResult> {
        let start_time = Instant::now();
        let (from, _) = month_bounds(year, 1)?;
        let (_, to) = month_bounds(year, 12)?;
        let snapshot = self.snapshot();
        let person = snapshot.config.person(person_id)?;
        let holidays = self.holidays_around(&snapshot, year, year)?;
        let aggregator = Aggregator::new(&snapshot.config, person, &holidays);

        let range = RangeRecords::fetch(
            records,
            person,
            from,
            to,
            aggregator.sick_tracker().lookback_days(),
        )?;
        let days = aggregator.range(from, to, &range, |d| {
            self.scheduled_on(&snapshot, person, d)
        })?;

        let mut months = Vec::with_capacity(12);
        let mut totals = PeriodTotals::default();
        for month in 1..=12 {
            let in_month: Vec<DayResult> = days
                .iter()
                .filter(|d| d.date.month() == month)
                .cloned()
                .collect();
            let month_totals = aggregator.month_totals(&in_month);
            totals.accumulate(&month_totals);
            months.push(MonthLine {
                month,
                totals: month_totals,
            });
        }
        let cowork = self.cowork_with(&snapshot, year, person)?;

        debug!(
            person_id = %person_id,
            year,
            net = %totals.net,
            duration_us = start_time.elapsed().as_micros() as u64,
            "Year summarised"
        );
        Ok(YearResult {
            calculation_id: Uuid::new_v4(),
            calculated_at: Utc::now(),
            person_id,
            year,
            months,
            totals,
            cowork,
        })
    }

    /// Vacation balance for the vacation year starting in `year`.
    ///
    /// Entitlement comes from the earning year before it; the variable part
    /// of the supplement is the OB, on-call and overtime pay of that earning
    /// year, summed from rounded month totals. The balance is always a
    /// projection: nothing is closed or saved.
    pub fn vacation_balance(
        &self,
        year: i32,
        person_id: PersonId,
        records: &dyn RecordSource,
    ) -> EngineResult<VacationBalance> {
        let start_time = Instant::now();
        check_year(year)?;
        check_year(year - 1)?;
        let snapshot = self.snapshot();
        let person = snapshot.config.person(person_id)?;
        let settings = &snapshot.config.settings().vacation;
        let (year_start, year_end) = vacation_year_bounds(year, settings.year_start_month)?;
        let (earning_start, earning_end) = vacation_year_bounds(year - 1, settings.year_start_month)?;

        let is_first_year = person.employment_start.is_some_and(|s| s > earning_start);
        let entitled = entitled_days(
            settings.days_per_year,
            person.employment_start,
            earning_start,
            earning_end,
        );

        let week_based_used = week_based_days_used(person, year_start, year_end);
        let day_level = records
            .absences(person_id, year_start, year_end)
            .iter()
            .filter(|a| a.kind == AbsenceKind::Vacation && !person.is_on_vacation(a.date))
            .count();
        let day_level_used = u32::try_from(day_level)
            .map_err(|_| EngineError::input_range("too many vacation days"))?;
        let used_days = week_based_used + day_level_used;

        let holidays = self.holidays_around(&snapshot, earning_start.year(), earning_end.year())?;
        let aggregator = Aggregator::new(&snapshot.config, person, &holidays);
        let range = RangeRecords::fetch(
            records,
            person,
            earning_start,
            earning_end,
            aggregator.sick_tracker().lookback_days(),
        )?;
        let days = aggregator.range(earning_start, earning_end, &range, |d| {
            self.scheduled_on(&snapshot, person, d)
        })?;
        let variable_total: Decimal = days
            .chunk_by(|a, b| (a.date.year(), a.date.month()) == (b.date.year(), b.date.month()))
            .map(|month| {
                let totals = aggregator.month_totals(month);
                totals.ob_pay + totals.on_call_pay + totals.overtime_pay
            })
            .sum();

        let saved_from_previous = saved_days(person, year, settings.saved_days_valid_years);
        let total_available = entitled + saved_from_previous;
        let remaining_days = i64::from(total_available) - i64::from(used_days);
        let pay = vacation_pay(settings, person.monthly_wage, variable_total, entitled);
        let projection = projection(settings, remaining_days, &pay);

        debug!(
            person_id = %person_id,
            year,
            entitled,
            used_days,
            remaining_days,
            duration_us = start_time.elapsed().as_micros() as u64,
            "Vacation balance calculated"
        );
        Ok(VacationBalance {
            person_id,
            year,
            year_start,
            year_end,
            earning_year_start: earning_start,
            earning_year_end: earning_end,
            is_first_year,
            entitled_days: entitled,
            week_based_used,
            day_level_used,
            used_days,
            saved_from_previous,
            total_available,
            remaining_days,
            pay,
            projection,
        })
    }

    /// Shared work shifts between `person_id` and every other person in
    /// `year`, most shared first.
    pub fn cowork_stats(&self, year: i32, person_id: PersonId) -> EngineResult<Vec<CoworkCount>> {
        check_year(year)?;
        let snapshot = self.snapshot();
        let person = snapshot.config.person(person_id)?;
        self.cowork_with(&snapshot, year, person)
    }

    /// The dates in `year` on which `a` and `b` work the same shift.
    pub fn cowork_details(&self, year: i32, a: PersonId, b: PersonId) -> EngineResult<Vec<CoworkDay>> {
        check_year(year)?;
        let snapshot = self.snapshot();
        let left = self.schedule(&snapshot, snapshot.config.person(a)?, year)?;
        let right = self.schedule(&snapshot, snapshot.config.person(b)?, year)?;
        shared_shifts(&snapshot.config, &left, &right)
    }

    fn cowork_with(&self, snapshot: &Snapshot, year: i32, person: &Person) -> EngineResult<Vec<CoworkCount>> {
        let own = self.schedule(snapshot, person, year)?;
        let mut counts = Vec::new();
        for other in snapshot.config.persons().filter(|p| p.id != person.id) {
            let theirs = self.schedule(snapshot, other, year)?;
            let days = shared_shifts(&snapshot.config, &own, &theirs)?;
            counts.push(count_for(other, &days));
        }
        rank(&mut counts);
        Ok(counts)
    }

    fn holidays(&self, snapshot: &Snapshot, year: i32) -> EngineResult<Arc<Vec<HolidayWindow>>> {
        self.cache
            .holidays(snapshot.version, year, || holiday_windows_for(year))
    }

    /// Windows from `first - 1` through `last + 1`, merged across year ends.
    fn holidays_around(&self, snapshot: &Snapshot, first: i32, last: i32) -> EngineResult<Vec<HolidayWindow>> {
        let mut all = Vec::new();
        for year in (first - 1).max(MIN_YEAR)..=(last + 1).min(MAX_YEAR) {
            all.extend(self.holidays(snapshot, year)?.iter().cloned());
        }
        Ok(merge_same_tier(all))
    }

    fn schedule(&self, snapshot: &Snapshot, person: &Person, year: i32) -> EngineResult<YearSchedule> {
        self.cache.schedule(snapshot.version, person.id, year, || {
            let (from, _) = month_bounds(year, 1)?;
            let (_, to) = month_bounds(year, 12)?;
            debug!(person_id = %person.id, year, "Computing year schedule");
            from.iter_days()
                .take_while(|d| *d <= to)
                .map(|date| scheduled_assignment(&snapshot.config, person, date))
                .collect()
        })
    }

    fn scheduled_on(
        &self,
        snapshot: &Snapshot,
        person: &Person,
        date: NaiveDate,
    ) -> EngineResult<Option<ShiftAssignment>> {
        let schedule = self.schedule(snapshot, person, date.year())?;
        Ok(schedule
            .get(date.ordinal0() as usize)
            .cloned()
            .flatten())
    }
}

fn check_year(year: i32) -> EngineResult<()> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(EngineError::input_range(format!(
            "year {} is outside {}..={}",
            year, MIN_YEAR, MAX_YEAR
        )))
    }
}

/// First and last date of a month.
fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    check_year(year)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::input_range(format!("invalid month {}", month)))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| EngineError::input_range(format!("invalid month {}-{}", year, month)))?;
    Ok((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::*;
    use crate::models::{
        AbsenceRecord, InMemoryRecords, OvertimeRecord, ShiftKind, ShiftSwap,
    };

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn engine() -> Engine {
        Engine::new(config())
    }

    #[test]
    fn test_shift_for_is_deterministic() {
        let engine = engine();
        let date = make_date("2026-03-11");
        let first = engine.shift_for(date, PersonId(1)).unwrap();
        for _ in 0..5 {
            assert_eq!(engine.shift_for(date, PersonId(1)).unwrap(), first);
        }
    }

    #[test]
    fn test_shift_before_rotation_start_is_input_error() {
        let engine = engine();
        let result = engine.shift_for(make_date("2025-12-31"), PersonId(1));
        match result {
            Err(EngineError::InputRange { message }) => {
                assert!(message.contains("rotation start"));
            }
            other => panic!("Expected InputRange error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_person_is_input_error() {
        let engine = engine();
        let result = engine.shift_for(make_date("2026-03-11"), PersonId(99));
        assert!(matches!(result, Err(EngineError::InputRange { .. })));
    }

    #[test]
    fn test_invalid_month_and_year() {
        let engine = engine();
        let records = InMemoryRecords::default();
        assert!(matches!(
            engine.month_summary(2026, 13, PersonId(1), &records),
            Err(EngineError::InputRange { .. })
        ));
        assert!(matches!(
            engine.month_summary(2026, 0, PersonId(1), &records),
            Err(EngineError::InputRange { .. })
        ));
        assert!(matches!(
            engine.holiday_windows_for(1500),
            Err(EngineError::InputRange { .. })
        ));
    }

    #[test]
    fn test_holiday_windows_are_cached_per_version() {
        let engine = engine();
        let first = engine.holiday_windows_for(2026).unwrap();
        let second = engine.holiday_windows_for(2026).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 11);

        let version = engine.reload(config());
        assert_eq!(version, 2);
        assert_eq!(engine.cache().entry_counts(), (0, 0));
        let third = engine.holiday_windows_for(2026).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }

    #[test]
    fn test_in_flight_snapshot_survives_reload() {
        let engine = engine();
        let held = engine.snapshot();
        engine.reload(config_with(vec![person(7, "40000", 3)]));
        assert_eq!(held.version(), 1);
        assert!(held.config().person(PersonId(1)).is_ok());
        assert!(engine.snapshot().config().person(PersonId(1)).is_err());
        assert_eq!(engine.snapshot().version(), 2);
    }

    #[test]
    fn test_old_snapshot_does_not_refill_cache_after_reload() {
        let engine = engine();
        let held = engine.snapshot();
        engine.reload(config());
        assert_eq!(engine.cache().entry_counts(), (0, 0));

        let windows = engine.holidays(&held, 2026).unwrap();
        assert_eq!(windows.len(), 11);
        let schedule = engine
            .schedule(&held, held.config().person(PersonId(1)).unwrap(), 2026)
            .unwrap();
        assert_eq!(schedule.len(), 365);
        assert_eq!(engine.cache().entry_counts(), (0, 0));

        let current = engine.snapshot();
        engine.holidays(&current, 2026).unwrap();
        assert_eq!(engine.cache().entry_counts(), (1, 0));
    }

    #[test]
    fn test_day_breakdown_uses_records() {
        let engine = engine();
        let date = make_date("2026-01-14");
        let records = InMemoryRecords {
            absences: vec![AbsenceRecord {
                person_id: PersonId(1),
                date,
                kind: AbsenceKind::Vab,
                hours: None,
            }],
            ..Default::default()
        };
        let day = engine.day_breakdown(date, PersonId(1), &records).unwrap();
        assert_eq!(day.kind, Some(ShiftKind::Absence));
        assert_eq!(day.absence, Some(AbsenceKind::Vab));
        assert_eq!(day.absence_deduction, dec("1912.5"));
    }

    #[test]
    fn test_month_summary_totals() {
        let engine = engine();
        let result = engine
            .month_summary(2026, 2, PersonId(1), &InMemoryRecords::default())
            .unwrap();
        assert_eq!(result.days.len(), 28);
        assert_eq!(result.totals.wage, dec("36000"));
        assert_eq!(result.totals.absence_deduction, Decimal::ZERO);
        assert_eq!(result.totals.net, result.totals.gross - result.totals.tax);
        // Every weekday of February 2026 is a work shift for person 1.
        assert!(result.totals.work_shifts >= 20);
    }

    #[test]
    fn test_year_totals_are_sum_of_months() {
        let engine = engine();
        let result = engine
            .year_summary(2026, PersonId(1), &InMemoryRecords::default())
            .unwrap();
        assert_eq!(result.months.len(), 12);
        let gross: Decimal = result.months.iter().map(|m| m.totals.gross).sum();
        let tax: Decimal = result.months.iter().map(|m| m.totals.tax).sum();
        assert_eq!(result.totals.gross, gross);
        assert_eq!(result.totals.tax, tax);
        assert_eq!(result.totals.wage, dec("432000"));

        let month = engine
            .month_summary(2026, 6, PersonId(1), &InMemoryRecords::default())
            .unwrap();
        assert_eq!(result.months[5].totals, month.totals);

        assert_eq!(result.cowork.len(), 2);
        assert_eq!(result.cowork[0].person_id, PersonId(3));
        assert_eq!(result.cowork[1].total, 0);
    }

    #[test]
    fn test_cowork_details_match_stats() {
        let engine = engine();
        let stats = engine.cowork_stats(2026, PersonId(1)).unwrap();
        let details = engine.cowork_details(2026, PersonId(1), PersonId(3)).unwrap();
        let count = stats.iter().find(|c| c.person_id == PersonId(3)).unwrap();
        assert_eq!(count.total as usize, details.len());
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2028, 2).unwrap(),
            (make_date("2028-02-01"), make_date("2028-02-29"))
        );
        assert_eq!(
            month_bounds(2026, 12).unwrap(),
            (make_date("2026-12-01"), make_date("2026-12-31"))
        );
    }

    #[test]
    fn test_negative_overtime_hours_are_rejected() {
        let engine = engine();
        let date = make_date("2026-03-11");
        let records = InMemoryRecords {
            overtime: vec![OvertimeRecord {
                person_id: PersonId(1),
                date,
                hours: Some(Decimal::new(-10, 0)),
                start: None,
            }],
            ..Default::default()
        };
        let result = engine.day_breakdown(date, PersonId(1), &records);
        assert!(matches!(result, Err(EngineError::InputRange { .. })));
        let result = engine.month_summary(2026, 3, PersonId(1), &records);
        assert!(matches!(result, Err(EngineError::InputRange { .. })));
    }

    #[test]
    fn test_day_breakdown_applies_swap() {
        let engine = engine();
        let date = make_date("2026-01-07");
        let records = InMemoryRecords {
            swaps: vec![ShiftSwap {
                requester_id: PersonId(2),
                requester_date: make_date("2026-01-14"),
                target_id: PersonId(1),
                target_date: date,
            }],
            ..Default::default()
        };
        let anna = engine.day_breakdown(date, PersonId(1), &records).unwrap();
        assert_eq!(anna.shift_code().unwrap().as_str(), "N3");
        let bo = engine.day_breakdown(date, PersonId(2), &records).unwrap();
        assert_eq!(bo.shift_code().unwrap().as_str(), "N1");
        // The schedule itself is unchanged.
        assert_eq!(engine.shift_for(date, PersonId(1)).unwrap().as_str(), "N1");
    }

    fn vacationer() -> Person {
        let mut anna = person(1, "36000", 1);
        anna.vacation.entry(2026).or_default().extend([28, 29, 30]);
        anna.vacation_saved.insert(2025, 5);
        anna
    }

    /// VAC-002: weeks, single days and saved days make up the balance
    #[test]
    fn test_vacation_balance_for_full_year() {
        let engine = Engine::new(config_with(vec![vacationer(), person(2, "36000", 2)]));
        let vacation_day = |date: &str| AbsenceRecord {
            person_id: PersonId(1),
            date: make_date(date),
            kind: AbsenceKind::Vacation,
            hours: None,
        };
        let records = InMemoryRecords {
            // 7 July is already inside vacation week 28.
            absences: vec![vacation_day("2026-07-07"), vacation_day("2026-08-03")],
            ..Default::default()
        };
        let balance = engine.vacation_balance(2026, PersonId(1), &records).unwrap();

        assert_eq!(balance.year_start, make_date("2026-04-01"));
        assert_eq!(balance.earning_year_end, make_date("2026-03-31"));
        assert!(!balance.is_first_year);
        assert_eq!(balance.entitled_days, 25);
        assert_eq!(balance.week_based_used, 15);
        assert_eq!(balance.day_level_used, 1);
        assert_eq!(balance.used_days, 16);
        assert_eq!(balance.saved_from_previous, 5);
        assert_eq!(balance.total_available, 30);
        assert_eq!(balance.remaining_days, 14);
        assert_eq!(balance.projection.days_to_save, 5);
        assert_eq!(balance.projection.days_to_pay_out, 9);

        // The rotation starts in January, so only January to March earn
        // variable pay.
        let none = InMemoryRecords::default();
        let mut variable = Decimal::ZERO;
        for month in 1..=3 {
            let totals = engine.month_summary(2026, month, PersonId(1), &none).unwrap().totals;
            variable += totals.ob_pay + totals.on_call_pay + totals.overtime_pay;
        }
        assert!(variable > Decimal::ZERO);
        assert_eq!(balance.pay.variable_total, variable);
        assert_eq!(
            balance.pay.supplement_per_day,
            balance.pay.fixed_per_day + balance.pay.variable_per_day
        );
    }

    #[test]
    fn test_vacation_balance_first_year_is_pro_rated() {
        let mut anna = person(1, "36000", 1);
        anna.employment_start = Some(make_date("2025-10-01"));
        let engine = Engine::new(config_with(vec![anna]));
        let balance = engine
            .vacation_balance(2026, PersonId(1), &InMemoryRecords::default())
            .unwrap();
        assert!(balance.is_first_year);
        assert_eq!(balance.entitled_days, 13);
        assert_eq!(balance.remaining_days, 13);
    }

    #[test]
    fn test_vacation_balance_needs_an_earning_year() {
        let engine = engine();
        let result = engine.vacation_balance(MIN_YEAR, PersonId(1), &InMemoryRecords::default());
        assert!(matches!(result, Err(EngineError::InputRange { .. })));
    }
}
