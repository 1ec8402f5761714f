//! Calculation logic for the OB engine.
//!
//! This module contains the interval arithmetic and the priority overlay that
//! every pay figure is built on, the Swedish holiday calendar, the rotation
//! resolver with swaps, rate pricing, sick-period deductions, tax, vacation
//! balances, and the day/month aggregation that composes them.

mod absence;
mod aggregate;
mod cowork;
mod holidays;
mod interval;
mod overlay;
mod pay;
mod rotation;
mod tax;
mod vacation;
mod windows;

pub use absence::{SickDay, SickPeriodTracker, deduction, deduction_percent};
pub use aggregate::{Aggregator, DayRecords, RangeRecords};
pub use cowork::{count_for, rank, shared_shifts};
pub use holidays::{
    HolidayRule, SWEDISH_HOLIDAYS, all_saints_day, easter_sunday, first_weekday_after,
    holiday_windows_for, merge_same_tier, midsummer_eve, windows_from_rules,
};
pub use interval::{Interval, IntervalSet, datetime_of, minute_of, minute_of_datetime};
pub use overlay::{Covered, RateWindow, WindowBuilder, resolve};
pub use pay::{WageBasis, per_hour, price_hours, price_segments};
pub use rotation::{
    OFF_CODE, VACATION_CODE, assignment_for, rotation_code, rotation_week, scheduled_assignment,
    with_absence, with_swap,
};
pub use tax::tax_for;
pub use vacation::{
    entitled_days, projection, saved_days, vacation_pay, vacation_year_bounds,
    week_based_days_used,
};
pub use windows::{ob_windows, on_call_span, on_call_windows};
