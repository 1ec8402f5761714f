//! Core data models for the OB engine.
//!
//! This module contains all the domain models used throughout the engine.

mod holiday;
mod person;
mod principal;
mod records;
mod results;
mod rotation;
mod rules;
mod shift;

pub use holiday::{HolidayTier, HolidayWindow};
pub use person::{Person, PersonId};
pub use principal::{Principal, Role};
pub use records::{
    AbsenceKind, AbsenceRecord, InMemoryRecords, OnCallRecord, OvertimeRecord, RecordSource,
    ShiftSwap,
};
pub use results::{
    CoworkCount, CoworkDay, DayResult, MonthLine, MonthResult, PaySegment, PeriodTotals,
    VacationBalance, VacationPay, VacationProjection, YearResult, round_money,
};
pub use rotation::{AssignmentSource, ROTATION_WEEKS, RotationPattern, RotationWeek, ShiftAssignment};
pub use rules::{ObRule, ObTier, PayRate, TaxBracket};
pub use shift::{ClockTime, MINUTES_PER_DAY, ShiftCode, ShiftKind, ShiftType};
