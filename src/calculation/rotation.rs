//! Rotation resolver: which shift a person has on a date.
//!
//! The rotation week advances once per ISO week, counted from the Monday of
//! the rotation start date's week. Precedence, lowest first: rotation,
//! vacation week (`SEM`), accepted shift swap, absence record.

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AbsenceRecord, AssignmentSource, Person, RotationWeek, ShiftAssignment, ShiftCode, ShiftSwap,
};

/// Shift code used for vacation weeks.
pub const VACATION_CODE: &str = "SEM";

/// Shift code a swap hands over when the counterpart has no rotation shift.
pub const OFF_CODE: &str = "OFF";

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The rotation week `person` is on at `date`, or `None` before `start`.
///
/// # Example
///
/// ```
/// use ob_engine::calculation::rotation_week;
/// use ob_engine::models::RotationWeek;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(); // a Wednesday
/// let offset = RotationWeek::new(3).unwrap();
///
/// // Same ISO week as the start: the person's own offset week.
/// let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// assert_eq!(rotation_week(start, offset, start), Some(offset));
/// // Ten weeks later the cycle is back at week 3.
/// let later = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
/// assert_eq!(rotation_week(start, offset, later), Some(offset));
/// // The Monday before a Wednesday start is still before the rotation.
/// assert_eq!(rotation_week(start, offset, monday), None);
/// ```
pub fn rotation_week(start: NaiveDate, offset: RotationWeek, date: NaiveDate) -> Option<RotationWeek> {
    if date < start {
        return None;
    }
    let weeks_since = (monday_of(date) - monday_of(start)).num_days() / 7;
    Some(RotationWeek::from_position(
        weeks_since + i64::from(offset.get()) - 1,
    ))
}

/// The scheduled assignment: rotation code, replaced by `SEM` in vacation weeks.
///
/// Returns `None` for dates before the rotation start.
pub fn scheduled_assignment(
    config: &EngineConfig,
    person: &Person,
    date: NaiveDate,
) -> EngineResult<Option<ShiftAssignment>> {
    let start = config.settings().rotation_start_date;
    let Some(week) = rotation_week(start, person.cycle_offset, date) else {
        return Ok(None);
    };
    let weekday = date.weekday().num_days_from_monday() as usize;

    let (code, source) = if person.is_on_vacation(date) {
        (ShiftCode::from(VACATION_CODE), AssignmentSource::Vacation)
    } else {
        (
            config.rotation().code(week, weekday).clone(),
            AssignmentSource::Rotation,
        )
    };
    // Codes are validated at load; a miss here means the snapshot is broken.
    config.shift_type(&code)?;

    Ok(Some(ShiftAssignment {
        date,
        week,
        code,
        source,
    }))
}

/// The plain rotation code of `person` on `date`, ignoring vacation.
pub fn rotation_code(config: &EngineConfig, person: &Person, date: NaiveDate) -> Option<ShiftCode> {
    let week = rotation_week(config.settings().rotation_start_date, person.cycle_offset, date)?;
    let weekday = date.weekday().num_days_from_monday() as usize;
    Some(config.rotation().code(week, weekday).clone())
}

/// Replaces a scheduled assignment with the counterpart's rotation shift
/// when an accepted swap covers its date.
///
/// The counterpart's rotation code is used as is; their own vacation or
/// absences do not travel with the swap. A counterpart without a rotation
/// shift that day hands over `OFF`.
pub fn with_swap(
    config: &EngineConfig,
    person: &Person,
    mut assignment: ShiftAssignment,
    swap: Option<&ShiftSwap>,
) -> EngineResult<ShiftAssignment> {
    let Some(swap) = swap else {
        return Ok(assignment);
    };
    if !swap.applies_to(person.id, assignment.date) {
        return Err(EngineError::input_range(format!(
            "swap between persons {} and {} does not cover person {} on {}",
            swap.requester_id, swap.target_id, person.id, assignment.date
        )));
    }
    let counterpart = swap
        .counterpart(person.id)
        .map(|id| config.person(id))
        .transpose()?
        .ok_or_else(|| EngineError::input_range("swap without a counterpart"))?;
    let code = rotation_code(config, counterpart, assignment.date)
        .unwrap_or_else(|| ShiftCode::from(OFF_CODE));
    config.shift_type(&code)?;
    assignment.code = code;
    assignment.source = AssignmentSource::Swap;
    Ok(assignment)
}

/// The final assignment with an optional absence override applied.
pub fn assignment_for(
    config: &EngineConfig,
    person: &Person,
    date: NaiveDate,
    absence: Option<&AbsenceRecord>,
) -> EngineResult<Option<ShiftAssignment>> {
    scheduled_assignment(config, person, date)?
        .map(|scheduled| with_absence(config, person, scheduled, absence))
        .transpose()
}

/// Replaces a scheduled assignment's code with the absence's code.
pub fn with_absence(
    config: &EngineConfig,
    person: &Person,
    mut assignment: ShiftAssignment,
    absence: Option<&AbsenceRecord>,
) -> EngineResult<ShiftAssignment> {
    let Some(absence) = absence else {
        return Ok(assignment);
    };
    if absence.person_id != person.id || absence.date != assignment.date {
        return Err(EngineError::input_range(format!(
            "absence for person {} on {} applied to person {} on {}",
            absence.person_id, absence.date, person.id, assignment.date
        )));
    }
    assignment.code = absence.kind.shift_code();
    assignment.source = AssignmentSource::Absence;
    config.shift_type(&assignment.code)?;
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::*;
    use crate::models::{AbsenceKind, PersonId};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn code_on(config: &EngineConfig, person: &Person, date: &str) -> Option<String> {
        scheduled_assignment(config, person, make_date(date))
            .unwrap()
            .map(|a| a.code.to_string())
    }

    /// ROT-001: offset week 1 works week 1 in the start week
    #[test]
    fn test_start_week_uses_offset() {
        let config = config();
        let person = person(1, "36000", 1);
        // 2026-01-05 Monday, 2026-01-10 Saturday
        assert_eq!(code_on(&config, &person, "2026-01-05").as_deref(), Some("N1"));
        assert_eq!(code_on(&config, &person, "2026-01-10").as_deref(), Some("N2"));
        // Next week is rotation week 2
        assert_eq!(code_on(&config, &person, "2026-01-12").as_deref(), Some("N3"));
        assert_eq!(code_on(&config, &person, "2026-01-17").as_deref(), Some("OC"));
    }

    /// ROT-002: the cycle repeats every ten weeks
    #[test]
    fn test_cycle_wraps_after_ten_weeks() {
        let config = config();
        let person = person(1, "36000", 1);
        let start = make_date("2026-01-05");
        for week in 0..30 {
            let date = start + Duration::weeks(week);
            let expected = RotationWeek::from_position(week);
            let assignment = scheduled_assignment(&config, &person, date).unwrap().unwrap();
            assert_eq!(assignment.week, expected);
        }
    }

    #[test]
    fn test_offset_shifts_week() {
        let config = config();
        let person = person(2, "36000", 2);
        let assignment = scheduled_assignment(&config, &person, make_date("2026-01-05"))
            .unwrap()
            .unwrap();
        assert_eq!(assignment.week.get(), 2);
        assert_eq!(assignment.code.as_str(), "N3");
    }

    #[test]
    fn test_offset_ten_wraps_to_one() {
        let start = make_date("2026-01-05");
        let offset = RotationWeek::new(10).unwrap();
        assert_eq!(rotation_week(start, offset, start).unwrap().get(), 10);
        assert_eq!(
            rotation_week(start, offset, make_date("2026-01-12")).unwrap().get(),
            1
        );
    }

    #[test]
    fn test_before_rotation_start_is_unscheduled() {
        let config = config();
        let person = person(1, "36000", 1);
        assert_eq!(code_on(&config, &person, "2026-01-04"), None);
    }

    #[test]
    fn test_vacation_week_overrides_rotation() {
        let config = config();
        let mut person = person(1, "36000", 1);
        person.vacation.entry(2026).or_default().insert(3);
        // ISO week 3 of 2026 is 2026-01-12..2026-01-18
        let assignment = scheduled_assignment(&config, &person, make_date("2026-01-14"))
            .unwrap()
            .unwrap();
        assert_eq!(assignment.code.as_str(), "SEM");
        assert_eq!(assignment.source, AssignmentSource::Vacation);
    }

    #[test]
    fn test_absence_overrides_vacation() {
        let config = config();
        let mut person = person(1, "36000", 1);
        person.vacation.entry(2026).or_default().insert(3);
        let absence = AbsenceRecord {
            person_id: PersonId(1),
            date: make_date("2026-01-14"),
            kind: AbsenceKind::Sick,
            hours: None,
        };
        let assignment = assignment_for(&config, &person, absence.date, Some(&absence))
            .unwrap()
            .unwrap();
        assert_eq!(assignment.code.as_str(), "SICK");
        assert_eq!(assignment.source, AssignmentSource::Absence);
    }

    #[test]
    fn test_mismatched_absence_is_rejected() {
        let config = config();
        let person = person(1, "36000", 1);
        let absence = AbsenceRecord {
            person_id: PersonId(2),
            date: make_date("2026-01-14"),
            kind: AbsenceKind::Vab,
            hours: None,
        };
        let result = assignment_for(&config, &person, absence.date, Some(&absence));
        assert!(matches!(result, Err(EngineError::InputRange { .. })));
    }

    fn swap(requester: u32, requester_date: &str, target: u32, target_date: &str) -> ShiftSwap {
        ShiftSwap {
            requester_id: PersonId(requester),
            requester_date: make_date(requester_date),
            target_id: PersonId(target),
            target_date: make_date(target_date),
        }
    }

    /// SWAP-001: both persons take the other's rotation shift on both dates
    #[test]
    fn test_swap_exchanges_rotation_shifts() {
        let config = config();
        let anna = config.person(PersonId(1)).unwrap();
        let bo = config.person(PersonId(2)).unwrap();
        // 2026-01-07: person 1 week 1 (N1), person 2 week 2 (N3).
        // 2026-01-14: person 1 week 2 (N3), person 2 week 3 (N1).
        let swap = swap(1, "2026-01-07", 2, "2026-01-14");

        let on = |person: &Person, date: &str| {
            let scheduled = scheduled_assignment(&config, person, make_date(date))
                .unwrap()
                .unwrap();
            with_swap(&config, person, scheduled, Some(&swap)).unwrap()
        };
        assert_eq!(on(anna, "2026-01-07").code.as_str(), "N3");
        assert_eq!(on(bo, "2026-01-07").code.as_str(), "N1");
        assert_eq!(on(anna, "2026-01-14").code.as_str(), "N1");
        assert_eq!(on(bo, "2026-01-14").code.as_str(), "N3");
        assert_eq!(on(anna, "2026-01-07").source, AssignmentSource::Swap);
        // The rotation week stays the person's own.
        assert_eq!(on(anna, "2026-01-07").week.get(), 1);
    }

    #[test]
    fn test_swap_replaces_vacation_week() {
        let mut anna = person(1, "36000", 1);
        anna.vacation.entry(2026).or_default().insert(2);
        let config = config_with(vec![anna.clone(), person(2, "36000", 2)]);
        let scheduled = scheduled_assignment(&config, &anna, make_date("2026-01-07"))
            .unwrap()
            .unwrap();
        assert_eq!(scheduled.code.as_str(), "SEM");
        let swapped = with_swap(
            &config,
            &anna,
            scheduled,
            Some(&swap(1, "2026-01-07", 2, "2026-01-07")),
        )
        .unwrap();
        assert_eq!(swapped.code.as_str(), "N3");
    }

    #[test]
    fn test_swap_not_covering_date_is_rejected() {
        let config = config();
        let anna = config.person(PersonId(1)).unwrap();
        let scheduled = scheduled_assignment(&config, anna, make_date("2026-01-08"))
            .unwrap()
            .unwrap();
        let result = with_swap(
            &config,
            anna,
            scheduled,
            Some(&swap(1, "2026-01-07", 2, "2026-01-14")),
        );
        assert!(matches!(result, Err(EngineError::InputRange { .. })));
    }

    #[test]
    fn test_swap_with_unknown_person_is_rejected() {
        let config = config();
        let anna = config.person(PersonId(1)).unwrap();
        let scheduled = scheduled_assignment(&config, anna, make_date("2026-01-07"))
            .unwrap()
            .unwrap();
        let result = with_swap(
            &config,
            anna,
            scheduled,
            Some(&swap(1, "2026-01-07", 42, "2026-01-07")),
        );
        assert!(matches!(result, Err(EngineError::InputRange { .. })));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let config = config();
        let person = person(3, "36000", 1);
        let date = make_date("2026-05-20");
        let first = scheduled_assignment(&config, &person, date).unwrap();
        for _ in 0..10 {
            assert_eq!(scheduled_assignment(&config, &person, date).unwrap(), first);
        }
    }
}
