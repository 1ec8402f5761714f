//! Per-request records supplied by the storage collaborator.
//!
//! The engine never loads records itself. Callers hand over absences,
//! overtime, on-call records and accepted shift swaps through a
//! [`RecordSource`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ClockTime, PersonId, ShiftCode};

/// Kind of absence recorded for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceKind {
    /// Sick leave.
    Sick,
    /// Care of a sick child ("VAB").
    Vab,
    /// Unpaid leave.
    Leave,
    /// A single vacation day outside the vacation weeks.
    Vacation,
    /// A day off swapped in.
    Off,
}

impl AbsenceKind {
    /// The shift code that replaces the rotation shift on an absence day.
    pub fn shift_code(self) -> ShiftCode {
        ShiftCode::from(match self {
            AbsenceKind::Sick => "SICK",
            AbsenceKind::Vab => "VAB",
            AbsenceKind::Leave => "LEAVE",
            AbsenceKind::Vacation => "SEM",
            AbsenceKind::Off => "OFF",
        })
    }

    /// All kinds, for validating that every replacement code is configured.
    pub fn all() -> [AbsenceKind; 5] {
        [
            AbsenceKind::Sick,
            AbsenceKind::Vab,
            AbsenceKind::Leave,
            AbsenceKind::Vacation,
            AbsenceKind::Off,
        ]
    }
}

/// An absence for one person on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    /// Who was absent.
    pub person_id: PersonId,
    /// The date of absence.
    pub date: NaiveDate,
    /// Kind of absence.
    pub kind: AbsenceKind,
    /// Explicit absent hours; defaults to the scheduled shift length.
    #[serde(default)]
    pub hours: Option<Decimal>,
}

/// Overtime worked on a date, paid on top of the rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeRecord {
    /// Who worked overtime.
    pub person_id: PersonId,
    /// The date of the overtime.
    pub date: NaiveDate,
    /// Hours worked; defaults to the configured overtime shift length.
    #[serde(default)]
    pub hours: Option<Decimal>,
    /// Start time, kept for presentation.
    #[serde(default)]
    pub start: Option<ClockTime>,
}

/// An on-call assignment starting at 00:00 on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnCallRecord {
    /// Who was on call.
    pub person_id: PersonId,
    /// The date the on-call period starts.
    pub date: NaiveDate,
    /// Length of the on-call period; defaults to the configured length.
    #[serde(default)]
    pub hours: Option<Decimal>,
}

/// An accepted shift swap between two persons.
///
/// On each of the two dates both persons work the shift the rotation gives
/// the other one. Both dates may be the same day.
///
/// # Example
///
/// ```
/// use ob_engine::models::{PersonId, ShiftSwap};
/// use chrono::NaiveDate;
///
/// let swap = ShiftSwap {
///     requester_id: PersonId(1),
///     requester_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
///     target_id: PersonId(3),
///     target_date: NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
/// };
/// assert_eq!(swap.counterpart(PersonId(3)), Some(PersonId(1)));
/// assert_eq!(swap.counterpart(PersonId(2)), None);
/// assert_eq!(swap.dates().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSwap {
    /// Who asked for the swap.
    pub requester_id: PersonId,
    /// The requester's date given away.
    pub requester_date: NaiveDate,
    /// Who accepted it.
    pub target_id: PersonId,
    /// The target's date given away.
    pub target_date: NaiveDate,
}

impl ShiftSwap {
    /// The other person of the swap, or `None` if `person` is not part of it.
    pub fn counterpart(&self, person: PersonId) -> Option<PersonId> {
        if person == self.requester_id {
            Some(self.target_id)
        } else if person == self.target_id {
            Some(self.requester_id)
        } else {
            None
        }
    }

    /// The swapped dates, each once.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let second = (self.target_date != self.requester_date).then_some(self.target_date);
        std::iter::once(self.requester_date).chain(second)
    }

    /// Returns true if the swap changes `person`'s shift on `date`.
    pub fn applies_to(&self, person: PersonId, date: NaiveDate) -> bool {
        self.counterpart(person).is_some() && self.dates().any(|d| d == date)
    }
}

/// Source of per-person records over an inclusive date range.
pub trait RecordSource {
    /// Absences for `person` with `from <= date <= to`.
    fn absences(&self, person: PersonId, from: NaiveDate, to: NaiveDate) -> Vec<AbsenceRecord>;

    /// Overtime for `person` with `from <= date <= to`.
    fn overtime(&self, person: PersonId, from: NaiveDate, to: NaiveDate) -> Vec<OvertimeRecord>;

    /// On-call records for `person` with `from <= date <= to`.
    fn on_call(&self, person: PersonId, from: NaiveDate, to: NaiveDate) -> Vec<OnCallRecord>;

    /// Accepted swaps involving `person` with either date in `from..=to`.
    fn swaps(&self, person: PersonId, from: NaiveDate, to: NaiveDate) -> Vec<ShiftSwap>;
}

/// A [`RecordSource`] backed by plain vectors.
///
/// # Example
///
/// ```
/// use ob_engine::models::{AbsenceKind, AbsenceRecord, InMemoryRecords, PersonId, RecordSource};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
/// let records = InMemoryRecords {
///     absences: vec![AbsenceRecord {
///         person_id: PersonId(1),
///         date,
///         kind: AbsenceKind::Sick,
///         hours: None,
///     }],
///     ..Default::default()
/// };
/// assert_eq!(records.absences(PersonId(1), date, date).len(), 1);
/// assert!(records.absences(PersonId(2), date, date).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryRecords {
    /// Absence records.
    #[serde(default)]
    pub absences: Vec<AbsenceRecord>,
    /// Overtime records.
    #[serde(default)]
    pub overtime: Vec<OvertimeRecord>,
    /// On-call records.
    #[serde(default)]
    pub on_call: Vec<OnCallRecord>,
    /// Accepted shift swaps.
    #[serde(default)]
    pub swaps: Vec<ShiftSwap>,
}

fn in_range(date: NaiveDate, from: NaiveDate, to: NaiveDate) -> bool {
    from <= date && date <= to
}

impl RecordSource for InMemoryRecords {
    fn absences(&self, person: PersonId, from: NaiveDate, to: NaiveDate) -> Vec<AbsenceRecord> {
        self.absences
            .iter()
            .filter(|r| r.person_id == person && in_range(r.date, from, to))
            .cloned()
            .collect()
    }

    fn overtime(&self, person: PersonId, from: NaiveDate, to: NaiveDate) -> Vec<OvertimeRecord> {
        self.overtime
            .iter()
            .filter(|r| r.person_id == person && in_range(r.date, from, to))
            .cloned()
            .collect()
    }

    fn on_call(&self, person: PersonId, from: NaiveDate, to: NaiveDate) -> Vec<OnCallRecord> {
        self.on_call
            .iter()
            .filter(|r| r.person_id == person && in_range(r.date, from, to))
            .cloned()
            .collect()
    }

    fn swaps(&self, person: PersonId, from: NaiveDate, to: NaiveDate) -> Vec<ShiftSwap> {
        self.swaps
            .iter()
            .filter(|s| s.counterpart(person).is_some() && s.dates().any(|d| in_range(d, from, to)))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_absence_kind_shift_codes() {
        assert_eq!(AbsenceKind::Sick.shift_code().as_str(), "SICK");
        assert_eq!(AbsenceKind::Vacation.shift_code().as_str(), "SEM");
        assert_eq!(AbsenceKind::all().len(), 5);
    }

    #[test]
    fn test_range_filter_is_inclusive() {
        let records = InMemoryRecords {
            overtime: vec![
                OvertimeRecord {
                    person_id: PersonId(1),
                    date: make_date("2026-03-01"),
                    hours: None,
                    start: None,
                },
                OvertimeRecord {
                    person_id: PersonId(1),
                    date: make_date("2026-03-31"),
                    hours: Some(Decimal::new(4, 0)),
                    start: Some(ClockTime::at(14, 0)),
                },
                OvertimeRecord {
                    person_id: PersonId(1),
                    date: make_date("2026-04-01"),
                    hours: None,
                    start: None,
                },
            ],
            ..Default::default()
        };
        let found = records.overtime(PersonId(1), make_date("2026-03-01"), make_date("2026-03-31"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_records_deserialize_from_json() {
        let json = r#"{
            "absences": [{"person_id": 2, "date": "2026-02-03", "kind": "vab"}],
            "on_call": [{"person_id": 2, "date": "2026-02-07", "hours": "12"}]
        }"#;
        let records: InMemoryRecords = serde_json::from_str(json).unwrap();
        assert_eq!(records.absences[0].kind, AbsenceKind::Vab);
        assert_eq!(records.on_call[0].hours, Some(Decimal::new(12, 0)));
        assert!(records.overtime.is_empty());
        assert!(records.swaps.is_empty());
    }

    #[test]
    fn test_swaps_found_for_both_persons() {
        let swap = ShiftSwap {
            requester_id: PersonId(1),
            requester_date: make_date("2026-03-04"),
            target_id: PersonId(3),
            target_date: make_date("2026-04-15"),
        };
        let records = InMemoryRecords {
            swaps: vec![swap.clone()],
            ..Default::default()
        };
        let march = (make_date("2026-03-01"), make_date("2026-03-31"));
        assert_eq!(records.swaps(PersonId(1), march.0, march.1), vec![swap.clone()]);
        assert_eq!(records.swaps(PersonId(3), march.0, march.1).len(), 1);
        assert!(records.swaps(PersonId(2), march.0, march.1).is_empty());
        // Only the target date falls in April.
        let april = records.swaps(PersonId(3), make_date("2026-04-01"), make_date("2026-04-30"));
        assert_eq!(april.len(), 1);
        assert!(swap.applies_to(PersonId(1), make_date("2026-04-15")));
        assert!(!swap.applies_to(PersonId(1), make_date("2026-04-16")));
    }

    #[test]
    fn test_same_day_swap_has_one_date() {
        let date = make_date("2026-03-04");
        let swap = ShiftSwap {
            requester_id: PersonId(1),
            requester_date: date,
            target_id: PersonId(2),
            target_date: date,
        };
        assert_eq!(swap.dates().collect::<Vec<_>>(), vec![date]);
    }
}
