//! Request types for the OB engine API.
//!
//! Records are loaded by the caller and sent with each request; the person
//! id comes from the path, so record entries carry only their date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    AbsenceKind, AbsenceRecord, ClockTime, InMemoryRecords, OnCallRecord, OvertimeRecord,
    PersonId, ShiftSwap,
};

/// An absence in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsenceRequest {
    /// The day of absence.
    pub date: NaiveDate,
    /// What kind of absence.
    pub kind: AbsenceKind,
    /// Hours absent; defaults to the scheduled shift.
    #[serde(default)]
    pub hours: Option<Decimal>,
}

/// Overtime in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvertimeRequest {
    /// The day the overtime was worked.
    pub date: NaiveDate,
    /// Hours worked; defaults to the configured overtime length.
    #[serde(default)]
    pub hours: Option<Decimal>,
    /// Start time, informational.
    #[serde(default)]
    pub start: Option<ClockTime>,
}

/// An on-call period in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnCallRequest {
    /// The day the on-call period starts.
    pub date: NaiveDate,
    /// Length in hours; defaults to the configured on-call length.
    #[serde(default)]
    pub hours: Option<Decimal>,
}

/// An accepted shift swap in a request, seen from the path person's side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    /// The path person's shift date that is handed over.
    pub date: NaiveDate,
    /// The colleague taking part in the swap.
    pub with: PersonId,
    /// The colleague's shift date that is taken in return.
    pub with_date: NaiveDate,
}

/// Records accompanying a calculation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordsRequest {
    /// Absences.
    #[serde(default)]
    pub absences: Vec<AbsenceRequest>,
    /// Overtime.
    #[serde(default)]
    pub overtime: Vec<OvertimeRequest>,
    /// On-call periods.
    #[serde(default)]
    pub on_call: Vec<OnCallRequest>,
    /// Accepted shift swaps.
    #[serde(default)]
    pub swaps: Vec<SwapRequest>,
}

impl RecordsRequest {
    /// Attaches `person_id` to every record.
    pub fn into_records(self, person_id: PersonId) -> InMemoryRecords {
        InMemoryRecords {
            absences: self
                .absences
                .into_iter()
                .map(|r| AbsenceRecord {
                    person_id,
                    date: r.date,
                    kind: r.kind,
                    hours: r.hours,
                })
                .collect(),
            overtime: self
                .overtime
                .into_iter()
                .map(|r| OvertimeRecord {
                    person_id,
                    date: r.date,
                    hours: r.hours,
                    start: r.start,
                })
                .collect(),
            on_call: self
                .on_call
                .into_iter()
                .map(|r| OnCallRecord {
                    person_id,
                    date: r.date,
                    hours: r.hours,
                })
                .collect(),
            swaps: self
                .swaps
                .into_iter()
                .map(|r| ShiftSwap {
                    requester_id: person_id,
                    requester_date: r.date,
                    target_id: r.with,
                    target_date: r.with_date,
                })
                .collect(),
        }
    }
}

/// Request body for `POST /persons/:id/day`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRequest {
    /// The day to price.
    pub date: NaiveDate,
    /// Records for the day (and the days before it, for sick periods).
    #[serde(default)]
    pub records: RecordsRequest,
}

/// Request body for `POST /persons/:id/month`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRequest {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// Records for the month.
    #[serde(default)]
    pub records: RecordsRequest,
}

/// Request body for `POST /persons/:id/year` and `POST /persons/:id/vacation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearRequest {
    /// Calendar year.
    pub year: i32,
    /// Records for the year.
    #[serde(default)]
    pub records: RecordsRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordSource;

    #[test]
    fn test_deserialize_month_request() {
        let json = r#"{
            "year": 2026,
            "month": 3,
            "records": {
                "absences": [
                    { "date": "2026-03-02", "kind": "sick" },
                    { "date": "2026-03-03", "kind": "vab", "hours": "4" }
                ],
                "overtime": [
                    { "date": "2026-03-05", "hours": "2.5", "start": "15:00" }
                ]
            }
        }"#;

        let request: MonthRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.month, 3);
        assert_eq!(request.records.absences.len(), 2);
        assert_eq!(request.records.absences[0].kind, AbsenceKind::Sick);
        assert!(request.records.on_call.is_empty());
    }

    #[test]
    fn test_records_default_to_empty() {
        let request: YearRequest = serde_json::from_str(r#"{ "year": 2026 }"#).unwrap();
        assert!(request.records.absences.is_empty());
    }

    #[test]
    fn test_records_take_person_from_path() {
        let request: DayRequest = serde_json::from_str(
            r#"{ "date": "2026-03-02", "records": { "on_call": [ { "date": "2026-03-02" } ] } }"#,
        )
        .unwrap();
        let date = request.date;
        let records = request.records.into_records(PersonId(4));
        assert_eq!(records.on_call(PersonId(4), date, date).len(), 1);
        assert!(records.on_call(PersonId(1), date, date).is_empty());
    }

    #[test]
    fn test_swap_request_names_path_person_as_requester() {
        let request: DayRequest = serde_json::from_str(
            r#"{
                "date": "2026-03-04",
                "records": {
                    "swaps": [ { "date": "2026-03-04", "with": 2, "with_date": "2026-03-11" } ]
                }
            }"#,
        )
        .unwrap();
        let records = request.records.into_records(PersonId(1));
        let swaps = records.swaps(PersonId(2), request.date, request.date);
        assert_eq!(swaps.len(), 1);
        assert_eq!(swaps[0].requester_id, PersonId(1));
        assert_eq!(swaps[0].counterpart(PersonId(1)), Some(PersonId(2)));
    }
}
