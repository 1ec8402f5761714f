//! Co-working statistics: how often two people work the same shift.
//!
//! Only the rotation and vacation weeks count; absence records are ignored.

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{CoworkCount, CoworkDay, Person, ShiftAssignment, ShiftKind};

/// Days where both schedules carry the same work shift.
///
/// The slices are parallel: index `i` of each is the same date.
pub fn shared_shifts(
    config: &EngineConfig,
    a: &[Option<ShiftAssignment>],
    b: &[Option<ShiftAssignment>],
) -> EngineResult<Vec<CoworkDay>> {
    let mut days = Vec::new();
    for (left, right) in a.iter().zip(b) {
        let (Some(left), Some(right)) = (left, right) else {
            continue;
        };
        if left.code != right.code {
            continue;
        }
        if config.shift_type(&left.code)?.kind == ShiftKind::Work {
            days.push(CoworkDay {
                date: left.date,
                code: left.code.clone(),
            });
        }
    }
    Ok(days)
}

/// Summarises shared shifts with `other`.
pub fn count_for(other: &Person, days: &[CoworkDay]) -> CoworkCount {
    let mut by_code = BTreeMap::new();
    for day in days {
        *by_code.entry(day.code.to_string()).or_insert(0) += 1;
    }
    CoworkCount {
        person_id: other.id,
        name: other.name.clone(),
        total: days.len() as u32,
        by_code,
    }
}

/// Sorts counts with the most shared shifts first, then by id.
pub fn rank(counts: &mut [CoworkCount]) {
    counts.sort_by(|a, b| b.total.cmp(&a.total).then(a.person_id.cmp(&b.person_id)));
}
