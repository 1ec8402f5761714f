//! Priority overlay of rate windows onto a shift span.
//!
//! The overlay partitions a span into chronological, non-overlapping
//! segments. Each minute is tagged with the highest-priority window covering
//! it, or left untagged, so no minute is ever paid twice.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::PayRate;

use super::interval::{Interval, IntervalSet, datetime_of};

/// Every minute a single rule or holiday is active, with its pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateWindow {
    /// Tier code reported in breakdowns (e.g. "OB1").
    pub code: String,
    /// Rule label or holiday name.
    pub label: String,
    /// Priority, higher wins.
    pub priority: u8,
    /// Rate for covered minutes.
    pub rate: PayRate,
    /// Active minutes.
    pub windows: IntervalSet,
}

impl RateWindow {
    fn same_source(&self, code: &str, label: &str, priority: u8, rate: &PayRate) -> bool {
        self.code == code && self.label == label && self.priority == priority && &self.rate == rate
    }

    fn name(&self, other: &RateWindow) -> String {
        if self.code == other.code {
            self.label.clone()
        } else {
            self.code.clone()
        }
    }
}

/// Collects rate windows, merging repeated activations of the same rule.
///
/// A rule spanning midnight contributes one interval per applicable date;
/// those all land in the same [`RateWindow`].
#[derive(Debug, Default)]
pub struct WindowBuilder {
    windows: Vec<RateWindow>,
}

impl WindowBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an active interval for a rule.
    pub fn add(&mut self, code: &str, label: &str, priority: u8, rate: PayRate, interval: Interval) {
        match self
            .windows
            .iter_mut()
            .find(|w| w.same_source(code, label, priority, &rate))
        {
            Some(window) => window.windows.insert(interval),
            None => self.windows.push(RateWindow {
                code: code.to_string(),
                label: label.to_string(),
                priority,
                rate,
                windows: IntervalSet::from(interval),
            }),
        }
    }

    /// Finishes building.
    pub fn build(self) -> Vec<RateWindow> {
        self.windows
    }
}

/// A piece of the resolved span. `window` indexes the slice given to [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Covered {
    /// The minutes of this piece.
    pub interval: Interval,
    /// Index of the winning window, `None` for untagged time.
    pub window: Option<usize>,
}

impl Covered {
    /// Length in hours.
    pub fn hours(&self) -> Decimal {
        self.interval.hours()
    }
}

/// Resolves `span` against `windows`.
///
/// Windows are applied in descending priority. Each one claims whatever
/// part of its active minutes is still uncovered; the rest of the span is
/// emitted untagged. The result covers `span` exactly, in chronological
/// order, with adjacent pieces of the same window merged.
///
/// Two windows of equal priority that are both active on some minute of
/// the span make the result ambiguous and yield
/// [`EngineError::OverlapAmbiguity`].
///
/// # Example
///
/// ```
/// use ob_engine::calculation::{Interval, WindowBuilder, resolve};
/// use ob_engine::models::PayRate;
/// use rust_decimal::Decimal;
///
/// let shift = Interval::new(14 * 60, 22 * 60).unwrap();
/// let mut builder = WindowBuilder::new();
/// builder.add(
///     "OB1",
///     "Evening",
///     1,
///     PayRate::Divisor { divisor: Decimal::new(600, 0) },
///     Interval::new(18 * 60, 24 * 60).unwrap(),
/// );
/// let windows = builder.build();
///
/// let pieces = resolve(shift, &windows).unwrap();
/// assert_eq!(pieces.len(), 2);
/// assert_eq!(pieces[0].window, None);
/// assert_eq!(pieces[1].window, Some(0));
/// assert_eq!(pieces[1].interval.minutes(), 4 * 60);
/// ```
pub fn resolve(span: Interval, windows: &[RateWindow]) -> EngineResult<Vec<Covered>> {
    let active: Vec<IntervalSet> = windows.iter().map(|w| w.windows.intersect(&span)).collect();
    check_ambiguity(windows, &active)?;

    let mut order: Vec<usize> = (0..windows.len()).collect();
    order.sort_by(|a, b| windows[*b].priority.cmp(&windows[*a].priority));

    let mut remaining = IntervalSet::from(span);
    let mut pieces = Vec::new();
    for index in order {
        if remaining.is_empty() {
            break;
        }
        let claimed = remaining.intersect_set(&active[index]);
        if claimed.is_empty() {
            continue;
        }
        remaining = remaining.subtract_set(&claimed);
        pieces.extend(claimed.iter().map(|interval| Covered {
            interval: *interval,
            window: Some(index),
        }));
    }
    pieces.extend(remaining.iter().map(|interval| Covered {
        interval: *interval,
        window: None,
    }));

    pieces.sort_by_key(|p| p.interval.start());
    Ok(merge_adjacent(pieces))
}

fn check_ambiguity(windows: &[RateWindow], active: &[IntervalSet]) -> EngineResult<()> {
    for (i, first) in windows.iter().enumerate() {
        for (j, second) in windows.iter().enumerate().skip(i + 1) {
            if first.priority != second.priority {
                continue;
            }
            if let Some(minute) = active[i].first_common_minute(&active[j]) {
                return Err(EngineError::OverlapAmbiguity {
                    first: first.name(second),
                    second: second.name(first),
                    priority: first.priority,
                    at: datetime_of(minute),
                });
            }
        }
    }
    Ok(())
}

fn merge_adjacent(pieces: Vec<Covered>) -> Vec<Covered> {
    let mut merged: Vec<Covered> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if let Some(last) = merged.last_mut() {
            if last.window == piece.window && last.interval.end() == piece.interval.start() {
                if let Some(joined) = Interval::new(last.interval.start(), piece.interval.end()) {
                    last.interval = joined;
                    continue;
                }
            }
        }
        merged.push(piece);
    }
    merged
}
