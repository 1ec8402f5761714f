//! Minute-exact interval arithmetic.
//!
//! All overlay calculations work on half-open `[start, end)` intervals of
//! whole minutes since 1970-01-01 00:00 (naive local time). Working in
//! integers keeps the partition exact; hours are only derived as
//! `minutes / 60` when pay is priced.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::models::ClockTime;

const MINUTES_PER_DAY: i64 = 24 * 60;

fn epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

/// Minute offset of `time` on `date`.
///
/// `24:00` yields the first minute of the following date.
pub fn minute_of(date: NaiveDate, time: ClockTime) -> i64 {
    let days = date.signed_duration_since(epoch().date()).num_days();
    days * MINUTES_PER_DAY + time.minutes()
}

/// Converts a datetime to its minute offset, dropping seconds.
pub fn minute_of_datetime(datetime: NaiveDateTime) -> i64 {
    datetime.signed_duration_since(epoch()).num_minutes()
}

/// Converts a minute offset back to a datetime.
pub fn datetime_of(minute: i64) -> NaiveDateTime {
    epoch() + Duration::minutes(minute)
}

/// A non-empty half-open interval `[start, end)` of minutes.
///
/// # Example
///
/// ```
/// use ob_engine::calculation::Interval;
///
/// let a = Interval::new(0, 60).unwrap();
/// let b = Interval::new(30, 90).unwrap();
/// assert_eq!(a.intersect(&b), Interval::new(30, 60));
/// assert!(Interval::new(10, 10).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    start: i64,
    end: i64,
}

impl Interval {
    /// Creates an interval, or `None` if it would be empty or inverted.
    pub fn new(start: i64, end: i64) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Interval between two datetimes.
    pub fn from_datetimes(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        Self::new(minute_of_datetime(start), minute_of_datetime(end))
    }

    /// The whole calendar day `[date 00:00, date+1 00:00)`.
    pub fn whole_day(date: NaiveDate) -> Self {
        let start = minute_of(date, ClockTime::MIDNIGHT);
        Self {
            start,
            end: start + MINUTES_PER_DAY,
        }
    }

    /// First minute.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Minute just past the end.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Length in minutes.
    pub fn minutes(&self) -> i64 {
        self.end - self.start
    }

    /// Length in hours.
    pub fn hours(&self) -> Decimal {
        Decimal::new(self.minutes(), 0) / Decimal::new(60, 0)
    }

    /// Start as a datetime.
    pub fn start_datetime(&self) -> NaiveDateTime {
        datetime_of(self.start)
    }

    /// End as a datetime.
    pub fn end_datetime(&self) -> NaiveDateTime {
        datetime_of(self.end)
    }

    /// Returns true if `minute` lies inside the interval.
    pub fn contains(&self, minute: i64) -> bool {
        self.start <= minute && minute < self.end
    }

    /// Returns true if the intervals share at least one minute.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if the intervals overlap or are directly adjacent.
    pub fn touches(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// The common part of two intervals.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        Interval::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// What is left of `self` after removing `other`: zero, one or two pieces.
    pub fn subtract(&self, other: &Interval) -> Vec<Interval> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        [
            Interval::new(self.start, other.start),
            Interval::new(other.end, self.end),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Calendar dates this interval touches, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start_datetime().date();
        let last = datetime_of(self.end - 1).date();
        first.iter_days().take_while(move |d| *d <= last)
    }
}

/// A sorted set of disjoint, non-adjacent intervals.
///
/// Inserting an interval merges it with every member it touches, so the
/// set is always in canonical form.
///
/// # Example
///
/// ```
/// use ob_engine::calculation::{Interval, IntervalSet};
///
/// let mut set = IntervalSet::new();
/// set.insert(Interval::new(0, 60).unwrap());
/// set.insert(Interval::new(60, 120).unwrap());
/// set.insert(Interval::new(200, 260).unwrap());
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.total_minutes(), 180);
///
/// let rest = set.subtract(&Interval::new(30, 230).unwrap());
/// assert_eq!(rest.total_minutes(), 60);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of disjoint members.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns true if the set covers no minutes.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Members in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    /// Total covered minutes.
    pub fn total_minutes(&self) -> i64 {
        self.intervals.iter().map(Interval::minutes).sum()
    }

    /// Adds an interval, merging with touching members.
    pub fn insert(&mut self, interval: Interval) {
        let mut merged = interval;
        let mut kept = Vec::with_capacity(self.intervals.len() + 1);
        for existing in self.intervals.drain(..) {
            if existing.touches(&merged) {
                merged = Interval {
                    start: existing.start.min(merged.start),
                    end: existing.end.max(merged.end),
                };
            } else {
                kept.push(existing);
            }
        }
        let position = kept.partition_point(|i| i.start < merged.start);
        kept.insert(position, merged);
        self.intervals = kept;
    }

    /// Adds every member of `other`.
    pub fn union(&mut self, other: &IntervalSet) {
        for interval in other.iter() {
            self.insert(*interval);
        }
    }

    /// The part of the set inside `window`.
    pub fn intersect(&self, window: &Interval) -> IntervalSet {
        IntervalSet {
            intervals: self
                .intervals
                .iter()
                .filter_map(|i| i.intersect(window))
                .collect(),
        }
    }

    /// Minutes covered by both sets.
    pub fn intersect_set(&self, other: &IntervalSet) -> IntervalSet {
        let mut out = Vec::new();
        let (mut a, mut b) = (0, 0);
        while a < self.intervals.len() && b < other.intervals.len() {
            let (x, y) = (self.intervals[a], other.intervals[b]);
            if let Some(common) = x.intersect(&y) {
                out.push(common);
            }
            if x.end <= y.end {
                a += 1;
            } else {
                b += 1;
            }
        }
        IntervalSet { intervals: out }
    }

    /// The set with `window` removed.
    pub fn subtract(&self, window: &Interval) -> IntervalSet {
        IntervalSet {
            intervals: self
                .intervals
                .iter()
                .flat_map(|i| i.subtract(window))
                .collect(),
        }
    }

    /// The set with every member of `other` removed.
    pub fn subtract_set(&self, other: &IntervalSet) -> IntervalSet {
        other
            .iter()
            .fold(self.clone(), |rest, window| rest.subtract(window))
    }

    /// First minute covered by both sets, if any.
    pub fn first_common_minute(&self, other: &IntervalSet) -> Option<i64> {
        self.intersect_set(other).iter().next().map(Interval::start)
    }
}

impl From<Interval> for IntervalSet {
    fn from(interval: Interval) -> Self {
        IntervalSet {
            intervals: vec![interval],
        }
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        let mut set = IntervalSet::new();
        for interval in iter {
            set.insert(interval);
        }
        set
    }
}
