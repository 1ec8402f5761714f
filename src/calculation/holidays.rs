//! Swedish holiday calendar.
//!
//! Produces the date-specific high-priority windows for a year from a
//! declarative table. Each row names an anchor date, when the window starts
//! relative to it and which day is the last holiday day. A window always
//! runs on through any following weekend and ends at 00:00 of the first
//! weekday after the last holiday day.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{ClockTime, HolidayTier, HolidayWindow};

/// One row of the holiday table.
#[derive(Debug, Clone, Copy)]
pub struct HolidayRule {
    /// Name reported on the window.
    pub name: &'static str,
    /// Anchor date for a year. Must fall inside that year.
    pub anchor: fn(i32) -> Option<NaiveDate>,
    /// Days from the anchor to the window start.
    pub start_offset_days: i64,
    /// Time the window starts.
    pub start: ClockTime,
    /// Days from the anchor to the last holiday day.
    pub last_day_offset: i64,
    /// Tier of the window.
    pub tier: HolidayTier,
}

/// The Swedish holiday table.
pub const SWEDISH_HOLIDAYS: &[HolidayRule] = &[
    HolidayRule {
        name: "New Year",
        anchor: new_years_day,
        start_offset_days: -1,
        start: ClockTime::at(18, 0),
        last_day_offset: 0,
        tier: HolidayTier::MajorHoliday,
    },
    HolidayRule {
        name: "Epiphany",
        anchor: epiphany,
        start_offset_days: 0,
        start: ClockTime::at(7, 0),
        last_day_offset: 0,
        tier: HolidayTier::Holiday,
    },
    HolidayRule {
        name: "Easter",
        anchor: maundy_thursday,
        start_offset_days: 0,
        start: ClockTime::at(18, 0),
        last_day_offset: 4,
        tier: HolidayTier::MajorHoliday,
    },
    HolidayRule {
        name: "May Day",
        anchor: may_day,
        start_offset_days: 0,
        start: ClockTime::at(7, 0),
        last_day_offset: 0,
        tier: HolidayTier::Holiday,
    },
    HolidayRule {
        name: "Ascension Day",
        anchor: ascension_day,
        start_offset_days: 0,
        start: ClockTime::at(7, 0),
        last_day_offset: 0,
        tier: HolidayTier::Holiday,
    },
    HolidayRule {
        name: "Whitsun",
        anchor: whitsun_eve,
        start_offset_days: 0,
        start: ClockTime::at(7, 0),
        last_day_offset: 1,
        tier: HolidayTier::MajorHoliday,
    },
    HolidayRule {
        name: "National Day",
        anchor: national_day,
        start_offset_days: 0,
        start: ClockTime::at(7, 0),
        last_day_offset: 0,
        tier: HolidayTier::Holiday,
    },
    HolidayRule {
        name: "Midsummer",
        anchor: midsummer_eve,
        start_offset_days: 0,
        start: ClockTime::at(7, 0),
        last_day_offset: 1,
        tier: HolidayTier::MajorHoliday,
    },
    HolidayRule {
        name: "All Saints' Day",
        anchor: all_saints_day,
        start_offset_days: 0,
        start: ClockTime::at(7, 0),
        last_day_offset: 0,
        tier: HolidayTier::Holiday,
    },
    HolidayRule {
        name: "Christmas",
        anchor: christmas_eve,
        start_offset_days: 0,
        start: ClockTime::at(7, 0),
        last_day_offset: 2,
        tier: HolidayTier::MajorHoliday,
    },
    HolidayRule {
        name: "New Year's Eve",
        anchor: new_years_eve,
        start_offset_days: 0,
        start: ClockTime::at(18, 0),
        last_day_offset: 1,
        tier: HolidayTier::MajorHoliday,
    },
];

/// Easter Sunday by the anonymous Gregorian computus.
///
/// # Example
///
/// ```
/// use ob_engine::calculation::easter_sunday;
/// use chrono::NaiveDate;
///
/// assert_eq!(easter_sunday(2026), NaiveDate::from_ymd_opt(2026, 4, 5));
/// assert_eq!(easter_sunday(2025), NaiveDate::from_ymd_opt(2025, 4, 20));
/// ```
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

fn easter_offset(year: i32, days: i64) -> Option<NaiveDate> {
    easter_sunday(year).map(|easter| easter + Duration::days(days))
}

fn first_weekday_on_or_after(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() as i64
        - date.weekday().num_days_from_monday() as i64)
        % 7;
    date + Duration::days(ahead)
}

fn new_years_day(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

fn epiphany(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 6)
}

fn maundy_thursday(year: i32) -> Option<NaiveDate> {
    easter_offset(year, -3)
}

fn may_day(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 5, 1)
}

fn ascension_day(year: i32) -> Option<NaiveDate> {
    easter_offset(year, 39)
}

fn whitsun_eve(year: i32) -> Option<NaiveDate> {
    easter_offset(year, 48)
}

fn national_day(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 6, 6)
}

/// Midsummer Eve: the Friday between 19 and 25 June.
pub fn midsummer_eve(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 6, 19).map(|d| first_weekday_on_or_after(d, Weekday::Fri))
}

/// All Saints' Day: the Saturday between 31 October and 6 November.
pub fn all_saints_day(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 10, 31).map(|d| first_weekday_on_or_after(d, Weekday::Sat))
}

fn christmas_eve(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 24)
}

fn new_years_eve(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

/// The first Monday-Friday strictly after `date`.
///
/// # Example
///
/// ```
/// use ob_engine::calculation::first_weekday_after;
/// use chrono::NaiveDate;
///
/// // Friday -> Monday
/// let friday = NaiveDate::from_ymd_opt(2026, 6, 19).unwrap();
/// assert_eq!(first_weekday_after(friday), NaiveDate::from_ymd_opt(2026, 6, 22).unwrap());
/// ```
pub fn first_weekday_after(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next += Duration::days(1);
    }
    next
}

/// Holiday windows for `year` from the Swedish table.
pub fn holiday_windows_for(year: i32) -> EngineResult<Vec<HolidayWindow>> {
    windows_from_rules(year, SWEDISH_HOLIDAYS)
}

/// Holiday windows for `year` from an arbitrary table.
///
/// Windows of the same tier that touch or overlap are merged. The result
/// is ordered by start, then tier.
pub fn windows_from_rules(year: i32, rules: &[HolidayRule]) -> EngineResult<Vec<HolidayWindow>> {
    let mut windows = Vec::with_capacity(rules.len());
    for rule in rules {
        let anchor = (rule.anchor)(year).ok_or_else(|| {
            EngineError::configuration(format!("holiday '{}' has no date in {}", rule.name, year))
        })?;
        if anchor.year() != year {
            return Err(EngineError::configuration(format!(
                "holiday '{}' is anchored on {}, outside {}",
                rule.name, anchor, year
            )));
        }
        let start_date = anchor + Duration::days(rule.start_offset_days);
        let last_day = anchor + Duration::days(rule.last_day_offset);
        let end_date = first_weekday_after(last_day);
        windows.push(HolidayWindow {
            name: rule.name.to_string(),
            tier: rule.tier,
            start: start_date.and_time(chrono::NaiveTime::MIN)
                + Duration::minutes(rule.start.minutes()),
            end: end_date.and_time(chrono::NaiveTime::MIN),
        });
    }
    let merged = merge_same_tier(windows);
    debug!(year, windows = merged.len(), "Generated holiday windows");
    Ok(merged)
}

/// Merges touching or overlapping windows of the same tier.
///
/// Also used when windows of adjacent years are combined, where the New
/// Year's Eve window of one year meets the New Year window of the next.
pub fn merge_same_tier(mut windows: Vec<HolidayWindow>) -> Vec<HolidayWindow> {
    windows.sort_by(|a, b| (a.tier, a.start).cmp(&(b.tier, b.start)));
    let mut merged: Vec<HolidayWindow> = Vec::with_capacity(windows.len());
    for window in windows {
        match merged.last_mut() {
            Some(last) if last.tier == window.tier && window.start <= last.end => {
                if window.end > last.end {
                    last.end = window.end;
                }
                if !last.name.split(" / ").any(|n| n == window.name) {
                    last.name = format!("{} / {}", last.name, window.name);
                }
            }
            _ => merged.push(window),
        }
    }
    merged.sort_by(|a, b| (a.start, a.tier).cmp(&(b.start, b.tier)));
    merged
}
