//! Builds overlay input for a span from the OB table, the on-call table and
//! the holiday calendar.
//!
//! Rules are evaluated on every date the span touches plus the day before,
//! so a window that starts the previous evening and runs past midnight is
//! seen by a shift starting after midnight.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{ClockTime, HolidayTier, HolidayWindow, ObRule};

use super::interval::{Interval, minute_of};
use super::overlay::{RateWindow, WindowBuilder};

fn candidate_dates(span: &Interval) -> impl Iterator<Item = NaiveDate> {
    let first = span.start_datetime().date() - Duration::days(1);
    let last = span.end_datetime().date();
    first.iter_days().take_while(move |d| *d <= last)
}

fn add_rules<'a>(
    builder: &mut WindowBuilder,
    rules: impl IntoIterator<Item = &'a ObRule>,
    span: &Interval,
    code_for: impl Fn(&ObRule) -> EngineResult<String>,
) -> EngineResult<()> {
    for rule in rules {
        let code = code_for(rule)?;
        for date in candidate_dates(span) {
            if let Some(window) = rule.window_on(date).filter(|w| w.overlaps(span)) {
                builder.add(&code, &rule.label, rule.priority, rule.rate, window);
            }
        }
    }
    Ok(())
}

/// OB windows active during `span`.
///
/// Weekday/date rules are reported under their tier's code; holiday
/// windows are priced by the tier matching their holiday tier.
pub fn ob_windows(
    config: &EngineConfig,
    span: &Interval,
    holidays: &[HolidayWindow],
) -> EngineResult<Vec<RateWindow>> {
    let mut builder = WindowBuilder::new();
    add_rules(&mut builder, &config.ob().rules, span, |rule| {
        Ok(config.tier(rule.priority)?.code.clone())
    })?;

    for holiday in holidays {
        let Some(window) = holiday.interval().filter(|w| w.overlaps(span)) else {
            continue;
        };
        let tier = config.tier(holiday.tier.priority())?;
        let rate = tier.rate.ok_or_else(|| {
            EngineError::configuration(format!("tier '{}' has no holiday rate", tier.code))
        })?;
        builder.add(&tier.code, &holiday.name, tier.priority, rate, window);
    }
    Ok(builder.build())
}

/// On-call windows active during `span`.
///
/// Besides the on-call table's own rules, holiday windows map to the
/// holiday and major-holiday on-call rules, and 18:00-24:00 on the day
/// before an ordinary holiday window maps to the holiday-eve rule.
pub fn on_call_windows(
    config: &EngineConfig,
    span: &Interval,
    holidays: &[HolidayWindow],
) -> EngineResult<Vec<RateWindow>> {
    let on_call = config.on_call();
    let mut builder = WindowBuilder::new();
    add_rules(&mut builder, &on_call.rules, span, |rule| Ok(rule.code.clone()))?;

    for holiday in holidays {
        let derived = on_call.for_tier(holiday.tier);
        if let Some(window) = holiday.interval().filter(|w| w.overlaps(span)) {
            builder.add(
                &derived.code,
                &derived.label,
                derived.priority,
                derived.rate,
                window,
            );
        }

        if holiday.tier == HolidayTier::Holiday {
            let eve_date = holiday.start.date() - Duration::days(1);
            let eve = Interval::new(
                minute_of(eve_date, ClockTime::at(18, 0)),
                minute_of(eve_date, ClockTime::END_OF_DAY),
            );
            if let Some(eve) = eve.filter(|w| w.overlaps(span)) {
                let rule = &on_call.holiday_eve;
                builder.add(&rule.code, &rule.label, rule.priority, rule.rate, eve);
            }
        }
    }
    Ok(builder.build())
}

/// The on-call span: `hours` from 00:00 on `date`.
pub fn on_call_span(date: NaiveDate, hours: Decimal) -> Option<Interval> {
    let minutes = (hours * Decimal::new(60, 0)).round().to_i64()?;
    let start = minute_of(date, ClockTime::MIDNIGHT);
    Interval::new(start, start + minutes)
}
