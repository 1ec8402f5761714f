//! Vacation entitlement, usage and vacation pay.
//!
//! A vacation year starts on the first of `year_start_month` and is earned
//! during the year before it (the earning year). Days used come from the
//! vacation weeks plus single vacation days recorded as absences.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::config::VacationSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{Person, VacationPay, VacationProjection, round_money};

/// First and last day of the vacation year starting in `year`.
///
/// # Example
///
/// ```
/// use ob_engine::calculation::vacation_year_bounds;
/// use chrono::NaiveDate;
///
/// let (start, end) = vacation_year_bounds(2026, 4).unwrap();
/// assert_eq!(start, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
/// assert_eq!(end, NaiveDate::from_ymd_opt(2027, 3, 31).unwrap());
/// ```
pub fn vacation_year_bounds(year: i32, start_month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let invalid = || {
        EngineError::input_range(format!(
            "no vacation year {} starting in month {}",
            year, start_month
        ))
    };
    let start = NaiveDate::from_ymd_opt(year, start_month, 1).ok_or_else(invalid)?;
    let end = NaiveDate::from_ymd_opt(year + 1, start_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(invalid)?;
    Ok((start, end))
}

/// Days earned over `earning_start..=earning_end`.
///
/// Employment starting inside the earning year pro-rates the full-year days
/// by calendar days employed, rounded up. Employment starting after it
/// earns nothing.
pub fn entitled_days(
    days_per_year: u32,
    employment_start: Option<NaiveDate>,
    earning_start: NaiveDate,
    earning_end: NaiveDate,
) -> u32 {
    let Some(start) = employment_start.filter(|s| *s > earning_start) else {
        return days_per_year;
    };
    if start > earning_end {
        return 0;
    }
    let employed = (earning_end - start).num_days() + 1;
    let total = (earning_end - earning_start).num_days() + 1;
    let earned = (i64::from(days_per_year) * employed + total - 1) / total;
    u32::try_from(earned).unwrap_or(days_per_year)
}

/// Weekdays in `from..=to` that fall inside one of the person's vacation weeks.
pub fn week_based_days_used(person: &Person, from: NaiveDate, to: NaiveDate) -> u32 {
    let count = from
        .iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .filter(|d| person.is_on_vacation(*d))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Days saved in the `valid_years` vacation years before `year`.
pub fn saved_days(person: &Person, year: i32, valid_years: i32) -> u32 {
    person
        .vacation_saved
        .range(year - valid_years..year)
        .map(|(_, days)| *days)
        .sum()
}

fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / Decimal::ONE_HUNDRED
}

/// Vacation supplement and payout rates.
///
/// `variable_total` is the OB, on-call and overtime pay of the earning year.
///
/// # Example
///
/// ```
/// use ob_engine::calculation::vacation_pay;
/// use ob_engine::config::VacationSettings;
/// use rust_decimal::Decimal;
///
/// let pay = vacation_pay(&VacationSettings::default(), Decimal::new(36000, 0), Decimal::ZERO, 25);
/// // 0.8 % of 36000
/// assert_eq!(pay.fixed_per_day, Decimal::new(288, 0));
/// assert_eq!(pay.supplement_total, Decimal::new(7200, 0));
/// ```
pub fn vacation_pay(
    settings: &VacationSettings,
    monthly_wage: Decimal,
    variable_total: Decimal,
    entitled_days: u32,
) -> VacationPay {
    let variable_total = round_money(variable_total);
    let fixed_per_day = round_money(percent_of(monthly_wage, settings.fixed_percent));
    let variable_per_day = round_money(percent_of(variable_total, settings.variable_percent));
    let supplement_per_day = fixed_per_day + variable_per_day;
    VacationPay {
        monthly_wage,
        fixed_per_day,
        variable_total,
        variable_per_day,
        supplement_per_day,
        supplement_total: round_money(supplement_per_day * Decimal::from(entitled_days)),
        payout_per_day: round_money(
            percent_of(monthly_wage, settings.payout_percent) + supplement_per_day,
        ),
    }
}

/// What closing the vacation year with `remaining` days would do: save up
/// to `max_saved_days` and pay out the rest.
pub fn projection(settings: &VacationSettings, remaining: i64, pay: &VacationPay) -> VacationProjection {
    let remaining = u32::try_from(remaining.max(0)).unwrap_or(u32::MAX);
    let days_to_save = remaining.min(settings.max_saved_days);
    let days_to_pay_out = remaining - days_to_save;
    VacationProjection {
        days_to_save,
        days_to_pay_out,
        payout_total: round_money(pay.payout_per_day * Decimal::from(days_to_pay_out)),
    }
}
