//! Turning resolved minutes into money.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::models::{PayRate, PaySegment};

use super::overlay::{Covered, RateWindow};

/// The wage figures rates are priced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WageBasis {
    /// Monthly wage.
    pub monthly: Decimal,
    /// `monthly / standard_monthly_hours`.
    pub hourly: Decimal,
}

impl WageBasis {
    /// Derives the hourly wage from the monthly wage.
    ///
    /// # Example
    ///
    /// ```
    /// use ob_engine::calculation::WageBasis;
    /// use rust_decimal::Decimal;
    ///
    /// let wage = WageBasis::new(Decimal::new(36000, 0), Decimal::new(160, 0));
    /// assert_eq!(wage.hourly, Decimal::new(225, 0));
    /// ```
    pub fn new(monthly: Decimal, standard_monthly_hours: Decimal) -> Self {
        let hourly = if standard_monthly_hours.is_zero() {
            Decimal::ZERO
        } else {
            monthly / standard_monthly_hours
        };
        Self { monthly, hourly }
    }

    /// Pay for `hours` of ordinary scheduled time.
    pub fn scheduled_pay(&self, hours: Decimal) -> Decimal {
        hours * self.hourly
    }
}

/// Amount per hour for the per-hour rate forms; zero for [`PayRate::FlatPerShift`].
pub fn per_hour(rate: &PayRate, wage: &WageBasis) -> Decimal {
    match rate {
        PayRate::Percent { percent } => *percent / Decimal::ONE_HUNDRED * wage.hourly,
        PayRate::Divisor { divisor } if divisor.is_zero() => Decimal::ZERO,
        PayRate::Divisor { divisor } => wage.monthly / *divisor,
        PayRate::FlatPerHour { amount } => *amount,
        PayRate::FlatPerShift { .. } => Decimal::ZERO,
    }
}

/// Pay for `hours` at `rate` for a single span.
///
/// A per-shift amount is paid once if `hours` is positive.
pub fn price_hours(rate: &PayRate, hours: Decimal, wage: &WageBasis) -> Decimal {
    match rate {
        PayRate::FlatPerShift { amount } if hours > Decimal::ZERO => *amount,
        _ => hours * per_hour(rate, wage),
    }
}

/// Prices resolved pieces into pay segments.
///
/// Per-shift amounts are attached to the first segment of their window;
/// later segments of the same window carry zero.
pub fn price_segments(pieces: &[Covered], windows: &[RateWindow], wage: &WageBasis) -> Vec<PaySegment> {
    let mut paid_per_shift = HashSet::new();
    pieces
        .iter()
        .map(|piece| {
            let hours = piece.hours();
            let (code, label, priority, amount) = match piece.window.map(|i| (i, &windows[i])) {
                Some((index, window)) => {
                    let amount = match window.rate {
                        PayRate::FlatPerShift { .. } if !paid_per_shift.insert(index) => {
                            Decimal::ZERO
                        }
                        rate => price_hours(&rate, hours, wage),
                    };
                    (
                        Some(window.code.clone()),
                        Some(window.label.clone()),
                        Some(window.priority),
                        amount,
                    )
                }
                None => (None, None, None, Decimal::ZERO),
            };
            PaySegment {
                start: piece.interval.start_datetime(),
                end: piece.interval.end_datetime(),
                code,
                label,
                priority,
                hours,
                amount,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{Interval, WindowBuilder, resolve};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn wage() -> WageBasis {
        WageBasis::new(dec("36000"), dec("160"))
    }

    #[test]
    fn test_divisor_rate() {
        let rate = PayRate::Divisor {
            divisor: dec("600"),
        };
        assert_eq!(per_hour(&rate, &wage()), dec("60"));
        assert_eq!(price_hours(&rate, dec("4"), &wage()), dec("240"));
    }

    #[test]
    fn test_percent_rate() {
        let rate = PayRate::Percent {
            percent: dec("50"),
        };
        assert_eq!(price_hours(&rate, dec("2"), &wage()), dec("225"));
    }

    #[test]
    fn test_flat_rates_ignore_wage() {
        let hourly = PayRate::FlatPerHour { amount: dec("75") };
        let low = WageBasis::new(dec("20000"), dec("160"));
        assert_eq!(price_hours(&hourly, dec("24"), &low), dec("1800"));
        assert_eq!(price_hours(&hourly, dec("24"), &wage()), dec("1800"));

        let per_shift = PayRate::FlatPerShift {
            amount: dec("250"),
        };
        assert_eq!(price_hours(&per_shift, dec("0.5"), &wage()), dec("250"));
        assert_eq!(price_hours(&per_shift, Decimal::ZERO, &wage()), Decimal::ZERO);
    }

    #[test]
    fn test_per_shift_amount_paid_once() {
        let mut builder = WindowBuilder::new();
        let per_shift = PayRate::FlatPerShift {
            amount: dec("250"),
        };
        let high = PayRate::FlatPerHour { amount: dec("10") };
        builder.add("BONUS", "Bonus", 1, per_shift, Interval::new(0, 600).unwrap());
        builder.add("HIGH", "High", 2, high, Interval::new(120, 240).unwrap());
        let windows = builder.build();
        let pieces = resolve(Interval::new(0, 600).unwrap(), &windows).unwrap();
        let segments = price_segments(&pieces, &windows, &wage());

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].amount, dec("250"));
        assert_eq!(segments[1].amount, dec("20"));
        assert_eq!(segments[2].amount, Decimal::ZERO);
        let total: Decimal = segments.iter().map(|s| s.amount).sum();
        assert_eq!(total, dec("270"));
    }

    #[test]
    fn test_untagged_segments_are_unpaid() {
        let pieces = resolve(Interval::new(0, 90).unwrap(), &[]).unwrap();
        let segments = price_segments(&pieces, &[], &wage());
        assert!(segments[0].is_untagged());
        assert_eq!(segments[0].hours, dec("1.5"));
        assert_eq!(segments[0].amount, Decimal::ZERO);
    }
}
