//! Preliminary tax by bracket.

use rust_decimal::Decimal;

use crate::models::TaxBracket;

/// Tax on `taxable` using the first bracket whose bound covers it.
///
/// A negative taxable amount is taxed as zero.
///
/// # Example
///
/// ```
/// use ob_engine::calculation::tax_for;
/// use ob_engine::models::TaxBracket;
/// use rust_decimal::Decimal;
///
/// let brackets = [
///     TaxBracket { up_to: Some(Decimal::new(20000, 0)), rate: Decimal::new(20, 2) },
///     TaxBracket { up_to: None, rate: Decimal::new(30, 2) },
/// ];
/// assert_eq!(tax_for(&brackets, Decimal::new(20000, 0)), Decimal::new(4000, 0));
/// assert_eq!(tax_for(&brackets, Decimal::new(30000, 0)), Decimal::new(9000, 0));
/// ```
pub fn tax_for(brackets: &[TaxBracket], taxable: Decimal) -> Decimal {
    if taxable <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    brackets
        .iter()
        .find(|b| b.up_to.is_none_or(|limit| taxable <= limit))
        .or_else(|| brackets.last())
        .map(|b| taxable * b.rate)
        .unwrap_or(Decimal::ZERO)
}
