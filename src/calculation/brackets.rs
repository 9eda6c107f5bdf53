//! Progressive bracket evaluation.
//!
//! This module applies a marginal-rate [`BracketTable`] to an amount. The same
//! evaluator drives income taxes, capped payroll taxes and flat taxes.

use rust_decimal::Decimal;

use crate::config::BracketTable;

/// Calculates the tax due on `amount` under `table`.
///
/// Each bracket taxes the slice of the amount between the previous bracket's
/// limit and its own at its rate; the unbounded bracket taxes whatever
/// remains. Evaluation stops as soon as the amount is exhausted, so trailing
/// brackets are never touched for small amounts. Non-positive amounts owe
/// nothing.
///
/// # Examples
///
/// ```
/// use offer_engine::calculation::calculate_due;
/// use offer_engine::config::{Bracket, BracketTable};
/// use rust_decimal::Decimal;
///
/// let table = BracketTable::new(vec![
///     Bracket::capped(Decimal::new(10, 2), Decimal::from(10_000)),
///     Bracket::unbounded(Decimal::new(20, 2)),
/// ]);
///
/// // 10% of the first 10,000 plus 20% of the next 5,000
/// assert_eq!(calculate_due(Decimal::from(15_000), &table), Decimal::from(2_000));
/// ```
pub fn calculate_due(amount: Decimal, table: &BracketTable) -> Decimal {
    let mut remaining = amount;
    let mut lower = Decimal::ZERO;
    let mut total = Decimal::ZERO;

    for bracket in table.brackets() {
        if remaining <= Decimal::ZERO {
            break;
        }
        let basis = match bracket.limit {
            Some(limit) => (limit - lower).max(Decimal::ZERO).min(remaining),
            None => remaining,
        };
        total += basis * bracket.rate;
        remaining -= basis;
        if let Some(limit) = bracket.limit {
            lower = lower.max(limit);
        }
    }

    total
}
