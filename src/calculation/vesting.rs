//! Vesting schedule generation.
//!
//! This module turns a grant's total value and annual vesting fractions into
//! dated partial payouts: a one-year cliff, then periodic vests on the
//! configured anniversaries.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::MonthDay;

use super::add_years;

/// Generates the vesting schedule of a grant.
///
/// The first vest is the cliff, exactly one year after `start`, releasing
/// `fractions[0]` of `total`. Every later year's fraction is split evenly
/// across `vesting_dates`: walking forward day by day from the cliff, each
/// matching anniversary releases `fractions[i] / vesting_dates.len()` of the
/// total, and once every anniversary has been hit the walk moves on to the
/// next year's fraction.
///
/// The walk is a simulation rather than a formula because anniversaries are
/// arbitrary and need not divide the year evenly.
///
/// Returns the `(date, amount)` pairs in chronological order, or
/// `InvalidGrant` if fractions remain after the cliff but no anniversaries
/// are configured.
///
/// # Examples
///
/// ```
/// use offer_engine::calculation::make_vests;
/// use offer_engine::models::DEFAULT_VESTING_DATES;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDate::from_ymd_opt(2016, 8, 15).unwrap();
/// let fractions = vec![Decimal::new(5, 1), Decimal::new(5, 1)];
/// let vests = make_vests(Decimal::from(1_000), &fractions, start, &DEFAULT_VESTING_DATES).unwrap();
///
/// assert_eq!(vests[0], (NaiveDate::from_ymd_opt(2017, 8, 15).unwrap(), Decimal::from(500)));
/// assert_eq!(vests[1], (NaiveDate::from_ymd_opt(2017, 8, 20).unwrap(), Decimal::from(125)));
/// assert_eq!(vests.len(), 5);
/// ```
pub fn make_vests(
    total: Decimal,
    fractions: &[Decimal],
    start: NaiveDate,
    vesting_dates: &[MonthDay],
) -> EngineResult<Vec<(NaiveDate, Decimal)>> {
    let Some((first, remaining)) = fractions.split_first() else {
        return Ok(Vec::new());
    };
    if !remaining.is_empty() && vesting_dates.is_empty() {
        return Err(EngineError::InvalidGrant {
            message: "vesting continues after the cliff but no vesting dates are configured"
                .to_string(),
        });
    }

    let cliff = add_years(start, 1)?;
    let mut vests = Vec::with_capacity(1 + remaining.len() * vesting_dates.len());
    vests.push((cliff, *first * total));

    let per_year = Decimal::from(vesting_dates.len() as u64);
    let mut remaining = remaining.iter();
    let mut current = remaining.next();
    let mut vested_this_year = 0;
    let mut day = cliff;

    while let Some(fraction) = current {
        day = day.succ_opt().ok_or_else(|| EngineError::CalculationError {
            message: format!("vesting schedule runs past {}", day),
        })?;
        if vesting_dates.iter().any(|anniversary| anniversary.matches(day)) {
            vests.push((day, *fraction / per_year * total));
            vested_this_year += 1;
        }
        if vested_this_year == vesting_dates.len() {
            vested_this_year = 0;
            current = remaining.next();
        }
    }

    Ok(vests)
}
