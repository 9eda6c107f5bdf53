//! Daily gross pay resolution.
//!
//! This module determines what an offer pays out on a single day: salary on
//! paydays, the signing bonus on the start date, prorated performance bonuses
//! on bonus dates, and any equity vesting that day.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{DailyPay, Offer, VestEvent};

const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Resolves the gross cash and equity `offer` pays on `day`.
///
/// - Cash: the signing bonus on `start_date`; otherwise, on a configured
///   payday, the annual base split evenly over `12 * paydays.len()` paychecks.
///   The signing bonus replaces the salary slice when the start date is
///   itself a payday.
/// - Performance bonus: on each bonus date, `bonus_target * base / n` for `n`
///   bonus dates, scaled by `min(1, days_since_start / (365 / n))` so that a
///   partial first period is prorated.
/// - Equity: every vest in `vests` dated `day`.
///
/// `vests` should hold this offer's events only.
///
/// # Examples
///
/// ```
/// use offer_engine::calculation::resolve_daily_pay;
/// use offer_engine::models::Offer;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let offer = Offer::new("Initech", Decimal::from(120_000), "CA");
/// let start = NaiveDate::from_ymd_opt(2016, 8, 10).unwrap();
/// let payday = NaiveDate::from_ymd_opt(2016, 8, 15).unwrap();
///
/// let pay = resolve_daily_pay(&offer, payday, start, &[1, 15], &[]);
/// assert_eq!(pay.cash, Decimal::from(5_000));
/// assert_eq!(pay.equity, Decimal::ZERO);
/// ```
pub fn resolve_daily_pay(
    offer: &Offer,
    day: NaiveDate,
    start_date: NaiveDate,
    paydays: &[u32],
    vests: &[VestEvent],
) -> DailyPay {
    let mut cash = Decimal::ZERO;

    if day == start_date {
        cash += offer.bonus;
    } else if paydays.contains(&day.day()) {
        cash += offer.base / (MONTHS_PER_YEAR * Decimal::from(paydays.len() as u64));
    }

    if offer.bonus_dates.iter().any(|date| date.matches(day)) {
        let periods = Decimal::from(offer.bonus_dates.len() as u64);
        let days_since_start = Decimal::from((day - start_date).num_days());
        let proration = (days_since_start * periods / DAYS_PER_YEAR).min(Decimal::ONE);
        cash += offer.bonus_target * offer.base / periods * proration;
    }

    let equity = vests
        .iter()
        .filter(|vest| vest.date == day)
        .map(|vest| vest.amount)
        .sum();

    DailyPay { cash, equity }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthDay;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_offer() -> Offer {
        let mut offer = Offer::new("Initech", dec("120000"), "CA");
        offer.bonus = dec("50000");
        offer
    }

    const PAYDAYS: [u32; 2] = [1, 15];

    /// DP-001: salary slice on a payday
    #[test]
    fn test_salary_on_payday() {
        let pay = resolve_daily_pay(&create_test_offer(), date(2016, 9, 1), date(2016, 8, 10), &PAYDAYS, &[]);
        assert_eq!(pay.cash, dec("5000"));
        assert_eq!(pay.equity, Decimal::ZERO);
    }

    /// DP-002: nothing on an ordinary day
    #[test]
    fn test_nothing_on_ordinary_day() {
        let pay = resolve_daily_pay(&create_test_offer(), date(2016, 9, 2), date(2016, 8, 10), &PAYDAYS, &[]);
        assert_eq!(pay, DailyPay::default());
        assert!(!pay.is_payday());
    }

    /// DP-003: signing bonus on the start date replaces the salary slice
    #[test]
    fn test_signing_bonus_replaces_salary_on_start_date() {
        let pay = resolve_daily_pay(&create_test_offer(), date(2016, 8, 15), date(2016, 8, 15), &PAYDAYS, &[]);
        assert_eq!(pay.cash, dec("50000"));
    }

    /// DP-004: single payday per month pays a twelfth of base
    #[test]
    fn test_monthly_payroll() {
        let pay = resolve_daily_pay(&create_test_offer(), date(2016, 9, 15), date(2016, 8, 10), &[15], &[]);
        assert_eq!(pay.cash, dec("10000"));
    }

    /// DP-005: full performance bonus after a complete period
    #[test]
    fn test_full_performance_bonus() {
        let mut offer = create_test_offer();
        offer.bonus_target = dec("0.10");
        // Bonus dates Jan 1 and Jun 1; more than half a year has elapsed.
        let pay = resolve_daily_pay(&offer, date(2017, 6, 1), date(2016, 8, 10), &PAYDAYS, &[]);
        // 5000 salary + 12000 / 2
        assert_eq!(pay.cash, dec("11000"));
    }

    /// DP-006: prorated performance bonus for a partial first period
    #[test]
    fn test_prorated_performance_bonus() {
        let mut offer = create_test_offer();
        offer.bonus_target = dec("0.10");
        offer.bonus_dates = vec![MonthDay::new(1, 2).unwrap()];
        // 73 days into a 365-day period: a fifth of the 12000 annual bonus.
        let pay = resolve_daily_pay(&offer, date(2017, 1, 2), date(2016, 10, 21), &PAYDAYS, &[]);
        assert_eq!(pay.cash, dec("2400"));
    }

    /// DP-007: equity sums every vest on the day
    #[test]
    fn test_equity_sums_vests_on_day() {
        let vests = vec![
            VestEvent { offer: 0, date: date(2017, 8, 20), amount: dec("6250") },
            VestEvent { offer: 0, date: date(2017, 8, 20), amount: dec("1000") },
            VestEvent { offer: 0, date: date(2017, 11, 20), amount: dec("6250") },
        ];
        let pay = resolve_daily_pay(&create_test_offer(), date(2017, 8, 20), date(2016, 8, 10), &PAYDAYS, &vests);
        assert_eq!(pay.equity, dec("7250"));
        assert_eq!(pay.cash, Decimal::ZERO);
        assert_eq!(pay.gross(), dec("7250"));
    }

    #[test]
    fn test_cash_and_equity_on_same_day() {
        let vests = vec![VestEvent { offer: 0, date: date(2017, 9, 1), amount: dec("500") }];
        let pay = resolve_daily_pay(&create_test_offer(), date(2017, 9, 1), date(2016, 8, 10), &PAYDAYS, &vests);
        assert_eq!(pay.cash, dec("5000"));
        assert_eq!(pay.equity, dec("500"));
        assert!(pay.is_payday());
    }
}
