//! Earnings table construction.
//!
//! This module ties the calculation pipeline together. For each offer it
//! expands the declared and refresher grants into vests, projects the daily
//! income history into a tax assessment, resolves every day of the window,
//! and finally folds the daily rows into a cumulative series.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Comparison, EarningsRow, EarningsTable, IncomeEvent, Offer, OfferFigures, OfferSummary,
    VestEvent,
};

use super::{DateRange, TaxAssessment, TaxModel, add_years, make_vests, resolve_daily_pay};

/// Builds the cumulative earnings table for a comparison.
///
/// The window covers `[start_date, start_date + nr_years years]`, one row per
/// day. With a tax model every figure is after tax and `tax` holds the
/// withheld amount; without one, `tax` stays zero.
///
/// Each row is cumulative: row `i` holds the sum of every day up to and
/// including day `i`, so the final row is the total over the window.
///
/// # Errors
///
/// - `InvalidComparison` if the comparison parameters are unusable
/// - `GrantBeforeStart` if a grant starts before the job
/// - `RefresherWithoutGrant` if refreshers have no grant to copy from
/// - `JurisdictionNotFound` if the tax model lacks an offer's jurisdiction
///
/// # Example
///
/// ```
/// use offer_engine::calculation::build_earnings_table;
/// use offer_engine::models::{Comparison, Offer};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let offer = Offer::new("Initech", Decimal::from(120_000), "CA");
/// let start = NaiveDate::from_ymd_opt(2016, 8, 15).unwrap();
/// let mut comparison = Comparison::new(vec![offer], start);
/// comparison.nr_years = 1;
///
/// let table = build_earnings_table(&comparison, None).unwrap();
/// assert_eq!(table.rows.len(), 366);
/// // The start day pays the (zero) signing bonus; 24 paychecks of 5000 follow.
/// assert_eq!(table.final_row().unwrap().offers[0].cash, Decimal::from(120_000));
/// ```
pub fn build_earnings_table(
    comparison: &Comparison,
    taxes: Option<&dyn TaxModel>,
) -> EngineResult<EarningsTable> {
    comparison.validate()?;

    let start = comparison.start_date;
    let window_end = add_years(start, comparison.nr_years)?
        .succ_opt()
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("comparison window starting {} overflows the calendar", start),
        })?;
    let window = DateRange::new(start, window_end);

    let vests = comparison
        .offers
        .iter()
        .enumerate()
        .map(|(index, offer)| build_vests(index, offer, start, window))
        .collect::<EngineResult<Vec<_>>>()?;

    let assessments = match taxes {
        Some(model) => {
            let projection = DateRange::new(start, add_years(window_end, 1)?);
            comparison
                .offers
                .iter()
                .zip(&vests)
                .map(|(offer, offer_vests)| {
                    let events = project_income(comparison, offer, offer_vests, projection);
                    model.assess(&events)
                })
                .collect::<EngineResult<Vec<_>>>()?
        }
        None => Vec::new(),
    };

    let mut rows: Vec<EarningsRow> = Vec::with_capacity(window.len());
    for day in window {
        let mut offers = Vec::with_capacity(comparison.offers.len());
        for (index, offer) in comparison.offers.iter().enumerate() {
            let pay = resolve_daily_pay(offer, day, start, &comparison.paydays, &vests[index]);
            let figures = match assessments.get(index) {
                Some(assessment) if pay.is_payday() => {
                    after_tax(assessment, day, pay.cash, pay.equity)?
                }
                _ => OfferFigures {
                    cash: pay.cash,
                    equity: pay.equity,
                    total: pay.gross(),
                    tax: Decimal::ZERO,
                },
            };
            offers.push(figures);
        }

        let row = EarningsRow { date: day, offers };
        let row = match rows.last() {
            Some(previous) => row.accumulate(previous),
            None => row,
        };
        rows.push(row);
    }

    let offers = comparison
        .offers
        .iter()
        .zip(vests)
        .enumerate()
        .map(|(index, (offer, offer_vests))| OfferSummary {
            name: offer.name.clone(),
            jurisdiction: offer.jurisdiction.clone(),
            color: offer.color.clone(),
            vests: offer_vests,
            tax_years: assessments
                .get(index)
                .map(|assessment| assessment.years().cloned().collect())
                .unwrap_or_default(),
        })
        .collect();

    Ok(EarningsTable {
        taxed: taxes.is_some(),
        offers,
        rows,
    })
}

/// Expands an offer's declared grants and refreshers into vest events.
fn build_vests(
    index: usize,
    offer: &Offer,
    start: NaiveDate,
    window: DateRange,
) -> EngineResult<Vec<VestEvent>> {
    let tag = |(date, amount): (NaiveDate, Decimal)| VestEvent {
        offer: index,
        date,
        amount,
    };
    let mut vests = Vec::new();

    for grant in &offer.grants {
        let grant_start = grant.resolve_start(start)?;
        if grant_start < start {
            return Err(EngineError::GrantBeforeStart {
                offer: offer.name.clone(),
                grant_start,
                offer_start: start,
            });
        }
        let dated = make_vests(
            grant.total(),
            grant.vesting(),
            grant_start,
            grant.vesting_dates(),
        )?;
        vests.extend(dated.into_iter().map(tag));
    }
    let declared = vests.len();

    if !offer.refresher_amount.is_zero() {
        let template = offer
            .grants
            .first()
            .ok_or_else(|| EngineError::RefresherWithoutGrant {
                offer: offer.name.clone(),
            })?;
        for day in window.filter(|day| offer.refresher_dates.iter().any(|date| date.matches(*day))) {
            let dated = make_vests(
                offer.refresher_amount,
                template.vesting(),
                day,
                template.vesting_dates(),
            )?;
            vests.extend(dated.into_iter().map(tag));
        }
    }

    vests.sort_by_key(|vest| vest.date);
    debug!(
        offer = %offer.name,
        grants = offer.grants.len(),
        declared_vests = declared,
        refresher_vests = vests.len() - declared,
        "vest schedule"
    );
    Ok(vests)
}

/// Projects an offer's daily gross income over `projection`, preceded by the
/// already-earned event.
fn project_income(
    comparison: &Comparison,
    offer: &Offer,
    vests: &[VestEvent],
    projection: DateRange,
) -> Vec<IncomeEvent> {
    let start = comparison.start_date;
    let mut events = Vec::with_capacity(projection.len() + 1);
    if let Some(earned) = &comparison.already_earned {
        let jurisdiction = earned
            .jurisdiction
            .clone()
            .unwrap_or_else(|| offer.jurisdiction.clone());
        events.push(IncomeEvent::new(start, earned.amount, jurisdiction));
    }
    for day in projection {
        let pay = resolve_daily_pay(offer, day, start, &comparison.paydays, vests);
        events.push(IncomeEvent::new(day, pay.gross(), offer.jurisdiction.as_str()));
    }
    events
}

fn after_tax(
    assessment: &TaxAssessment,
    day: NaiveDate,
    cash: Decimal,
    equity: Decimal,
) -> EngineResult<OfferFigures> {
    let net_cash = if cash > Decimal::ZERO {
        assessment.take_home_pay(day, cash)?
    } else {
        cash
    };
    let net_equity = if equity > Decimal::ZERO {
        assessment.take_home_pay(day, equity)?
    } else {
        equity
    };
    Ok(OfferFigures {
        cash: net_cash,
        equity: net_equity,
        total: net_cash + net_equity,
        tax: (cash - net_cash) + (equity - net_equity),
    })
}
