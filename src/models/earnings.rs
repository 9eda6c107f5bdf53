//! Earnings table models.
//!
//! This module contains the rows produced by the earnings table builder and
//! the per-offer summary returned alongside them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{TaxYearRecord, VestEvent};

/// One offer's figures for one day (or, once folded, up to that day).
///
/// When taxation is enabled `cash`, `equity` and `total` are after tax and
/// `tax` is what was withheld; otherwise they are pre-tax and `tax` is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferFigures {
    /// Cash received.
    pub cash: Decimal,
    /// Equity received.
    pub equity: Decimal,
    /// Cash plus equity.
    pub total: Decimal,
    /// Tax withheld.
    pub tax: Decimal,
}

impl OfferFigures {
    /// Field-wise sum of two figure sets.
    pub fn plus(&self, other: &OfferFigures) -> OfferFigures {
        OfferFigures {
            cash: self.cash + other.cash,
            equity: self.equity + other.equity,
            total: self.total + other.total,
            tax: self.tax + other.tax,
        }
    }
}

/// One day of the comparison window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsRow {
    /// The day.
    pub date: NaiveDate,
    /// Figures per offer, in comparison order.
    pub offers: Vec<OfferFigures>,
}

impl EarningsRow {
    /// Accumulates `self` onto the running row `previous`.
    ///
    /// The result keeps this row's date.
    pub fn accumulate(&self, previous: &EarningsRow) -> EarningsRow {
        debug_assert_eq!(self.offers.len(), previous.offers.len());
        EarningsRow {
            date: self.date,
            offers: previous
                .offers
                .iter()
                .zip(&self.offers)
                .map(|(before, today)| before.plus(today))
                .collect(),
        }
    }
}

/// What a renderer needs to know about one offer besides its series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSummary {
    /// Offer name.
    pub name: String,
    /// Jurisdiction code.
    pub jurisdiction: String,
    /// Display color, if the offer declared one.
    pub color: Option<String>,
    /// All vest events, declared and refresher grants alike.
    pub vests: Vec<VestEvent>,
    /// Tax records over the projection, empty when untaxed.
    pub tax_years: Vec<TaxYearRecord>,
}

/// The cumulative earnings series for a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsTable {
    /// Whether figures are after tax.
    pub taxed: bool,
    /// Per-offer summaries, in comparison order.
    pub offers: Vec<OfferSummary>,
    /// One cumulative row per day.
    pub rows: Vec<EarningsRow>,
}

impl EarningsTable {
    /// Returns the last cumulative row, i.e. the totals over the whole window.
    pub fn final_row(&self) -> Option<&EarningsRow> {
        self.rows.last()
    }

    /// Returns the cumulative row for `date`, if it lies in the window.
    pub fn row_on(&self, date: NaiveDate) -> Option<&EarningsRow> {
        self.rows
            .binary_search_by(|row| row.date.cmp(&date))
            .ok()
            .map(|index| &self.rows[index])
    }
}
