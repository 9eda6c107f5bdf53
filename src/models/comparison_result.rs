//! Comparison result models for the Offer Engine.
//!
//! This module contains the [`ComparisonResult`] type returned by the HTTP API
//! and printed by the command line: the earnings table plus provenance.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EarningsRow, EarningsTable, OfferSummary};

/// The complete result of an offer comparison.
///
/// # Example
///
/// ```
/// use offer_engine::models::{ComparisonResult, EarningsTable};
/// use chrono::NaiveDate;
///
/// let table = EarningsTable { taxed: false, offers: vec![], rows: vec![] };
/// let result = ComparisonResult::new(
///     NaiveDate::from_ymd_opt(2016, 8, 15).unwrap(),
///     4,
///     table,
///     1234,
/// );
/// assert!(!result.taxed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Unique identifier for this comparison.
    pub comparison_id: Uuid,
    /// When the comparison was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the comparison.
    pub engine_version: String,
    /// The common start date.
    pub start_date: NaiveDate,
    /// Number of years compared.
    pub nr_years: u32,
    /// Whether the figures are after tax.
    pub taxed: bool,
    /// Per-offer summaries, in request order.
    pub offers: Vec<OfferSummary>,
    /// Cumulative daily rows.
    pub rows: Vec<EarningsRow>,
    /// How long the comparison took, in microseconds.
    pub duration_us: u64,
}

impl ComparisonResult {
    /// Wraps an earnings table with a fresh id and timestamp.
    pub fn new(
        start_date: NaiveDate,
        nr_years: u32,
        table: EarningsTable,
        duration_us: u64,
    ) -> Self {
        Self {
            comparison_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            start_date,
            nr_years,
            taxed: table.taxed,
            offers: table.offers,
            rows: table.rows,
            duration_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OfferFigures;
    use rust_decimal::Decimal;

    fn sample_table() -> EarningsTable {
        EarningsTable {
            taxed: true,
            offers: vec![OfferSummary {
                name: "Initech".to_string(),
                jurisdiction: "CA".to_string(),
                color: Some("red".to_string()),
                vests: vec![],
                tax_years: vec![],
            }],
            rows: vec![EarningsRow {
                date: NaiveDate::from_ymd_opt(2016, 8, 15).unwrap(),
                offers: vec![OfferFigures {
                    cash: Decimal::new(4000000, 2),
                    equity: Decimal::ZERO,
                    total: Decimal::new(4000000, 2),
                    tax: Decimal::new(1000000, 2),
                }],
            }],
        }
    }

    #[test]
    fn test_result_serializes_decimals_as_strings() {
        let result = ComparisonResult::new(
            NaiveDate::from_ymd_opt(2016, 8, 15).unwrap(),
            4,
            sample_table(),
            10,
        );
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["rows"][0]["offers"][0]["cash"], "40000.00");
        assert_eq!(json["rows"][0]["date"], "2016-08-15");
        assert_eq!(json["offers"][0]["color"], "red");
        assert_eq!(json["taxed"], true);
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let result = ComparisonResult::new(
            NaiveDate::from_ymd_opt(2016, 8, 15).unwrap(),
            4,
            sample_table(),
            10,
        );
        let json = serde_json::to_string(&result).unwrap();
        let parsed: ComparisonResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_each_result_gets_a_fresh_id() {
        let start = NaiveDate::from_ymd_opt(2016, 8, 15).unwrap();
        let first = ComparisonResult::new(start, 4, sample_table(), 0);
        let second = ComparisonResult::new(start, 4, sample_table(), 0);
        assert_ne!(first.comparison_id, second.comparison_id);
    }
}
