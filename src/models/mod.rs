//! Core data models for the Offer Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod comparison;
mod comparison_result;
mod earnings;
mod income;
mod offer;
mod tax_year;

pub use comparison::{AlreadyEarned, Comparison, DEFAULT_NR_YEARS, DEFAULT_PAYDAYS};
pub use comparison_result::ComparisonResult;
pub use earnings::{EarningsRow, EarningsTable, OfferFigures, OfferSummary};
pub use income::{DailyPay, IncomeEvent, VestEvent};
pub use offer::{
    DEFAULT_BONUS_DATES, DEFAULT_REFRESHER_DATES, DEFAULT_VESTING_DATES, Grant, GrantStart,
    MonthDay, Offer, default_vesting,
};
pub use tax_year::{JurisdictionTax, TaxYearRecord};
