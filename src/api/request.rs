//! Request types for the Offer Engine API.
//!
//! This module defines the JSON request structures for the `/compare`
//! endpoint. The command line reads the same structures from YAML.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AlreadyEarned, Comparison, DEFAULT_BONUS_DATES, DEFAULT_NR_YEARS, DEFAULT_PAYDAYS,
    DEFAULT_REFRESHER_DATES, DEFAULT_VESTING_DATES, Grant, GrantStart, MonthDay, Offer,
    default_vesting,
};

/// Request body for the `/compare` endpoint.
///
/// Everything but `start_date` and `offers` is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// The day every offer's job starts.
    pub start_date: NaiveDate,
    /// Number of years to compare.
    #[serde(default = "default_nr_years")]
    pub nr_years: u32,
    /// Whether figures are reported after tax.
    #[serde(default = "default_taxes")]
    pub taxes: bool,
    /// Days of the month on which salary is paid.
    #[serde(default = "default_paydays")]
    pub paydays: Vec<u32>,
    /// Income already earned earlier in the first year.
    #[serde(default)]
    pub already_earned: Option<AlreadyEarned>,
    /// The offers to compare, in display order.
    pub offers: Vec<OfferRequest>,
}

fn default_nr_years() -> u32 {
    DEFAULT_NR_YEARS
}

fn default_taxes() -> bool {
    true
}

fn default_paydays() -> Vec<u32> {
    DEFAULT_PAYDAYS.to_vec()
}

/// One offer in a comparison request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferRequest {
    /// Name of the offer.
    pub name: String,
    /// Annual base salary.
    pub base: Decimal,
    /// Signing bonus.
    #[serde(default)]
    pub bonus: Decimal,
    /// Jurisdiction code, e.g. "CA".
    pub jurisdiction: String,
    /// Display color.
    #[serde(default)]
    pub color: Option<String>,
    /// Annual performance bonus as a fraction of base.
    #[serde(default)]
    pub bonus_target: Decimal,
    /// Performance bonus dates as `[month, day]` pairs.
    #[serde(default = "default_bonus_dates")]
    pub bonus_dates: Vec<MonthDay>,
    /// Value of each refresher grant.
    #[serde(default)]
    pub refresher_amount: Decimal,
    /// Refresher issue dates as `[month, day]` pairs.
    #[serde(default = "default_refresher_dates")]
    pub refresher_dates: Vec<MonthDay>,
    /// Declared equity grants.
    #[serde(default)]
    pub grants: Vec<GrantRequest>,
}

fn default_bonus_dates() -> Vec<MonthDay> {
    DEFAULT_BONUS_DATES.to_vec()
}

fn default_refresher_dates() -> Vec<MonthDay> {
    DEFAULT_REFRESHER_DATES.to_vec()
}

/// One equity grant in an offer request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantRequest {
    /// Total grant value.
    pub total: Decimal,
    /// When vesting starts; defaults to the job start.
    #[serde(default)]
    pub start: GrantStart,
    /// Vesting anniversaries after the cliff as `[month, day]` pairs.
    #[serde(default = "default_vesting_dates")]
    pub vesting_dates: Vec<MonthDay>,
    /// Annual vesting fractions.
    #[serde(default = "default_vesting")]
    pub vesting: Vec<Decimal>,
}

fn default_vesting_dates() -> Vec<MonthDay> {
    DEFAULT_VESTING_DATES.to_vec()
}

impl TryFrom<GrantRequest> for Grant {
    type Error = EngineError;

    fn try_from(req: GrantRequest) -> EngineResult<Self> {
        Grant::new(req.total, req.start, req.vesting_dates, req.vesting)
    }
}

impl TryFrom<OfferRequest> for Offer {
    type Error = EngineError;

    fn try_from(req: OfferRequest) -> EngineResult<Self> {
        let grants = req
            .grants
            .into_iter()
            .map(Grant::try_from)
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Offer {
            name: req.name,
            base: req.base,
            bonus: req.bonus,
            jurisdiction: req.jurisdiction,
            color: req.color,
            bonus_target: req.bonus_target,
            bonus_dates: req.bonus_dates,
            refresher_amount: req.refresher_amount,
            refresher_dates: req.refresher_dates,
            grants,
        })
    }
}

impl TryFrom<ComparisonRequest> for Comparison {
    type Error = EngineError;

    /// Converts the request, validating every grant. The `taxes` flag is
    /// not part of the comparison and is read by the caller beforehand.
    fn try_from(req: ComparisonRequest) -> EngineResult<Self> {
        let offers = req
            .offers
            .into_iter()
            .map(Offer::try_from)
            .collect::<EngineResult<Vec<_>>>()?;
        let comparison = Comparison {
            offers,
            start_date: req.start_date,
            nr_years: req.nr_years,
            paydays: req.paydays,
            already_earned: req.already_earned,
        };
        comparison.validate()?;
        Ok(comparison)
    }
}
