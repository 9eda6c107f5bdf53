//! Offer and equity grant models.
//!
//! This module defines the declarative description of a job offer: its cash
//! terms, performance bonus and refresher policy, and the equity grants it
//! carries.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A (month, day) anniversary that recurs every year.
///
/// Any day that exists in a leap year is accepted, so `(2, 29)` is valid and
/// simply matches only in leap years.
///
/// # Example
///
/// ```
/// use offer_engine::models::MonthDay;
/// use chrono::NaiveDate;
///
/// let anniversary = MonthDay::new(2, 20).unwrap();
/// assert!(anniversary.matches(NaiveDate::from_ymd_opt(2018, 2, 20).unwrap()));
/// assert!(MonthDay::new(2, 30).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32)", into = "(u32, u32)")]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Creates an anniversary, rejecting combinations no calendar contains.
    pub fn new(month: u32, day: u32) -> EngineResult<Self> {
        // 2000 is a leap year, so this admits February 29.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(EngineError::InvalidVestingDate { month, day });
        }
        Ok(Self { month, day })
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the day of the month.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Returns true if `date` falls on this anniversary.
    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

impl TryFrom<(u32, u32)> for MonthDay {
    type Error = EngineError;

    fn try_from((month, day): (u32, u32)) -> EngineResult<Self> {
        Self::new(month, day)
    }
}

impl From<MonthDay> for (u32, u32) {
    fn from(value: MonthDay) -> Self {
        (value.month, value.day)
    }
}

/// Quarterly vesting on the 20th of February, May, August and November.
pub const DEFAULT_VESTING_DATES: [MonthDay; 4] = [
    MonthDay { month: 2, day: 20 },
    MonthDay { month: 5, day: 20 },
    MonthDay { month: 8, day: 20 },
    MonthDay { month: 11, day: 20 },
];

/// Performance bonuses paid on January 1 and June 1.
pub const DEFAULT_BONUS_DATES: [MonthDay; 2] =
    [MonthDay { month: 1, day: 1 }, MonthDay { month: 6, day: 1 }];

/// Refresher grants issued every January 1.
pub const DEFAULT_REFRESHER_DATES: [MonthDay; 1] = [MonthDay { month: 1, day: 1 }];

/// Four equal annual vesting fractions.
pub fn default_vesting() -> Vec<Decimal> {
    vec![Decimal::new(25, 2); 4]
}

/// When a grant's vesting clock starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantStart {
    /// The grant starts with the job.
    #[default]
    OfferStart,
    /// The grant starts on an absolute date.
    Date(NaiveDate),
    /// The grant starts this many days after the job starts.
    OffsetDays(i64),
}

/// An equity grant.
///
/// Grants are validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grant {
    total: Decimal,
    start: GrantStart,
    vesting_dates: Vec<MonthDay>,
    vesting: Vec<Decimal>,
}

impl Grant {
    /// Creates a grant.
    ///
    /// `vesting` holds one fraction per year and must sum to exactly one.
    /// `vesting_dates` are the anniversaries on which the years after the
    /// cliff vest; they must be distinct and, when more than one year
    /// vests, non-empty.
    ///
    /// # Example
    ///
    /// ```
    /// use offer_engine::models::{Grant, GrantStart, DEFAULT_VESTING_DATES};
    /// use rust_decimal::Decimal;
    ///
    /// let grant = Grant::new(
    ///     Decimal::from(100_000),
    ///     GrantStart::OfferStart,
    ///     DEFAULT_VESTING_DATES.to_vec(),
    ///     vec![Decimal::new(5, 2), Decimal::new(15, 2), Decimal::new(40, 2), Decimal::new(40, 2)],
    /// );
    /// assert!(grant.is_ok());
    /// ```
    pub fn new(
        total: Decimal,
        start: GrantStart,
        vesting_dates: Vec<MonthDay>,
        vesting: Vec<Decimal>,
    ) -> EngineResult<Self> {
        let sum: Decimal = vesting.iter().sum();
        if sum != Decimal::ONE {
            return Err(EngineError::InvalidVesting { sum });
        }
        if total < Decimal::ZERO {
            return Err(EngineError::InvalidGrant {
                message: format!("total {} is negative", total),
            });
        }
        if vesting.len() > 1 && vesting_dates.is_empty() {
            return Err(EngineError::InvalidGrant {
                message: "vesting continues after the cliff but no vesting dates are configured"
                    .to_string(),
            });
        }
        for (index, date) in vesting_dates.iter().enumerate() {
            if vesting_dates[..index].contains(date) {
                return Err(EngineError::InvalidGrant {
                    message: format!(
                        "vesting date {}/{} is listed more than once",
                        date.month, date.day
                    ),
                });
            }
        }

        Ok(Self {
            total,
            start,
            vesting_dates,
            vesting,
        })
    }

    /// A grant starting with the job, vesting quarterly over four equal years.
    pub fn standard(total: Decimal) -> EngineResult<Self> {
        Self::new(
            total,
            GrantStart::OfferStart,
            DEFAULT_VESTING_DATES.to_vec(),
            default_vesting(),
        )
    }

    /// Returns the total grant value.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Returns when the vesting clock starts.
    pub fn start(&self) -> GrantStart {
        self.start
    }

    /// Returns the vesting anniversaries.
    pub fn vesting_dates(&self) -> &[MonthDay] {
        &self.vesting_dates
    }

    /// Returns the annual vesting fractions.
    pub fn vesting(&self) -> &[Decimal] {
        &self.vesting
    }

    /// Resolves the grant's effective start date for a job starting on `offer_start`.
    pub fn resolve_start(&self, offer_start: NaiveDate) -> EngineResult<NaiveDate> {
        match self.start {
            GrantStart::OfferStart => Ok(offer_start),
            GrantStart::Date(date) => Ok(date),
            GrantStart::OffsetDays(days) => offer_start
                .checked_add_signed(chrono::Duration::days(days))
                .ok_or_else(|| EngineError::CalculationError {
                    message: format!("grant offset of {} days overflows the calendar", days),
                }),
        }
    }
}

/// A job offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    /// Name of the offer, usually the employer.
    pub name: String,
    /// Annual base salary.
    pub base: Decimal,
    /// Signing bonus paid on the start date.
    pub bonus: Decimal,
    /// Jurisdiction code where the income is earned, e.g. "CA".
    pub jurisdiction: String,
    /// Display color passed through to chart renderers.
    pub color: Option<String>,
    /// Annual performance bonus as a fraction of base.
    pub bonus_target: Decimal,
    /// Anniversaries on which the performance bonus is paid out.
    pub bonus_dates: Vec<MonthDay>,
    /// Value of each refresher grant; zero disables refreshers.
    pub refresher_amount: Decimal,
    /// Anniversaries on which refresher grants are issued.
    pub refresher_dates: Vec<MonthDay>,
    /// Declared equity grants.
    pub grants: Vec<Grant>,
}

impl Offer {
    /// Creates an offer with no bonuses, no grants, and default dates.
    ///
    /// # Example
    ///
    /// ```
    /// use offer_engine::models::Offer;
    /// use rust_decimal::Decimal;
    ///
    /// let offer = Offer::new("Initech", Decimal::from(105_000), "CA");
    /// assert_eq!(offer.bonus_dates.len(), 2);
    /// assert!(offer.grants.is_empty());
    /// ```
    pub fn new(name: impl Into<String>, base: Decimal, jurisdiction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base,
            bonus: Decimal::ZERO,
            jurisdiction: jurisdiction.into(),
            color: None,
            bonus_target: Decimal::ZERO,
            bonus_dates: DEFAULT_BONUS_DATES.to_vec(),
            refresher_amount: Decimal::ZERO,
            refresher_dates: DEFAULT_REFRESHER_DATES.to_vec(),
            grants: Vec::new(),
        }
    }
}
