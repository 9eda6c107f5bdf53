//! Income and vesting events.
//!
//! These are the intermediate values flowing between the vesting generator,
//! the daily pay resolver and the tax aggregator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Gross income received on a date, tagged with the paying jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeEvent {
    /// The day the income is received.
    pub date: NaiveDate,
    /// Gross amount.
    pub amount: Decimal,
    /// Jurisdiction code the income is taxed in.
    pub jurisdiction: String,
}

impl IncomeEvent {
    /// Creates an income event.
    pub fn new(date: NaiveDate, amount: Decimal, jurisdiction: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            jurisdiction: jurisdiction.into(),
        }
    }
}

/// A partial vest of an equity grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestEvent {
    /// Index of the owning offer within the comparison.
    pub offer: usize,
    /// The vest date.
    pub date: NaiveDate,
    /// Value released on that date.
    pub amount: Decimal,
}

/// Gross pay received on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyPay {
    /// Salary, signing bonus and performance bonus.
    pub cash: Decimal,
    /// Vested equity.
    pub equity: Decimal,
}

impl DailyPay {
    /// Returns cash plus equity.
    pub fn gross(&self) -> Decimal {
        self.cash + self.equity
    }

    /// Returns true if anything is paid on this day.
    pub fn is_payday(&self) -> bool {
        self.cash > Decimal::ZERO || self.equity > Decimal::ZERO
    }
}
