//! Comparison parameters.
//!
//! A [`Comparison`] is everything the earnings table builder needs besides
//! the tax model: the offers, the common start date, the window length and
//! the payroll calendar.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Offer;

/// Default number of years a comparison covers.
pub const DEFAULT_NR_YEARS: u32 = 4;

/// Default paydays: the 1st and the 15th of every month.
pub const DEFAULT_PAYDAYS: [u32; 2] = [1, 15];

/// Income already earned in the year the new job starts.
///
/// It refines the first year's effective tax rate; it never appears in the
/// earnings series itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlreadyEarned {
    /// Amount earned so far this year.
    pub amount: Decimal,
    /// Jurisdiction it was earned in; `None` means the offer's own.
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

/// A set of offers compared over a common window.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// The offers, in display order.
    pub offers: Vec<Offer>,
    /// The day every offer's job starts.
    pub start_date: NaiveDate,
    /// Number of years to compare.
    pub nr_years: u32,
    /// Days of the month on which salary is paid.
    pub paydays: Vec<u32>,
    /// Optional income earned earlier in the first year.
    pub already_earned: Option<AlreadyEarned>,
}

impl Comparison {
    /// Creates a comparison with the default window and payroll calendar.
    pub fn new(offers: Vec<Offer>, start_date: NaiveDate) -> Self {
        Self {
            offers,
            start_date,
            nr_years: DEFAULT_NR_YEARS,
            paydays: DEFAULT_PAYDAYS.to_vec(),
            already_earned: None,
        }
    }

    /// Checks the parameters the builder divides by or iterates over.
    pub fn validate(&self) -> EngineResult<()> {
        if self.offers.is_empty() {
            return Err(invalid("offers", "at least one offer is required"));
        }
        if self.nr_years == 0 {
            return Err(invalid("nr_years", "must be at least 1"));
        }
        if self.paydays.is_empty() {
            return Err(invalid("paydays", "at least one payday is required"));
        }
        if let Some(day) = self.paydays.iter().find(|day| !(1..=31).contains(*day)) {
            return Err(invalid(
                "paydays",
                &format!("{} is not a day of the month", day),
            ));
        }
        for (index, day) in self.paydays.iter().enumerate() {
            if self.paydays[..index].contains(day) {
                return Err(invalid(
                    "paydays",
                    &format!("{} is listed more than once", day),
                ));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidComparison {
        field: field.to_string(),
        message: message.to_string(),
    }
}
