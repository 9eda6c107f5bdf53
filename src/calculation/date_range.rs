//! Calendar helpers: a bounded day iterator and year arithmetic.

use chrono::{Months, NaiveDate};

use crate::error::{EngineError, EngineResult};

/// Iterates every day in `[start, end)`.
///
/// # Example
///
/// ```
/// use offer_engine::calculation::DateRange;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2016, 12, 30).unwrap();
/// let end = NaiveDate::from_ymd_opt(2017, 1, 2).unwrap();
/// let days: Vec<_> = DateRange::new(start, end).collect();
/// assert_eq!(days.len(), 3);
/// assert_eq!(days[2], NaiveDate::from_ymd_opt(2017, 1, 1).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DateRange {
    /// Creates the range `[start, end)`; empty when `end <= start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: Some(start),
            end,
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let day = self.next.filter(|day| *day < self.end)?;
        self.next = day.succ_opt();
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map(|day| (self.end - day).num_days().max(0) as usize)
            .unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}

/// Returns the same calendar day `years` later.
///
/// February 29 maps to February 28 when the target year is not a leap year.
pub fn add_years(date: NaiveDate, years: u32) -> EngineResult<NaiveDate> {
    years
        .checked_mul(12)
        .and_then(|months| date.checked_add_months(Months::new(months)))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("adding {} years to {} overflows the calendar", years, date),
        })
}
