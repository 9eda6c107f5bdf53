//! Error types for the Offer Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every precondition violation the engine can detect. All of them are
//! fatal to the comparison being computed; there are no partial results.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the Offer Engine.
///
/// # Example
///
/// ```
/// use offer_engine::error::EngineError;
///
/// let error = EngineError::RefresherWithoutGrant {
///     offer: "Initech".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Offer 'Initech' specifies a refresher amount but declares no grant"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but violates a table invariant.
    #[error("Invalid configuration in '{path}': {message}")]
    InvalidConfig {
        /// The file holding the offending table.
        path: String,
        /// What is wrong with it.
        message: String,
    },

    /// An income event names a jurisdiction the tax schedule does not know.
    #[error("Jurisdiction not found: {code}")]
    JurisdictionNotFound {
        /// The jurisdiction code that was not found.
        code: String,
    },

    /// Annual vesting fractions must sum to exactly one.
    #[error("Vesting fractions sum to {sum}, expected exactly 1")]
    InvalidVesting {
        /// The actual sum of the fractions.
        sum: Decimal,
    },

    /// A (month, day) anniversary that does not exist on any calendar.
    #[error("Invalid vesting date: month {month}, day {day}")]
    InvalidVestingDate {
        /// The month component.
        month: u32,
        /// The day-of-month component.
        day: u32,
    },

    /// A grant description is unusable for a reason other than its fractions.
    #[error("Invalid grant: {message}")]
    InvalidGrant {
        /// A description of what made the grant invalid.
        message: String,
    },

    /// A grant's effective start precedes the offer's start date.
    #[error("Grant for offer '{offer}' starts on {grant_start}, before the job starts on {offer_start}")]
    GrantBeforeStart {
        /// The offer owning the grant.
        offer: String,
        /// The resolved grant start date.
        grant_start: NaiveDate,
        /// The offer's start date.
        offer_start: NaiveDate,
    },

    /// A refresher amount needs a declared grant to copy its vesting shape from.
    #[error("Offer '{offer}' specifies a refresher amount but declares no grant")]
    RefresherWithoutGrant {
        /// The offending offer.
        offer: String,
    },

    /// A take-home query for a date that was never registered as income.
    #[error("No income event registered on {date}")]
    UnregisteredIncomeDate {
        /// The queried date.
        date: NaiveDate,
    },

    /// A take-home query for a year whose aggregated income is zero.
    #[error("Tax year {year} has zero aggregated income")]
    ZeroIncomeYear {
        /// The calendar year.
        year: i32,
    },

    /// The comparison parameters are unusable.
    #[error("Invalid comparison field '{field}': {message}")]
    InvalidComparison {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
