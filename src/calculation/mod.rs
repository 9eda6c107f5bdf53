//! Calculation logic for the Offer Engine.
//!
//! This module contains the calculation pipeline for comparing offers,
//! from progressive bracket evaluation and exemption phaseouts through
//! per-year tax assessment, vesting schedule generation and daily pay
//! resolution, up to the cumulative earnings table.

mod brackets;
mod daily_pay;
mod date_range;
mod earnings_table;
mod phaseout;
mod tax_year;
mod vesting;

pub use brackets::calculate_due;
pub use daily_pay::resolve_daily_pay;
pub use date_range::{DateRange, add_years};
pub use earnings_table::build_earnings_table;
pub use phaseout::effective_exemption;
pub use tax_year::{TaxAssessment, TaxModel};
pub use vesting::make_vests;
