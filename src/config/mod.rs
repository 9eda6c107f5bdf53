//! Configuration loading and management for the Offer Engine.
//!
//! This module provides functionality to load tax schedules from YAML files:
//! federal brackets, exemption phaseouts, payroll taxes, and per-jurisdiction
//! tables.
//!
//! # Example
//!
//! ```no_run
//! use offer_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/tax2016").unwrap();
//! println!("Loaded tax year: {}", config.schedule().tax_year());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    Bracket, BracketTable, ExemptionPhaseout, FederalSchedule, JurisdictionSchedule, TaxSchedule,
};
