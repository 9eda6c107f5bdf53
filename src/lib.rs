//! Offer Engine for comparing job offers
//!
//! This crate projects the earnings of competing job offers day by day over a
//! multi-year window: salary, signing and performance bonuses, and vesting
//! equity grants, optionally after US federal and state taxes.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
