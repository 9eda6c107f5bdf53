//! Application state for the Offer Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::TaxSchedule;

/// Shared application state.
///
/// Holds the tax schedule loaded at startup. It is immutable, so handlers
/// share it without locking.
#[derive(Clone)]
pub struct AppState {
    schedule: Arc<TaxSchedule>,
}

impl AppState {
    /// Creates a new application state around a loaded tax schedule.
    pub fn new(schedule: TaxSchedule) -> Self {
        Self {
            schedule: Arc::new(schedule),
        }
    }

    /// Returns the tax schedule.
    pub fn schedule(&self) -> &TaxSchedule {
        &self.schedule
    }
}
