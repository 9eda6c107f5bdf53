//! HTTP API module for the Offer Engine.
//!
//! This module provides the REST API endpoints for comparing offers
//! against the loaded tax schedule.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{create_router, perform_comparison};
pub use request::{ComparisonRequest, GrantRequest, OfferRequest};
pub use response::{ApiError, HealthResponse};
pub use state::AppState;
