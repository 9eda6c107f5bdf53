//! HTTP request handlers for the Offer Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{TaxModel, build_earnings_table};
use crate::config::TaxSchedule;
use crate::error::EngineResult;
use crate::models::{Comparison, ComparisonResult};

use super::request::ComparisonRequest;
use super::response::{ApiError, ApiErrorResponse, HealthResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/compare", post(compare_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for POST /compare endpoint.
///
/// Accepts a comparison request and returns the cumulative earnings table.
async fn compare_handler(
    State(state): State<AppState>,
    payload: Result<Json<ComparisonRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing comparison request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // The body text carries serde's description of the problem
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let taxed = request.taxes;
    let offers_count = request.offers.len();
    let result = Comparison::try_from(request)
        .and_then(|comparison| perform_comparison(&comparison, taxed, state.schedule()));

    match result {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                comparison_id = %result.comparison_id,
                offers_count,
                taxed,
                rows = result.rows.len(),
                duration_us = result.duration_us,
                "Comparison completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Comparison failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Handler for GET /health endpoint.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let schedule = state.schedule();
    Json(HealthResponse {
        status: "ok".to_string(),
        tax_year: schedule.tax_year(),
        jurisdictions: schedule
            .jurisdiction_codes()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// Builds the earnings table for a comparison and wraps it with provenance.
pub fn perform_comparison(
    comparison: &Comparison,
    taxed: bool,
    schedule: &TaxSchedule,
) -> EngineResult<ComparisonResult> {
    let start_time = Instant::now();
    let model: Option<&dyn TaxModel> = if taxed { Some(schedule) } else { None };
    let table = build_earnings_table(comparison, model)?;
    let duration_us = start_time.elapsed().as_micros() as u64;

    Ok(ComparisonResult::new(
        comparison.start_date,
        comparison.nr_years,
        table,
        duration_us,
    ))
}
