//! Response types for the Offer Engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// Body of the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" when the server answers.
    pub status: String,
    /// Tax year of the loaded schedule.
    pub tax_year: i32,
    /// Jurisdiction codes the schedule defines, sorted.
    pub jurisdictions: Vec<String>,
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn bad_request(code: &str, error: &EngineError, details: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::with_details(code, error.to_string(), details),
        }
    }

    fn internal(code: &str, message: &str, error: &EngineError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::with_details(code, message, error.to_string()),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match &error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => {
                Self::internal("CONFIG_ERROR", "Configuration error", &error)
            }
            EngineError::JurisdictionNotFound { code } => Self::bad_request(
                "JURISDICTION_NOT_FOUND",
                &error,
                &format!("The jurisdiction '{}' is not in the loaded tax schedule", code),
            ),
            EngineError::InvalidVesting { .. } => Self::bad_request(
                "INVALID_VESTING",
                &error,
                "Annual vesting fractions must add up to exactly 1",
            ),
            EngineError::InvalidVestingDate { .. } => Self::bad_request(
                "INVALID_VESTING_DATE",
                &error,
                "Dates are [month, day] pairs that exist in a leap year",
            ),
            EngineError::InvalidGrant { .. } => Self::bad_request(
                "INVALID_GRANT",
                &error,
                "The grant data contains invalid information",
            ),
            EngineError::GrantBeforeStart { .. } => Self::bad_request(
                "GRANT_BEFORE_START",
                &error,
                "Grants may not start vesting before the job starts",
            ),
            EngineError::RefresherWithoutGrant { .. } => Self::bad_request(
                "REFRESHER_WITHOUT_GRANT",
                &error,
                "Refresher grants copy the vesting of the first declared grant",
            ),
            EngineError::InvalidComparison { .. } => Self::bad_request(
                "INVALID_COMPARISON",
                &error,
                "The comparison parameters contain invalid information",
            ),
            EngineError::UnregisteredIncomeDate { .. }
            | EngineError::ZeroIncomeYear { .. }
            | EngineError::CalculationError { .. } => {
                Self::internal("CALCULATION_ERROR", "Calculation failed", &error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_grant_before_start_is_bad_request() {
        let engine_error = EngineError::GrantBeforeStart {
            offer: "Initech".to_string(),
            grant_start: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
            offer_start: NaiveDate::from_ymd_opt(2016, 8, 15).unwrap(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "GRANT_BEFORE_START");
        assert!(api_error.error.message.contains("Initech"));
    }

    #[test]
    fn test_unknown_jurisdiction_is_bad_request() {
        let engine_error = EngineError::JurisdictionNotFound {
            code: "NY".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "JURISDICTION_NOT_FOUND");
    }

    #[test]
    fn test_internal_conditions_are_server_errors() {
        let engine_error = EngineError::ZeroIncomeYear { year: 2017 };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CALCULATION_ERROR");
        assert_eq!(api_error.error.details.as_deref(), Some("Tax year 2017 has zero aggregated income"));
    }
}
