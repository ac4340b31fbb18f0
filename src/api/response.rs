//! Response types for the payroll API.
//!
//! This module defines the success bodies for the batch and export
//! endpoints and the error body shared by every endpoint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::{BatchFailure, BatchOutcome};
use crate::error::EngineError;
use crate::export::{ExportBatch, ExportRow, ValidationError};
use crate::models::{PayrollPeriod, PayrollResult};

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

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            EngineError::ParametersNotFound { period, .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "PARAMETERS_NOT_FOUND",
                    message,
                    format!("Regulatory parameters for {} must be published first", period),
                ),
            },
            EngineError::MalformedParameter { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Malformed regulatory parameter",
                    message,
                ),
            },
            EngineError::InvalidEmployee { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_EMPLOYEE",
                    message,
                    "The employee data contains invalid information",
                ),
            },
            EngineError::InvalidPeriod { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_PERIOD", message),
            },
            EngineError::CalculationError { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}

/// An employee the batch endpoint could not compute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureBody {
    /// The employee that failed.
    pub employee_id: String,
    /// The error, in the same shape as a single-employee error response.
    pub error: ApiError,
}

impl From<BatchFailure> for FailureBody {
    fn from(failure: BatchFailure) -> Self {
        let response: ApiErrorResponse = failure.error.into();
        Self {
            employee_id: failure.employee_id,
            error: response.error,
        }
    }
}

/// Response body for `POST /payroll/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// The period computed.
    pub period: PayrollPeriod,
    /// Settlements in roster order.
    pub results: Vec<PayrollResult>,
    /// Employees that failed.
    pub failures: Vec<FailureBody>,
}

impl BatchResponse {
    /// Builds the response body from a batch outcome.
    pub fn new(period: PayrollPeriod, outcome: BatchOutcome) -> Self {
        Self {
            period,
            results: outcome.results,
            failures: outcome.failures.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response body for `POST /export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    /// Valid rows.
    pub rows: Vec<ExportRow>,
    /// Employees left out of the file.
    pub errors: Vec<ValidationError>,
    /// The serialized file contents.
    pub text: String,
}

impl From<ExportBatch> for ExportResponse {
    fn from(batch: ExportBatch) -> Self {
        let text = batch.to_text();
        Self {
            rows: batch.rows,
            errors: batch.errors,
            text,
        }
    }
}
