//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{compute, compute_batch};
use crate::config::resolve_period;
use crate::error::EngineError;
use crate::export::build_export;

use super::request::{BatchRequest, CalculationRequest, ExportRequest};
use super::response::{ApiError, ApiErrorResponse, BatchResponse, ExportResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/calculate", post(calculate_handler))
        .route("/payroll/batch", post(batch_handler))
        .route("/export", post(export_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, api_error.error)
}

/// Maps a body that failed to deserialize onto a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
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
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Handler for POST /payroll/calculate.
///
/// Computes one employee's settlement for the requested month.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let outcome = resolve_period(state.config(), request.period).and_then(|params| {
        compute(
            &request.employee,
            &request.period,
            &request.overrides,
            &params,
        )
    });

    match outcome {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %result.employee_id,
                period = %result.period,
                net_salary = %result.totals.net_salary,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /payroll/batch.
///
/// Computes a roster. Employees that fail are listed next to the results;
/// only a period without parameters fails the whole request.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let params = match resolve_period(state.config(), request.period) {
        Ok(params) => params,
        Err(err) => return error_response(correlation_id, err),
    };

    // Rayon work stays off the async workers.
    let start_time = Instant::now();
    let BatchRequest { period, employees } = request;
    let outcome = match tokio::task::spawn_blocking(move || {
        compute_batch(&employees, &period, &params)
    })
    .await
    {
        Ok(outcome) => outcome,
        Err(join_error) => {
            return error_response(
                correlation_id,
                EngineError::CalculationError {
                    message: format!("batch computation aborted: {}", join_error),
                },
            );
        }
    };
    info!(
        correlation_id = %correlation_id,
        period = %period,
        computed = outcome.results.len(),
        failed = outcome.failures.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Batch completed"
    );

    json_response(StatusCode::OK, BatchResponse::new(period, outcome))
}

/// Handler for POST /export.
///
/// Always answers 200: employees that cannot be exported are reported in
/// `errors` and left out of `text`.
async fn export_handler(payload: Result<Json<ExportRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing export request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let batch = build_export(
        &request.company,
        &request.employees,
        &request.results,
        &request.period,
    );
    info!(
        correlation_id = %correlation_id,
        period = %request.period,
        rows = batch.rows.len(),
        errors = batch.errors.len(),
        "Export completed"
    );

    json_response(StatusCode::OK, ExportResponse::from(batch))
}
