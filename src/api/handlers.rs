//! HTTP request handlers for the OB engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{PersonId, Principal, Role};

use super::request::{DayRequest, MonthRequest, YearRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Header carrying the caller's person id.
pub const PRINCIPAL_ID_HEADER: &str = "x-principal-id";
/// Header carrying the caller's role (`admin` or `employee`).
pub const PRINCIPAL_ROLE_HEADER: &str = "x-principal-role";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/holidays/:year", get(holidays_handler))
        .route("/persons/:id/shift/:date", get(shift_handler))
        .route("/persons/:id/day", post(day_handler))
        .route("/persons/:id/month", post(month_handler))
        .route("/persons/:id/year", post(year_handler))
        .route("/persons/:id/vacation", post(vacation_handler))
        .route("/persons/:id/cowork/:year", get(cowork_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(state)
}

/// Reads the principal set by the upstream identity service.
fn principal_from(headers: &HeaderMap) -> Result<Principal, ApiErrorResponse> {
    let unauthorized = |message: &str| {
        ApiErrorResponse::new(
            StatusCode::UNAUTHORIZED,
            ApiError::missing_principal(message),
        )
    };
    let id = headers
        .get(PRINCIPAL_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u32>().ok())
        .ok_or_else(|| unauthorized("missing or invalid x-principal-id"))?;
    let role = match headers
        .get(PRINCIPAL_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
    {
        Some("admin") => Role::Admin,
        Some("employee") => Role::Employee,
        _ => return Err(unauthorized("missing or invalid x-principal-role")),
    };
    Ok(Principal {
        person_id: PersonId(id),
        role,
    })
}

/// Maps a body rejection the way every POST endpoint reports it.
fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
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
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error)
}

/// Turns an engine result into a JSON response, logging the outcome.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    start_time: Instant,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                duration_us = start_time.elapsed().as_micros() as u64,
                "Request completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                fatal = err.is_fatal(),
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for `GET /holidays/:year`.
async fn holidays_handler(State(state): State<AppState>, Path(year): Path<i32>) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(correlation_id = %correlation_id, year, "Processing holiday request");

    let result = state
        .engine()
        .holiday_windows_for(year)
        .map(|windows| windows.as_ref().clone());
    respond(correlation_id, "holidays", start_time, result)
}

/// Handler for `GET /persons/:id/shift/:date`.
async fn shift_handler(
    State(state): State<AppState>,
    Path((id, date)): Path<(u32, NaiveDate)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(correlation_id = %correlation_id, person_id = id, %date, "Processing shift request");

    let result = state.engine().assignment_for(date, PersonId(id));
    respond(correlation_id, "shift", start_time, result)
}

/// Handler for `POST /persons/:id/day`.
async fn day_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    headers: HeaderMap,
    payload: Result<Json<DayRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(correlation_id = %correlation_id, person_id = id, "Processing day request");

    let person_id = PersonId(id);
    if let Err(err) = authorize(&headers, person_id) {
        return reject(correlation_id, err);
    }
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_error(correlation_id, rejection).into_response(),
    };

    let records = request.records.into_records(person_id);
    let result = state
        .engine()
        .day_breakdown(request.date, person_id, &records);
    respond(correlation_id, "day", start_time, result)
}

/// Handler for `POST /persons/:id/month`.
async fn month_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    headers: HeaderMap,
    payload: Result<Json<MonthRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(correlation_id = %correlation_id, person_id = id, "Processing month request");

    let person_id = PersonId(id);
    if let Err(err) = authorize(&headers, person_id) {
        return reject(correlation_id, err);
    }
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_error(correlation_id, rejection).into_response(),
    };

    let records = request.records.into_records(person_id);
    let result = state
        .engine()
        .month_summary(request.year, request.month, person_id, &records);
    respond(correlation_id, "month", start_time, result)
}

/// Handler for `POST /persons/:id/year`.
async fn year_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    headers: HeaderMap,
    payload: Result<Json<YearRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(correlation_id = %correlation_id, person_id = id, "Processing year request");

    let person_id = PersonId(id);
    if let Err(err) = authorize(&headers, person_id) {
        return reject(correlation_id, err);
    }
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_error(correlation_id, rejection).into_response(),
    };

    let records = request.records.into_records(person_id);
    let result = state
        .engine()
        .year_summary(request.year, person_id, &records);
    respond(correlation_id, "year", start_time, result)
}

/// Handler for `POST /persons/:id/vacation`.
///
/// `year` is the year the vacation year starts in; the records must cover
/// the earning year before it as well as the vacation year.
async fn vacation_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    headers: HeaderMap,
    payload: Result<Json<YearRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(correlation_id = %correlation_id, person_id = id, "Processing vacation request");

    let person_id = PersonId(id);
    if let Err(err) = authorize(&headers, person_id) {
        return reject(correlation_id, err);
    }
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_error(correlation_id, rejection).into_response(),
    };

    let records = request.records.into_records(person_id);
    let result = state
        .engine()
        .vacation_balance(request.year, person_id, &records);
    respond(correlation_id, "vacation", start_time, result)
}

/// Handler for `GET /persons/:id/cowork/:year`.
async fn cowork_handler(
    State(state): State<AppState>,
    Path((id, year)): Path<(u32, i32)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(correlation_id = %correlation_id, person_id = id, year, "Processing cowork request");

    let result = state.engine().cowork_stats(year, PersonId(id));
    respond(correlation_id, "cowork", start_time, result)
}

/// Handler for `POST /admin/reload`.
///
/// Re-reads the configuration directory; a broken configuration leaves the
/// running snapshot in place.
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(correlation_id = %correlation_id, "Processing reload request");

    let principal = match principal_from(&headers) {
        Ok(principal) => principal,
        Err(err) => return reject(correlation_id, err),
    };
    if let Err(err) = principal.ensure_admin() {
        return reject(correlation_id, err.into());
    }

    let result = ConfigLoader::load(state.config_dir()).map(|loader| {
        let version = state.engine().reload(loader.into_config());
        json!({ "version": version })
    });
    respond(correlation_id, "reload", start_time, result)
}

fn authorize(headers: &HeaderMap, person_id: PersonId) -> Result<Principal, ApiErrorResponse> {
    let principal = principal_from(headers)?;
    principal.ensure_can_view(person_id)?;
    Ok(principal)
}

fn reject(correlation_id: Uuid, err: ApiErrorResponse) -> Response {
    warn!(
        correlation_id = %correlation_id,
        status = err.status.as_u16(),
        code = %err.error.code,
        "Request rejected"
    );
    err.into_response()
}
