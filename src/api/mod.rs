//! HTTP API module for the OB engine.
//!
//! This module provides the REST API endpoints for shift lookup, holiday
//! calendars, day, month and year pay summaries and vacation balances.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{PRINCIPAL_ID_HEADER, PRINCIPAL_ROLE_HEADER, create_router};
pub use request::{
    AbsenceRequest, DayRequest, MonthRequest, OnCallRequest, OvertimeRequest, RecordsRequest,
    SwapRequest, YearRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
