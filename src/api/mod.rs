//! HTTP API module for the labor payroll engine.
//!
//! This module provides the REST endpoints for managing laborer profiles,
//! calculating and saving monthly salaries, and reading reports.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, DeleteProfileQuery, ListProfilesQuery, MonthQuery, ReportQuery};
pub use response::{
    ApiError, ApiErrorResponse, BackupResponse, CalculationResponse, DetailedReportResponse,
    HealthResponse, MaintenanceResponse, SaveResponse, SummaryReportResponse,
};
pub use state::AppState;
