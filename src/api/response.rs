//! Response types for the payroll API.
//!
//! This module defines the JSON response bodies, the error response
//! structure and the mapping from [`PayrollError`] to HTTP status codes.

use std::path::PathBuf;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollDefaults;
use crate::error::PayrollError;
use crate::models::{LaborSummary, MonthlyCalculation, SalaryRecord};
use crate::storage::DatabaseStats;

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
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        match error {
            PayrollError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    format!("Invalid input for '{}': {}", field, message),
                    field,
                ),
            },
            PayrollError::NotFound { entity, key } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", format!("{} not found: {}", entity, key)),
            },
            PayrollError::Conflict { message } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "CONFLICT",
                    message,
                    "Use PUT to replace what is already saved",
                ),
            },
            PayrollError::Storage(source) => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORAGE_ERROR", "Database error", source.to_string()),
            },
            PayrollError::Migration(source) => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "STORAGE_ERROR",
                    "Schema migration failed",
                    source.to_string(),
                ),
            },
            PayrollError::Io { path, source } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "IO_ERROR",
                    format!("File operation failed on {}", path),
                    source.to_string(),
                ),
            },
            PayrollError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            PayrollError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
        }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::validation_error(body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Self::bad_request(error)
    }
}

impl From<QueryRejection> for ApiErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(ApiError::new("INVALID_QUERY", rejection.body_text()))
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the service answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Values used for calculation fields a request leaves out.
    pub defaults: PayrollDefaults,
}

/// Body of `POST /calculations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// The calculation result.
    pub calculation: MonthlyCalculation,
    /// Salary records written (zero when not saved).
    pub records_saved: u64,
}

/// Body of the salary save, replace and delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    /// The laborer the records belong to.
    pub labor_name: String,
    /// Records written or removed.
    pub records: u64,
}

/// Body of `GET /reports/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReportResponse {
    /// Report year.
    pub year: i32,
    /// Report month.
    pub month: u32,
    /// One row per laborer, highest total first.
    pub laborers: Vec<LaborSummary>,
    /// Sum of every laborer's total.
    pub total_salary: Decimal,
}

/// Body of `GET /reports/detailed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedReportResponse {
    /// Report year.
    pub year: i32,
    /// Report month.
    pub month: u32,
    /// Saved records ordered by date then laborer.
    pub records: Vec<SalaryRecord>,
}

/// Body of `GET /maintenance/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceResponse {
    /// Row counts and size.
    #[serde(flatten)]
    pub stats: DatabaseStats,
    /// Result of the integrity check.
    pub integrity_ok: bool,
}

/// Body of `POST /maintenance/backups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupResponse {
    /// Where the new backup was written.
    pub path: PathBuf,
    /// Old backups removed afterwards.
    pub pruned: Vec<String>,
}
