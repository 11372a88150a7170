//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! handler tags its log lines with a fresh correlation id.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::PayrollError;
use crate::models::{
    CertificateRequest, LaborProfile, LaborProfileUpdate, MonthlyCalculation, NewLaborProfile,
    SalaryCertificate,
};
use crate::service::SaveMode;

use super::request::{
    CalculationRequest, DeleteProfileQuery, ListProfilesQuery, MonthQuery, ReportQuery,
};
use super::response::{
    ApiErrorResponse, BackupResponse, CalculationResponse, DetailedReportResponse,
    HealthResponse, MaintenanceResponse, SaveResponse, SummaryReportResponse,
};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/profiles", get(list_profiles_handler).post(create_profile_handler))
        .route(
            "/profiles/:name",
            get(get_profile_handler)
                .put(update_profile_handler)
                .delete(delete_profile_handler),
        )
        .route("/calculations", post(calculate_handler))
        .route("/salaries", post(save_salaries_handler).put(replace_salaries_handler))
        .route("/salaries/:name", delete(delete_salaries_handler))
        .route("/reports/summary", get(summary_report_handler))
        .route("/reports/detailed", get(detailed_report_handler))
        .route("/certificates", post(certificate_handler))
        .route("/maintenance/stats", get(maintenance_stats_handler))
        .route(
            "/maintenance/backups",
            get(list_backups_handler).post(create_backup_handler),
        )
        .with_state(state)
}

/// Logs a failed request and converts the error for the response.
fn rejected(correlation_id: Uuid, error: PayrollError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    error.into()
}

fn bad_body(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %rejection.body_text(), "Rejected request body");
    rejection.into()
}

fn bad_query(correlation_id: Uuid, rejection: QueryRejection) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %rejection.body_text(), "Rejected query string");
    rejection.into()
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        defaults: state.config().payroll().clone(),
    })
}

/// Handler for GET /profiles.
async fn list_profiles_handler(
    State(state): State<AppState>,
    query: Result<Query<ListProfilesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<LaborProfile>>> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|r| bad_query(correlation_id, r))?;

    let profiles = state
        .service()
        .profiles()
        .list(query.include_inactive)
        .await
        .map_err(|e| rejected(correlation_id, e))?;

    info!(correlation_id = %correlation_id, count = profiles.len(), "Profiles listed");
    Ok(Json(profiles))
}

/// Handler for POST /profiles.
async fn create_profile_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewLaborProfile>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Json(new_profile) = payload.map_err(|r| bad_body(correlation_id, r))?;

    let profile = state
        .service()
        .profiles()
        .add(new_profile)
        .await
        .map_err(|e| rejected(correlation_id, e))?;

    info!(correlation_id = %correlation_id, labor_name = %profile.name, "Profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Handler for GET /profiles/:name.
async fn get_profile_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<LaborProfile>> {
    let correlation_id = Uuid::new_v4();
    let profile = state
        .service()
        .profiles()
        .get(&name)
        .await
        .map_err(|e| rejected(correlation_id, e))?;
    Ok(Json(profile))
}

/// Handler for PUT /profiles/:name.
async fn update_profile_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<LaborProfileUpdate>, JsonRejection>,
) -> ApiResult<Json<LaborProfile>> {
    let correlation_id = Uuid::new_v4();
    let Json(changes) = payload.map_err(|r| bad_body(correlation_id, r))?;

    let profile = state
        .service()
        .profiles()
        .update(&name, &changes)
        .await
        .map_err(|e| rejected(correlation_id, e))?;

    info!(correlation_id = %correlation_id, labor_name = %profile.name, "Profile updated");
    Ok(Json(profile))
}

/// Handler for DELETE /profiles/:name.
///
/// Deactivates the profile unless `?hard=true` is given.
async fn delete_profile_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    query: Result<Query<DeleteProfileQuery>, QueryRejection>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|r| bad_query(correlation_id, r))?;
    let profiles = state.service().profiles();

    let result = if query.hard {
        profiles.delete(&name).await
    } else {
        profiles.deactivate(&name).await
    };
    result.map_err(|e| rejected(correlation_id, e))?;

    info!(correlation_id = %correlation_id, labor_name = %name, hard = query.hard, "Profile removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /calculations.
///
/// Calculates a month for a stored laborer and saves it when asked.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");
    let Json(request) = payload.map_err(|r| bad_body(correlation_id, r))?;

    let start_time = Instant::now();
    let (calculation, records_saved) = state
        .service()
        .calculate_and_save(&request.labor_name, &request.calculation, request.save)
        .await
        .map_err(|e| rejected(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        labor_name = %calculation.labor_name,
        working_days = calculation.total_working_days,
        total_salary = %calculation.summary.total_salary,
        records_saved,
        duration_us = start_time.elapsed().as_micros(),
        "Calculation completed successfully"
    );

    let status = if records_saved > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(CalculationResponse {
            calculation,
            records_saved,
        }),
    ))
}

async fn persist(
    state: &AppState,
    payload: Result<Json<MonthlyCalculation>, JsonRejection>,
    mode: SaveMode,
) -> ApiResult<(StatusCode, Json<SaveResponse>)> {
    let correlation_id = Uuid::new_v4();
    let Json(calculation) = payload.map_err(|r| bad_body(correlation_id, r))?;

    let records = state
        .service()
        .save(&calculation, mode)
        .await
        .map_err(|e| rejected(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        labor_name = %calculation.labor_name,
        year = calculation.year,
        month = calculation.month,
        records,
        mode = ?mode,
        "Salary records persisted"
    );
    Ok((
        StatusCode::CREATED,
        Json(SaveResponse {
            labor_name: calculation.labor_name,
            records,
        }),
    ))
}

/// Handler for POST /salaries. Fails with 409 if any day is already saved.
async fn save_salaries_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyCalculation>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SaveResponse>)> {
    persist(&state, payload, SaveMode::Insert).await
}

/// Handler for PUT /salaries. Replaces the laborer's saved month.
async fn replace_salaries_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyCalculation>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SaveResponse>)> {
    let (_, body) = persist(&state, payload, SaveMode::Replace).await?;
    Ok((StatusCode::OK, body))
}

/// Handler for DELETE /salaries/:name?year&month.
async fn delete_salaries_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<Json<SaveResponse>> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|r| bad_query(correlation_id, r))?;

    let records = state
        .service()
        .salaries()
        .delete_month(&name, query.year, query.month)
        .await
        .map_err(|e| rejected(correlation_id, e))?;

    Ok(Json(SaveResponse {
        labor_name: name,
        records,
    }))
}

/// Handler for GET /reports/summary.
async fn summary_report_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<SummaryReportResponse>> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|r| bad_query(correlation_id, r))?;

    let laborers = state
        .service()
        .reports()
        .summary_report(query.year, query.month, query.labor_name.as_deref())
        .await
        .map_err(|e| rejected(correlation_id, e))?;
    let total_salary: Decimal = laborers.iter().map(|row| row.total_salary).sum();

    info!(
        correlation_id = %correlation_id,
        year = query.year,
        month = query.month,
        laborers = laborers.len(),
        "Summary report generated"
    );
    Ok(Json(SummaryReportResponse {
        year: query.year,
        month: query.month,
        laborers,
        total_salary,
    }))
}

/// Handler for GET /reports/detailed.
async fn detailed_report_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<DetailedReportResponse>> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|r| bad_query(correlation_id, r))?;

    let records = state
        .service()
        .reports()
        .detailed_report(query.year, query.month, query.labor_name.as_deref())
        .await
        .map_err(|e| rejected(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        year = query.year,
        month = query.month,
        records = records.len(),
        "Detailed report generated"
    );
    Ok(Json(DetailedReportResponse {
        year: query.year,
        month: query.month,
        records,
    }))
}

/// Handler for POST /certificates.
async fn certificate_handler(
    payload: Result<Json<CertificateRequest>, JsonRejection>,
) -> ApiResult<Json<SalaryCertificate>> {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|r| bad_body(correlation_id, r))?;

    let certificate =
        SalaryCertificate::from_request(request).map_err(|e| rejected(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        labor_name = %certificate.request.labor_name,
        net_salary = %certificate.net_salary,
        "Certificate figures computed"
    );
    Ok(Json(certificate))
}

/// Handler for GET /maintenance/stats.
async fn maintenance_stats_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<MaintenanceResponse>> {
    let correlation_id = Uuid::new_v4();
    let maintenance = state.service().maintenance();

    let stats = maintenance
        .stats()
        .await
        .map_err(|e| rejected(correlation_id, e))?;
    let integrity_ok = maintenance
        .check_integrity()
        .await
        .map_err(|e| rejected(correlation_id, e))?;

    Ok(Json(MaintenanceResponse {
        stats,
        integrity_ok,
    }))
}

/// Handler for GET /maintenance/backups.
async fn list_backups_handler(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let backups = state
        .service()
        .maintenance()
        .list_backups()
        .await
        .map_err(|e| rejected(correlation_id, e))?;
    Ok(Json(backups))
}

/// Handler for POST /maintenance/backups.
///
/// Takes a backup and prunes old ones to the configured keep count.
async fn create_backup_handler(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<BackupResponse>)> {
    let correlation_id = Uuid::new_v4();
    let (path, pruned) = state
        .service()
        .backup_and_prune()
        .await
        .map_err(|e| rejected(correlation_id, e))?;

    info!(correlation_id = %correlation_id, path = %path.display(), "Backup created");
    Ok((StatusCode::CREATED, Json(BackupResponse { path, pruned })))
}
