//! End-to-end tests for the payroll API.
//!
//! Each test builds a router over its own in-memory database and drives it
//! with `oneshot` requests. The suite covers:
//! - Profile management (create, read, update, soft and hard delete)
//! - Monthly calculations (weekdays, overtime, weekends, allowances)
//! - Saving, conflicting and replacing salary months
//! - Summary and detailed reports
//! - Certificates and maintenance endpoints
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;
use uuid::Uuid;

use labor_payroll::api::{AppState, create_router};
use labor_payroll::config::ConfigLoader;
use labor_payroll::service::PayrollService;
use labor_payroll::storage::Database;

// =============================================================================
// Test Helpers
// =============================================================================

struct TestApp {
    state: AppState,
    backup_dir: std::path::PathBuf,
}

impl TestApp {
    fn router(&self) -> Router {
        create_router(self.state.clone())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.backup_dir);
    }
}

async fn create_test_app() -> TestApp {
    let backup_dir = std::env::temp_dir().join(format!("labor-payroll-it-{}", Uuid::new_v4()));
    let yaml = format!(
        "database:\n  url: \"sqlite::memory:\"\nbackup:\n  directory: \"{}\"\n  keep_count: 2\n",
        backup_dir.display()
    );
    let loader = ConfigLoader::from_yaml_str(&yaml, "integration").expect("Failed to parse config");
    let database = Database::open(loader.database())
        .await
        .expect("Failed to open database");
    let service = PayrollService::new(&database, loader.payroll().clone(), loader.backup());

    TestApp {
        state: AppState::new(loader, service),
        backup_dir,
    }
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Parses a decimal string field so `"2100.0"` and `"2100"` compare equal.
fn dec_field(value: &Value) -> Decimal {
    decimal(value.as_str().expect("expected a decimal string"))
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn create_profile(app: &TestApp, name: &str, wage: &str) {
    let (status, _) = send(
        app.router(),
        "POST",
        "/profiles",
        Some(json!({ "name": name, "base_daily_wage": wage, "position": "Goldsmith" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn calculate(app: &TestApp, body: Value) -> (StatusCode, Value) {
    send(app.router(), "POST", "/calculations", Some(body)).await
}

// =============================================================================
// Profiles
// =============================================================================

#[tokio::test]
async fn test_create_and_fetch_profile() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (status, profile) = send(app.router(), "GET", "/profiles/Ravi", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Ravi");
    assert_eq!(dec_field(&profile["base_daily_wage"]), decimal("100"));
    assert_eq!(dec_field(&profile["hourly_rate"]), decimal("12.5"));
    assert_eq!(dec_field(&profile["overtime_rate"]), decimal("1.5"));
    assert_eq!(profile["is_active"], true);
}

#[tokio::test]
async fn test_duplicate_profile_is_409() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (status, error) = send(
        app.router(),
        "POST",
        "/profiles",
        Some(json!({ "name": "Ravi", "base_daily_wage": "90" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "CONFLICT");
}

#[tokio::test]
async fn test_profile_with_zero_wage_is_400() {
    let app = create_test_app().await;
    let (status, error) = send(
        app.router(),
        "POST",
        "/profiles",
        Some(json!({ "name": "Ravi", "base_daily_wage": "0" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
    assert_eq!(error["details"], "base_daily_wage");
}

#[tokio::test]
async fn test_update_profile_wage() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (status, profile) = send(
        app.router(),
        "PUT",
        "/profiles/Ravi",
        Some(json!({ "base_daily_wage": "160" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_field(&profile["hourly_rate"]), decimal("20"));
    assert_eq!(profile["position"], "Goldsmith");
}

#[tokio::test]
async fn test_list_profiles_hides_inactive_by_default() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;
    create_profile(&app, "Anil", "80").await;

    let (status, _) = send(app.router(), "DELETE", "/profiles/Anil", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, active) = send(app.router(), "GET", "/profiles", None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["name"], "Ravi");

    let (_, all) = send(app.router(), "GET", "/profiles?include_inactive=true", None).await;
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Anil", "Ravi"]);
}

#[tokio::test]
async fn test_hard_delete_removes_profile() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (status, _) = send(app.router(), "DELETE", "/profiles/Ravi?hard=true", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, error) = send(app.router(), "GET", "/profiles/Ravi", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

// =============================================================================
// Calculations
// =============================================================================

#[tokio::test]
async fn test_february_weekdays_only() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (status, result) = calculate(&app, json!({ "labor_name": "Ravi", "year": 2024, "month": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["records_saved"], 0);

    let calculation = &result["calculation"];
    assert_eq!(calculation["month_name"], "February");
    assert_eq!(calculation["total_working_days"], 21);
    assert_eq!(calculation["day_type_summary"]["Weekday"], 21);
    assert_eq!(calculation["daily_salaries"].as_array().unwrap().len(), 21);
    assert_eq!(dec_field(&calculation["summary"]["total_regular_pay"]), decimal("2100"));
    assert_eq!(dec_field(&calculation["summary"]["total_salary"]), decimal("2100"));
}

#[tokio::test]
async fn test_flat_overtime_hours() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (_, result) = calculate(
        &app,
        json!({ "labor_name": "Ravi", "year": 2024, "month": 2, "overtime_per_day": "2" }),
    )
    .await;

    let calculation = &result["calculation"];
    for day in calculation["daily_salaries"].as_array().unwrap() {
        assert_eq!(dec_field(&day["overtime_pay"]), decimal("37.5"));
        assert_eq!(dec_field(&day["overtime_hours"]), decimal("2"));
    }
    assert_eq!(dec_field(&calculation["summary"]["total_overtime_pay"]), decimal("787.5"));
}

#[tokio::test]
async fn test_weekends_earn_bonus() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (_, result) = calculate(
        &app,
        json!({ "labor_name": "Ravi", "year": 2024, "month": 2, "include_weekends": true }),
    )
    .await;

    let calculation = &result["calculation"];
    assert_eq!(calculation["total_working_days"], 29);
    assert_eq!(calculation["day_type_summary"]["Weekend"], 8);

    let saturday = &calculation["daily_salaries"][2];
    assert_eq!(saturday["date"], "2024-02-03");
    assert_eq!(saturday["day_name"], "Saturday");
    assert_eq!(saturday["day_type"], "Weekend");
    assert_eq!(dec_field(&saturday["weekend_bonus"]), decimal("50"));
    assert_eq!(dec_field(&calculation["summary"]["total_salary"]), decimal("3300"));
}

#[tokio::test]
async fn test_long_days_record_extra_hours_without_paying_them() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (_, result) = calculate(
        &app,
        json!({ "labor_name": "Ravi", "year": 2024, "month": 2, "hours_per_day": "10" }),
    )
    .await;

    let first = &result["calculation"]["daily_salaries"][0];
    assert_eq!(dec_field(&first["regular_hours"]), decimal("8"));
    assert_eq!(dec_field(&first["overtime_hours"]), decimal("2"));
    assert_eq!(dec_field(&first["overtime_pay"]), decimal("0"));
    assert_eq!(dec_field(&first["total_salary"]), decimal("100"));
}

#[tokio::test]
async fn test_custom_wage_allowances_and_deductions() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (_, result) = calculate(
        &app,
        json!({
            "labor_name": "Ravi",
            "year": 2024,
            "month": 2,
            "daily_wage": "120",
            "other_allowances": "10",
            "deductions": "4"
        }),
    )
    .await;

    let summary = &result["calculation"]["summary"];
    assert_eq!(dec_field(&summary["total_regular_pay"]), decimal("2520"));
    assert_eq!(dec_field(&summary["total_allowances"]), decimal("210"));
    assert_eq!(dec_field(&summary["total_deductions"]), decimal("84"));
    assert_eq!(dec_field(&summary["total_salary"]), decimal("2646"));
}

#[tokio::test]
async fn test_invalid_month_is_400() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (status, error) = calculate(&app, json!({ "labor_name": "Ravi", "year": 2024, "month": 13 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"], "month");
}

#[tokio::test]
async fn test_unknown_laborer_is_404() {
    let app = create_test_app().await;
    let (status, error) = calculate(&app, json!({ "labor_name": "Nobody", "year": 2024, "month": 2 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error["message"].as_str().unwrap().contains("Nobody"));
}

// =============================================================================
// Saving salary months
// =============================================================================

#[tokio::test]
async fn test_calculate_and_save_then_conflict() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let body = json!({ "labor_name": "Ravi", "year": 2024, "month": 2, "save": "insert" });
    let (status, result) = calculate(&app, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(result["records_saved"], 21);

    let (status, error) = calculate(&app, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error["message"].as_str().unwrap().contains("2024-02-01"));
}

#[tokio::test]
async fn test_save_and_replace_calculation_body() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (_, result) = calculate(&app, json!({ "labor_name": "Ravi", "year": 2024, "month": 2 })).await;
    let calculation = result["calculation"].clone();

    let (status, saved) = send(app.router(), "POST", "/salaries", Some(calculation.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["records"], 21);

    let (status, _) = send(app.router(), "POST", "/salaries", Some(calculation)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, result) = calculate(
        &app,
        json!({ "labor_name": "Ravi", "year": 2024, "month": 2, "include_weekends": true }),
    )
    .await;
    let (status, replaced) = send(app.router(), "PUT", "/salaries", Some(result["calculation"].clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["records"], 29);
}

#[tokio::test]
async fn test_delete_saved_month() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;
    calculate(&app, json!({ "labor_name": "Ravi", "year": 2024, "month": 2, "save": "insert" })).await;

    let (status, deleted) = send(app.router(), "DELETE", "/salaries/Ravi?year=2024&month=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["records"], 21);

    let (_, report) = send(app.router(), "GET", "/reports/detailed?year=2024&month=2", None).await;
    assert!(report["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_negative_daily_total_cannot_be_saved() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (status, error) = calculate(
        &app,
        json!({ "labor_name": "Ravi", "year": 2024, "month": 2, "deductions": "150", "save": "insert" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"], "total_salary");
}

// =============================================================================
// Reports
// =============================================================================

async fn seed_february(app: &TestApp) {
    create_profile(app, "Ravi", "100").await;
    create_profile(app, "Anil", "80").await;
    calculate(
        app,
        json!({ "labor_name": "Ravi", "year": 2024, "month": 2, "overtime_per_day": "2", "save": "insert" }),
    )
    .await;
    calculate(
        app,
        json!({ "labor_name": "Anil", "year": 2024, "month": 2, "include_weekends": true, "save": "insert" }),
    )
    .await;
}

#[tokio::test]
async fn test_summary_report() {
    let app = create_test_app().await;
    seed_february(&app).await;

    let (status, report) = send(app.router(), "GET", "/reports/summary?year=2024&month=2", None).await;
    assert_eq!(status, StatusCode::OK);

    let laborers = report["laborers"].as_array().unwrap();
    assert_eq!(laborers.len(), 2);
    assert_eq!(laborers[0]["labor_name"], "Ravi");
    assert_eq!(laborers[0]["working_days"], 21);
    assert_eq!(dec_field(&laborers[0]["total_overtime_pay"]), decimal("787.5"));
    assert_eq!(dec_field(&laborers[0]["total_salary"]), decimal("2887.5"));
    assert_eq!(laborers[1]["labor_name"], "Anil");
    assert_eq!(dec_field(&laborers[1]["total_weekend_bonus"]), decimal("320"));
    assert_eq!(dec_field(&report["total_salary"]), decimal("5527.5"));
}

#[tokio::test]
async fn test_summary_report_for_one_laborer() {
    let app = create_test_app().await;
    seed_february(&app).await;

    let (_, report) = send(
        app.router(),
        "GET",
        "/reports/summary?year=2024&month=2&labor_name=Anil",
        None,
    )
    .await;
    let laborers = report["laborers"].as_array().unwrap();
    assert_eq!(laborers.len(), 1);
    assert_eq!(dec_field(&laborers[0]["total_salary"]), decimal("2640"));
}

#[tokio::test]
async fn test_empty_month_reports() {
    let app = create_test_app().await;
    seed_february(&app).await;

    let (_, summary) = send(app.router(), "GET", "/reports/summary?year=2024&month=3", None).await;
    assert!(summary["laborers"].as_array().unwrap().is_empty());
    assert_eq!(dec_field(&summary["total_salary"]), Decimal::ZERO);

    let (_, detailed) = send(app.router(), "GET", "/reports/detailed?year=2024&month=3", None).await;
    assert!(detailed["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_detailed_report_order() {
    let app = create_test_app().await;
    seed_february(&app).await;

    let (status, report) = send(app.router(), "GET", "/reports/detailed?year=2024&month=2", None).await;
    assert_eq!(status, StatusCode::OK);

    let records = report["records"].as_array().unwrap();
    assert_eq!(records.len(), 50);
    assert_eq!(records[0]["date"], "2024-02-01");
    assert_eq!(records[0]["labor_name"], "Anil");
    assert_eq!(records[1]["labor_name"], "Ravi");
    assert_eq!(records[49]["date"], "2024-02-29");
}

#[tokio::test]
async fn test_report_with_bad_month_is_400() {
    let app = create_test_app().await;
    let (status, error) = send(app.router(), "GET", "/reports/detailed?year=2024&month=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
}

// =============================================================================
// Certificates and maintenance
// =============================================================================

#[tokio::test]
async fn test_certificate_figures() {
    let app = create_test_app().await;
    let (status, certificate) = send(
        app.router(),
        "POST",
        "/certificates",
        Some(json!({
            "labor_name": "Meena",
            "passport_number": "K7654321",
            "national_id": "784-1988-7654321-2",
            "position": "Stone Setter",
            "join_date": "2019-09-15",
            "basic_salary": "3000",
            "housing_allowance": "1000",
            "transport_allowance": "250",
            "deductions": "300"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_field(&certificate["gross_salary"]), decimal("4250"));
    assert_eq!(dec_field(&certificate["net_salary"]), decimal("3950"));
}

#[tokio::test]
async fn test_certificate_missing_passport_is_400() {
    let app = create_test_app().await;
    let (status, error) = send(
        app.router(),
        "POST",
        "/certificates",
        Some(json!({
            "labor_name": "Meena",
            "passport_number": "",
            "national_id": "784-1988-7654321-2",
            "position": "Stone Setter",
            "join_date": "2019-09-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"], "passport_number");
}

#[tokio::test]
async fn test_maintenance_stats() {
    let app = create_test_app().await;
    seed_february(&app).await;

    let (status, stats) = send(app.router(), "GET", "/maintenance/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["active_laborers"], 2);
    assert_eq!(stats["total_salary_records"], 50);
    assert_eq!(stats["earliest_record"], "2024-02-01");
    assert_eq!(stats["latest_record"], "2024-02-29");
    assert_eq!(stats["integrity_ok"], true);
}

#[tokio::test]
async fn test_backup_endpoint_writes_file() {
    let app = create_test_app().await;
    create_profile(&app, "Ravi", "100").await;

    let (status, backup) = send(app.router(), "POST", "/maintenance/backups", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let path = backup["path"].as_str().unwrap();
    assert!(std::path::Path::new(path).exists());

    let (status, listing) = send(app.router(), "GET", "/maintenance/backups", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_error_malformed_json() {
    let app = create_test_app().await;
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculations")
                .header("Content-Type", "application/json")
                .body(Body::from("{ invalid json }"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_non_numeric_wage_is_not_coerced() {
    let app = create_test_app().await;
    let (status, error) = send(
        app.router(),
        "POST",
        "/profiles",
        Some(json!({ "name": "Ravi", "base_daily_wage": "one hundred" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");

    let (status, _) = send(app.router(), "GET", "/profiles/Ravi", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_missing_month() {
    let app = create_test_app().await;
    let (status, error) = calculate(&app, json!({ "labor_name": "Ravi", "year": 2024 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_error_missing_content_type() {
    let app = create_test_app().await;
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/profiles")
                .body(Body::from(r#"{"name": "Ravi", "base_daily_wage": "100"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;
    let (status, health) = send(app.router(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(dec_field(&health["defaults"]["hours_per_day"]), decimal("8"));
    assert_eq!(health["defaults"]["include_weekends"], false);
}
