//! Monthly salary calculation.
//!
//! Walks the working days of a month, composes each day's pay and aggregates
//! the lines into a [`MonthlyCalculation`] ready to be shown or saved.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::error::PayrollResult;
use crate::models::{DailySalary, MonthlyCalculation, MonthlyCalculationRequest};

use super::aggregator::{count_day_types, summarize};
use super::calendar::{month_name, working_days};
use super::pay_composer::{PayParameters, compose_daily_pay};

/// Calculates one laborer's salary for one month.
///
/// # Errors
///
/// Returns [`crate::error::PayrollError::InvalidInput`] for a month outside
/// 1-12, a non-positive wage or overtime multiplier, negative hours,
/// allowances or deductions, or amounts too large to total.
///
/// # Example
///
/// ```
/// use labor_payroll::calculation::calculate_monthly_salary;
/// use labor_payroll::models::MonthlyCalculationRequest;
/// use rust_decimal::Decimal;
///
/// let request = MonthlyCalculationRequest::new("Ravi", Decimal::new(100, 0), 2024, 2);
/// let calculation = calculate_monthly_salary(&request).unwrap();
///
/// assert_eq!(calculation.total_working_days, 21);
/// assert_eq!(calculation.summary.total_regular_pay, Decimal::new(2100, 0));
/// assert_eq!(calculation.summary.total_salary, Decimal::new(2100, 0));
/// ```
pub fn calculate_monthly_salary(request: &MonthlyCalculationRequest) -> PayrollResult<MonthlyCalculation> {
    let params = PayParameters::from_request(request)?;
    let month_name = month_name(request.month)?;
    let days = working_days(request.year, request.month, request.include_weekends)?;

    let daily_salaries = days
        .iter()
        .map(|day| compose_daily_pay(&request.labor_name, day, &params))
        .collect::<PayrollResult<Vec<DailySalary>>>()?;

    let summary = summarize(&daily_salaries)?;
    let day_type_summary = count_day_types(&daily_salaries);

    debug!(
        labor_name = %request.labor_name,
        year = request.year,
        month = request.month,
        working_days = daily_salaries.len(),
        total_salary = %summary.total_salary,
        "Monthly salary calculated"
    );

    Ok(MonthlyCalculation {
        calculation_id: Uuid::new_v4(),
        calculated_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        labor_name: request.labor_name.clone(),
        year: request.year,
        month: request.month,
        month_name: month_name.to_string(),
        total_working_days: daily_salaries.len() as u32,
        day_type_summary,
        daily_salaries,
        summary,
    })
}
