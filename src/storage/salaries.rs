//! Salary record persistence.
//!
//! A monthly calculation is saved as one salary record per daily line. The
//! whole batch goes through a single transaction: either every line lands or
//! none does.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::calculation::{checked, month_bounds};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{DailySalary, MonthlyCalculation};

use super::is_unique_violation;

/// Writes and removes salary records.
#[derive(Debug, Clone)]
pub struct SalaryRepository {
    pool: SqlitePool,
}

impl SalaryRepository {
    /// Creates a repository over a connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Saves every daily line of a calculation as a new salary record.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no profile carries the calculation's laborer name
    /// - `InvalidInput` when a line names another laborer, falls outside the
    ///   month, repeats a date, does not add up, or holds a negative amount
    /// - `Conflict` when a record already exists for any of the days; nothing
    ///   is written in that case
    pub async fn save_calculation(&self, calculation: &MonthlyCalculation) -> PayrollResult<u64> {
        check_saveable(calculation)?;

        let mut tx = self.pool.begin().await?;
        ensure_profile_exists(&mut tx, &calculation.labor_name).await?;

        let written = insert_lines(&mut tx, &calculation.daily_salaries, Utc::now()).await?;
        tx.commit().await?;

        info!(
            labor_name = %calculation.labor_name,
            year = calculation.year,
            month = calculation.month,
            records = written,
            "Monthly salary saved"
        );
        Ok(written)
    }

    /// Replaces whatever was saved for the calculation's laborer and month.
    ///
    /// Existing records in that month are deleted and the new lines inserted
    /// in the same transaction.
    pub async fn replace_month(&self, calculation: &MonthlyCalculation) -> PayrollResult<u64> {
        check_saveable(calculation)?;
        let (first, last) = month_bounds(calculation.year, calculation.month)?;

        let mut tx = self.pool.begin().await?;
        ensure_profile_exists(&mut tx, &calculation.labor_name).await?;

        let removed = sqlx::query(
            "DELETE FROM salary_records WHERE labor_name = ?1 AND date >= ?2 AND date <= ?3",
        )
        .bind(&calculation.labor_name)
        .bind(first)
        .bind(last)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let written = insert_lines(&mut tx, &calculation.daily_salaries, Utc::now()).await?;
        tx.commit().await?;

        info!(
            labor_name = %calculation.labor_name,
            year = calculation.year,
            month = calculation.month,
            removed,
            records = written,
            "Monthly salary replaced"
        );
        Ok(written)
    }

    /// Deletes a laborer's records for one month, returning how many went.
    pub async fn delete_month(&self, labor_name: &str, year: i32, month: u32) -> PayrollResult<u64> {
        let (first, last) = month_bounds(year, month)?;

        let removed = sqlx::query(
            "DELETE FROM salary_records WHERE labor_name = ?1 AND date >= ?2 AND date <= ?3",
        )
        .bind(labor_name)
        .bind(first)
        .bind(last)
        .execute(&self.pool)
        .await?
        .rows_affected();

        info!(labor_name = %labor_name, year, month, removed, "Monthly salary deleted");
        Ok(removed)
    }

    /// Counts a laborer's saved records in one month.
    pub async fn count_month(&self, labor_name: &str, year: i32, month: u32) -> PayrollResult<i64> {
        let (first, last) = month_bounds(year, month)?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM salary_records WHERE labor_name = ?1 AND date >= ?2 AND date <= ?3",
        )
        .bind(labor_name)
        .bind(first)
        .bind(last)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

/// Checks that every line belongs to the calculation's laborer and month,
/// appears once, adds up, and holds no negative amount.
fn check_saveable(calculation: &MonthlyCalculation) -> PayrollResult<()> {
    let (first, last) = month_bounds(calculation.year, calculation.month)?;
    let mut seen = HashSet::with_capacity(calculation.daily_salaries.len());

    for line in &calculation.daily_salaries {
        if line.labor_name != calculation.labor_name {
            return Err(refuse(
                calculation,
                line,
                "labor_name",
                format!(
                    "line for {} belongs to '{}', not '{}'",
                    line.date, line.labor_name, calculation.labor_name
                ),
            ));
        }
        if line.date < first || line.date > last {
            return Err(refuse(
                calculation,
                line,
                "date",
                format!(
                    "{} is outside {}-{:02}",
                    line.date, calculation.year, calculation.month
                ),
            ));
        }
        if !seen.insert(line.date) {
            return Err(refuse(
                calculation,
                line,
                "date",
                format!("{} appears more than once", line.date),
            ));
        }

        let expected = checked::daily_total(
            line.regular_pay,
            line.overtime_pay,
            line.weekend_bonus,
            line.holiday_bonus,
            line.other_allowances,
            line.deductions,
        )?;
        if line.total_salary != expected {
            return Err(refuse(
                calculation,
                line,
                "total_salary",
                format!(
                    "daily total on {} is {} but its components add up to {}",
                    line.date, line.total_salary, expected
                ),
            ));
        }
        if line.total_salary < Decimal::ZERO {
            return Err(refuse(
                calculation,
                line,
                "total_salary",
                format!(
                    "daily total on {} is negative ({}); deductions exceed pay",
                    line.date, line.total_salary
                ),
            ));
        }

        for (field, value) in [
            ("daily_wage", line.daily_wage),
            ("hours_worked", line.hours_worked),
            ("regular_hours", line.regular_hours),
            ("overtime_hours", line.overtime_hours),
            ("weekend_bonus", line.weekend_bonus),
            ("holiday_bonus", line.holiday_bonus),
            ("other_allowances", line.other_allowances),
            ("deductions", line.deductions),
        ] {
            if value < Decimal::ZERO {
                return Err(refuse(
                    calculation,
                    line,
                    field,
                    format!("must not be negative on {}, got {}", line.date, value),
                ));
            }
        }
        if line.overtime_rate <= Decimal::ZERO {
            return Err(refuse(
                calculation,
                line,
                "overtime_rate",
                format!("must be greater than zero on {}, got {}", line.date, line.overtime_rate),
            ));
        }
    }
    Ok(())
}

fn refuse(
    calculation: &MonthlyCalculation,
    line: &DailySalary,
    field: &str,
    message: String,
) -> PayrollError {
    warn!(
        labor_name = %calculation.labor_name,
        date = %line.date,
        field,
        reason = %message,
        "Refusing to save salary line"
    );
    PayrollError::invalid(field, message)
}

async fn ensure_profile_exists(conn: &mut SqliteConnection, labor_name: &str) -> PayrollResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM labor_profiles WHERE name = ?1")
        .bind(labor_name)
        .fetch_one(&mut *conn)
        .await?;

    if count == 0 {
        return Err(PayrollError::NotFound {
            entity: "labor profile",
            key: labor_name.to_string(),
        });
    }
    Ok(())
}

async fn insert_lines(
    conn: &mut SqliteConnection,
    lines: &[DailySalary],
    created_at: DateTime<Utc>,
) -> PayrollResult<u64> {
    let mut written = 0;

    for line in lines {
        sqlx::query(
            "INSERT INTO salary_records (
                labor_name, date, day_type, daily_wage, hours_worked, regular_hours,
                overtime_hours, overtime_rate, weekend_bonus, holiday_bonus,
                other_allowances, deductions, total_salary, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&line.labor_name)
        .bind(line.date)
        .bind(line.day_type.as_str())
        .bind(line.daily_wage.to_string())
        .bind(line.hours_worked.to_string())
        .bind(line.regular_hours.to_string())
        .bind(line.overtime_hours.to_string())
        .bind(line.overtime_rate.to_string())
        .bind(line.weekend_bonus.to_string())
        .bind(line.holiday_bonus.to_string())
        .bind(line.other_allowances.to_string())
        .bind(line.deductions.to_string())
        .bind(line.total_salary.to_string())
        .bind(created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PayrollError::Conflict {
                    message: format!(
                        "salary record already exists for {} on {}",
                        line.labor_name, line.date
                    ),
                }
            } else {
                e.into()
            }
        })?;
        written += 1;
    }

    Ok(written)
}
