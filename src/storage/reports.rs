//! Monthly reports over saved salary records.
//!
//! Records are filtered in SQL and totalled in Rust; summing the decimal text
//! columns in SQLite would coerce them to floating point.

use std::collections::BTreeMap;

use sqlx::SqlitePool;
use tracing::debug;

use crate::calculation::month_bounds;
use crate::error::PayrollResult;
use crate::models::{LaborSummary, SalaryRecord};

use super::rows::{RECORD_COLUMNS, SalaryRecordRow, convert_all};

/// Read-only queries behind the summary and detailed reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a repository over a connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every saved record in the month, ordered by date then laborer.
    ///
    /// `labor_name` narrows the report to one laborer.
    pub async fn detailed_report(
        &self,
        year: i32,
        month: u32,
        labor_name: Option<&str>,
    ) -> PayrollResult<Vec<SalaryRecord>> {
        let (first, last) = month_bounds(year, month)?;

        let rows = sqlx::query_as::<sqlx::Sqlite, SalaryRecordRow>(&format!(
            "SELECT {} FROM salary_records
             WHERE date >= ?1 AND date <= ?2 AND (?3 IS NULL OR labor_name = ?3)
             ORDER BY date, labor_name",
            RECORD_COLUMNS
        ))
        .bind(first)
        .bind(last)
        .bind(labor_name)
        .fetch_all(&self.pool)
        .await?;

        debug!(year, month, rows = rows.len(), "Detailed report queried");
        Ok(convert_all(rows)?)
    }

    /// One row per laborer with records in the month, highest total first.
    ///
    /// Laborers with equal totals are ordered by name.
    pub async fn summary_report(
        &self,
        year: i32,
        month: u32,
        labor_name: Option<&str>,
    ) -> PayrollResult<Vec<LaborSummary>> {
        let records = self.detailed_report(year, month, labor_name).await?;
        summarize_by_laborer(&records)
    }
}

/// Groups records by laborer and totals each group.
fn summarize_by_laborer(records: &[SalaryRecord]) -> PayrollResult<Vec<LaborSummary>> {
    let mut by_name: BTreeMap<&str, LaborSummary> = BTreeMap::new();
    for record in records {
        by_name
            .entry(record.labor_name.as_str())
            .or_insert_with(|| LaborSummary::empty(record.labor_name.as_str()))
            .add(record)?;
    }

    let mut summaries: Vec<LaborSummary> = by_name.into_values().collect();
    summaries.sort_by(|a, b| {
        b.total_salary
            .cmp(&a.total_salary)
            .then_with(|| a.labor_name.cmp(&b.labor_name))
    });
    Ok(summaries)
}
