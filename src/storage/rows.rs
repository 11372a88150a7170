//! Row structs read back from SQLite and their conversion into models.
//!
//! Monetary and hour columns are decimal text; they are parsed here so a
//! malformed value surfaces as a column decode error rather than a silent zero.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::calculation::DayType;
use crate::models::{LaborProfile, SalaryRecord};

pub(crate) const PROFILE_COLUMNS: &str = "id, name, base_daily_wage, hourly_rate, position, \
     contact_info, overtime_rate, is_active, created_at, updated_at";

pub(crate) const RECORD_COLUMNS: &str = "id, labor_name, date, day_type, daily_wage, \
     hours_worked, regular_hours, overtime_hours, overtime_rate, weekend_bonus, holiday_bonus, \
     other_allowances, deductions, total_salary, notes, created_at";

#[derive(Debug, FromRow)]
pub(crate) struct ProfileRow {
    id: i64,
    name: String,
    base_daily_wage: String,
    hourly_rate: String,
    position: String,
    contact_info: String,
    overtime_rate: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for LaborProfile {
    type Error = sqlx::Error;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(LaborProfile {
            id: row.id,
            name: row.name,
            base_daily_wage: decode_decimal("base_daily_wage", &row.base_daily_wage)?,
            hourly_rate: decode_decimal("hourly_rate", &row.hourly_rate)?,
            position: row.position,
            contact_info: row.contact_info,
            overtime_rate: decode_decimal("overtime_rate", &row.overtime_rate)?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SalaryRecordRow {
    id: i64,
    labor_name: String,
    date: NaiveDate,
    day_type: String,
    daily_wage: String,
    hours_worked: String,
    regular_hours: String,
    overtime_hours: String,
    overtime_rate: String,
    weekend_bonus: String,
    holiday_bonus: String,
    other_allowances: String,
    deductions: String,
    total_salary: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SalaryRecordRow> for SalaryRecord {
    type Error = sqlx::Error;

    fn try_from(row: SalaryRecordRow) -> Result<Self, Self::Error> {
        let day_type = DayType::from_str(&row.day_type).map_err(|e| sqlx::Error::ColumnDecode {
            index: "day_type".to_string(),
            source: Box::new(e),
        })?;

        Ok(SalaryRecord {
            id: row.id,
            labor_name: row.labor_name,
            date: row.date,
            day_type,
            daily_wage: decode_decimal("daily_wage", &row.daily_wage)?,
            hours_worked: decode_decimal("hours_worked", &row.hours_worked)?,
            regular_hours: decode_decimal("regular_hours", &row.regular_hours)?,
            overtime_hours: decode_decimal("overtime_hours", &row.overtime_hours)?,
            overtime_rate: decode_decimal("overtime_rate", &row.overtime_rate)?,
            weekend_bonus: decode_decimal("weekend_bonus", &row.weekend_bonus)?,
            holiday_bonus: decode_decimal("holiday_bonus", &row.holiday_bonus)?,
            other_allowances: decode_decimal("other_allowances", &row.other_allowances)?,
            deductions: decode_decimal("deductions", &row.deductions)?,
            total_salary: decode_decimal("total_salary", &row.total_salary)?,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

/// Converts a batch of rows, failing on the first bad one.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, sqlx::Error>
where
    T: TryFrom<R, Error = sqlx::Error>,
{
    rows.into_iter().map(T::try_from).collect()
}

fn decode_decimal(column: &str, text: &str) -> Result<Decimal, sqlx::Error> {
    Decimal::from_str(text).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
