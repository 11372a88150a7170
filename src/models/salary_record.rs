//! Persisted salary record and report rows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::DayType;
use crate::calculation::checked;
use crate::error::PayrollResult;

/// A saved daily pay line for one laborer on one date.
///
/// At most one record exists per `(labor_name, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRecord {
    /// Surrogate key.
    pub id: i64,
    /// The laborer's profile name.
    pub labor_name: String,
    /// The worked date.
    pub date: NaiveDate,
    /// Weekday or weekend.
    pub day_type: DayType,
    /// Daily wage at the time of saving.
    pub daily_wage: Decimal,
    /// Hours worked.
    pub hours_worked: Decimal,
    /// Hours up to the 8 hour baseline.
    pub regular_hours: Decimal,
    /// Hours paid as overtime.
    pub overtime_hours: Decimal,
    /// Overtime multiplier at the time of saving.
    pub overtime_rate: Decimal,
    /// Weekend bonus paid.
    pub weekend_bonus: Decimal,
    /// Holiday bonus paid (always zero).
    pub holiday_bonus: Decimal,
    /// Allowances paid.
    pub other_allowances: Decimal,
    /// Deductions taken.
    pub deductions: Decimal,
    /// Total pay for the day.
    pub total_salary: Decimal,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

impl SalaryRecord {
    /// Regular pay as reported: `daily_wage * regular_hours / 8`.
    pub fn reported_regular_pay(&self) -> PayrollResult<Decimal> {
        let scaled = checked::mul("total_regular_pay", self.daily_wage, self.regular_hours)?;
        Ok(scaled / super::STANDARD_DAY_HOURS)
    }

    /// Overtime pay as reported: `overtime_hours * (daily_wage / 8) * overtime_rate`.
    pub fn reported_overtime_pay(&self) -> PayrollResult<Decimal> {
        let hourly = checked::mul(
            "total_overtime_pay",
            self.overtime_hours,
            super::hourly_rate_for(self.daily_wage),
        )?;
        checked::mul("total_overtime_pay", hourly, self.overtime_rate)
    }
}

/// One row of the per-laborer summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborSummary {
    /// The laborer's profile name.
    pub labor_name: String,
    /// Number of saved days in the period.
    pub working_days: u32,
    /// Sum of hours worked.
    pub total_hours: Decimal,
    /// Sum of regular hours.
    pub total_regular_hours: Decimal,
    /// Sum of overtime hours.
    pub total_overtime_hours: Decimal,
    /// Sum of reported regular pay.
    pub total_regular_pay: Decimal,
    /// Sum of reported overtime pay.
    pub total_overtime_pay: Decimal,
    /// Sum of weekend bonuses.
    pub total_weekend_bonus: Decimal,
    /// Sum of holiday bonuses.
    pub total_holiday_bonus: Decimal,
    /// Sum of allowances.
    pub total_allowances: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Sum of daily totals.
    pub total_salary: Decimal,
}

impl LaborSummary {
    /// Starts an empty summary for a laborer.
    pub fn empty(labor_name: impl Into<String>) -> Self {
        Self {
            labor_name: labor_name.into(),
            working_days: 0,
            total_hours: Decimal::ZERO,
            total_regular_hours: Decimal::ZERO,
            total_overtime_hours: Decimal::ZERO,
            total_regular_pay: Decimal::ZERO,
            total_overtime_pay: Decimal::ZERO,
            total_weekend_bonus: Decimal::ZERO,
            total_holiday_bonus: Decimal::ZERO,
            total_allowances: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            total_salary: Decimal::ZERO,
        }
    }

    /// Folds one saved record into the running totals.
    ///
    /// Fails with `InvalidInput` when a running total would leave the
    /// decimal range; the summary is left unchanged in that case.
    pub fn add(&mut self, record: &SalaryRecord) -> PayrollResult<()> {
        let next = Self {
            labor_name: self.labor_name.clone(),
            working_days: self.working_days + 1,
            total_hours: checked::add("total_hours", self.total_hours, record.hours_worked)?,
            total_regular_hours: checked::add(
                "total_regular_hours",
                self.total_regular_hours,
                record.regular_hours,
            )?,
            total_overtime_hours: checked::add(
                "total_overtime_hours",
                self.total_overtime_hours,
                record.overtime_hours,
            )?,
            total_regular_pay: checked::add(
                "total_regular_pay",
                self.total_regular_pay,
                record.reported_regular_pay()?,
            )?,
            total_overtime_pay: checked::add(
                "total_overtime_pay",
                self.total_overtime_pay,
                record.reported_overtime_pay()?,
            )?,
            total_weekend_bonus: checked::add(
                "total_weekend_bonus",
                self.total_weekend_bonus,
                record.weekend_bonus,
            )?,
            total_holiday_bonus: checked::add(
                "total_holiday_bonus",
                self.total_holiday_bonus,
                record.holiday_bonus,
            )?,
            total_allowances: checked::add(
                "total_allowances",
                self.total_allowances,
                record.other_allowances,
            )?,
            total_deductions: checked::add(
                "total_deductions",
                self.total_deductions,
                record.deductions,
            )?,
            total_salary: checked::add("total_salary", self.total_salary, record.total_salary)?,
        };
        *self = next;
        Ok(())
    }

    /// Weekend plus holiday bonuses.
    pub fn total_bonuses(&self) -> Decimal {
        self.total_weekend_bonus + self.total_holiday_bonus
    }
}
