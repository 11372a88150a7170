//! Monthly calculation models.
//!
//! This module contains the [`MonthlyCalculation`] type and the per-day and
//! summary structures it is built from. A monthly calculation is transient:
//! it is produced by the calculator, optionally shown, optionally saved as a
//! batch of salary records, then dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::DayType;

/// Default hours worked per day when the caller gives none.
pub const DEFAULT_HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Default overtime multiplier (150%).
pub const DEFAULT_OVERTIME_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

fn default_hours_per_day() -> Decimal {
    DEFAULT_HOURS_PER_DAY
}

fn default_overtime_rate() -> Decimal {
    DEFAULT_OVERTIME_RATE
}

/// Inputs for one laborer/month calculation.
///
/// Optional fields fall back to the same defaults the payroll desk uses:
/// 8 hours per day, no overtime, a 1.5 overtime multiplier, weekends off,
/// no allowances and no deductions.
///
/// # Example
///
/// ```
/// use labor_payroll::models::MonthlyCalculationRequest;
/// use rust_decimal::Decimal;
///
/// let request: MonthlyCalculationRequest = serde_json::from_str(
///     r#"{"labor_name": "Ravi", "daily_wage": "100", "year": 2024, "month": 2}"#,
/// )
/// .unwrap();
/// assert_eq!(request.hours_per_day, Decimal::new(8, 0));
/// assert!(!request.include_weekends);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCalculationRequest {
    /// The laborer the calculation is for.
    pub labor_name: String,
    /// The flat daily wage.
    pub daily_wage: Decimal,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Hours worked on each day.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: Decimal,
    /// Flat overtime hours paid on each day.
    #[serde(default)]
    pub overtime_per_day: Decimal,
    /// Overtime multiplier applied to the hourly rate.
    #[serde(default = "default_overtime_rate")]
    pub overtime_rate: Decimal,
    /// Whether Saturdays and Sundays are worked.
    #[serde(default)]
    pub include_weekends: bool,
    /// Allowance added to every worked day.
    #[serde(default)]
    pub other_allowances: Decimal,
    /// Deduction subtracted from every worked day.
    #[serde(default)]
    pub deductions: Decimal,
}

impl MonthlyCalculationRequest {
    /// Creates a request with default hours, overtime and allowances.
    pub fn new(labor_name: impl Into<String>, daily_wage: Decimal, year: i32, month: u32) -> Self {
        Self {
            labor_name: labor_name.into(),
            daily_wage,
            year,
            month,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            overtime_per_day: Decimal::ZERO,
            overtime_rate: DEFAULT_OVERTIME_RATE,
            include_weekends: false,
            other_allowances: Decimal::ZERO,
            deductions: Decimal::ZERO,
        }
    }
}

/// The pay breakdown for a single worked day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySalary {
    /// The laborer this line belongs to.
    pub labor_name: String,
    /// The calendar date.
    pub date: NaiveDate,
    /// The ISO date string.
    pub date_str: String,
    /// English weekday name.
    pub day_name: String,
    /// Weekday or weekend.
    pub day_type: DayType,
    /// Daily wage snapshot.
    pub daily_wage: Decimal,
    /// Hours worked on the day.
    pub hours_worked: Decimal,
    /// Hours up to the 8 hour baseline.
    pub regular_hours: Decimal,
    /// Hours beyond the baseline plus the flat overtime hours.
    pub overtime_hours: Decimal,
    /// Overtime multiplier snapshot.
    pub overtime_rate: Decimal,
    /// Flat regular pay (equals the daily wage).
    pub regular_pay: Decimal,
    /// Overtime pay for the flat overtime hours.
    pub overtime_pay: Decimal,
    /// 50% of the daily wage on weekend days.
    pub weekend_bonus: Decimal,
    /// Always zero.
    pub holiday_bonus: Decimal,
    /// Allowances added for the day.
    pub other_allowances: Decimal,
    /// Deductions subtracted for the day.
    pub deductions: Decimal,
    /// Total pay for the day.
    pub total_salary: Decimal,
}

/// Monthly totals of every pay component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySummary {
    /// Sum of regular pay.
    pub total_regular_pay: Decimal,
    /// Sum of overtime pay.
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

/// The result of running the calculator over one laborer/month pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub calculated_at: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The laborer the calculation is for.
    pub labor_name: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// English month name.
    pub month_name: String,
    /// Number of days that generated pay.
    pub total_working_days: u32,
    /// How many paid days fell on each day type.
    pub day_type_summary: BTreeMap<DayType, u32>,
    /// One line per paid day, in calendar order.
    pub daily_salaries: Vec<DailySalary>,
    /// Monthly totals.
    pub summary: SalarySummary,
}
