//! Monthly aggregation of daily pay lines.

use std::collections::BTreeMap;

use crate::error::PayrollResult;
use crate::models::{DailySalary, SalarySummary};

use super::calendar::DayType;
use super::checked;

/// Sums every pay component across the given daily lines.
///
/// `total_salary` is the sum of the daily totals, so allowances and
/// deductions are reflected in it. Order of the input does not matter.
///
/// # Errors
///
/// Returns [`crate::error::PayrollError::InvalidInput`] when a monthly
/// total leaves the range a `Decimal` can hold.
pub fn summarize(daily_salaries: &[DailySalary]) -> PayrollResult<SalarySummary> {
    daily_salaries
        .iter()
        .try_fold(SalarySummary::default(), |summary, day| {
            Ok(SalarySummary {
                total_regular_pay: checked::add(
                    "total_regular_pay",
                    summary.total_regular_pay,
                    day.regular_pay,
                )?,
                total_overtime_pay: checked::add(
                    "total_overtime_pay",
                    summary.total_overtime_pay,
                    day.overtime_pay,
                )?,
                total_weekend_bonus: checked::add(
                    "total_weekend_bonus",
                    summary.total_weekend_bonus,
                    day.weekend_bonus,
                )?,
                total_holiday_bonus: checked::add(
                    "total_holiday_bonus",
                    summary.total_holiday_bonus,
                    day.holiday_bonus,
                )?,
                total_allowances: checked::add(
                    "total_allowances",
                    summary.total_allowances,
                    day.other_allowances,
                )?,
                total_deductions: checked::add(
                    "total_deductions",
                    summary.total_deductions,
                    day.deductions,
                )?,
                total_salary: checked::add("total_salary", summary.total_salary, day.total_salary)?,
            })
        })
}

/// Counts how many lines fall on each day type.
///
/// Day types with no lines are absent from the map.
pub fn count_day_types(daily_salaries: &[DailySalary]) -> BTreeMap<DayType, u32> {
    let mut counts = BTreeMap::new();
    for day in daily_salaries {
        *counts.entry(day.day_type).or_insert(0) += 1;
    }
    counts
}
