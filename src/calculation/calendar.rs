//! Day classification and month walking.
//!
//! This module enumerates the calendar days of a month, classifies each one as
//! a weekday or a weekend day, and drops weekend days when they are not worked.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// Classification of a calendar date for bonus purposes.
///
/// # Example
///
/// ```
/// use labor_payroll::calculation::{get_day_type, DayType};
/// use chrono::NaiveDate;
///
/// // 2024-02-03 is a Saturday
/// let saturday = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
/// assert_eq!(get_day_type(saturday), DayType::Weekend);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday and Sunday; earns the weekend bonus when worked.
    Weekend,
}

impl DayType {
    /// Returns the label stored in the `day_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayType {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Weekday" => Ok(DayType::Weekday),
            "Weekend" => Ok(DayType::Weekend),
            other => Err(PayrollError::invalid(
                "day_type",
                format!("unknown day type '{}'", other),
            )),
        }
    }
}

/// Determines the day type for a date.
///
/// Saturday and Sunday (index 5 and 6 counting from Monday as 0) are
/// [`DayType::Weekend`]; every other day is [`DayType::Weekday`].
pub fn get_day_type(date: NaiveDate) -> DayType {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayType::Weekend,
        _ => DayType::Weekday,
    }
}

/// A single day produced by [`working_days`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDay {
    /// The calendar date.
    pub date: NaiveDate,
    /// The ISO-8601 date string (`YYYY-MM-DD`).
    pub date_str: String,
    /// The English weekday name, e.g. "Monday".
    pub day_name: String,
    /// Weekday or weekend.
    pub day_type: DayType,
    /// Always `false`: no holiday calendar is consulted.
    pub is_holiday: bool,
}

impl WorkingDay {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            date_str: date.format("%Y-%m-%d").to_string(),
            day_name: date.format("%A").to_string(),
            day_type: get_day_type(date),
            is_holiday: false,
        }
    }

    /// Returns true for Saturdays and Sundays.
    pub fn is_weekend(&self) -> bool {
        self.day_type == DayType::Weekend
    }
}

/// Validates a year/month pair and returns the first day of that month.
pub fn first_day_of_month(year: i32, month: u32) -> PayrollResult<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(PayrollError::invalid(
            "month",
            format!("must be between 1 and 12, got {}", month),
        ));
    }

    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| PayrollError::invalid("year", format!("{} is out of range", year)))
}

/// Returns the first and last calendar day of a month, both inclusive.
///
/// ```
/// use labor_payroll::calculation::month_bounds;
/// use chrono::NaiveDate;
///
/// let (first, last) = month_bounds(2024, 2).unwrap();
/// assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
pub fn month_bounds(year: i32, month: u32) -> PayrollResult<(NaiveDate, NaiveDate)> {
    let first = first_day_of_month(year, month)?;
    let next_first = if month == 12 {
        year.checked_add(1).and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1))
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_first
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| PayrollError::invalid("year", format!("{} is out of range", year)))?;

    Ok((first, last))
}

/// Returns the English month name for a month number (1-12).
pub fn month_name(month: u32) -> PayrollResult<&'static str> {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .ok_or_else(|| {
            PayrollError::invalid("month", format!("must be between 1 and 12, got {}", month))
        })
}

/// Enumerates the days of a month that generate pay.
///
/// Days are returned in calendar order. When `include_weekends` is `false`
/// Saturdays and Sundays are left out entirely rather than produced with a
/// zero amount.
///
/// # Errors
///
/// Returns [`PayrollError::InvalidInput`] if `month` is outside 1-12 or the
/// year cannot be represented.
///
/// # Example
///
/// ```
/// use labor_payroll::calculation::working_days;
///
/// // February 2024 has 29 days, 21 of which are weekdays
/// assert_eq!(working_days(2024, 2, false).unwrap().len(), 21);
/// assert_eq!(working_days(2024, 2, true).unwrap().len(), 29);
/// ```
pub fn working_days(year: i32, month: u32, include_weekends: bool) -> PayrollResult<Vec<WorkingDay>> {
    let (first, last) = month_bounds(year, month)?;

    Ok(first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(WorkingDay::new)
        .filter(|day| include_weekends || !day.is_weekend())
        .collect())
}
