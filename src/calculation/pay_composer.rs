//! Daily pay composition.
//!
//! This module turns one [`WorkingDay`] and the month's pay parameters into a
//! [`DailySalary`] line: flat regular pay, overtime on the flat overtime
//! hours, the weekend bonus, allowances and deductions.

use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{DailySalary, MonthlyCalculationRequest, STANDARD_DAY_HOURS, hourly_rate_for};

use super::calendar::{DayType, WorkingDay};
use super::checked;

/// Share of the daily wage paid as a bonus for working a weekend day.
pub const WEEKEND_BONUS_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// The pay inputs shared by every day of a monthly calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayParameters {
    /// Flat daily wage.
    pub daily_wage: Decimal,
    /// Hours worked each day.
    pub hours_per_day: Decimal,
    /// Flat overtime hours paid each day.
    pub overtime_per_day: Decimal,
    /// Overtime multiplier.
    pub overtime_rate: Decimal,
    /// Allowance added each day.
    pub other_allowances: Decimal,
    /// Deduction subtracted each day.
    pub deductions: Decimal,
}

impl PayParameters {
    /// Extracts and validates the pay inputs of a calculation request.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidInput`] if the daily wage or overtime
    /// multiplier is not positive, or if hours, overtime hours, allowances or
    /// deductions are negative.
    pub fn from_request(request: &MonthlyCalculationRequest) -> PayrollResult<Self> {
        let params = Self {
            daily_wage: request.daily_wage,
            hours_per_day: request.hours_per_day,
            overtime_per_day: request.overtime_per_day,
            overtime_rate: request.overtime_rate,
            other_allowances: request.other_allowances,
            deductions: request.deductions,
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> PayrollResult<()> {
        for (field, value) in [
            ("daily_wage", self.daily_wage),
            ("overtime_rate", self.overtime_rate),
        ] {
            if value <= Decimal::ZERO {
                return Err(PayrollError::invalid(
                    field,
                    format!("must be greater than zero, got {}", value),
                ));
            }
        }

        for (field, value) in [
            ("hours_per_day", self.hours_per_day),
            ("overtime_per_day", self.overtime_per_day),
            ("other_allowances", self.other_allowances),
            ("deductions", self.deductions),
        ] {
            if value < Decimal::ZERO {
                return Err(PayrollError::invalid(
                    field,
                    format!("must not be negative, got {}", value),
                ));
            }
        }

        Ok(())
    }

    /// `daily_wage / 8`, independent of `hours_per_day`.
    pub fn hourly_rate(&self) -> Decimal {
        hourly_rate_for(self.daily_wage)
    }
}

/// Computes the pay line for one day.
///
/// Regular pay is the flat daily wage whatever the hours. Overtime pay only
/// covers the flat overtime hours; hours above 8 in `hours_per_day` are
/// recorded in `overtime_hours` but not paid here. The daily total is the
/// exact sum of the components and may be negative when deductions exceed
/// everything else.
///
/// # Errors
///
/// Returns [`PayrollError::InvalidInput`] when an amount leaves the range a
/// `Decimal` can hold.
///
/// # Example
///
/// ```
/// use labor_payroll::calculation::{compose_daily_pay, working_days, PayParameters};
/// use rust_decimal::Decimal;
///
/// let params = PayParameters {
///     daily_wage: Decimal::new(100, 0),
///     hours_per_day: Decimal::new(8, 0),
///     overtime_per_day: Decimal::new(2, 0),
///     overtime_rate: Decimal::new(15, 1),
///     other_allowances: Decimal::ZERO,
///     deductions: Decimal::ZERO,
/// };
///
/// // 2024-02-03 is a Saturday
/// let saturday = &working_days(2024, 2, true).unwrap()[2];
/// let line = compose_daily_pay("Ravi", saturday, &params).unwrap();
///
/// assert_eq!(line.overtime_pay, Decimal::new(375, 1));
/// assert_eq!(line.weekend_bonus, Decimal::new(50, 0));
/// assert_eq!(line.total_salary, Decimal::new(1875, 1));
/// ```
pub fn compose_daily_pay(
    labor_name: &str,
    day: &WorkingDay,
    params: &PayParameters,
) -> PayrollResult<DailySalary> {
    let regular_pay = params.daily_wage;
    let overtime_pay = checked::mul(
        "overtime_pay",
        checked::mul("overtime_pay", params.overtime_per_day, params.hourly_rate())?,
        params.overtime_rate,
    )?;
    let weekend_bonus = match day.day_type {
        DayType::Weekend => checked::mul("weekend_bonus", params.daily_wage, WEEKEND_BONUS_RATE)?,
        DayType::Weekday => Decimal::ZERO,
    };
    let holiday_bonus = Decimal::ZERO;

    let total_salary = checked::daily_total(
        regular_pay,
        overtime_pay,
        weekend_bonus,
        holiday_bonus,
        params.other_allowances,
        params.deductions,
    )?;

    let regular_hours = params.hours_per_day.min(STANDARD_DAY_HOURS);
    let extra_hours = (params.hours_per_day - STANDARD_DAY_HOURS).max(Decimal::ZERO);

    Ok(DailySalary {
        labor_name: labor_name.to_string(),
        date: day.date,
        date_str: day.date_str.clone(),
        day_name: day.day_name.clone(),
        day_type: day.day_type,
        daily_wage: params.daily_wage,
        hours_worked: params.hours_per_day,
        regular_hours,
        overtime_hours: checked::add("overtime_hours", extra_hours, params.overtime_per_day)?,
        overtime_rate: params.overtime_rate,
        regular_pay,
        overtime_pay,
        weekend_bonus,
        holiday_bonus,
        other_allowances: params.other_allowances,
        deductions: params.deductions,
        total_salary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::working_days;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn params(daily_wage: &str) -> PayParameters {
        PayParameters {
            daily_wage: dec(daily_wage),
            hours_per_day: dec("8"),
            overtime_per_day: Decimal::ZERO,
            overtime_rate: dec("1.5"),
            other_allowances: Decimal::ZERO,
            deductions: Decimal::ZERO,
        }
    }

    fn weekday() -> WorkingDay {
        // 2024-02-01 is a Thursday
        working_days(2024, 2, false).unwrap().remove(0)
    }

    fn weekend_day() -> WorkingDay {
        // 2024-02-03 is a Saturday
        working_days(2024, 2, true).unwrap().remove(2)
    }

    #[test]
    fn test_regular_pay_is_flat_daily_wage() {
        let mut p = params("100");
        p.hours_per_day = dec("4");
        let line = compose_daily_pay("Ravi", &weekday(), &p).unwrap();
        assert_eq!(line.regular_pay, dec("100"));
        assert_eq!(line.regular_hours, dec("4"));
        assert_eq!(line.total_salary, dec("100"));
    }

    #[test]
    fn test_overtime_pay_uses_eight_hour_divisor() {
        let mut p = params("100");
        p.hours_per_day = dec("10");
        p.overtime_per_day = dec("2");
        let line = compose_daily_pay("Ravi", &weekday(), &p).unwrap();

        // 2 * (100 / 8) * 1.5
        assert_eq!(line.overtime_pay, dec("37.5"));
        assert_eq!(line.regular_hours, dec("8"));
        // 2 hours above the baseline plus 2 flat overtime hours
        assert_eq!(line.overtime_hours, dec("4"));
    }

    #[test]
    fn test_weekend_bonus_only_on_weekend() {
        let p = params("100");
        assert_eq!(compose_daily_pay("Ravi", &weekday(), &p).unwrap().weekend_bonus, Decimal::ZERO);

        let line = compose_daily_pay("Ravi", &weekend_day(), &p).unwrap();
        assert_eq!(line.day_type, DayType::Weekend);
        assert_eq!(line.weekend_bonus, dec("50"));
        assert_eq!(line.total_salary, dec("150"));
    }

    #[test]
    fn test_holiday_bonus_is_always_zero() {
        let line = compose_daily_pay("Ravi", &weekend_day(), &params("100")).unwrap();
        assert_eq!(line.holiday_bonus, Decimal::ZERO);
    }

    #[test]
    fn test_allowances_and_deductions() {
        let mut p = params("100");
        p.other_allowances = dec("10.25");
        p.deductions = dec("5.10");
        let line = compose_daily_pay("Ravi", &weekday(), &p).unwrap();
        assert_eq!(line.total_salary, dec("105.15"));
    }

    #[test]
    fn test_deductions_larger_than_pay_give_negative_total() {
        let mut p = params("100");
        p.deductions = dec("150");
        let line = compose_daily_pay("Ravi", &weekday(), &p).unwrap();
        assert_eq!(line.total_salary, dec("-50"));
    }

    #[test]
    fn test_odd_wage_keeps_exact_decimal() {
        let mut p = params("333");
        p.overtime_per_day = dec("1");
        let line = compose_daily_pay("Ravi", &weekday(), &p).unwrap();
        // 333 / 8 * 1.5 = 62.4375
        assert_eq!(line.overtime_pay, dec("62.4375"));
    }

    #[test]
    fn test_total_identity() {
        let mut p = params("275.50");
        p.overtime_per_day = dec("3");
        p.overtime_rate = dec("2");
        p.other_allowances = dec("12");
        p.deductions = dec("7.5");

        for day in working_days(2024, 6, true).unwrap() {
            let line = compose_daily_pay("Ravi", &day, &p).unwrap();
            assert_eq!(
                line.total_salary,
                line.regular_pay + line.overtime_pay + line.weekend_bonus + line.holiday_bonus
                    + line.other_allowances
                    - line.deductions
            );
        }
    }

    #[test]
    fn test_huge_wage_is_an_error_not_a_panic() {
        let p = params(&Decimal::MAX.to_string());
        match compose_daily_pay("Ravi", &weekend_day(), &p) {
            Err(PayrollError::InvalidInput { field, .. }) => assert_eq!(field, "total_salary"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_parameters_reject_zero_wage() {
        let mut request = MonthlyCalculationRequest::new("Ravi", Decimal::ZERO, 2024, 2);
        match PayParameters::from_request(&request) {
            Err(PayrollError::InvalidInput { field, .. }) => assert_eq!(field, "daily_wage"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }

        request.daily_wage = dec("100");
        request.overtime_rate = Decimal::ZERO;
        assert!(PayParameters::from_request(&request).is_err());
    }

    #[test]
    fn test_parameters_reject_negative_amounts() {
        let mut request = MonthlyCalculationRequest::new("Ravi", dec("100"), 2024, 2);
        request.deductions = dec("-1");
        match PayParameters::from_request(&request) {
            Err(PayrollError::InvalidInput { field, .. }) => assert_eq!(field, "deductions"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
