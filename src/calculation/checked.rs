//! Overflow-checked decimal arithmetic.
//!
//! `Decimal`'s operators panic when a result leaves its range. Every amount
//! derived from user input goes through these helpers instead, so an
//! oversized wage becomes an `InvalidInput` naming the amount being computed.

use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};

pub(crate) fn out_of_range(field: &str) -> PayrollError {
    PayrollError::invalid(field, "amount out of range")
}

pub(crate) fn add(field: &str, a: Decimal, b: Decimal) -> PayrollResult<Decimal> {
    a.checked_add(b).ok_or_else(|| out_of_range(field))
}

pub(crate) fn sub(field: &str, a: Decimal, b: Decimal) -> PayrollResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| out_of_range(field))
}

pub(crate) fn mul(field: &str, a: Decimal, b: Decimal) -> PayrollResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| out_of_range(field))
}

pub(crate) fn sum<I>(field: &str, values: I) -> PayrollResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| add(field, total, value))
}

/// `regular + overtime + weekend + holiday + allowances - deductions`.
pub(crate) fn daily_total(
    regular_pay: Decimal,
    overtime_pay: Decimal,
    weekend_bonus: Decimal,
    holiday_bonus: Decimal,
    other_allowances: Decimal,
    deductions: Decimal,
) -> PayrollResult<Decimal> {
    let gross = sum(
        "total_salary",
        [regular_pay, overtime_pay, weekend_bonus, holiday_bonus, other_allowances],
    )?;
    sub("total_salary", gross, deductions)
}
