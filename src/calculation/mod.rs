//! Calculation logic for the labor payroll engine.
//!
//! This module contains the calendar walker that enumerates the paid days of
//! a month, the pay composer that prices a single day, the aggregator that
//! folds daily lines into monthly totals, and the monthly calculation that
//! ties the three together.

mod aggregator;
mod calendar;
pub(crate) mod checked;
mod monthly;
mod pay_composer;

pub use aggregator::{count_day_types, summarize};
pub use calendar::{
    DayType, WorkingDay, first_day_of_month, get_day_type, month_bounds, month_name, working_days,
};
pub use monthly::calculate_monthly_salary;
pub use pay_composer::{PayParameters, WEEKEND_BONUS_RATE, compose_daily_pay};
