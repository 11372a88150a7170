//! Core data models for the labor payroll engine.
//!
//! This module contains the laborer profile, the transient monthly
//! calculation, the persisted salary record and the report rows.

mod certificate;
mod labor_profile;
mod monthly_calculation;
mod salary_record;

pub use certificate::{CertificateRequest, SalaryCertificate};
pub use labor_profile::{
    LaborProfile, LaborProfileUpdate, NewLaborProfile, STANDARD_DAY_HOURS, hourly_rate_for,
};
pub use monthly_calculation::{
    DEFAULT_HOURS_PER_DAY, DEFAULT_OVERTIME_RATE, DailySalary, MonthlyCalculation,
    MonthlyCalculationRequest, SalarySummary,
};
pub use salary_record::{LaborSummary, SalaryRecord};
