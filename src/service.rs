//! Payroll service.
//!
//! [`PayrollService`] ties the profile store to the calculator: it looks a
//! laborer up, fills the calculation request from their profile and the
//! configured defaults, and optionally saves the result.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculation::calculate_monthly_salary;
use crate::config::{BackupConfig, PayrollDefaults};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{LaborProfile, MonthlyCalculation, MonthlyCalculationRequest};
use crate::storage::{
    Database, MaintenanceRepository, ProfileRepository, ReportRepository, SalaryRepository,
};

/// A calculation for a stored laborer.
///
/// Unset fields come from the laborer's profile (wage, overtime multiplier)
/// or from the configured [`PayrollDefaults`] (hours, weekends).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborCalculationRequest {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Custom daily wage instead of the profile's base wage.
    #[serde(default)]
    pub daily_wage: Option<Decimal>,
    /// Hours worked on each day.
    #[serde(default)]
    pub hours_per_day: Option<Decimal>,
    /// Flat overtime hours paid on each day.
    #[serde(default)]
    pub overtime_per_day: Decimal,
    /// Overtime multiplier instead of the profile's.
    #[serde(default)]
    pub overtime_rate: Option<Decimal>,
    /// Whether Saturdays and Sundays are worked.
    #[serde(default)]
    pub include_weekends: Option<bool>,
    /// Allowance added to every worked day.
    #[serde(default)]
    pub other_allowances: Decimal,
    /// Deduction subtracted from every worked day.
    #[serde(default)]
    pub deductions: Decimal,
}

impl LaborCalculationRequest {
    /// Creates a request for a month with everything else defaulted.
    pub fn for_month(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            ..Default::default()
        }
    }

    /// Builds the full calculator input for a profile.
    pub fn resolve(
        &self,
        profile: &LaborProfile,
        defaults: &PayrollDefaults,
    ) -> MonthlyCalculationRequest {
        MonthlyCalculationRequest {
            labor_name: profile.name.clone(),
            daily_wage: self.daily_wage.unwrap_or(profile.base_daily_wage),
            year: self.year,
            month: self.month,
            hours_per_day: self.hours_per_day.unwrap_or(defaults.hours_per_day),
            overtime_per_day: self.overtime_per_day,
            overtime_rate: self.overtime_rate.unwrap_or(profile.overtime_rate),
            include_weekends: self.include_weekends.unwrap_or(defaults.include_weekends),
            other_allowances: self.other_allowances,
            deductions: self.deductions,
        }
    }
}

/// How a calculation should be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    /// Calculate only.
    #[default]
    None,
    /// Insert new records; fail with `Conflict` if any day is already saved.
    Insert,
    /// Replace whatever is saved for the laborer and month.
    Replace,
}

/// Entry point for payroll operations over one database.
#[derive(Debug, Clone)]
pub struct PayrollService {
    profiles: ProfileRepository,
    salaries: SalaryRepository,
    reports: ReportRepository,
    maintenance: MaintenanceRepository,
    defaults: PayrollDefaults,
    backup_keep_count: usize,
}

impl PayrollService {
    /// Creates a service over an opened database.
    pub fn new(database: &Database, defaults: PayrollDefaults, backup: &BackupConfig) -> Self {
        let pool = database.pool().clone();
        Self {
            profiles: ProfileRepository::new(pool.clone())
                .with_default_overtime_rate(defaults.overtime_rate),
            salaries: SalaryRepository::new(pool.clone()),
            reports: ReportRepository::new(pool.clone()),
            maintenance: MaintenanceRepository::new(pool, backup),
            defaults,
            backup_keep_count: backup.keep_count,
        }
    }

    /// The laborer profile store.
    pub fn profiles(&self) -> &ProfileRepository {
        &self.profiles
    }

    /// The salary record store.
    pub fn salaries(&self) -> &SalaryRepository {
        &self.salaries
    }

    /// The report queries.
    pub fn reports(&self) -> &ReportRepository {
        &self.reports
    }

    /// Backup and housekeeping operations.
    pub fn maintenance(&self) -> &MaintenanceRepository {
        &self.maintenance
    }

    /// The calculation defaults in effect.
    pub fn defaults(&self) -> &PayrollDefaults {
        &self.defaults
    }

    /// Calculates a month for a stored laborer.
    ///
    /// # Errors
    ///
    /// `NotFound` when no profile has that name, `InvalidInput` when the
    /// profile is inactive or the resolved inputs are out of range.
    pub async fn calculate_for_laborer(
        &self,
        labor_name: &str,
        request: &LaborCalculationRequest,
    ) -> PayrollResult<MonthlyCalculation> {
        let profile = self.profiles.get(labor_name).await?;
        if !profile.is_active {
            return Err(PayrollError::invalid(
                "labor_name",
                format!("laborer '{}' is inactive", profile.name),
            ));
        }

        calculate_monthly_salary(&request.resolve(&profile, &self.defaults))
    }

    /// Calculates a month for a stored laborer and persists it per `mode`.
    ///
    /// Returns the calculation and the number of records written.
    pub async fn calculate_and_save(
        &self,
        labor_name: &str,
        request: &LaborCalculationRequest,
        mode: SaveMode,
    ) -> PayrollResult<(MonthlyCalculation, u64)> {
        let calculation = self.calculate_for_laborer(labor_name, request).await?;
        let written = self.save(&calculation, mode).await?;
        Ok((calculation, written))
    }

    /// Persists a calculation per `mode`, returning the records written.
    pub async fn save(&self, calculation: &MonthlyCalculation, mode: SaveMode) -> PayrollResult<u64> {
        match mode {
            SaveMode::None => Ok(0),
            SaveMode::Insert => self.salaries.save_calculation(calculation).await,
            SaveMode::Replace => self.salaries.replace_month(calculation).await,
        }
    }

    /// Takes a timestamped backup, then prunes old ones down to the
    /// configured keep count.
    pub async fn backup_and_prune(&self) -> PayrollResult<(PathBuf, Vec<String>)> {
        let path = self.maintenance.backup(None).await?;
        let deleted = self
            .maintenance
            .cleanup_old_backups(self.backup_keep_count)
            .await?;

        info!(
            path = %path.display(),
            pruned = deleted.len(),
            "Backup taken"
        );
        Ok((path, deleted))
    }
}
