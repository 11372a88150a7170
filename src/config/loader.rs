//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the application
//! configuration from a YAML file once at startup.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};

use super::types::{AppConfig, BackupConfig, DatabaseConfig, PayrollDefaults, ServerConfig};

/// Loads and provides access to the application configuration.
///
/// # Example
///
/// ```no_run
/// use labor_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml")?;
/// println!("Database: {}", loader.database().url);
/// # Ok::<(), labor_payroll::error::PayrollError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file is not valid YAML or misses a required field (`ConfigParseError`)
    /// - A calculation default is out of range (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Parses configuration from YAML text; `origin` names the source in errors.
    pub fn from_yaml_str(content: &str, origin: &str) -> PayrollResult<Self> {
        let config: AppConfig =
            serde_yaml::from_str(content).map_err(|e| PayrollError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        Self::validate(&config, origin)?;

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    fn validate(config: &AppConfig, origin: &str) -> PayrollResult<()> {
        let parse_error = |message: String| PayrollError::ConfigParseError {
            path: origin.to_string(),
            message,
        };

        if config.database.url.trim().is_empty() {
            return Err(parse_error("database.url must not be empty".to_string()));
        }
        if config.database.max_connections == 0 {
            return Err(parse_error(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if config.payroll.hours_per_day < Decimal::ZERO {
            return Err(parse_error(format!(
                "payroll.hours_per_day must not be negative, got {}",
                config.payroll.hours_per_day
            )));
        }
        if config.payroll.overtime_rate <= Decimal::ZERO {
            return Err(parse_error(format!(
                "payroll.overtime_rate must be greater than zero, got {}",
                config.payroll.overtime_rate
            )));
        }

        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the database settings.
    pub fn database(&self) -> &DatabaseConfig {
        &self.config.database
    }

    /// Returns the backup settings.
    pub fn backup(&self) -> &BackupConfig {
        &self.config.backup
    }

    /// Returns the calculation defaults.
    pub fn payroll(&self) -> &PayrollDefaults {
        &self.config.payroll
    }

    /// Returns the HTTP server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.config.server
    }
}
