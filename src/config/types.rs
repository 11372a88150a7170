//! Configuration types for the payroll application.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DEFAULT_HOURS_PER_DAY, DEFAULT_OVERTIME_RATE};

fn default_max_connections() -> u32 {
    5
}

fn default_backup_directory() -> String {
    "backups".to_string()
}

fn default_keep_count() -> usize {
    10
}

fn default_hours_per_day() -> Decimal {
    DEFAULT_HOURS_PER_DAY
}

fn default_overtime_rate() -> Decimal {
    DEFAULT_OVERTIME_RATE
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://labor_salary.db` or `sqlite::memory:`.
    pub url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Settings for a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    /// Returns true when the URL names an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Backup housekeeping settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BackupConfig {
    /// Directory backups are written to; created on first use.
    #[serde(default = "default_backup_directory")]
    pub directory: String,
    /// How many backups cleanup keeps.
    #[serde(default = "default_keep_count")]
    pub keep_count: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            directory: default_backup_directory(),
            keep_count: default_keep_count(),
        }
    }
}

/// Calculation defaults used when a request leaves a field out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollDefaults {
    /// Hours worked per day.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: Decimal,
    /// Overtime multiplier for new profiles.
    #[serde(default = "default_overtime_rate")]
    pub overtime_rate: Decimal,
    /// Whether weekends are worked.
    #[serde(default)]
    pub include_weekends: bool,
}

impl Default for PayrollDefaults {
    fn default() -> Self {
        Self {
            hours_per_day: default_hours_per_day(),
            overtime_rate: default_overtime_rate(),
            include_weekends: false,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// The complete application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Backup settings.
    #[serde(default)]
    pub backup: BackupConfig,
    /// Calculation defaults.
    #[serde(default)]
    pub payroll: PayrollDefaults,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}
