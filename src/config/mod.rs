//! Configuration loading and management for the payroll application.
//!
//! The configuration is read from one YAML file at startup into an
//! [`AppConfig`] and handed by reference to whatever needs it. Nothing in the
//! library reads the process environment.
//!
//! # Example
//!
//! ```no_run
//! use labor_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Backups go to {}", config.backup().directory);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, BackupConfig, DatabaseConfig, PayrollDefaults, ServerConfig};
