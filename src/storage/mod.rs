//! Relational persistence for profiles and salary records.
//!
//! The store is a SQLite database reached through a pooled `sqlx` connection.
//! Each repository owns a clone of the pool; every multi-row write runs in a
//! single transaction so a failed batch leaves nothing behind.

mod maintenance;
mod profiles;
mod reports;
mod rows;
mod salaries;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::PayrollResult;

pub use maintenance::{BackupInfo, DatabaseStats, MaintenanceRepository};
pub use profiles::ProfileRepository;
pub use reports::ReportRepository;
pub use salaries::SalaryRepository;

/// A handle on the payroll database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens a connection pool for the configured database.
    ///
    /// File databases are created when missing. An in-memory database is
    /// pinned to a single connection that never expires, since its contents
    /// live only as long as that connection.
    pub async fn connect(config: &DatabaseConfig) -> PayrollResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        info!(url = %config.url, "Database connection pool created");

        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> PayrollResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Connects and migrates in one step.
    pub async fn open(config: &DatabaseConfig) -> PayrollResult<Self> {
        let database = Self::connect(config).await?;
        database.migrate().await?;
        Ok(database)
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Returns true when a database error is a uniqueness-constraint violation.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_error) if db_error.is_unique_violation())
}
