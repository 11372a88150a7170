//! Backups, restores and housekeeping for the payroll database.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{Connection, SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::config::BackupConfig;
use crate::error::{PayrollError, PayrollResult};

const PRE_RESTORE_BACKUP: &str = "pre_restore_backup.db";

/// A backup file found in the backup directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupInfo {
    /// File name, e.g. `labor_salary_backup_20240301_181500.db`.
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// Row counts and size of the live database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    /// Profiles that are still active.
    pub active_laborers: i64,
    /// Saved salary records.
    pub total_salary_records: i64,
    /// Earliest saved record date.
    pub earliest_record: Option<NaiveDate>,
    /// Latest saved record date.
    pub latest_record: Option<NaiveDate>,
    /// Database size (page count times page size).
    pub size_bytes: i64,
    /// Schema version recorded in `app_metadata`.
    pub db_version: Option<String>,
}

/// Backup, restore, integrity and statistics operations.
#[derive(Debug, Clone)]
pub struct MaintenanceRepository {
    pool: SqlitePool,
    backup_dir: PathBuf,
}

impl MaintenanceRepository {
    /// Creates a repository writing backups to the configured directory.
    pub fn new(pool: SqlitePool, config: &BackupConfig) -> Self {
        Self {
            pool,
            backup_dir: PathBuf::from(&config.directory),
        }
    }

    /// The directory backups are written to.
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Writes a consistent snapshot of the database into the backup directory.
    ///
    /// Without a name the file is called `labor_salary_backup_<timestamp>.db`.
    /// An existing file with the same name is overwritten. A given name must
    /// be a bare file name; anything that could leave the backup directory
    /// is rejected with `InvalidInput`.
    pub async fn backup(&self, name: Option<&str>) -> PayrollResult<PathBuf> {
        if let Some(name) = name {
            check_backup_name(name)?;
        }

        tokio::fs::create_dir_all(&self.backup_dir)
            .await
            .map_err(io_error(&self.backup_dir))?;

        let file_name = match name {
            Some(name) => name.to_string(),
            None => format!(
                "labor_salary_backup_{}.db",
                Local::now().format("%Y%m%d_%H%M%S")
            ),
        };
        let path = self.backup_dir.join(file_name);

        if tokio::fs::try_exists(&path).await.map_err(io_error(&path))? {
            tokio::fs::remove_file(&path).await.map_err(io_error(&path))?;
        }

        sqlx::query("VACUUM INTO ?1")
            .bind(path.to_string_lossy().into_owned())
            .execute(&self.pool)
            .await?;

        info!(path = %path.display(), "Database backed up");
        Ok(path)
    }

    /// Lists `.db` files in the backup directory, newest first.
    pub async fn list_backups(&self) -> PayrollResult<Vec<BackupInfo>> {
        let mut backups = Vec::new();

        let mut entries = match tokio::fs::read_dir(&self.backup_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(backups),
            Err(e) => return Err(io_error(&self.backup_dir)(e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(io_error(&self.backup_dir))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("db") {
                continue;
            }
            let metadata = entry.metadata().await.map_err(io_error(&path))?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().map_err(io_error(&path))?;

            backups.push(BackupInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                size_bytes: metadata.len(),
                modified: DateTime::<Utc>::from(modified),
            });
        }

        backups.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.name.cmp(&a.name)));
        Ok(backups)
    }

    /// Replaces the live data with the contents of a backup file.
    ///
    /// The current data is first saved as `pre_restore_backup.db`, whose path
    /// is returned. Both tables are emptied and refilled in one transaction.
    pub async fn restore(&self, backup_path: &Path) -> PayrollResult<PathBuf> {
        if !tokio::fs::try_exists(backup_path)
            .await
            .map_err(io_error(backup_path))?
        {
            return Err(PayrollError::NotFound {
                entity: "backup",
                key: backup_path.display().to_string(),
            });
        }

        let safety_copy = self.backup(Some(PRE_RESTORE_BACKUP)).await?;

        let mut conn = self.pool.acquire().await?;
        sqlx::query("ATTACH DATABASE ?1 AS restore_source")
            .bind(backup_path.to_string_lossy().into_owned())
            .execute(&mut *conn)
            .await?;

        let copied = copy_from_attached(&mut conn).await;

        sqlx::query("DETACH DATABASE restore_source")
            .execute(&mut *conn)
            .await?;
        let (profiles, records) = copied?;

        info!(
            source = %backup_path.display(),
            profiles,
            records,
            "Database restored"
        );
        Ok(safety_copy)
    }

    /// Deletes all but the `keep` newest backups.
    ///
    /// Safety copies taken before a restore are never deleted. Returns the
    /// names of the removed files.
    pub async fn cleanup_old_backups(&self, keep: usize) -> PayrollResult<Vec<String>> {
        let backups = self.list_backups().await?;
        let mut deleted = Vec::new();

        for backup in backups.into_iter().skip(keep) {
            if backup.name.contains("pre_restore") {
                continue;
            }
            tokio::fs::remove_file(&backup.path)
                .await
                .map_err(io_error(&backup.path))?;
            info!(name = %backup.name, "Old backup deleted");
            deleted.push(backup.name);
        }

        Ok(deleted)
    }

    /// Runs SQLite's integrity check; true when it reports `ok`.
    pub async fn check_integrity(&self) -> PayrollResult<bool> {
        let result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&self.pool)
            .await?;

        if result != "ok" {
            warn!(result = %result, "Database integrity check failed");
        }
        Ok(result == "ok")
    }

    /// Rebuilds the database file and refreshes planner statistics.
    pub async fn vacuum(&self) -> PayrollResult<()> {
        sqlx::query("VACUUM").execute(&self.pool).await?;
        sqlx::query("ANALYZE").execute(&self.pool).await?;
        info!("Database vacuumed");
        Ok(())
    }

    /// Collects row counts, the saved date range and the database size.
    pub async fn stats(&self) -> PayrollResult<DatabaseStats> {
        let active_laborers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM labor_profiles WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        let total_salary_records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM salary_records")
            .fetch_one(&self.pool)
            .await?;

        let (earliest, latest): (Option<String>, Option<String>) =
            sqlx::query_as("SELECT MIN(date), MAX(date) FROM salary_records")
                .fetch_one(&self.pool)
                .await?;

        let page_count: i64 = sqlx::query_scalar("PRAGMA page_count")
            .fetch_one(&self.pool)
            .await?;
        let page_size: i64 = sqlx::query_scalar("PRAGMA page_size")
            .fetch_one(&self.pool)
            .await?;

        let db_version =
            sqlx::query_scalar::<_, Option<String>>("SELECT value FROM app_metadata WHERE key = 'db_version'")
                .fetch_optional(&self.pool)
                .await?
                .flatten();

        Ok(DatabaseStats {
            active_laborers,
            total_salary_records,
            earliest_record: earliest.as_deref().map(parse_date).transpose()?,
            latest_record: latest.as_deref().map(parse_date).transpose()?,
            size_bytes: page_count * page_size,
            db_version,
        })
    }
}

async fn copy_from_attached(conn: &mut SqliteConnection) -> PayrollResult<(u64, u64)> {
    let mut tx = conn.begin().await?;

    sqlx::query("DELETE FROM main.salary_records")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM main.labor_profiles")
        .execute(&mut *tx)
        .await?;

    let profiles = sqlx::query("INSERT INTO main.labor_profiles SELECT * FROM restore_source.labor_profiles")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let records = sqlx::query("INSERT INTO main.salary_records SELECT * FROM restore_source.salary_records")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok((profiles, records))
}

fn parse_date(text: &str) -> Result<NaiveDate, sqlx::Error> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| sqlx::Error::ColumnDecode {
        index: "date".to_string(),
        source: Box::new(e),
    })
}

fn check_backup_name(name: &str) -> PayrollResult<()> {
    let bare = !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if !bare {
        return Err(PayrollError::invalid(
            "name",
            format!("'{}' is not a plain file name", name),
        ));
    }
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PayrollError + '_ {
    move |source| PayrollError::Io {
        path: path.display().to_string(),
        source,
    }
}
