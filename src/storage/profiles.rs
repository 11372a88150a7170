//! Laborer profile persistence.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    DEFAULT_OVERTIME_RATE, LaborProfile, LaborProfileUpdate, NewLaborProfile, hourly_rate_for,
};

use super::is_unique_violation;
use super::rows::{PROFILE_COLUMNS, ProfileRow, convert_all};

/// Creates, reads, updates and removes laborer profiles.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
    default_overtime_rate: Decimal,
}

impl ProfileRepository {
    /// Creates a repository over a connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            default_overtime_rate: DEFAULT_OVERTIME_RATE,
        }
    }

    /// Sets the overtime multiplier given to profiles added without one.
    pub fn with_default_overtime_rate(mut self, rate: Decimal) -> Self {
        self.default_overtime_rate = rate;
        self
    }

    /// Inserts a new active profile and returns it.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank name or non-positive rates, `Conflict` when
    /// a profile with the same name already exists (active or not).
    pub async fn add(&self, mut profile: NewLaborProfile) -> PayrollResult<LaborProfile> {
        profile.validate()?;
        let now = Utc::now();
        let hourly_rate = hourly_rate_for(profile.base_daily_wage);
        let overtime_rate = profile.overtime_rate.unwrap_or(self.default_overtime_rate);

        let id = sqlx::query(
            "INSERT INTO labor_profiles (
                name, base_daily_wage, hourly_rate, position, contact_info,
                overtime_rate, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
        )
        .bind(&profile.name)
        .bind(profile.base_daily_wage.to_string())
        .bind(hourly_rate.to_string())
        .bind(&profile.position)
        .bind(&profile.contact_info)
        .bind(overtime_rate.to_string())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_name(e, &profile.name))?
        .last_insert_rowid();

        info!(labor_name = %profile.name, id, "Labor profile added");

        Ok(LaborProfile {
            id,
            name: profile.name,
            base_daily_wage: profile.base_daily_wage,
            hourly_rate,
            position: profile.position,
            contact_info: profile.contact_info,
            overtime_rate,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Looks a profile up by name, whether active or not.
    pub async fn find(&self, name: &str) -> PayrollResult<Option<LaborProfile>> {
        let row = sqlx::query_as::<sqlx::Sqlite, ProfileRow>(&format!(
            "SELECT {} FROM labor_profiles WHERE name = ?1",
            PROFILE_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LaborProfile::try_from).transpose()?)
    }

    /// Looks a profile up by name, failing with `NotFound` when absent.
    pub async fn get(&self, name: &str) -> PayrollResult<LaborProfile> {
        self.find(name).await?.ok_or_else(|| not_found(name))
    }

    /// Lists profiles ordered by name; inactive ones only when asked.
    pub async fn list(&self, include_inactive: bool) -> PayrollResult<Vec<LaborProfile>> {
        let rows = sqlx::query_as::<sqlx::Sqlite, ProfileRow>(&format!(
            "SELECT {} FROM labor_profiles WHERE (?1 OR is_active = 1) ORDER BY name",
            PROFILE_COLUMNS
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(convert_all(rows)?)
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// Renaming a laborer also renames their salary records, in the same
    /// transaction, so reports keep following the profile.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown name, `InvalidInput` when the changes do not
    /// validate, `Conflict` when the new name belongs to another profile or
    /// collides with salary records still saved under it. Nothing is written
    /// on error.
    pub async fn update(
        &self,
        name: &str,
        changes: &LaborProfileUpdate,
    ) -> PayrollResult<LaborProfile> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<sqlx::Sqlite, ProfileRow>(&format!(
            "SELECT {} FROM labor_profiles WHERE name = ?1",
            PROFILE_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?
        .map(LaborProfile::try_from)
        .transpose()?
        .ok_or_else(|| not_found(name))?;

        let mut updated = changes.apply_to(&current)?;
        updated.updated_at = Utc::now();

        sqlx::query(
            "UPDATE labor_profiles SET
                name = ?1, base_daily_wage = ?2, hourly_rate = ?3, position = ?4,
                contact_info = ?5, overtime_rate = ?6, is_active = ?7, updated_at = ?8
            WHERE id = ?9",
        )
        .bind(&updated.name)
        .bind(updated.base_daily_wage.to_string())
        .bind(updated.hourly_rate.to_string())
        .bind(&updated.position)
        .bind(&updated.contact_info)
        .bind(updated.overtime_rate.to_string())
        .bind(updated.is_active)
        .bind(updated.updated_at)
        .bind(updated.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_name(e, &updated.name))?;

        if updated.name != current.name {
            let renamed = sqlx::query("UPDATE salary_records SET labor_name = ?1 WHERE labor_name = ?2")
                .bind(&updated.name)
                .bind(&current.name)
                .execute(&mut *tx)
                .await
                .map_err(|e| leftover_records(e, &updated.name))?
                .rows_affected();
            info!(from = %current.name, to = %updated.name, renamed, "Salary records renamed");
        }

        tx.commit().await?;
        info!(labor_name = %updated.name, "Labor profile updated");

        Ok(updated)
    }

    /// Marks a profile inactive. Its salary records are kept.
    pub async fn deactivate(&self, name: &str) -> PayrollResult<()> {
        let affected = sqlx::query(
            "UPDATE labor_profiles SET is_active = 0, updated_at = ?1 WHERE name = ?2",
        )
        .bind(Utc::now())
        .bind(name)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(not_found(name));
        }
        info!(labor_name = %name, "Labor profile deactivated");
        Ok(())
    }

    /// Removes a profile row permanently. Salary records are left in place.
    pub async fn delete(&self, name: &str) -> PayrollResult<()> {
        let affected = sqlx::query("DELETE FROM labor_profiles WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(not_found(name));
        }
        info!(labor_name = %name, "Labor profile deleted");
        Ok(())
    }
}

fn not_found(name: &str) -> PayrollError {
    PayrollError::NotFound {
        entity: "labor profile",
        key: name.to_string(),
    }
}

fn duplicate_name(error: sqlx::Error, name: &str) -> PayrollError {
    if is_unique_violation(&error) {
        PayrollError::Conflict {
            message: format!("a labor profile named '{}' already exists", name),
        }
    } else {
        error.into()
    }
}

fn leftover_records(error: sqlx::Error, name: &str) -> PayrollError {
    if is_unique_violation(&error) {
        PayrollError::Conflict {
            message: format!(
                "salary records already saved under '{}' share dates with this laborer's records",
                name
            ),
        }
    } else {
        error.into()
    }
}
