//! Laborer profile model and related types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};


/// Baseline hours in a working day; the hourly rate is always `wage / 8`.
pub const STANDARD_DAY_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Derives the hourly rate from a daily wage.
///
/// The divisor is fixed at [`STANDARD_DAY_HOURS`] regardless of how many
/// hours the laborer actually works.
///
/// ```
/// use labor_payroll::models::hourly_rate_for;
/// use rust_decimal::Decimal;
///
/// assert_eq!(hourly_rate_for(Decimal::new(100, 0)), Decimal::new(125, 1));
/// ```
pub fn hourly_rate_for(daily_wage: Decimal) -> Decimal {
    daily_wage / STANDARD_DAY_HOURS
}

/// A stored laborer profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborProfile {
    /// Surrogate key.
    pub id: i64,
    /// Unique display name; salary records reference the laborer by it.
    pub name: String,
    /// Flat daily wage, always greater than zero.
    pub base_daily_wage: Decimal,
    /// `base_daily_wage / 8`.
    pub hourly_rate: Decimal,
    /// Job title.
    pub position: String,
    /// Phone number or other contact details.
    pub contact_info: String,
    /// Overtime multiplier, always greater than zero.
    pub overtime_rate: Decimal,
    /// False once the profile has been soft-deleted.
    pub is_active: bool,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a laborer profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLaborProfile {
    /// Unique display name.
    pub name: String,
    /// Flat daily wage.
    pub base_daily_wage: Decimal,
    /// Job title.
    #[serde(default)]
    pub position: String,
    /// Contact details.
    #[serde(default)]
    pub contact_info: String,
    /// Overtime multiplier; the store's configured default when omitted.
    #[serde(default)]
    pub overtime_rate: Option<Decimal>,
}

impl NewLaborProfile {
    /// Creates a profile input with an empty position, no contact details and
    /// no overtime multiplier of its own.
    pub fn new(name: impl Into<String>, base_daily_wage: Decimal) -> Self {
        Self {
            name: name.into(),
            base_daily_wage,
            position: String::new(),
            contact_info: String::new(),
            overtime_rate: None,
        }
    }

    /// Checks the name is present and both rates, when given, are positive.
    ///
    /// The name is trimmed in place, matching how the form strips input.
    pub fn validate(&mut self) -> PayrollResult<()> {
        self.name = self.name.trim().to_string();
        validate_name(&self.name)?;
        validate_positive("base_daily_wage", self.base_daily_wage)?;
        match self.overtime_rate {
            Some(rate) => validate_positive("overtime_rate", rate),
            None => Ok(()),
        }
    }
}

/// A partial update of a laborer profile. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborProfileUpdate {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New daily wage; the hourly rate is re-derived from it.
    #[serde(default)]
    pub base_daily_wage: Option<Decimal>,
    /// New job title.
    #[serde(default)]
    pub position: Option<String>,
    /// New contact details.
    #[serde(default)]
    pub contact_info: Option<String>,
    /// New overtime multiplier.
    #[serde(default)]
    pub overtime_rate: Option<Decimal>,
    /// Reactivate or deactivate the profile.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl LaborProfileUpdate {
    /// Applies the update to a copy of `current`, validating the result.
    pub fn apply_to(&self, current: &LaborProfile) -> PayrollResult<LaborProfile> {
        let mut updated = current.clone();

        if let Some(name) = &self.name {
            let name = name.trim();
            validate_name(name)?;
            updated.name = name.to_string();
        }
        if let Some(wage) = self.base_daily_wage {
            validate_positive("base_daily_wage", wage)?;
            updated.base_daily_wage = wage;
            updated.hourly_rate = hourly_rate_for(wage);
        }
        if let Some(position) = &self.position {
            updated.position = position.clone();
        }
        if let Some(contact_info) = &self.contact_info {
            updated.contact_info = contact_info.clone();
        }
        if let Some(rate) = self.overtime_rate {
            validate_positive("overtime_rate", rate)?;
            updated.overtime_rate = rate;
        }
        if let Some(is_active) = self.is_active {
            updated.is_active = is_active;
        }

        Ok(updated)
    }
}

fn validate_name(name: &str) -> PayrollResult<()> {
    if name.is_empty() {
        return Err(PayrollError::invalid("name", "is required"));
    }
    Ok(())
}

fn validate_positive(field: &str, value: Decimal) -> PayrollResult<()> {
    if value <= Decimal::ZERO {
        return Err(PayrollError::invalid(
            field,
            format!("must be greater than zero, got {}", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_profile() -> LaborProfile {
        let now = Utc::now();
        LaborProfile {
            id: 1,
            name: "Ravi".to_string(),
            base_daily_wage: dec("100"),
            hourly_rate: dec("12.5"),
            position: "Polisher".to_string(),
            contact_info: "050-1234567".to_string(),
            overtime_rate: dec("1.5"),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_hourly_rate_uses_eight_hour_divisor() {
        assert_eq!(hourly_rate_for(dec("100")), dec("12.5"));
        assert_eq!(hourly_rate_for(dec("333")), dec("41.625"));
    }

    #[test]
    fn test_new_profile_defaults() {
        let json = r#"{"name": "Ravi", "base_daily_wage": "100"}"#;
        let profile: NewLaborProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.overtime_rate, None);
        assert!(profile.position.is_empty());
        assert!(profile.contact_info.is_empty());
    }

    #[test]
    fn test_validate_trims_name() {
        let mut profile = NewLaborProfile::new("  Ravi  ", dec("100"));
        profile.validate().unwrap();
        assert_eq!(profile.name, "Ravi");
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut profile = NewLaborProfile::new("   ", dec("100"));
        match profile.validate() {
            Err(PayrollError::InvalidInput { field, .. }) => assert_eq!(field, "name"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_zero_wage() {
        let mut profile = NewLaborProfile::new("Ravi", Decimal::ZERO);
        match profile.validate() {
            Err(PayrollError::InvalidInput { field, .. }) => assert_eq!(field, "base_daily_wage"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_overtime_rate() {
        let mut profile = NewLaborProfile::new("Ravi", dec("100"));
        profile.overtime_rate = Some(dec("-1"));
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_update_rederives_hourly_rate() {
        let profile = create_test_profile();
        let update = LaborProfileUpdate {
            base_daily_wage: Some(dec("160")),
            ..Default::default()
        };

        let updated = update.apply_to(&profile).unwrap();
        assert_eq!(updated.base_daily_wage, dec("160"));
        assert_eq!(updated.hourly_rate, dec("20"));
        assert_eq!(updated.name, "Ravi");
        assert_eq!(updated.position, "Polisher");
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let profile = create_test_profile();
        let updated = LaborProfileUpdate::default().apply_to(&profile).unwrap();
        assert_eq!(updated, profile);
    }

    #[test]
    fn test_update_rejects_zero_overtime_rate() {
        let profile = create_test_profile();
        let update = LaborProfileUpdate {
            overtime_rate: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(update.apply_to(&profile).is_err());
    }
}
