//! Request types for the payroll API.
//!
//! This module defines the JSON bodies and query strings the endpoints
//! accept. Profile, certificate and salary bodies reuse the model types
//! directly.

use serde::{Deserialize, Serialize};

use crate::service::{LaborCalculationRequest, SaveMode};

/// Request body for `POST /calculations`.
///
/// Calculation fields sit at the top level next to `labor_name`:
///
/// ```json
/// { "labor_name": "Ravi", "year": 2024, "month": 2, "overtime_per_day": "2", "save": "insert" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The stored laborer to calculate for.
    pub labor_name: String,
    /// Month and overrides.
    #[serde(flatten)]
    pub calculation: LaborCalculationRequest,
    /// Whether and how to persist the result.
    #[serde(default)]
    pub save: SaveMode,
}

/// Query string for `GET /profiles`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListProfilesQuery {
    /// Include deactivated profiles.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query string for `DELETE /profiles/:name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteProfileQuery {
    /// Remove the row instead of deactivating it.
    #[serde(default)]
    pub hard: bool,
}

/// Query string for the report endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Report year.
    pub year: i32,
    /// Report month, 1-12.
    pub month: u32,
    /// Restrict the report to one laborer.
    #[serde(default)]
    pub labor_name: Option<String>,
}

/// Query string for `DELETE /salaries/:name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthQuery {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}
