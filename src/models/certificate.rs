//! Salary certificate figures.
//!
//! A salary certificate states a laborer's fixed monthly package. This module
//! validates the request and computes gross and net salary; rendering the
//! document is left to whatever consumes [`SalaryCertificate`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::checked;
use crate::error::{PayrollError, PayrollResult};

/// The figures a certificate is issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRequest {
    /// The laborer's name.
    pub labor_name: String,
    /// Passport number.
    pub passport_number: String,
    /// National identity number.
    pub national_id: String,
    /// Job title.
    pub position: String,
    /// Date the laborer joined.
    pub join_date: NaiveDate,
    /// Basic monthly salary.
    #[serde(default)]
    pub basic_salary: Decimal,
    /// Housing allowance.
    #[serde(default)]
    pub housing_allowance: Decimal,
    /// Transport allowance.
    #[serde(default)]
    pub transport_allowance: Decimal,
    /// Any other allowance.
    #[serde(default)]
    pub other_allowances: Decimal,
    /// Monthly deductions.
    #[serde(default)]
    pub deductions: Decimal,
}

/// A validated certificate with computed totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryCertificate {
    /// The validated request.
    #[serde(flatten)]
    pub request: CertificateRequest,
    /// Basic salary plus every allowance.
    pub gross_salary: Decimal,
    /// Gross salary minus deductions.
    pub net_salary: Decimal,
}

impl SalaryCertificate {
    /// Validates a certificate request and computes its totals.
    ///
    /// # Example
    ///
    /// ```
    /// use labor_payroll::models::{CertificateRequest, SalaryCertificate};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let certificate = SalaryCertificate::from_request(CertificateRequest {
    ///     labor_name: "Ravi".to_string(),
    ///     passport_number: "P1234567".to_string(),
    ///     national_id: "784-1990-1234567-1".to_string(),
    ///     position: "Goldsmith".to_string(),
    ///     join_date: NaiveDate::from_ymd_opt(2021, 4, 1).unwrap(),
    ///     basic_salary: Decimal::new(2500, 0),
    ///     housing_allowance: Decimal::new(800, 0),
    ///     transport_allowance: Decimal::new(200, 0),
    ///     other_allowances: Decimal::ZERO,
    ///     deductions: Decimal::new(100, 0),
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(certificate.gross_salary, Decimal::new(3500, 0));
    /// assert_eq!(certificate.net_salary, Decimal::new(3400, 0));
    /// ```
    pub fn from_request(request: CertificateRequest) -> PayrollResult<Self> {
        for (field, value) in [
            ("labor_name", &request.labor_name),
            ("passport_number", &request.passport_number),
            ("national_id", &request.national_id),
            ("position", &request.position),
        ] {
            if value.trim().is_empty() {
                return Err(PayrollError::invalid(field, "is required"));
            }
        }

        for (field, value) in [
            ("basic_salary", request.basic_salary),
            ("housing_allowance", request.housing_allowance),
            ("transport_allowance", request.transport_allowance),
            ("other_allowances", request.other_allowances),
            ("deductions", request.deductions),
        ] {
            if value < Decimal::ZERO {
                return Err(PayrollError::invalid(
                    field,
                    format!("must not be negative, got {}", value),
                ));
            }
        }

        let gross_salary = checked::sum(
            "gross_salary",
            [
                request.basic_salary,
                request.housing_allowance,
                request.transport_allowance,
                request.other_allowances,
            ],
        )?;
        let net_salary = checked::sub("net_salary", gross_salary, request.deductions)?;

        Ok(Self {
            request,
            gross_salary,
            net_salary,
        })
    }
}
