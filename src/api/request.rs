//! Request types for the payroll engine API.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AllocationStrategy, PayFrequency, Payee, PayrollStatus, PayrollType};

/// Request body for `POST /allocate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateRequest {
    /// The amount to distribute.
    pub budget: Decimal,
    /// Payees in the order remainder cents are handed out.
    pub payees: Vec<Payee>,
    /// Strategy to use; the configured default when omitted.
    #[serde(default)]
    pub strategy: Option<AllocationStrategy>,
}

/// Request body for `POST /project`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRequest {
    /// The plan to project against.
    pub plan_id: String,
    /// The amount to invest.
    pub principal: Decimal,
}

/// Request body for `POST /payrolls`.
///
/// The payees are proposed amounts with `strategy`, then `overrides` are
/// applied as manual edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayrollRequest {
    /// Payroll name.
    pub name: String,
    /// First day of the pay period.
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period.
    pub pay_period_end: NaiveDate,
    /// Planned payment date.
    #[serde(default)]
    pub payday: Option<NaiveDate>,
    /// The budget to distribute.
    pub budget: Decimal,
    /// One-time or recurring.
    #[serde(rename = "type", default)]
    pub payroll_type: PayrollType,
    /// Recurrence for recurring payrolls.
    #[serde(default)]
    pub frequency: Option<PayFrequency>,
    /// Selected payees.
    pub payees: Vec<Payee>,
    /// Strategy to use; the configured default when omitted.
    #[serde(default)]
    pub strategy: Option<AllocationStrategy>,
    /// Manually entered amounts by payee id.
    #[serde(default)]
    pub overrides: BTreeMap<String, Decimal>,
}

/// Request body for `POST /payrolls/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// The target status.
    pub status: PayrollStatus,
    /// The version the caller last read.
    pub expected_version: u64,
}

/// Request body for `POST /investments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestRequest {
    /// The plan to invest in.
    pub plan_id: String,
    /// The principal.
    pub amount: Decimal,
    /// First day of the term; today when omitted.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}
