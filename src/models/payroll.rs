//! Payroll record models.
//!
//! This module contains the persisted [`Payroll`] record together with its
//! [`EmployeePayment`] lines and lifecycle enums.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::Payee;

/// A payment line for one payee.
///
/// The amount starts as an engine proposal or the payee's salary and may be
/// overwritten by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePayment {
    /// The payee receiving the payment.
    pub payee_id: String,
    /// The amount to pay.
    pub amount: Decimal,
}

/// Lifecycle status of a payroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayrollStatus {
    /// Created and still editable.
    #[default]
    Pending,
    /// Approved and paid out.
    Processed,
    /// Abandoned before processing.
    Cancelled,
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayrollStatus::Pending => write!(f, "Pending"),
            PayrollStatus::Processed => write!(f, "Processed"),
            PayrollStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Whether a payroll runs once or repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayrollType {
    /// A single payout.
    #[default]
    OneTime,
    /// A payout repeated at a [`PayFrequency`].
    Recurring,
}

/// How often a recurring payroll repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Every week.
    Weekly,
    /// Every month.
    #[default]
    Monthly,
    /// Every year.
    Yearly,
}

/// A persisted payroll run.
///
/// The total amount is not stored: [`Payroll::total_amount`] sums the
/// payment lines on every call.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{EmployeePayment, Payroll, PayrollStatus, PayrollType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let payroll = Payroll {
///     id: Uuid::new_v4(),
///     name: "May 2025 Payroll".to_string(),
///     date_created: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
///     payday: None,
///     pay_period_start: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
///     pay_period_end: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
///     status: PayrollStatus::Pending,
///     budget: Decimal::new(1000, 0),
///     payroll_type: PayrollType::OneTime,
///     frequency: None,
///     payees: vec![],
///     payments: vec![
///         EmployeePayment { payee_id: "a".to_string(), amount: Decimal::new(40000, 2) },
///         EmployeePayment { payee_id: "b".to_string(), amount: Decimal::new(60000, 2) },
///     ],
///     version: 1,
/// };
/// assert_eq!(payroll.total_amount(), Decimal::new(100000, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier for the payroll.
    pub id: Uuid,
    /// Display name (e.g. "May 2025 Payroll").
    pub name: String,
    /// The date the payroll was created.
    pub date_created: NaiveDate,
    /// The scheduled payout date.
    #[serde(default)]
    pub payday: Option<NaiveDate>,
    /// The first day of the pay period (inclusive).
    pub pay_period_start: NaiveDate,
    /// The last day of the pay period (inclusive).
    pub pay_period_end: NaiveDate,
    /// Lifecycle status.
    pub status: PayrollStatus,
    /// The budget the payments were planned against.
    pub budget: Decimal,
    /// One-time or recurring.
    #[serde(rename = "type")]
    pub payroll_type: PayrollType,
    /// Repeat interval for recurring payrolls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<PayFrequency>,
    /// The payees included in this payroll.
    pub payees: Vec<Payee>,
    /// One payment line per payee.
    pub payments: Vec<EmployeePayment>,
    /// Optimistic-concurrency version, bumped on every stored write.
    #[serde(default)]
    pub version: u64,
}

impl Payroll {
    /// Sum of all payment lines.
    pub fn total_amount(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// True when the payments add up to more than the budget.
    pub fn is_over_budget(&self) -> bool {
        self.total_amount() > self.budget
    }

    /// True while the payroll may still be edited.
    pub fn is_editable(&self) -> bool {
        self.status == PayrollStatus::Pending
    }

    /// Moves the payroll to a new status.
    ///
    /// Only `Pending` payrolls can change status; `Processed` and
    /// `Cancelled` are terminal. Setting `Pending` on a pending payroll is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PayrollImmutable`] if the payroll has already
    /// left `Pending`.
    pub fn transition_to(&mut self, status: PayrollStatus) -> EngineResult<()> {
        if !self.is_editable() {
            return Err(EngineError::PayrollImmutable {
                payroll_id: self.id.to_string(),
                status: self.status.to_string(),
            });
        }
        self.status = status;
        Ok(())
    }
}
