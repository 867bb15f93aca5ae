//! Payee model.
//!
//! This module defines the [`Payee`] struct, a read-only view of an
//! employee record supplied by the external employee store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::MAX_MONEY_AMOUNT;
use crate::error::{EngineError, EngineResult};

/// A person eligible for payroll.
///
/// The engine only reads payees; they are owned by the employee store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payee {
    /// Unique identifier for the payee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Baseline salary, used as the default payment and as the weight for
    /// proportional allocation.
    pub salary: Decimal,
    /// The department the payee belongs to.
    pub department: String,
    /// Job title, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Payout wallet address, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    /// Contact email, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Payee {
    /// Creates a payee with only the required fields populated.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Payee;
    /// use rust_decimal::Decimal;
    ///
    /// let payee = Payee::new("emp_001", "Ada", Decimal::new(5000, 0), "Engineering");
    /// assert_eq!(payee.salary, Decimal::new(5000, 0));
    /// assert!(payee.wallet_address.is_none());
    /// ```
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        salary: Decimal,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            salary,
            department: department.into(),
            position: None,
            wallet_address: None,
            email: None,
        }
    }

    /// Checks the fields the engine relies on.
    ///
    /// A zero salary is accepted: proportional allocation has a documented
    /// fallback for it. Blank ids are rejected, as are salaries that are
    /// negative or above [`MAX_MONEY_AMOUNT`].
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InvalidPayee {
                payee_id: self.id.clone(),
                message: "id must not be blank".to_string(),
            });
        }
        if self.salary < Decimal::ZERO {
            return Err(EngineError::InvalidPayee {
                payee_id: self.id.clone(),
                message: format!("salary {} must not be negative", self.salary),
            });
        }
        if self.salary > MAX_MONEY_AMOUNT {
            return Err(EngineError::InvalidPayee {
                payee_id: self.id.clone(),
                message: format!("salary {} exceeds {}", self.salary, MAX_MONEY_AMOUNT),
            });
        }
        Ok(())
    }
}
