//! Allocation request and result models.
//!
//! This module contains the [`AllocationRequest`] input and the
//! [`AllocationResult`] output of the allocation strategy engine.

use std::collections::{HashMap, HashSet};
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::to_cents;
use crate::error::{EngineError, EngineResult};

use super::{AuditStep, AuditWarning, Payee};

/// How a budget is split across payees.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AllocationStrategy;
///
/// let strategy: AllocationStrategy = serde_json::from_str("\"proportional\"").unwrap();
/// assert_eq!(strategy, AllocationStrategy::Proportional);
/// assert_eq!(strategy.to_string(), "proportional");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    /// Every payee receives the same amount, remainder cents in payee order.
    #[default]
    Equal,
    /// Amounts follow each payee's share of the combined salary.
    Proportional,
}

impl fmt::Display for AllocationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationStrategy::Equal => write!(f, "equal"),
            AllocationStrategy::Proportional => write!(f, "proportional"),
        }
    }
}

/// Input to a single allocation run.
///
/// Fields are private so a request can only exist in a validated state:
/// budget and salaries within the money range, valid payees, no duplicate
/// payee ids. The budget and salaries are also kept as whole cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    budget: Decimal,
    payees: Vec<Payee>,
    strategy: AllocationStrategy,
    budget_cents: i128,
    salary_cents: Vec<i128>,
}

impl AllocationRequest {
    /// Builds a validated allocation request.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidAmount`] if `budget` is negative or above
    ///   [`MAX_MONEY_AMOUNT`](crate::calculation::MAX_MONEY_AMOUNT)
    /// - [`EngineError::InvalidPayee`] if a payee fails validation
    /// - [`EngineError::DuplicatePayee`] if a payee id appears twice
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{AllocationRequest, AllocationStrategy, Payee};
    /// use rust_decimal::Decimal;
    ///
    /// let payee = Payee::new("a", "A", Decimal::new(300, 0), "Ops");
    /// let request = AllocationRequest::new(
    ///     Decimal::new(1000, 0),
    ///     vec![payee.clone(), payee],
    ///     AllocationStrategy::Equal,
    /// );
    /// assert!(request.is_err());
    /// ```
    pub fn new(
        budget: Decimal,
        payees: Vec<Payee>,
        strategy: AllocationStrategy,
    ) -> EngineResult<Self> {
        let budget_cents = to_cents(budget).ok_or_else(|| EngineError::InvalidAmount {
            field: "budget".to_string(),
            amount: budget,
        })?;

        let mut seen = HashSet::with_capacity(payees.len());
        let mut salary_cents = Vec::with_capacity(payees.len());
        for payee in &payees {
            payee.validate()?;
            if !seen.insert(payee.id.as_str()) {
                return Err(EngineError::DuplicatePayee {
                    payee_id: payee.id.clone(),
                });
            }
            salary_cents.push(to_cents(payee.salary).ok_or_else(|| EngineError::InvalidPayee {
                payee_id: payee.id.clone(),
                message: format!("salary {} is out of range", payee.salary),
            })?);
        }

        Ok(Self {
            budget,
            payees,
            strategy,
            budget_cents,
            salary_cents,
        })
    }

    /// The budget to distribute.
    pub fn budget(&self) -> Decimal {
        self.budget
    }

    /// The selected payees, in selection order.
    pub fn payees(&self) -> &[Payee] {
        &self.payees
    }

    /// The requested strategy.
    pub fn strategy(&self) -> AllocationStrategy {
        self.strategy
    }

    /// The budget rounded to whole cents.
    pub(crate) fn budget_cents(&self) -> i128 {
        self.budget_cents
    }

    /// Each payee's salary rounded to whole cents, in payee order.
    pub(crate) fn salary_cents(&self) -> &[i128] {
        &self.salary_cents
    }
}

/// The amount allocated to one payee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeeAllocation {
    /// The payee the amount belongs to.
    pub payee_id: String,
    /// The allocated amount, always at two decimal places.
    pub amount: Decimal,
}

/// The output of the allocation strategy engine.
///
/// Allocations keep the order of the request's payees. The total is never
/// stored; it is summed from the allocations each time it is asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// The strategy the caller asked for.
    pub requested_strategy: AllocationStrategy,
    /// The strategy that actually produced the amounts.
    pub strategy: AllocationStrategy,
    /// The budget the amounts were measured against.
    pub budget: Decimal,
    /// Per-payee amounts in payee order.
    pub allocations: Vec<PayeeAllocation>,
    /// The calculation step that produced this result.
    pub audit_step: AuditStep,
    /// Warnings raised while allocating (e.g. a strategy fallback).
    #[serde(default)]
    pub warnings: Vec<AuditWarning>,
}

impl AllocationResult {
    /// Sum of all allocated amounts.
    pub fn total_allocated(&self) -> Decimal {
        self.allocations.iter().map(|a| a.amount).sum()
    }

    /// True when the allocations add up to more than the budget.
    pub fn is_over_budget(&self) -> bool {
        self.total_allocated() > self.budget
    }

    /// True when the requested strategy could not be applied as asked.
    pub fn fell_back(&self) -> bool {
        self.requested_strategy != self.strategy
    }

    /// The amount allocated to a payee, if that payee was part of the run.
    pub fn amount_for(&self, payee_id: &str) -> Option<Decimal> {
        self.allocations
            .iter()
            .find(|a| a.payee_id == payee_id)
            .map(|a| a.amount)
    }

    /// The allocations as a payee id to amount map.
    pub fn amounts(&self) -> HashMap<String, Decimal> {
        self.allocations
            .iter()
            .map(|a| (a.payee_id.clone(), a.amount))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn payee(id: &str, salary: &str) -> Payee {
        Payee::new(id, id.to_uppercase(), dec(salary), "Ops")
    }

    fn result_with(amounts: &[(&str, &str)], budget: &str) -> AllocationResult {
        AllocationResult {
            requested_strategy: AllocationStrategy::Equal,
            strategy: AllocationStrategy::Equal,
            budget: dec(budget),
            allocations: amounts
                .iter()
                .map(|(id, amount)| PayeeAllocation {
                    payee_id: id.to_string(),
                    amount: dec(amount),
                })
                .collect(),
            audit_step: AuditStep {
                step_number: 1,
                rule_id: "equal_split".to_string(),
                rule_name: "Equal Split".to_string(),
                input: serde_json::Value::Null,
                output: serde_json::Value::Null,
                reasoning: String::new(),
            },
            warnings: vec![],
        }
    }

    #[test]
    fn test_strategy_serialization() {
        assert_eq!(
            serde_json::to_string(&AllocationStrategy::Equal).unwrap(),
            "\"equal\""
        );
        assert_eq!(
            serde_json::to_string(&AllocationStrategy::Proportional).unwrap(),
            "\"proportional\""
        );
    }

    #[test]
    fn test_request_rejects_negative_budget() {
        let result = AllocationRequest::new(
            dec("-0.01"),
            vec![payee("a", "1")],
            AllocationStrategy::Equal,
        );
        match result {
            Err(EngineError::InvalidAmount { field, amount }) => {
                assert_eq!(field, "budget");
                assert_eq!(amount, dec("-0.01"));
            }
            other => panic!("Expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_request_rejects_budget_above_ceiling() {
        for budget in [dec("1000000000000000000000000000"), Decimal::MAX] {
            let result =
                AllocationRequest::new(budget, vec![payee("a", "1")], AllocationStrategy::Equal);
            match result {
                Err(EngineError::InvalidAmount { field, amount }) => {
                    assert_eq!(field, "budget");
                    assert_eq!(amount, budget);
                }
                other => panic!("Expected InvalidAmount, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_request_rejects_salary_above_ceiling() {
        let result = AllocationRequest::new(
            dec("10"),
            vec![payee("a", "1"), payee("b", "79228162514264337593543950335")],
            AllocationStrategy::Proportional,
        );
        match result {
            Err(EngineError::InvalidPayee { payee_id, .. }) => assert_eq!(payee_id, "b"),
            other => panic!("Expected InvalidPayee, got {:?}", other),
        }
    }

    #[test]
    fn test_request_keeps_amounts_in_cents() {
        let request = AllocationRequest::new(
            dec("12.345"),
            vec![payee("a", "0.5"), payee("b", "1000")],
            AllocationStrategy::Proportional,
        )
        .unwrap();
        assert_eq!(request.budget_cents(), 1235);
        assert_eq!(request.salary_cents(), &[50, 100_000]);
    }

    #[test]
    fn test_request_rejects_duplicate_payees() {
        let result = AllocationRequest::new(
            dec("10"),
            vec![payee("a", "1"), payee("b", "1"), payee("a", "2")],
            AllocationStrategy::Proportional,
        );
        assert_eq!(
            result.unwrap_err(),
            EngineError::DuplicatePayee {
                payee_id: "a".to_string()
            }
        );
    }

    #[test]
    fn test_request_accepts_empty_payee_list() {
        let request =
            AllocationRequest::new(dec("10"), vec![], AllocationStrategy::Equal).unwrap();
        assert!(request.payees().is_empty());
        assert_eq!(request.budget(), dec("10"));
    }

    #[test]
    fn test_total_is_sum_of_allocations() {
        let result = result_with(&[("a", "33.34"), ("b", "33.33"), ("c", "33.33")], "100");
        assert_eq!(result.total_allocated(), dec("100.00"));
        assert!(!result.is_over_budget());
    }

    #[test]
    fn test_over_budget_when_total_exceeds_budget() {
        let result = result_with(&[("a", "60.00"), ("b", "40.01")], "100");
        assert!(result.is_over_budget());
    }

    #[test]
    fn test_amount_lookup_by_payee() {
        let result = result_with(&[("a", "1.00"), ("b", "2.00")], "3");
        assert_eq!(result.amount_for("b"), Some(dec("2.00")));
        assert_eq!(result.amount_for("z"), None);
        assert_eq!(result.amounts().len(), 2);
    }
}
