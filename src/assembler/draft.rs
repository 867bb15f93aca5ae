//! The payroll draft assembler.
//!
//! A [`PayrollAssembler`] holds one user's in-progress payroll: the selected
//! payees, their payment lines and which lines were set by hand. Totals are
//! recomputed from the payment lines on every read.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::calculation::{MAX_MONEY_AMOUNT, allocate, is_valid_money};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AllocationRequest, AllocationResult, AllocationStrategy, EmployeePayment, PayFrequency, Payee,
    Payroll, PayrollStatus, PayrollType,
};

use super::OverridePolicy;

/// Builds a payroll record from payee selections, engine proposals and
/// manual overrides.
///
/// # Example
///
/// ```
/// use payroll_engine::assembler::PayrollAssembler;
/// use payroll_engine::models::{AllocationStrategy, Payee};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut draft = PayrollAssembler::new(
///     "May 2025 Payroll",
///     NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
///     Decimal::from(100),
/// )
/// .unwrap();
///
/// draft.add_payee(Payee::new("a", "A", Decimal::from(40), "Ops")).unwrap();
/// draft.add_payee(Payee::new("b", "B", Decimal::from(40), "Ops")).unwrap();
/// assert_eq!(draft.total_amount(), Decimal::from(80));
///
/// draft.distribute(AllocationStrategy::Equal).unwrap();
/// assert_eq!(draft.total_amount(), Decimal::from(100));
///
/// let payroll = draft.to_payroll().unwrap();
/// assert_eq!(payroll.payments.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PayrollAssembler {
    id: Option<Uuid>,
    version: u64,
    name: String,
    date_created: NaiveDate,
    payday: Option<NaiveDate>,
    pay_period_start: NaiveDate,
    pay_period_end: NaiveDate,
    budget: Decimal,
    payroll_type: PayrollType,
    frequency: Option<PayFrequency>,
    payees: Vec<Payee>,
    payments: Vec<EmployeePayment>,
    manual: HashSet<String>,
    policy: OverridePolicy,
}

impl PayrollAssembler {
    /// Starts an empty one-time draft.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAmount`] if `budget` is negative or
    /// above [`MAX_MONEY_AMOUNT`].
    pub fn new(
        name: impl Into<String>,
        pay_period_start: NaiveDate,
        pay_period_end: NaiveDate,
        budget: Decimal,
    ) -> EngineResult<Self> {
        check_budget(budget)?;
        Ok(Self {
            id: None,
            version: 0,
            name: name.into(),
            date_created: Utc::now().date_naive(),
            payday: None,
            pay_period_start,
            pay_period_end,
            budget,
            payroll_type: PayrollType::OneTime,
            frequency: None,
            payees: Vec::new(),
            payments: Vec::new(),
            manual: HashSet::new(),
            policy: OverridePolicy::default(),
        })
    }

    /// Reopens a stored payroll for editing.
    ///
    /// Stored payment amounts are loaded as they are; none of them is
    /// treated as manually set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PayrollImmutable`] unless the payroll is
    /// `Pending`.
    pub fn from_payroll(payroll: &Payroll) -> EngineResult<Self> {
        if !payroll.is_editable() {
            return Err(EngineError::PayrollImmutable {
                payroll_id: payroll.id.to_string(),
                status: payroll.status.to_string(),
            });
        }

        let payments = payroll
            .payees
            .iter()
            .map(|payee| EmployeePayment {
                payee_id: payee.id.clone(),
                amount: payroll
                    .payments
                    .iter()
                    .find(|p| p.payee_id == payee.id)
                    .map(|p| p.amount)
                    .unwrap_or(Decimal::ZERO),
            })
            .collect();

        Ok(Self {
            id: Some(payroll.id),
            version: payroll.version,
            name: payroll.name.clone(),
            date_created: payroll.date_created,
            payday: payroll.payday,
            pay_period_start: payroll.pay_period_start,
            pay_period_end: payroll.pay_period_end,
            budget: payroll.budget,
            payroll_type: payroll.payroll_type,
            frequency: payroll.frequency,
            payees: payroll.payees.clone(),
            payments,
            manual: HashSet::new(),
            policy: OverridePolicy::default(),
        })
    }

    /// Sets the override policy used by [`PayrollAssembler::distribute`].
    pub fn with_policy(mut self, policy: OverridePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active override policy.
    pub fn policy(&self) -> OverridePolicy {
        self.policy
    }

    /// Renames the draft.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the payout date.
    pub fn set_payday(&mut self, payday: Option<NaiveDate>) {
        self.payday = payday;
    }

    /// Makes the payroll one-time, or recurring at `frequency`.
    ///
    /// A recurring payroll without a frequency defaults to monthly.
    pub fn set_schedule(&mut self, payroll_type: PayrollType, frequency: Option<PayFrequency>) {
        self.payroll_type = payroll_type;
        self.frequency = match payroll_type {
            PayrollType::OneTime => None,
            PayrollType::Recurring => Some(frequency.unwrap_or_default()),
        };
    }

    /// Changes the budget. Existing payments are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAmount`] if `budget` is negative or
    /// above [`MAX_MONEY_AMOUNT`].
    pub fn set_budget(&mut self, budget: Decimal) -> EngineResult<()> {
        check_budget(budget)?;
        self.budget = budget;
        Ok(())
    }

    /// The current budget.
    pub fn budget(&self) -> Decimal {
        self.budget
    }

    /// The selected payees, in selection order.
    pub fn payees(&self) -> &[Payee] {
        &self.payees
    }

    /// The payment lines, in payee order.
    pub fn payments(&self) -> &[EmployeePayment] {
        &self.payments
    }

    /// The payment amount for a payee, if selected.
    pub fn payment_for(&self, payee_id: &str) -> Option<Decimal> {
        self.payments
            .iter()
            .find(|p| p.payee_id == payee_id)
            .map(|p| p.amount)
    }

    /// True if the payee's amount was set by hand since the last full
    /// distribution.
    pub fn is_manual(&self, payee_id: &str) -> bool {
        self.manual.contains(payee_id)
    }

    /// Sum of all payment lines.
    pub fn total_amount(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// True when the payments add up to more than the budget.
    pub fn is_over_budget(&self) -> bool {
        self.total_amount() > self.budget
    }

    /// Budget minus total; negative when over budget.
    pub fn remaining_budget(&self) -> Decimal {
        self.budget - self.total_amount()
    }

    /// Adds a payee with a default payment equal to their salary.
    ///
    /// Returns `Ok(false)` if the payee was already selected; nothing
    /// changes in that case.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPayee`] if the payee fails validation.
    pub fn add_payee(&mut self, payee: Payee) -> EngineResult<bool> {
        payee.validate()?;
        if self.payees.iter().any(|p| p.id == payee.id) {
            return Ok(false);
        }

        self.payments.push(EmployeePayment {
            payee_id: payee.id.clone(),
            amount: payee.salary,
        });
        self.payees.push(payee);
        Ok(true)
    }

    /// Removes a payee together with their payment line.
    ///
    /// Returns `false` if the payee was not selected.
    pub fn remove_payee(&mut self, payee_id: &str) -> bool {
        let before = self.payees.len();
        self.payees.retain(|p| p.id != payee_id);
        self.payments.retain(|p| p.payee_id != payee_id);
        self.manual.remove(payee_id);
        self.payees.len() != before
    }

    /// Sets a payee's amount by hand and marks it as manually set.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidOverride`] if `amount` is negative or above
    ///   [`MAX_MONEY_AMOUNT`]
    /// - [`EngineError::PayeeNotFound`] if the payee is not selected
    pub fn set_override(&mut self, payee_id: &str, amount: Decimal) -> EngineResult<()> {
        if !is_valid_money(amount) {
            return Err(EngineError::InvalidOverride {
                payee_id: payee_id.to_string(),
                amount,
            });
        }

        let payment = self
            .payments
            .iter_mut()
            .find(|p| p.payee_id == payee_id)
            .ok_or_else(|| EngineError::PayeeNotFound {
                payee_id: payee_id.to_string(),
            })?;
        payment.amount = amount;
        self.manual.insert(payee_id.to_string());
        Ok(())
    }

    /// Proposes amounts with the allocation engine.
    ///
    /// Under [`OverridePolicy::PreserveManual`], manually set payees keep
    /// their amounts and only the budget they leave over (never below zero)
    /// is allocated across the other payees. Under
    /// [`OverridePolicy::OverwriteAll`] this behaves like
    /// [`PayrollAssembler::distribute_all`].
    ///
    /// Returns the engine result for the payees that were redistributed.
    pub fn distribute(&mut self, strategy: AllocationStrategy) -> EngineResult<AllocationResult> {
        if self.policy == OverridePolicy::OverwriteAll || self.manual.is_empty() {
            return self.distribute_all(strategy);
        }

        let manual_total: Decimal = self
            .payments
            .iter()
            .filter(|p| self.manual.contains(&p.payee_id))
            .map(|p| p.amount)
            .sum();
        let remaining = (self.budget - manual_total).max(Decimal::ZERO);
        let unlocked: Vec<Payee> = self
            .payees
            .iter()
            .filter(|p| !self.manual.contains(&p.id))
            .cloned()
            .collect();

        let request = AllocationRequest::new(remaining, unlocked, strategy)?;
        let result = allocate(&request);
        self.apply(&result);

        debug!(
            strategy = %strategy,
            locked = self.manual.len(),
            redistributed = result.allocations.len(),
            remaining_budget = %remaining,
            total = %self.total_amount(),
            "Distributed budget around manual overrides"
        );

        Ok(result)
    }

    /// Replaces every payment with a fresh engine proposal and clears all
    /// manual flags.
    pub fn distribute_all(
        &mut self,
        strategy: AllocationStrategy,
    ) -> EngineResult<AllocationResult> {
        let request = AllocationRequest::new(self.budget, self.payees.clone(), strategy)?;
        let result = allocate(&request);
        self.manual.clear();
        self.apply(&result);

        debug!(
            strategy = %strategy,
            payees = self.payees.len(),
            total = %self.total_amount(),
            "Distributed full budget"
        );

        Ok(result)
    }

    fn apply(&mut self, result: &AllocationResult) {
        for payment in &mut self.payments {
            if let Some(amount) = result.amount_for(&payment.payee_id) {
                payment.amount = amount;
            }
        }
    }

    /// Assembles the submission record.
    ///
    /// A new draft gets a fresh id; a reopened one keeps its id and version.
    ///
    /// # Errors
    ///
    /// - [`EngineError::IncompletePayroll`] if the name is blank, no payee is
    ///   selected, or the total is zero
    /// - [`EngineError::InvalidPayPeriod`] if the period ends before it starts
    pub fn to_payroll(&self) -> EngineResult<Payroll> {
        if self.name.trim().is_empty() {
            return Err(EngineError::IncompletePayroll {
                reason: "payroll name is required".to_string(),
            });
        }
        if self.payees.is_empty() {
            return Err(EngineError::IncompletePayroll {
                reason: "no payees selected".to_string(),
            });
        }
        if self.total_amount().is_zero() {
            return Err(EngineError::IncompletePayroll {
                reason: "total amount is zero".to_string(),
            });
        }
        if self.pay_period_end < self.pay_period_start {
            return Err(EngineError::InvalidPayPeriod {
                message: format!(
                    "end date {} is before start date {}",
                    self.pay_period_end, self.pay_period_start
                ),
            });
        }

        Ok(Payroll {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: self.name.trim().to_string(),
            date_created: self.date_created,
            payday: self.payday,
            pay_period_start: self.pay_period_start,
            pay_period_end: self.pay_period_end,
            status: PayrollStatus::Pending,
            budget: self.budget,
            payroll_type: self.payroll_type,
            frequency: self.frequency,
            payees: self.payees.clone(),
            payments: self.payments.clone(),
            version: self.version,
        })
    }
}

fn check_budget(budget: Decimal) -> EngineResult<()> {
    if !is_valid_money(budget) {
        return Err(EngineError::InvalidAmount {
            field: "budget".to_string(),
            amount: budget,
        });
    }
    Ok(())
}
