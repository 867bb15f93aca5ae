//! Equal budget split.
//!
//! This module splits a budget evenly across payees, handing out leftover
//! cents one at a time in payee order.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Payee, PayeeAllocation};

use super::money::{from_cents, round_money, to_cents};

/// The rule identifier recorded in audit steps for equal splits.
pub const EQUAL_SPLIT_RULE_ID: &str = "equal_split";

/// Per-payee amounts produced by a split, with the audit step explaining them.
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// Amounts in payee order.
    pub allocations: Vec<PayeeAllocation>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Splits `total_cents` into `count` whole-cent shares.
///
/// Every share gets `floor(total_cents / count)`; the first
/// `total_cents mod count` shares get one extra cent. The shares always sum
/// to `total_cents`.
pub(crate) fn split_cents_equally(total_cents: i128, count: usize) -> Vec<i128> {
    if count == 0 {
        return Vec::new();
    }

    let n = count as i128;
    let base = total_cents.div_euclid(n);
    let leftover = total_cents.rem_euclid(n);

    (0..n)
        .map(|i| if i < leftover { base + 1 } else { base })
        .collect()
}

/// Calculates an equal split of `budget` across `payees`.
///
/// The budget is first rounded to cents. Leftover cents go one each to the
/// earliest payees, so the result is deterministic and always sums to the
/// rounded budget, even when there are more payees than cents.
///
/// # Arguments
///
/// * `budget` - The amount to distribute
/// * `payees` - The payees, in selection order
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns [`EngineError::InvalidAmount`] if `budget` is negative or above
/// [`MAX_MONEY_AMOUNT`](super::MAX_MONEY_AMOUNT).
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_equal_split;
/// use payroll_engine::models::Payee;
/// use rust_decimal::Decimal;
///
/// let payees = vec![
///     Payee::new("a", "A", Decimal::from(1), "Ops"),
///     Payee::new("b", "B", Decimal::from(1), "Ops"),
///     Payee::new("c", "C", Decimal::from(1), "Ops"),
/// ];
/// let result = calculate_equal_split(Decimal::from(100), &payees, 1).unwrap();
///
/// let amounts: Vec<String> = result.allocations.iter().map(|a| a.amount.to_string()).collect();
/// assert_eq!(amounts, vec!["33.34", "33.33", "33.33"]);
/// ```
pub fn calculate_equal_split(
    budget: Decimal,
    payees: &[Payee],
    step_number: u32,
) -> EngineResult<SplitResult> {
    let total_cents = to_cents(budget).ok_or_else(|| EngineError::InvalidAmount {
        field: "budget".to_string(),
        amount: budget,
    })?;
    Ok(split_equally(total_cents, payees, step_number))
}

/// Equal split of an already validated cent total.
pub(crate) fn split_equally(total_cents: i128, payees: &[Payee], step_number: u32) -> SplitResult {
    let budget = from_cents(total_cents);
    let shares = split_cents_equally(total_cents, payees.len());

    let allocations: Vec<PayeeAllocation> = payees
        .iter()
        .zip(shares)
        .map(|(payee, cents)| PayeeAllocation {
            payee_id: payee.id.clone(),
            amount: from_cents(cents),
        })
        .collect();

    let base_amount = allocations
        .last()
        .map(|a| a.amount)
        .unwrap_or_else(|| round_money(Decimal::ZERO));
    let extra_cents = allocations
        .iter()
        .filter(|a| a.amount > base_amount)
        .count();

    let reasoning = if payees.is_empty() {
        "No payees selected - nothing to allocate".to_string()
    } else if extra_cents > 0 {
        format!(
            "${} / {} payees = ${} each; {} leftover cent(s) given to the first payee(s) in order",
            budget,
            payees.len(),
            base_amount,
            extra_cents
        )
    } else {
        format!(
            "${} / {} payees = ${} each",
            budget,
            payees.len(),
            base_amount
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: EQUAL_SPLIT_RULE_ID.to_string(),
        rule_name: "Equal Split".to_string(),
        input: serde_json::json!({
            "budget": budget.to_string(),
            "payee_count": payees.len()
        }),
        output: serde_json::json!({
            "base_amount": base_amount.to_string(),
            "leftover_cents": extra_cents,
            "allocations": allocations
                .iter()
                .map(|a| serde_json::json!({
                    "payee_id": a.payee_id,
                    "amount": a.amount.to_string()
                }))
                .collect::<Vec<_>>()
        }),
        reasoning,
    };

    SplitResult {
        allocations,
        audit_step,
    }
}
