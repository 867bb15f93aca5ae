//! Salary-proportional budget split.
//!
//! This module splits a budget by each payee's share of the combined salary
//! using the largest-remainder method, so the cent amounts add back up to
//! the rounded budget exactly.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Payee, PayeeAllocation};

use super::equal_split::SplitResult;
use super::money::{from_cents, to_cents};

/// The rule identifier recorded in audit steps for proportional splits.
pub const PROPORTIONAL_SPLIT_RULE_ID: &str = "proportional_split";

/// Splits `total_cents` into whole-cent shares weighted by `weights`.
///
/// Each share starts at `floor(total_cents * weight / total_weight)`. The
/// cents still missing (always fewer than the number of shares) go one each
/// to the shares with the largest remainder, earlier shares first on ties.
///
/// Inputs must be non-negative cent counts no larger than the money ceiling
/// so every product fits in an `i128`. Returns `None` when the weights sum
/// to zero.
pub(crate) fn split_cents_by_weight(total_cents: i128, weights: &[i128]) -> Option<Vec<i128>> {
    if weights.is_empty() {
        return Some(Vec::new());
    }

    let total_weight: i128 = weights.iter().sum();
    if total_weight == 0 {
        return None;
    }

    let mut shares = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for weight in weights {
        let scaled = total_cents * weight;
        shares.push(scaled / total_weight);
        remainders.push(scaled % total_weight);
    }

    let assigned: i128 = shares.iter().sum();
    let leftover = total_cents - assigned;
    debug_assert!((0..weights.len() as i128).contains(&leftover));

    // Largest remainder first; ties keep payee order.
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| match remainders[b].cmp(&remainders[a]) {
        Ordering::Equal => a.cmp(&b),
        other => other,
    });

    for &i in order.iter().take(leftover.max(0) as usize) {
        shares[i] += 1;
    }

    Some(shares)
}

/// Calculates a salary-proportional split of `budget` across `payees`.
///
/// Each payee's exact share is `budget * salary / sum(salaries)`, with the
/// budget and salaries taken at cent precision. Amounts are whole cents,
/// each within one cent of the exact share, and they sum to the budget
/// rounded to cents.
///
/// # Arguments
///
/// * `budget` - The amount to distribute
/// * `payees` - The payees, in selection order
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// `Ok(None)` when the payees' salaries sum to zero, so the caller can apply
/// its fallback instead of dividing by zero.
///
/// # Errors
///
/// - [`EngineError::InvalidAmount`] if `budget` is negative or above
///   [`MAX_MONEY_AMOUNT`](super::MAX_MONEY_AMOUNT)
/// - [`EngineError::InvalidPayee`] if a salary is outside the same range
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_proportional_split;
/// use payroll_engine::models::Payee;
/// use rust_decimal::Decimal;
///
/// let payees = vec![
///     Payee::new("a", "A", Decimal::from(300), "Ops"),
///     Payee::new("b", "B", Decimal::from(700), "Ops"),
/// ];
/// let result = calculate_proportional_split(Decimal::from(1000), &payees, 1)
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(result.allocations[0].amount.to_string(), "300.00");
/// assert_eq!(result.allocations[1].amount.to_string(), "700.00");
/// ```
pub fn calculate_proportional_split(
    budget: Decimal,
    payees: &[Payee],
    step_number: u32,
) -> EngineResult<Option<SplitResult>> {
    let total_cents = to_cents(budget).ok_or_else(|| EngineError::InvalidAmount {
        field: "budget".to_string(),
        amount: budget,
    })?;
    let salary_cents = salaries_in_cents(payees)?;
    Ok(split_proportionally(total_cents, &salary_cents, payees, step_number))
}

/// Converts each payee's salary to cents, rejecting out-of-range salaries.
pub(crate) fn salaries_in_cents(payees: &[Payee]) -> EngineResult<Vec<i128>> {
    payees
        .iter()
        .map(|payee| {
            to_cents(payee.salary).ok_or_else(|| EngineError::InvalidPayee {
                payee_id: payee.id.clone(),
                message: format!("salary {} is out of range", payee.salary),
            })
        })
        .collect()
}

/// Proportional split of an already validated cent total and cent salaries.
pub(crate) fn split_proportionally(
    total_cents: i128,
    salary_cents: &[i128],
    payees: &[Payee],
    step_number: u32,
) -> Option<SplitResult> {
    let shares = split_cents_by_weight(total_cents, salary_cents)?;
    let budget = from_cents(total_cents);
    let total_salary = from_cents(salary_cents.iter().sum());

    let allocations: Vec<PayeeAllocation> = payees
        .iter()
        .zip(shares)
        .map(|(payee, cents)| PayeeAllocation {
            payee_id: payee.id.clone(),
            amount: from_cents(cents),
        })
        .collect();

    let reasoning = if payees.is_empty() {
        "No payees selected - nothing to allocate".to_string()
    } else {
        format!(
            "${} split across {} payees by salary share of ${}",
            budget,
            payees.len(),
            total_salary.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: PROPORTIONAL_SPLIT_RULE_ID.to_string(),
        rule_name: "Proportional Split".to_string(),
        input: serde_json::json!({
            "budget": budget.to_string(),
            "payee_count": payees.len(),
            "total_salary": total_salary.normalize().to_string()
        }),
        output: serde_json::json!({
            "allocations": payees
                .iter()
                .zip(&allocations)
                .map(|(payee, a)| serde_json::json!({
                    "payee_id": a.payee_id,
                    "salary": payee.salary.normalize().to_string(),
                    "amount": a.amount.to_string()
                }))
                .collect::<Vec<_>>()
        }),
        reasoning,
    };

    Some(SplitResult {
        allocations,
        audit_step,
    })
}
