//! The allocation strategy engine.
//!
//! [`allocate`] dispatches an [`AllocationRequest`] to the split for its
//! strategy and packages the amounts into an [`AllocationResult`].

use tracing::debug;

use crate::models::{AllocationRequest, AllocationResult, AllocationStrategy, AuditWarning};

use super::equal_split::split_equally;
use super::proportional_split::split_proportionally;

/// Warning code raised when a proportional split falls back to equal.
pub const ZERO_SALARY_FALLBACK: &str = "ZERO_SALARY_FALLBACK";

/// Allocates the request's budget across its payees.
///
/// This is a pure function: it never touches manual overrides and returns
/// the same result for the same request.
///
/// - No payees: empty allocations, total 0, not over budget.
/// - `Equal`: even split with leftover cents in payee order.
/// - `Proportional`: salary-weighted split with leftover cents by largest
///   remainder. If every salary is zero the engine falls back to `Equal`
///   and records a [`ZERO_SALARY_FALLBACK`] warning.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::allocate;
/// use payroll_engine::models::{AllocationRequest, AllocationStrategy, Payee};
/// use rust_decimal::Decimal;
///
/// let request = AllocationRequest::new(
///     Decimal::from(1000),
///     vec![
///         Payee::new("a", "A", Decimal::from(300), "Ops"),
///         Payee::new("b", "B", Decimal::from(700), "Ops"),
///     ],
///     AllocationStrategy::Proportional,
/// )
/// .unwrap();
///
/// let result = allocate(&request);
/// assert_eq!(result.amount_for("a"), Some(Decimal::from(300)));
/// assert_eq!(result.total_allocated(), Decimal::from(1000));
/// assert!(!result.is_over_budget());
/// ```
pub fn allocate(request: &AllocationRequest) -> AllocationResult {
    let budget = request.budget();
    let budget_cents = request.budget_cents();
    let payees = request.payees();
    let requested_strategy = request.strategy();
    let mut warnings = Vec::new();

    let (strategy, split) = match requested_strategy {
        AllocationStrategy::Equal => (
            AllocationStrategy::Equal,
            split_equally(budget_cents, payees, 1),
        ),
        AllocationStrategy::Proportional => match split_proportionally(
            budget_cents,
            request.salary_cents(),
            payees,
            1,
        ) {
            Some(split) => (AllocationStrategy::Proportional, split),
            None => {
                warnings.push(AuditWarning::new(
                    ZERO_SALARY_FALLBACK,
                    "Selected payees have a combined salary of zero; budget split equally instead",
                    "low",
                ));
                (
                    AllocationStrategy::Equal,
                    split_equally(budget_cents, payees, 1),
                )
            }
        },
    };

    let result = AllocationResult {
        requested_strategy,
        strategy,
        budget,
        allocations: split.allocations,
        audit_step: split.audit_step,
        warnings,
    };

    debug!(
        requested_strategy = %requested_strategy,
        strategy = %strategy,
        payees = payees.len(),
        budget = %budget,
        total = %result.total_allocated(),
        "Allocation computed"
    );

    result
}
