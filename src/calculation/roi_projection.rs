//! Investment ROI projection.
//!
//! Plans pay a flat percentage over a fixed six-month term; there is no
//! compounding and no annualizing.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, INVESTMENT_TERM_MONTHS, InvestmentPlan, InvestmentProjection, ProjectionIssue,
};

use super::money::{is_valid_money, round_money};

/// The rule identifier recorded in audit steps for projections.
pub const ROI_PROJECTION_RULE_ID: &str = "roi_projection";

/// Projects the return on `principal` under `plan`.
///
/// `profit = round(principal * roi / 100, 2)` and
/// `total_value = principal + profit`. The plan's ROI percentage is copied
/// into the projection, so later plan changes do not affect it.
///
/// A principal below the plan minimum still yields a full projection for
/// live display; it is flagged with [`ProjectionIssue::BelowMinimum`] and
/// [`InvestmentProjection::is_valid`] returns `false`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidAmount`] if `principal` is negative, above
/// [`MAX_MONEY_AMOUNT`](super::MAX_MONEY_AMOUNT), or large enough that the
/// projected total cannot be represented.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::project;
/// use payroll_engine::models::InvestmentPlan;
/// use rust_decimal::Decimal;
///
/// let plan = InvestmentPlan {
///     id: "premium".to_string(),
///     name: "Premium Investor".to_string(),
///     description: String::new(),
///     roi_percentage: Decimal::from(55),
///     min_investment: Decimal::from(5000),
/// };
///
/// let projection = project(&plan, Decimal::from(5000)).unwrap();
/// assert_eq!(projection.profit.to_string(), "2750.00");
/// assert_eq!(projection.total_value, Decimal::from(7750));
/// assert!(projection.is_valid());
/// ```
pub fn project(plan: &InvestmentPlan, principal: Decimal) -> EngineResult<InvestmentProjection> {
    let out_of_range = || EngineError::InvalidAmount {
        field: "principal".to_string(),
        amount: principal,
    };
    if !is_valid_money(principal) {
        return Err(out_of_range());
    }

    let profit = principal
        .checked_mul(plan.roi_percentage)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .map(round_money)
        .ok_or_else(out_of_range)?;
    let total_value = principal.checked_add(profit).ok_or_else(out_of_range)?;
    let below_minimum = principal < plan.min_investment;
    let issue = below_minimum.then_some(ProjectionIssue::BelowMinimum);

    let reasoning = if below_minimum {
        format!(
            "${} is below the {} minimum of ${}; projected {}% return of ${} shown for reference only",
            principal,
            plan.name,
            plan.min_investment,
            plan.roi_percentage.normalize(),
            profit
        )
    } else {
        format!(
            "${} × {}% = ${} profit over {} months (total ${})",
            principal,
            plan.roi_percentage.normalize(),
            profit,
            INVESTMENT_TERM_MONTHS,
            total_value
        )
    };

    let audit_step = AuditStep {
        step_number: 1,
        rule_id: ROI_PROJECTION_RULE_ID.to_string(),
        rule_name: "ROI Projection".to_string(),
        input: serde_json::json!({
            "plan_id": plan.id,
            "principal": principal.to_string(),
            "roi_percentage": plan.roi_percentage.normalize().to_string(),
            "min_investment": plan.min_investment.to_string()
        }),
        output: serde_json::json!({
            "profit": profit.to_string(),
            "total_value": total_value.to_string(),
            "term_months": INVESTMENT_TERM_MONTHS,
            "valid": !below_minimum
        }),
        reasoning,
    };

    Ok(InvestmentProjection {
        plan_id: plan.id.clone(),
        principal,
        roi_percentage: plan.roi_percentage,
        profit,
        total_value,
        term_months: INVESTMENT_TERM_MONTHS,
        min_investment: plan.min_investment,
        issue,
        audit_step,
    })
}
