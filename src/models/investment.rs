//! Investment plan, projection and record models.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::AuditStep;

/// Length of every investment term, in months.
pub const INVESTMENT_TERM_MONTHS: u32 = 6;

/// A catalog entry describing an investment tier.
///
/// The ROI percentage is a flat rate for the whole six-month term; it is
/// neither annualized nor compounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentPlan {
    /// Unique plan identifier (e.g. "premium").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Marketing description.
    #[serde(default)]
    pub description: String,
    /// Flat ROI over the term, in percent.
    pub roi_percentage: Decimal,
    /// Smallest principal the plan accepts.
    pub min_investment: Decimal,
}

/// A validation problem attached to a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionIssue {
    /// The principal is below the plan's minimum investment.
    BelowMinimum,
}

/// Projected return for a principal under a plan.
///
/// Projections are always computed, even for invalid principals, so a form
/// can display live figures. [`InvestmentProjection::is_valid`] tells the
/// caller whether submission should be allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentProjection {
    /// The plan the projection was computed for.
    pub plan_id: String,
    /// The amount invested.
    pub principal: Decimal,
    /// The plan's ROI percentage at computation time.
    pub roi_percentage: Decimal,
    /// Expected profit over the term, at two decimal places.
    pub profit: Decimal,
    /// Principal plus profit.
    pub total_value: Decimal,
    /// Term length in months.
    pub term_months: u32,
    /// The plan minimum the principal was checked against.
    pub min_investment: Decimal,
    /// Set when the projection must not be submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<ProjectionIssue>,
    /// The calculation step that produced this projection.
    pub audit_step: AuditStep,
}

impl InvestmentProjection {
    /// True when the projection can be submitted.
    pub fn is_valid(&self) -> bool {
        self.issue.is_none()
    }

    /// Converts a flagged projection into the matching error.
    pub fn ensure_valid(&self) -> EngineResult<()> {
        match self.issue {
            None => Ok(()),
            Some(ProjectionIssue::BelowMinimum) => Err(EngineError::BelowMinimum {
                plan_id: self.plan_id.clone(),
                principal: self.principal,
                minimum: self.min_investment,
            }),
        }
    }
}

/// Status of an investment relative to a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStatus {
    /// The term has not ended.
    Active,
    /// The term has ended.
    Matured,
}

/// A submitted investment.
///
/// The ROI percentage and profit are snapshots taken from the projection at
/// submission and never recomputed, even if the plan later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    /// Unique identifier.
    pub id: Uuid,
    /// The plan invested in.
    pub plan_id: String,
    /// The principal.
    pub amount: Decimal,
    /// ROI percentage snapshot.
    pub roi_percentage: Decimal,
    /// Expected profit snapshot.
    pub roi_profit: Decimal,
    /// Term length in months.
    pub duration_months: u32,
    /// The first day of the term.
    pub start_date: NaiveDate,
    /// The day the term ends.
    pub maturity_date: NaiveDate,
    /// When the investment was recorded.
    pub created_at: DateTime<Utc>,
}

impl Investment {
    /// Records a projection as an investment starting on `start_date`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::BelowMinimum`] if the projection is flagged invalid
    /// - [`EngineError::InvalidDate`] if the maturity date is out of range
    pub fn from_projection(
        projection: &InvestmentProjection,
        start_date: NaiveDate,
    ) -> EngineResult<Self> {
        projection.ensure_valid()?;

        let maturity_date = start_date
            .checked_add_months(Months::new(projection.term_months))
            .ok_or_else(|| EngineError::InvalidDate {
                message: format!(
                    "{} plus {} months is out of range",
                    start_date, projection.term_months
                ),
            })?;

        Ok(Self {
            id: Uuid::new_v4(),
            plan_id: projection.plan_id.clone(),
            amount: projection.principal,
            roi_percentage: projection.roi_percentage,
            roi_profit: projection.profit,
            duration_months: projection.term_months,
            start_date,
            maturity_date,
            created_at: Utc::now(),
        })
    }

    /// Principal plus the profit snapshot.
    pub fn expected_value(&self) -> Decimal {
        self.amount + self.roi_profit
    }

    /// Whether the term has ended on `date`.
    pub fn status_on(&self, date: NaiveDate) -> InvestmentStatus {
        if date >= self.maturity_date {
            InvestmentStatus::Matured
        } else {
            InvestmentStatus::Active
        }
    }
}
