//! Response types for the payroll engine API.
//!
//! This module defines the success bodies returned by each endpoint, the
//! error response structure, and the mapping from [`EngineError`] to HTTP
//! status codes.

use std::collections::HashMap;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{
    AllocationResult, AllocationStrategy, AuditTrace, Investment, InvestmentProjection,
    InvestmentStatus, Notification, Payroll, ProjectionIssue,
};

/// Body returned by `POST /allocate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResponse {
    /// Amount per payee id.
    pub amounts: HashMap<String, Decimal>,
    /// Sum of all amounts.
    pub total: Decimal,
    /// True when the total exceeds the budget.
    pub over_budget: bool,
    /// The strategy that produced the amounts.
    pub strategy: AllocationStrategy,
    /// The strategy the caller asked for.
    pub requested_strategy: AllocationStrategy,
    /// How the amounts were derived.
    pub audit_trace: AuditTrace,
}

impl From<AllocationResult> for AllocationResponse {
    fn from(result: AllocationResult) -> Self {
        Self {
            amounts: result.amounts(),
            total: result.total_allocated(),
            over_budget: result.is_over_budget(),
            strategy: result.strategy,
            requested_strategy: result.requested_strategy,
            audit_trace: AuditTrace {
                steps: vec![result.audit_step],
                warnings: result.warnings,
            },
        }
    }
}

/// Body returned by `POST /project`.
///
/// A principal below the plan minimum still gets figures; `valid` is false,
/// `error` carries the issue code and `message` explains it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResponse {
    /// The plan projected against.
    pub plan_id: String,
    /// The amount invested.
    pub principal: Decimal,
    /// The plan's ROI percentage.
    pub roi_percentage: Decimal,
    /// Expected profit over the term.
    pub profit: Decimal,
    /// Principal plus profit.
    pub total_value: Decimal,
    /// Term length in months.
    pub term_months: u32,
    /// Whether the projection can be submitted.
    pub valid: bool,
    /// Why the projection cannot be submitted, as a stable code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProjectionIssue>,
    /// Human-readable explanation of `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<InvestmentProjection> for ProjectionResponse {
    fn from(projection: InvestmentProjection) -> Self {
        let message = projection.ensure_valid().err().map(|e| e.to_string());
        Self {
            valid: projection.is_valid(),
            plan_id: projection.plan_id,
            principal: projection.principal,
            roi_percentage: projection.roi_percentage,
            profit: projection.profit,
            total_value: projection.total_value,
            term_months: projection.term_months,
            error: projection.issue,
            message,
        }
    }
}

/// A stored payroll with its derived totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollResponse {
    /// The stored payroll.
    #[serde(flatten)]
    pub payroll: Payroll,
    /// Sum of all payments.
    pub total_amount: Decimal,
    /// True when the payments exceed the budget.
    pub over_budget: bool,
}

impl From<Payroll> for PayrollResponse {
    fn from(payroll: Payroll) -> Self {
        Self {
            total_amount: payroll.total_amount(),
            over_budget: payroll.is_over_budget(),
            payroll,
        }
    }
}

/// Body returned by `POST /investments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentResponse {
    /// The stored investment.
    pub investment: Investment,
    /// Status as of today.
    pub status: InvestmentStatus,
    /// Principal plus expected profit.
    pub expected_value: Decimal,
    /// The confirmation raised for the investment.
    pub notification: Notification,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, code: &str, error: &EngineError) -> Self {
        Self {
            status,
            error: ApiError::new(code, error.to_string()),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details(
                        "CONFIG_ERROR",
                        "Configuration error",
                        error.to_string(),
                    ),
                }
            }
            EngineError::PlanNotFound { plan_id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "PLAN_NOT_FOUND",
                    error.to_string(),
                    format!("The plan '{}' is not in the catalog", plan_id),
                ),
            },
            EngineError::InvalidPayee { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_PAYEE", &error)
            }
            EngineError::DuplicatePayee { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "DUPLICATE_PAYEE", &error)
            }
            EngineError::PayeeNotFound { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "PAYEE_NOT_FOUND", &error)
            }
            EngineError::InvalidAmount { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_AMOUNT", &error)
            }
            EngineError::InvalidOverride { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_OVERRIDE", &error)
            }
            EngineError::InvalidDate { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_DATE", &error)
            }
            EngineError::InvalidPayPeriod { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_PAY_PERIOD", &error)
            }
            EngineError::BelowMinimum { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "BELOW_MINIMUM", &error)
            }
            EngineError::IncompletePayroll { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "INCOMPLETE_PAYROLL", &error)
            }
            EngineError::RecordNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", &error)
            }
            EngineError::PayrollImmutable { .. } => {
                Self::new(StatusCode::CONFLICT, "PAYROLL_IMMUTABLE", &error)
            }
            EngineError::VersionConflict { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "VERSION_CONFLICT",
                    error.to_string(),
                    "Reload the record and retry",
                ),
            },
        }
    }
}
