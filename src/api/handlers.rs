//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assembler::{OverridePolicy, PayrollAssembler};
use crate::calculation::{allocate, project};
use crate::error::{EngineError, EngineResult};
use crate::models::{AllocationRequest, Investment, Notification, Payroll};

use super::request::{
    AllocateRequest, CreatePayrollRequest, InvestRequest, ProjectRequest, StatusUpdateRequest,
};
use super::response::{
    AllocationResponse, ApiError, ApiErrorResponse, InvestmentResponse, PayrollResponse,
    ProjectionResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/plans", get(list_plans_handler))
        .route("/allocate", post(allocate_handler))
        .route("/project", post(project_handler))
        .route("/payrolls", post(create_payroll_handler))
        .route("/payrolls/:id", get(get_payroll_handler))
        .route("/payrolls/:id/status", post(update_status_handler))
        .route("/investments", post(invest_handler))
        .route("/notifications", get(list_notifications_handler))
        .route("/notifications/:id/read", post(mark_read_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

/// Converts a JSON body rejection into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn path_rejection_response(correlation_id: Uuid, rejection: PathRejection) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %rejection,
        "Invalid path parameter"
    );
    json_response(
        StatusCode::BAD_REQUEST,
        ApiError::new("INVALID_ID", rejection.body_text()),
    )
}

/// Handler for GET /plans.
async fn list_plans_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.config().plans())
}

/// Handler for POST /allocate.
///
/// Runs the allocation engine without storing anything.
async fn allocate_handler(
    State(state): State<AppState>,
    payload: Result<Json<AllocateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing allocation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let strategy = request
        .strategy
        .unwrap_or(state.config().settings().default_strategy);
    let allocation_request = match AllocationRequest::new(request.budget, request.payees, strategy)
    {
        Ok(req) => req,
        Err(err) => return error_response(correlation_id, err),
    };

    let result = allocate(&allocation_request);
    info!(
        correlation_id = %correlation_id,
        payees = result.allocations.len(),
        strategy = %result.strategy,
        total = %result.total_allocated(),
        fell_back = result.fell_back(),
        "Allocation completed"
    );
    json_response(StatusCode::OK, AllocationResponse::from(result))
}

/// Handler for POST /project.
///
/// A principal below the plan minimum is still answered with 200 and
/// `valid: false`.
async fn project_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing projection request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let projection = state
        .config()
        .get_plan(&request.plan_id)
        .and_then(|plan| project(plan, request.principal));
    match projection {
        Ok(projection) => {
            info!(
                correlation_id = %correlation_id,
                plan_id = %projection.plan_id,
                profit = %projection.profit,
                valid = projection.is_valid(),
                "Projection completed"
            );
            json_response(StatusCode::OK, ProjectionResponse::from(projection))
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Assembles a payroll from a creation request.
///
/// Amounts are first proposed for every payee, then overrides are applied as
/// manual edits. Under [`OverridePolicy::PreserveManual`] the budget left
/// after the overrides is redistributed across the other payees.
fn assemble_payroll(
    request: CreatePayrollRequest,
    state: &AppState,
) -> EngineResult<Payroll> {
    let settings = state.config().settings();
    let strategy = request.strategy.unwrap_or(settings.default_strategy);

    let mut assembler = PayrollAssembler::new(
        request.name,
        request.pay_period_start,
        request.pay_period_end,
        request.budget,
    )?
    .with_policy(settings.override_policy);
    assembler.set_payday(request.payday);
    assembler.set_schedule(request.payroll_type, request.frequency);

    for payee in request.payees {
        let payee_id = payee.id.clone();
        if !assembler.add_payee(payee)? {
            return Err(EngineError::DuplicatePayee { payee_id });
        }
    }

    if !assembler.payees().is_empty() {
        assembler.distribute_all(strategy)?;
    }
    for (payee_id, amount) in &request.overrides {
        assembler.set_override(payee_id, *amount)?;
    }
    if !request.overrides.is_empty() && assembler.policy() == OverridePolicy::PreserveManual {
        assembler.distribute(strategy)?;
    }

    assembler.to_payroll()
}

/// Handler for POST /payrolls.
async fn create_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreatePayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll creation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let stored = assemble_payroll(request, &state)
        .and_then(|payroll| state.repository().insert_payroll(payroll));
    match stored {
        Ok(payroll) => {
            info!(
                correlation_id = %correlation_id,
                payroll_id = %payroll.id,
                payees = payroll.payees.len(),
                total = %payroll.total_amount(),
                over_budget = payroll.is_over_budget(),
                "Payroll created"
            );
            json_response(StatusCode::CREATED, PayrollResponse::from(payroll))
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /payrolls/{id}.
async fn get_payroll_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(id) = match id {
        Ok(path) => path,
        Err(rejection) => return path_rejection_response(correlation_id, rejection),
    };

    match state.repository().get_payroll(id) {
        Ok(payroll) => json_response(StatusCode::OK, PayrollResponse::from(payroll)),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /payrolls/{id}/status.
///
/// The caller's `expected_version` is checked against the stored version so
/// two approvers cannot both act on the same payroll.
async fn update_status_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll status update");

    let Path(id) = match id {
        Ok(path) => path,
        Err(rejection) => return path_rejection_response(correlation_id, rejection),
    };
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let repository = state.repository();
    let updated = repository.get_payroll(id).and_then(|mut payroll| {
        if payroll.version != request.expected_version {
            return Err(EngineError::VersionConflict {
                id: payroll.id.to_string(),
                expected: request.expected_version,
                actual: payroll.version,
            });
        }
        payroll.transition_to(request.status)?;
        repository.update_payroll(payroll)
    });
    match updated {
        Ok(payroll) => {
            info!(
                correlation_id = %correlation_id,
                payroll_id = %payroll.id,
                status = %payroll.status,
                version = payroll.version,
                "Payroll status updated"
            );
            json_response(StatusCode::OK, PayrollResponse::from(payroll))
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Records an investment and its confirmation notification.
fn record_investment(request: InvestRequest, state: &AppState) -> EngineResult<InvestmentResponse> {
    let plan = state.config().get_plan(&request.plan_id)?;
    let projection = project(plan, request.amount)?;
    let today = Utc::now().date_naive();
    let investment = Investment::from_projection(&projection, request.start_date.unwrap_or(today))?;

    let repository = state.repository();
    let investment = repository.insert_investment(investment)?;
    let invested_total: Decimal = repository
        .list_investments()
        .iter()
        .map(|i| i.amount)
        .sum();
    let notification = repository.insert_notification(Notification::investment_confirmed(
        &investment,
        plan,
        invested_total,
    ))?;

    Ok(InvestmentResponse {
        status: investment.status_on(today),
        expected_value: investment.expected_value(),
        investment,
        notification,
    })
}

/// Handler for POST /investments.
async fn invest_handler(
    State(state): State<AppState>,
    payload: Result<Json<InvestRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing investment request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match record_investment(request, &state) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                investment_id = %response.investment.id,
                plan_id = %response.investment.plan_id,
                amount = %response.investment.amount,
                maturity_date = %response.investment.maturity_date,
                "Investment recorded"
            );
            json_response(StatusCode::CREATED, response)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /notifications.
async fn list_notifications_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.repository().list_notifications())
}

/// Handler for POST /notifications/{id}/read.
async fn mark_read_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(id) = match id {
        Ok(path) => path,
        Err(rejection) => return path_rejection_response(correlation_id, rejection),
    };

    match state.repository().mark_notification_read(id) {
        Ok(notification) => json_response(StatusCode::OK, notification),
        Err(err) => error_response(correlation_id, err),
    }
}
