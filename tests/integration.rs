//! Integration tests for the payroll engine.
//!
//! This suite covers:
//! - Allocation scenarios through the library and the HTTP API
//! - Payroll assembly with manual overrides and payee removal
//! - ROI projections at and around plan minimums
//! - Investment submission with its confirmation notification
//! - Payroll approval with optimistic version checks
//! - Allocation properties checked with proptest

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{create_router, AppState};
use payroll_engine::assembler::{OverridePolicy, PayrollAssembler};
use payroll_engine::calculation::{allocate, project, round_money};
use payroll_engine::config::ConfigLoader;
use payroll_engine::error::EngineError;
use payroll_engine::models::{AllocationRequest, AllocationStrategy, Payee};

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    AppState::in_memory(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn payee(id: &str, salary: &str) -> Payee {
    Payee::new(id, id.to_uppercase(), decimal(salary), "Operations")
}

fn payee_json(id: &str, salary: &str) -> Value {
    json!({"id": id, "name": id.to_uppercase(), "salary": salary, "department": "Operations"})
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn assert_amount(value: &Value, expected: &str) {
    let actual = decimal(value.as_str().unwrap());
    assert_eq!(
        actual.normalize(),
        decimal(expected).normalize(),
        "Expected amount {}, got {}",
        expected,
        actual
    );
}

// =============================================================================
// Allocation
// =============================================================================

#[test]
fn test_proportional_split_matches_salary_shares() {
    let request = AllocationRequest::new(
        decimal("1000"),
        vec![payee("a", "300"), payee("b", "700")],
        AllocationStrategy::Proportional,
    )
    .unwrap();

    let result = allocate(&request);
    assert_eq!(result.amount_for("a"), Some(decimal("300.00")));
    assert_eq!(result.amount_for("b"), Some(decimal("700.00")));
    assert!(!result.fell_back());
}

#[test]
fn test_equal_split_gives_leftover_cent_to_first_payee() {
    let request = AllocationRequest::new(
        decimal("100"),
        vec![payee("a", "1"), payee("b", "1"), payee("c", "1")],
        AllocationStrategy::Equal,
    )
    .unwrap();

    let result = allocate(&request);
    assert_eq!(result.amount_for("a"), Some(decimal("33.34")));
    assert_eq!(result.amount_for("b"), Some(decimal("33.33")));
    assert_eq!(result.amount_for("c"), Some(decimal("33.33")));
    assert_eq!(result.total_allocated(), decimal("100.00"));
}

#[test]
fn test_zero_budget_allocates_zero() {
    let request = AllocationRequest::new(
        Decimal::ZERO,
        vec![payee("a", "100"), payee("b", "200")],
        AllocationStrategy::Proportional,
    )
    .unwrap();

    let result = allocate(&request);
    assert!(result.allocations.iter().all(|a| a.amount.is_zero()));
    assert!(!result.is_over_budget());
}

#[test]
fn test_empty_payee_list_allocates_nothing() {
    let request =
        AllocationRequest::new(decimal("500"), vec![], AllocationStrategy::Equal).unwrap();

    let result = allocate(&request);
    assert!(result.allocations.is_empty());
    assert_eq!(result.total_allocated(), Decimal::ZERO);
}

#[tokio::test]
async fn test_allocate_endpoint_proportional() {
    let (status, result) = send(
        create_router_for_test(),
        "POST",
        "/allocate",
        Some(json!({
            "budget": "1000",
            "strategy": "proportional",
            "payees": [payee_json("a", "300"), payee_json("b", "700")]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["amounts"]["a"], "300");
    assert_amount(&result["amounts"]["b"], "700");
    assert_amount(&result["total"], "1000");
    assert_eq!(result["audit_trace"]["steps"][0]["rule_id"], "proportional_split");
}

#[tokio::test]
async fn test_allocate_endpoint_rejects_negative_salary() {
    let (status, result) = send(
        create_router_for_test(),
        "POST",
        "/allocate",
        Some(json!({"budget": "1000", "payees": [payee_json("a", "-1")]})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_PAYEE");
}

#[tokio::test]
async fn test_allocate_endpoint_rejects_salary_beyond_money_range() {
    let (status, result) = send(
        create_router_for_test(),
        "POST",
        "/allocate",
        Some(json!({
            "budget": "1000",
            "strategy": "proportional",
            "payees": [payee_json("a", "1"), payee_json("b", "79228162514264337593543950335")]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_PAYEE");
}

#[tokio::test]
async fn test_allocate_endpoint_missing_budget() {
    let (status, result) = send(
        create_router_for_test(),
        "POST",
        "/allocate",
        Some(json!({"payees": []})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "VALIDATION_ERROR");
    assert!(result["message"].as_str().unwrap().contains("budget"));
}

// =============================================================================
// Payroll assembly
// =============================================================================

#[test]
fn test_removed_payee_is_excluded_from_payroll() {
    let mut assembler =
        PayrollAssembler::new("June", date("2025-06-01"), date("2025-06-30"), decimal("900"))
            .unwrap();
    assembler.add_payee(payee("a", "100")).unwrap();
    assembler.add_payee(payee("b", "100")).unwrap();
    assembler.add_payee(payee("c", "100")).unwrap();
    assembler.distribute(AllocationStrategy::Equal).unwrap();

    assert!(assembler.remove_payee("b"));
    let payroll = assembler.to_payroll().unwrap();

    assert_eq!(payroll.payees.len(), 2);
    assert!(payroll.payments.iter().all(|p| p.payee_id != "b"));
    assert_eq!(payroll.total_amount(), decimal("600.00"));
}

#[test]
fn test_overwrite_all_policy_discards_manual_amounts() {
    let mut assembler =
        PayrollAssembler::new("June", date("2025-06-01"), date("2025-06-30"), decimal("100"))
            .unwrap()
            .with_policy(OverridePolicy::OverwriteAll);
    assembler.add_payee(payee("a", "10")).unwrap();
    assembler.add_payee(payee("b", "10")).unwrap();
    assembler.set_override("a", decimal("90")).unwrap();

    assembler.distribute(AllocationStrategy::Equal).unwrap();

    assert_eq!(assembler.payment_for("a"), Some(decimal("50.00")));
    assert!(!assembler.is_manual("a"));
}

#[test]
fn test_manual_amounts_may_exceed_budget() {
    let mut assembler =
        PayrollAssembler::new("June", date("2025-06-01"), date("2025-06-30"), decimal("100"))
            .unwrap();
    assembler.add_payee(payee("a", "10")).unwrap();
    assembler.add_payee(payee("b", "10")).unwrap();
    assembler.set_override("a", decimal("150")).unwrap();

    assembler.distribute(AllocationStrategy::Equal).unwrap();

    assert_eq!(assembler.payment_for("b"), Some(decimal("0.00")));
    assert!(assembler.is_over_budget());
    assert!(assembler.to_payroll().unwrap().is_over_budget());
}

#[tokio::test]
async fn test_payroll_lifecycle_over_http() {
    let state = create_test_state();
    let (status, created) = send(
        create_router(state.clone()),
        "POST",
        "/payrolls",
        Some(json!({
            "name": "Weekly crew",
            "pay_period_start": "2025-06-02",
            "pay_period_end": "2025-06-08",
            "payday": "2025-06-09",
            "budget": "100",
            "type": "recurring",
            "payees": [payee_json("a", "1"), payee_json("b", "1"), payee_json("c", "1")]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "recurring");
    assert_eq!(created["frequency"], "monthly");
    assert_eq!(created["payday"], "2025-06-09");
    assert_amount(&created["payments"][0]["amount"], "33.34");
    assert_amount(&created["total_amount"], "100");

    let uri = format!("/payrolls/{}/status", created["id"].as_str().unwrap());
    let (status, cancelled) = send(
        create_router(state.clone()),
        "POST",
        &uri,
        Some(json!({"status": "Cancelled", "expected_version": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "Cancelled");

    let (status, error) = send(
        create_router(state),
        "POST",
        &uri,
        Some(json!({"status": "Processed", "expected_version": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "PAYROLL_IMMUTABLE");
}

#[tokio::test]
async fn test_payroll_with_inverted_period_is_rejected() {
    let (status, error) = send(
        create_router_for_test(),
        "POST",
        "/payrolls",
        Some(json!({
            "name": "Backwards",
            "pay_period_start": "2025-06-30",
            "pay_period_end": "2025-06-01",
            "budget": "100",
            "payees": [payee_json("a", "1")]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PAY_PERIOD");
}

#[tokio::test]
async fn test_payroll_override_for_unknown_payee_is_rejected() {
    let (status, error) = send(
        create_router_for_test(),
        "POST",
        "/payrolls",
        Some(json!({
            "name": "June",
            "pay_period_start": "2025-06-01",
            "pay_period_end": "2025-06-30",
            "budget": "100",
            "payees": [payee_json("a", "1")],
            "overrides": {"ghost": "10"}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "PAYEE_NOT_FOUND");
}

// =============================================================================
// ROI projection and investments
// =============================================================================

#[test]
fn test_projection_at_minimum_is_valid() {
    let config = ConfigLoader::load("./config/default").unwrap();
    let plan = config.get_plan("premium").unwrap();

    let at_minimum = project(plan, decimal("5000")).unwrap();
    assert!(at_minimum.is_valid());
    assert_eq!(at_minimum.profit, decimal("2750.00"));
    assert_eq!(at_minimum.total_value, decimal("7750.00"));

    let below = project(plan, decimal("4999.99")).unwrap();
    assert!(!below.is_valid());
    assert!(matches!(
        below.ensure_valid(),
        Err(EngineError::BelowMinimum { .. })
    ));
}

#[test]
fn test_gold_projection_fractional_rate() {
    let config = ConfigLoader::load("./config/default").unwrap();
    let plan = config.get_plan("gold").unwrap();

    let projection = project(plan, decimal("10000")).unwrap();
    assert_eq!(projection.profit, decimal("7560.00"));
    assert_eq!(projection.total_value, decimal("17560.00"));
}

#[test]
fn test_negative_principal_is_an_error() {
    let config = ConfigLoader::load("./config/default").unwrap();
    let plan = config.get_plan("basic").unwrap();

    assert!(matches!(
        project(plan, decimal("-1")),
        Err(EngineError::InvalidAmount { .. })
    ));
}

#[test]
fn test_principal_beyond_money_range_is_an_error() {
    let config = ConfigLoader::load("./config/default").unwrap();
    let plan = config.get_plan("gold").unwrap();

    assert!(matches!(
        project(plan, decimal("79228162514264337593543950335")),
        Err(EngineError::InvalidAmount { .. })
    ));
}

#[test]
fn test_quadrillion_budget_allocates_to_the_cent() {
    let request = AllocationRequest::new(
        decimal("1000000000000000"),
        vec![payee("a", "3"), payee("b", "7"), payee("c", "11")],
        AllocationStrategy::Proportional,
    )
    .unwrap();

    let result = allocate(&request);
    assert_eq!(result.total_allocated(), decimal("1000000000000000.00"));
}

#[tokio::test]
async fn test_investment_notification_reports_running_total() {
    let state = create_test_state();
    send(
        create_router(state.clone()),
        "POST",
        "/investments",
        Some(json!({"plan_id": "basic", "amount": "100", "start_date": "2025-01-01"})),
    )
    .await;
    let (status, second) = send(
        create_router(state.clone()),
        "POST",
        "/investments",
        Some(json!({"plan_id": "plus", "amount": "1000", "start_date": "2025-01-01"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        second["notification"]["message"],
        "You've successfully invested $1000 in our Plus Investor plan"
    );
    assert!(second["notification"]["details"]
        .as_str()
        .unwrap()
        .contains("$1100"));
    assert_eq!(second["status"], "matured");

    let (_, notifications) = send(create_router(state), "GET", "/notifications", None).await;
    let titles: Vec<&str> = notifications
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["New Investment Confirmed"; 2]);
}

#[tokio::test]
async fn test_unknown_notification_returns_404() {
    let uri = format!("/notifications/{}/read", uuid::Uuid::new_v4());
    let (status, error) = send(create_router_for_test(), "POST", &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

// =============================================================================
// Properties
// =============================================================================

fn payees_with_salaries(salary_cents: &[i64]) -> Vec<Payee> {
    salary_cents
        .iter()
        .enumerate()
        .map(|(i, cents)| Payee::new(format!("p{}", i), "P", Decimal::new(*cents, 2), "Ops"))
        .collect()
}

proptest! {
    #[test]
    fn prop_equal_split_sums_to_rounded_budget(
        budget_mills in 0i64..1_000_000_000,
        count in 1usize..40
    ) {
        let budget = Decimal::new(budget_mills, 3);
        let payees = payees_with_salaries(&vec![100; count]);
        let request = AllocationRequest::new(budget, payees, AllocationStrategy::Equal).unwrap();

        let result = allocate(&request);
        prop_assert_eq!(result.total_allocated(), round_money(budget));

        let max = result.allocations.iter().map(|a| a.amount).max().unwrap();
        let min = result.allocations.iter().map(|a| a.amount).min().unwrap();
        prop_assert!(max - min <= Decimal::new(1, 2));
    }

    #[test]
    fn prop_proportional_split_stays_within_a_cent(
        budget_cents in 0i64..100_000_000,
        salaries in prop::collection::vec(1i64..10_000_000, 1..40)
    ) {
        let budget = Decimal::new(budget_cents, 2);
        let payees = payees_with_salaries(&salaries);
        let salary_total: Decimal = payees.iter().map(|p| p.salary).sum();
        let request =
            AllocationRequest::new(budget, payees.clone(), AllocationStrategy::Proportional).unwrap();

        let result = allocate(&request);
        prop_assert_eq!(result.total_allocated(), budget);
        for (payee, allocation) in payees.iter().zip(&result.allocations) {
            let exact = budget * payee.salary / salary_total;
            prop_assert!((allocation.amount - exact).abs() <= Decimal::new(1, 2));
        }
    }

    #[test]
    fn prop_allocation_is_deterministic(
        budget_cents in 0i64..10_000_000,
        salaries in prop::collection::vec(0i64..1_000_000, 1..20),
        proportional in any::<bool>()
    ) {
        let strategy = if proportional {
            AllocationStrategy::Proportional
        } else {
            AllocationStrategy::Equal
        };
        let request = AllocationRequest::new(
            Decimal::new(budget_cents, 2),
            payees_with_salaries(&salaries),
            strategy,
        )
        .unwrap();

        prop_assert_eq!(allocate(&request), allocate(&request));
    }
}
