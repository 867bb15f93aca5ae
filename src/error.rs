//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every validation and persistence failure the engine can report.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// Validation problems are returned to the caller as values of this type,
/// never raised as panics, so the caller decides whether to block a
/// submission or merely show a warning.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::PlanNotFound {
///     plan_id: "platinum".to_string(),
/// };
/// assert_eq!(error.to_string(), "Investment plan not found: platinum");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Investment plan id was not found in the catalog.
    #[error("Investment plan not found: {plan_id}")]
    PlanNotFound {
        /// The plan id that was not found.
        plan_id: String,
    },

    /// A payee record was invalid.
    #[error("Invalid payee '{payee_id}': {message}")]
    InvalidPayee {
        /// The id of the offending payee.
        payee_id: String,
        /// What made the payee invalid.
        message: String,
    },

    /// The same payee was selected more than once.
    #[error("Duplicate payee: {payee_id}")]
    DuplicatePayee {
        /// The repeated payee id.
        payee_id: String,
    },

    /// A payee referenced by id is not part of the draft.
    #[error("Payee not found: {payee_id}")]
    PayeeNotFound {
        /// The payee id that was not found.
        payee_id: String,
    },

    /// A monetary input was negative or otherwise unusable.
    #[error("Invalid amount for '{field}': {amount}")]
    InvalidAmount {
        /// The input field carrying the amount.
        field: String,
        /// The rejected amount.
        amount: Decimal,
    },

    /// A manual per-payee override was rejected.
    #[error("Invalid override for payee '{payee_id}': {amount} is outside 0 to 1000000000000000")]
    InvalidOverride {
        /// The payee whose override was rejected.
        payee_id: String,
        /// The rejected amount.
        amount: Decimal,
    },

    /// An investment principal is below the plan minimum.
    #[error("Investment of {principal} is below the {plan_id} plan minimum of {minimum}")]
    BelowMinimum {
        /// The selected plan.
        plan_id: String,
        /// The requested principal.
        principal: Decimal,
        /// The plan's minimum investment.
        minimum: Decimal,
    },

    /// A date could not be derived or was out of range.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// A description of the problem.
        message: String,
    },

    /// A payroll draft is not ready for submission.
    #[error("Incomplete payroll: {reason}")]
    IncompletePayroll {
        /// Why the draft cannot be submitted.
        reason: String,
    },

    /// The pay period bounds are inconsistent.
    #[error("Invalid pay period: {message}")]
    InvalidPayPeriod {
        /// A description of the inconsistency.
        message: String,
    },

    /// The payroll has left the `Pending` state and can no longer change.
    #[error("Payroll '{payroll_id}' is {status} and can no longer be modified")]
    PayrollImmutable {
        /// The payroll id.
        payroll_id: String,
        /// The status that froze the payroll.
        status: String,
    },

    /// A stored record does not exist.
    #[error("{kind} not found: {id}")]
    RecordNotFound {
        /// The record kind (e.g. "Payroll").
        kind: String,
        /// The missing record id.
        id: String,
    },

    /// A write was based on a stale copy of a stored record.
    #[error("Version conflict on '{id}': expected {expected}, found {actual}")]
    VersionConflict {
        /// The record id.
        id: String,
        /// The version the writer started from.
        expected: u64,
        /// The version currently stored.
        actual: u64,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
