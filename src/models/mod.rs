//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod allocation;
mod audit;
mod investment;
mod notification;
mod payee;
mod payroll;

pub use allocation::{AllocationRequest, AllocationResult, AllocationStrategy, PayeeAllocation};
pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use investment::{
    INVESTMENT_TERM_MONTHS, Investment, InvestmentPlan, InvestmentProjection, InvestmentStatus,
    ProjectionIssue,
};
pub use notification::{Notification, NotificationKind, NotificationStatus};
pub use payee::Payee;
pub use payroll::{EmployeePayment, PayFrequency, Payroll, PayrollStatus, PayrollType};
