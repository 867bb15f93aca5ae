//! HTTP API for the payroll engine.
//!
//! Exposes allocation, projection, payroll, investment and notification
//! endpoints over a shared [`AppState`].

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AllocateRequest, CreatePayrollRequest, InvestRequest, ProjectRequest, StatusUpdateRequest,
};
pub use response::{
    AllocationResponse, ApiError, ApiErrorResponse, InvestmentResponse, PayrollResponse,
    ProjectionResponse,
};
pub use state::AppState;
