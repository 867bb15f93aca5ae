//! Payroll record assembly.
//!
//! This module turns payee selections, allocation engine proposals and
//! manual edits into a submittable [`Payroll`](crate::models::Payroll).

mod draft;
mod policy;

pub use draft::PayrollAssembler;
pub use policy::OverridePolicy;
