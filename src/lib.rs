//! Payroll allocation and investment projection engine.
//!
//! This crate splits a payroll budget across payees (equally or in
//! proportion to salary), assembles payroll records around manual edits,
//! and projects flat-rate returns for the investment plan catalog.

#![warn(missing_docs)]

pub mod api;
pub mod assembler;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
