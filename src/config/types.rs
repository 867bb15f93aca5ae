//! Configuration types for the payroll engine.
//!
//! These structures are deserialized from the YAML files in a configuration
//! directory.

use serde::Deserialize;

use crate::assembler::OverridePolicy;
use crate::models::{AllocationStrategy, InvestmentPlan};

/// Service-level settings from engine.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Service name, reported in logs.
    pub name: String,
    /// Configuration version label.
    pub version: String,
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Strategy used when a request does not name one.
    #[serde(default)]
    pub default_strategy: AllocationStrategy,
    /// How the assembler treats manually entered amounts.
    #[serde(default)]
    pub override_policy: OverridePolicy,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// Plan catalog file structure (plans.yaml).
#[derive(Debug, Clone, Deserialize)]
pub struct PlanCatalog {
    /// Plans in display order.
    pub plans: Vec<InvestmentPlan>,
}

/// The complete engine configuration loaded from a directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    settings: EngineSettings,
    plans: Vec<InvestmentPlan>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(settings: EngineSettings, plans: Vec<InvestmentPlan>) -> Self {
        Self { settings, plans }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the plan catalog in display order.
    pub fn plans(&self) -> &[InvestmentPlan] {
        &self.plans
    }
}
