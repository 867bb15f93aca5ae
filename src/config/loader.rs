//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! settings and the investment plan catalog from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::InvestmentPlan;

use super::types::{EngineConfig, EngineSettings, PlanCatalog};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml   # Service settings
/// └── plans.yaml    # Investment plan catalog
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let plan = loader.get_plan("premium").unwrap();
/// println!("{} pays {}%", plan.name, plan.roi_percentage);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Either file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML (`ConfigParseError`)
    /// - The plan catalog is empty, has duplicate ids, or has a negative
    ///   ROI or minimum (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;

        let plans_path = path.join("plans.yaml");
        let catalog = Self::load_yaml::<PlanCatalog>(&plans_path)?;
        Self::validate_catalog(&catalog.plans).map_err(|message| {
            EngineError::ConfigParseError {
                path: plans_path.display().to_string(),
                message,
            }
        })?;

        Ok(Self {
            config: EngineConfig::new(settings, catalog.plans),
        })
    }

    /// Builds a loader from configuration assembled in code.
    ///
    /// The catalog is validated the same way as when loading from disk.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        Self::validate_catalog(config.plans()).map_err(|message| {
            EngineError::ConfigParseError {
                path: "<in-memory>".to_string(),
                message,
            }
        })?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_catalog(plans: &[InvestmentPlan]) -> Result<(), String> {
        if plans.is_empty() {
            return Err("plan catalog is empty".to_string());
        }

        let mut seen = HashSet::new();
        for plan in plans {
            if !seen.insert(plan.id.as_str()) {
                return Err(format!("duplicate plan id '{}'", plan.id));
            }
            if plan.roi_percentage < Decimal::ZERO {
                return Err(format!("plan '{}' has a negative ROI percentage", plan.id));
            }
            if plan.min_investment < Decimal::ZERO {
                return Err(format!("plan '{}' has a negative minimum investment", plan.id));
            }
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        self.config.settings()
    }

    /// Returns every plan in catalog order.
    pub fn plans(&self) -> &[InvestmentPlan] {
        self.config.plans()
    }

    /// Gets a plan by its id.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// let plan = loader.get_plan("gold")?;
    /// println!("Minimum: ${}", plan.min_investment);
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn get_plan(&self, plan_id: &str) -> EngineResult<&InvestmentPlan> {
        self.config
            .plans()
            .iter()
            .find(|p| p.id == plan_id)
            .ok_or_else(|| EngineError::PlanNotFound {
                plan_id: plan_id.to_string(),
            })
    }
}
