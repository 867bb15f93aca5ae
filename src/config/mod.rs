//! Configuration loading for the payroll engine.
//!
//! A configuration directory holds the service settings and the investment
//! plan catalog as YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded {} plans", config.plans().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, EngineSettings, PlanCatalog};
