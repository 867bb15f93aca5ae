//! Manual override policy.

use serde::{Deserialize, Serialize};

/// What `distribute` does with amounts that were set by hand.
///
/// # Example
///
/// ```
/// use payroll_engine::assembler::OverridePolicy;
///
/// assert_eq!(OverridePolicy::default(), OverridePolicy::PreserveManual);
/// let policy: OverridePolicy = serde_json::from_str("\"overwrite_all\"").unwrap();
/// assert_eq!(policy, OverridePolicy::OverwriteAll);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverridePolicy {
    /// Manually set payees keep their amounts; the rest of the budget is
    /// distributed across the remaining payees.
    #[default]
    PreserveManual,
    /// Every payment is replaced and manual flags are cleared.
    OverwriteAll,
}
