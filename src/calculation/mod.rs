//! Calculation logic for the payroll engine.
//!
//! This module contains the pure calculators: money rounding, the equal and
//! salary-proportional budget splits, the allocation strategy engine that
//! chooses between them, and the investment ROI projection.

mod allocation;
mod equal_split;
mod money;
mod proportional_split;
mod roi_projection;

pub use allocation::{ZERO_SALARY_FALLBACK, allocate};
pub use equal_split::{EQUAL_SPLIT_RULE_ID, SplitResult, calculate_equal_split};
pub use money::{MAX_MONEY_AMOUNT, MONEY_DECIMAL_PLACES, is_valid_money, round_money};
pub(crate) use money::to_cents;
pub use proportional_split::{PROPORTIONAL_SPLIT_RULE_ID, calculate_proportional_split};
pub use roi_projection::{ROI_PROJECTION_RULE_ID, project};
