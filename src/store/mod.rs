//! Persistence boundary for payroll, investment and notification records.
//!
//! Services receive a [`Repository`] rather than reaching for a shared
//! client. Payroll writes are checked against the stored version so a
//! writer working from a stale copy gets a
//! [`VersionConflict`](crate::error::EngineError::VersionConflict) instead
//! of silently overwriting someone else's change.

mod memory;

use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{Investment, Notification, Payroll};

pub use memory::MemoryRepository;

/// Storage for the records the engine produces.
pub trait Repository: Send + Sync {
    /// Stores a new payroll and returns it with version 1.
    fn insert_payroll(&self, payroll: Payroll) -> EngineResult<Payroll>;

    /// Fetches a payroll by id.
    fn get_payroll(&self, id: Uuid) -> EngineResult<Payroll>;

    /// Replaces a stored payroll.
    ///
    /// `payroll.version` must match the stored version and the stored
    /// payroll must still be `Pending`. Returns the payroll with its version
    /// bumped.
    fn update_payroll(&self, payroll: Payroll) -> EngineResult<Payroll>;

    /// All payrolls, oldest first.
    fn list_payrolls(&self) -> Vec<Payroll>;

    /// Stores a new investment.
    fn insert_investment(&self, investment: Investment) -> EngineResult<Investment>;

    /// All investments, newest first.
    fn list_investments(&self) -> Vec<Investment>;

    /// Stores a new notification.
    fn insert_notification(&self, notification: Notification) -> EngineResult<Notification>;

    /// All notifications, newest first.
    fn list_notifications(&self) -> Vec<Notification>;

    /// Marks a notification as read and returns it.
    fn mark_notification_read(&self, id: Uuid) -> EngineResult<Notification>;
}
