//! User notification model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Investment, InvestmentPlan};

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Something completed.
    Success,
    /// Something failed.
    Error,
    /// Something needs attention.
    Warning,
    /// Informational.
    Info,
}

/// Whether the user has seen a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Not yet opened.
    #[default]
    Unread,
    /// Opened.
    Read,
}

/// A message shown in the user's notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier.
    pub id: Uuid,
    /// Short heading.
    pub title: String,
    /// One-line summary.
    pub message: String,
    /// Longer body text.
    pub details: String,
    /// Visual category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Read state.
    pub status: NotificationStatus,
    /// When the notification was raised.
    pub time: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification stamped with the current time.
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            message: message.into(),
            details: details.into(),
            kind,
            status: NotificationStatus::Unread,
            time: Utc::now(),
        }
    }

    /// The confirmation raised after an investment is recorded.
    ///
    /// `invested_total` is the caller's total invested amount including this
    /// investment.
    pub fn investment_confirmed(
        investment: &Investment,
        plan: &InvestmentPlan,
        invested_total: Decimal,
    ) -> Self {
        let message = format!(
            "You've successfully invested ${} in our {} plan",
            investment.amount, plan.name
        );
        let details = format!(
            "Your portfolio is now strengthened with an additional ${} in our {} plan, \
             offering an expected ROI of {}%. This investment is projected to yield a \
             profit of ${} over the {}-month duration, maturing on {}. Your total \
             invested amount is now ${}.",
            investment.amount,
            plan.name,
            investment.roi_percentage.normalize(),
            investment.roi_profit,
            investment.duration_months,
            investment.maturity_date,
            invested_total
        );
        Self::new(
            NotificationKind::Success,
            "New Investment Confirmed",
            message,
            details,
        )
    }

    /// True if the notification has not been opened.
    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Unread
    }

    /// Marks the notification as read. Idempotent.
    pub fn mark_read(&mut self) {
        self.status = NotificationStatus::Read;
    }
}
