//! In-process repository.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Investment, Notification, Payroll};

use super::Repository;

/// A [`Repository`] that keeps records in memory behind read-write locks.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    payrolls: RwLock<HashMap<Uuid, Payroll>>,
    investments: RwLock<Vec<Investment>>,
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryRepository {
    fn insert_payroll(&self, mut payroll: Payroll) -> EngineResult<Payroll> {
        let mut payrolls = self.payrolls.write();
        if let Some(existing) = payrolls.get(&payroll.id) {
            return Err(EngineError::VersionConflict {
                id: payroll.id.to_string(),
                expected: payroll.version,
                actual: existing.version,
            });
        }

        payroll.version = 1;
        payrolls.insert(payroll.id, payroll.clone());
        debug!(payroll_id = %payroll.id, "Payroll stored");
        Ok(payroll)
    }

    fn get_payroll(&self, id: Uuid) -> EngineResult<Payroll> {
        self.payrolls
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::RecordNotFound {
                kind: "Payroll".to_string(),
                id: id.to_string(),
            })
    }

    fn update_payroll(&self, mut payroll: Payroll) -> EngineResult<Payroll> {
        let mut payrolls = self.payrolls.write();
        let stored = payrolls
            .get(&payroll.id)
            .ok_or_else(|| EngineError::RecordNotFound {
                kind: "Payroll".to_string(),
                id: payroll.id.to_string(),
            })?;

        if stored.version != payroll.version {
            return Err(EngineError::VersionConflict {
                id: payroll.id.to_string(),
                expected: payroll.version,
                actual: stored.version,
            });
        }
        if !stored.is_editable() {
            return Err(EngineError::PayrollImmutable {
                payroll_id: stored.id.to_string(),
                status: stored.status.to_string(),
            });
        }

        payroll.version += 1;
        payrolls.insert(payroll.id, payroll.clone());
        debug!(
            payroll_id = %payroll.id,
            version = payroll.version,
            status = %payroll.status,
            "Payroll updated"
        );
        Ok(payroll)
    }

    fn list_payrolls(&self) -> Vec<Payroll> {
        let mut payrolls: Vec<Payroll> = self.payrolls.read().values().cloned().collect();
        payrolls.sort_by(|a, b| {
            a.date_created
                .cmp(&b.date_created)
                .then_with(|| a.name.cmp(&b.name))
        });
        payrolls
    }

    fn insert_investment(&self, investment: Investment) -> EngineResult<Investment> {
        self.investments.write().push(investment.clone());
        debug!(investment_id = %investment.id, plan_id = %investment.plan_id, "Investment stored");
        Ok(investment)
    }

    fn list_investments(&self) -> Vec<Investment> {
        self.investments.read().iter().rev().cloned().collect()
    }

    fn insert_notification(&self, notification: Notification) -> EngineResult<Notification> {
        self.notifications.write().push(notification.clone());
        Ok(notification)
    }

    fn list_notifications(&self) -> Vec<Notification> {
        self.notifications.read().iter().rev().cloned().collect()
    }

    fn mark_notification_read(&self, id: Uuid) -> EngineResult<Notification> {
        let mut notifications = self.notifications.write();
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| EngineError::RecordNotFound {
                kind: "Notification".to_string(),
                id: id.to_string(),
            })?;
        notification.mark_read();
        Ok(notification.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EmployeePayment, NotificationKind, NotificationStatus, PayrollStatus, PayrollType,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn create_payroll(name: &str) -> Payroll {
        Payroll {
            id: Uuid::new_v4(),
            name: name.to_string(),
            date_created: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            payday: None,
            pay_period_start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            pay_period_end: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            status: PayrollStatus::Pending,
            budget: Decimal::from(100),
            payroll_type: PayrollType::OneTime,
            frequency: None,
            payees: vec![],
            payments: vec![EmployeePayment {
                payee_id: "a".to_string(),
                amount: Decimal::from(100),
            }],
            version: 0,
        }
    }

    #[test]
    fn test_insert_sets_version_one() {
        let repo = MemoryRepository::new();
        let stored = repo.insert_payroll(create_payroll("June")).unwrap();

        assert_eq!(stored.version, 1);
        assert_eq!(repo.get_payroll(stored.id).unwrap(), stored);
    }

    #[test]
    fn test_insert_same_id_twice_conflicts() {
        let repo = MemoryRepository::new();
        let payroll = create_payroll("June");
        repo.insert_payroll(payroll.clone()).unwrap();

        assert!(matches!(
            repo.insert_payroll(payroll),
            Err(EngineError::VersionConflict { .. })
        ));
    }

    #[test]
    fn test_get_missing_payroll() {
        let repo = MemoryRepository::new();
        match repo.get_payroll(Uuid::nil()) {
            Err(EngineError::RecordNotFound { kind, .. }) => assert_eq!(kind, "Payroll"),
            other => panic!("Expected RecordNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_update_bumps_version() {
        let repo = MemoryRepository::new();
        let mut stored = repo.insert_payroll(create_payroll("June")).unwrap();
        stored.name = "June (revised)".to_string();

        let updated = repo.update_payroll(stored).unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(repo.get_payroll(updated.id).unwrap().name, "June (revised)");
    }

    #[test]
    fn test_stale_update_is_rejected() {
        let repo = MemoryRepository::new();
        let stored = repo.insert_payroll(create_payroll("June")).unwrap();

        let first = stored.clone();
        let mut second = stored;
        repo.update_payroll(first).unwrap();
        second.name = "Lost update".to_string();

        match repo.update_payroll(second) {
            Err(EngineError::VersionConflict {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected VersionConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_processed_payroll_cannot_be_updated() {
        let repo = MemoryRepository::new();
        let mut stored = repo.insert_payroll(create_payroll("June")).unwrap();
        stored.transition_to(PayrollStatus::Processed).unwrap();
        let processed = repo.update_payroll(stored).unwrap();

        let mut edit = processed;
        edit.name = "Too late".to_string();
        assert!(matches!(
            repo.update_payroll(edit),
            Err(EngineError::PayrollImmutable { .. })
        ));
    }

    #[test]
    fn test_list_payrolls_is_ordered() {
        let repo = MemoryRepository::new();
        repo.insert_payroll(create_payroll("b")).unwrap();
        repo.insert_payroll(create_payroll("a")).unwrap();

        let names: Vec<String> = repo.list_payrolls().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_notifications_newest_first_and_mark_read() {
        let repo = MemoryRepository::new();
        let first = repo
            .insert_notification(Notification::new(NotificationKind::Info, "1", "m", "d"))
            .unwrap();
        repo.insert_notification(Notification::new(NotificationKind::Info, "2", "m", "d"))
            .unwrap();

        let titles: Vec<String> = repo
            .list_notifications()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["2", "1"]);

        let read = repo.mark_notification_read(first.id).unwrap();
        assert_eq!(read.status, NotificationStatus::Read);
        assert!(repo.mark_notification_read(Uuid::nil()).is_err());
    }
}
