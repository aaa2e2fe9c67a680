use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ToastScheduler;
use crate::history::NotificationRecord;
use crate::toast::{ToastItem, ToastPhase};

/// Everything the dashboard renders, captured at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub toast: Option<ToastItem>,
    pub phase: ToastPhase,
    /// Newest first.
    pub notifications: Vec<NotificationRecord>,
    pub unread_count: usize,
    pub unopened_count: usize,
    pub exploring: bool,
    pub at: NaiveDateTime,
}

impl ToastScheduler {
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            toast: self.slot.current().cloned(),
            phase: self.slot.phase(),
            notifications: self.history.to_vec(),
            unread_count: self.unread_count(),
            unopened_count: self.unopened_count(),
            exploring: self.exploring,
            at: self.now(),
        }
    }

    /// Upcoming catalog events the user has not opened yet.
    pub fn unopened_count(&self) -> usize {
        let today = self.today();
        self.catalog
            .iter()
            .filter(|e| e.is_upcoming(today) && !self.interest.is_viewed(&e.id))
            .count()
    }
}
