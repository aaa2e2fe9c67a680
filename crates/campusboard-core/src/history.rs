//! Notification history: every toast ever shown, newest first.

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::toast::ToastItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Same id as the toast that produced it.
    pub id: u64,
    pub text: String,
    pub event_name: String,
    pub event_id: String,
    pub timestamp: NaiveDateTime,
    pub read: bool,
}

impl From<&ToastItem> for NotificationRecord {
    fn from(toast: &ToastItem) -> Self {
        Self {
            id: toast.id,
            text: toast.text.clone(),
            event_name: toast.event_name.clone(),
            event_id: toast.event_id.clone(),
            timestamp: toast.created_at,
            read: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationHistory {
    records: VecDeque<NotificationRecord>,
}

impl NotificationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: NotificationRecord) {
        self.records.push_front(record);
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<NotificationRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&NotificationRecord> {
        self.records.front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|r| !r.read).count()
    }

    pub fn mark_all_read(&mut self) {
        for record in &mut self.records {
            record.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
