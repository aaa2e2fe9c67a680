//! Capacity-one toast slot.
//!
//! ## State Transitions
//!
//! ```text
//! Empty -> Visible -> Exiting -> Empty
//!             \_______________/
//!                hard purge
//! ```
//!
//! The slot only knows how to move between phases. Deciding *whether* a
//! toast may be shown (registration, occupancy, exploring) and *when* it
//! exits is the scheduler's job.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastPhase {
    Empty,
    Visible,
    Exiting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastItem {
    /// Creation time in epoch milliseconds, bumped to stay unique.
    pub id: u64,
    pub text: String,
    pub event_name: String,
    pub event_id: String,
    pub is_exiting: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct ToastSlot {
    occupant: Option<ToastItem>,
}

impl ToastSlot {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> ToastPhase {
        match &self.occupant {
            None => ToastPhase::Empty,
            Some(t) if t.is_exiting => ToastPhase::Exiting,
            Some(_) => ToastPhase::Visible,
        }
    }

    pub fn current(&self) -> Option<&ToastItem> {
        self.occupant.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn holds(&self, toast_id: u64) -> bool {
        self.occupant.as_ref().is_some_and(|t| t.id == toast_id)
    }

    pub fn holds_event(&self, event_id: &str) -> bool {
        self.occupant.as_ref().is_some_and(|t| t.event_id == event_id)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Place a new visible toast, returning whatever it displaced.
    pub fn show(&mut self, mut toast: ToastItem) -> Option<ToastItem> {
        toast.is_exiting = false;
        self.occupant.replace(toast)
    }

    /// Visible -> Exiting for the given toast only.
    pub fn begin_exit(&mut self, toast_id: u64) -> bool {
        match self.occupant.as_mut() {
            Some(t) if t.id == toast_id && !t.is_exiting => {
                t.is_exiting = true;
                true
            }
            _ => false,
        }
    }

    /// Force every occupant into Exiting. Returns the ids that changed.
    pub fn exit_all(&mut self) -> Vec<u64> {
        self.occupant
            .iter_mut()
            .filter(|t| !t.is_exiting)
            .map(|t| {
                t.is_exiting = true;
                t.id
            })
            .collect()
    }

    pub fn remove(&mut self, toast_id: u64) -> Option<ToastItem> {
        if self.holds(toast_id) {
            self.occupant.take()
        } else {
            None
        }
    }

    pub fn remove_exiting(&mut self) -> Option<ToastItem> {
        if self.phase() == ToastPhase::Exiting {
            self.occupant.take()
        } else {
            None
        }
    }

    /// Immediate removal of any toast for `event_id`, in any phase.
    pub fn purge_event(&mut self, event_id: &str) -> Option<ToastItem> {
        if self.holds_event(event_id) {
            self.occupant.take()
        } else {
            None
        }
    }
}
