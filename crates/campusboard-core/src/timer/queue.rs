//! Deterministic one-shot timer queue.
//!
//! Timers fire in deadline order; timers sharing a deadline fire in the
//! order they were armed. Nothing here runs on its own: the owner pops due
//! timers and decides what each one means against its current state.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Handle to an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerKind {
    /// Periodic nudge attempt.
    Tick,
    /// Move the given toast from visible to exiting.
    BeginExit { toast_id: u64 },
    /// Drop the given toast from the slot.
    Remove { toast_id: u64 },
    /// Drop whatever occupant is currently exiting.
    SweepExiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub deadline: NaiveDateTime,
    pub kind: TimerKind,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: BTreeMap<(NaiveDateTime, TimerId), TimerKind>,
    deadlines: HashMap<TimerId, NaiveDateTime>,
    /// Timers armed on behalf of a toast, cancelled together.
    owned: HashMap<u64, Vec<TimerId>>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, deadline: NaiveDateTime, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((deadline, id), kind);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Arm a timer that belongs to `owner`, see [`TimerQueue::cancel_owned`].
    pub fn arm_for(&mut self, owner: u64, deadline: NaiveDateTime, kind: TimerKind) -> TimerId {
        let id = self.arm(deadline, kind);
        self.owned.entry(owner).or_default().push(id);
        id
    }

    /// Cancel every pending timer armed for `owner`. Returns how many were
    /// still pending.
    pub fn cancel_owned(&mut self, owner: u64) -> usize {
        self.owned
            .remove(&owner)
            .unwrap_or_default()
            .into_iter()
            .filter(|id| self.cancel(*id))
            .count()
    }

    /// Returns `false` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.pending.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        self.deadlines.clear();
        self.owned.clear();
        count
    }

    /// Remove and return the earliest timer due at `now`.
    pub fn pop_due(&mut self, now: NaiveDateTime) -> Option<FiredTimer> {
        let (&(deadline, id), _) = self.pending.first_key_value()?;
        if deadline > now {
            return None;
        }
        let kind = self.pending.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        Some(FiredTimer { id, deadline, kind })
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
