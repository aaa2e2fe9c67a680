//! Per-user interest state.
//!
//! `interested` and `not_interested` never share an id. `registered` only
//! grows. `viewed` is bookkeeping for the unopened-events badge and does not
//! interact with the other sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestStore {
    interested: BTreeSet<String>,
    not_interested: BTreeSet<String>,
    registered: BTreeSet<String>,
    viewed: BTreeSet<String>,
}

impl InterestStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_interested(&self, event_id: &str) -> bool {
        self.interested.contains(event_id)
    }

    pub fn is_not_interested(&self, event_id: &str) -> bool {
        self.not_interested.contains(event_id)
    }

    pub fn is_registered(&self, event_id: &str) -> bool {
        self.registered.contains(event_id)
    }

    pub fn is_viewed(&self, event_id: &str) -> bool {
        self.viewed.contains(event_id)
    }

    pub fn interested(&self) -> &BTreeSet<String> {
        &self.interested
    }

    pub fn not_interested(&self) -> &BTreeSet<String> {
        &self.not_interested
    }

    pub fn registered(&self) -> &BTreeSet<String> {
        &self.registered
    }

    pub fn viewed(&self) -> &BTreeSet<String> {
        &self.viewed
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Flip interest. Returns `true` if the event is now interested.
    pub fn toggle_interested(&mut self, event_id: &str) -> bool {
        if self.interested.remove(event_id) {
            return false;
        }
        self.not_interested.remove(event_id);
        self.interested.insert(event_id.to_string());
        true
    }

    pub fn mark_not_interested(&mut self, event_id: &str) {
        self.interested.remove(event_id);
        self.not_interested.insert(event_id.to_string());
    }

    /// Returns `false` if the event was already registered.
    pub fn register(&mut self, event_id: &str) -> bool {
        self.registered.insert(event_id.to_string())
    }

    pub fn mark_viewed(&mut self, event_id: &str) {
        self.viewed.insert(event_id.to_string());
    }
}
