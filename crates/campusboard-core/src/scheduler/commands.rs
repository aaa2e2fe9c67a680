//! User-facing commands: manual toasts, dismiss, click and interest signals.

use std::sync::Arc;

use super::{later, ToastScheduler};
use crate::events::CoreEvent;
use crate::selection::compose_feedback;
use crate::timer::TimerKind;

impl ToastScheduler {
    /// Show a toast. Unforced creation needs an empty slot and a user who is
    /// not exploring; forced creation only refuses a duplicate of the current
    /// occupant's event. Registered events are always refused.
    pub fn add_toast(
        &mut self,
        text: impl Into<String>,
        event_name: impl Into<String>,
        event_id: impl Into<String>,
        force: bool,
    ) -> Option<u64> {
        self.create(text.into(), event_name.into(), event_id.into(), force)
    }

    /// Start the exit animation early. Returns `false` if the toast is not
    /// the visible occupant.
    pub fn dismiss_toast(&mut self, toast_id: u64) -> bool {
        if !self.slot.begin_exit(toast_id) {
            return false;
        }
        self.timers.cancel_owned(toast_id);
        let now = self.now();
        let remove_at = later(now, self.exit_duration());
        self.events.push(CoreEvent::ToastExiting { toast_id, at: now });
        self.timers.arm_for(toast_id, remove_at, TimerKind::Remove { toast_id });
        true
    }

    /// Open the toast's event: everything in the slot starts exiting, a bulk
    /// removal is scheduled and the event is marked viewed.
    pub fn click_toast(&mut self, toast_id: u64) -> bool {
        let Some(event_id) = self
            .slot
            .current()
            .filter(|t| t.id == toast_id)
            .map(|t| t.event_id.clone())
        else {
            return false;
        };
        let now = self.now();
        let sweep_at = later(now, self.exit_duration());
        for exiting in self.slot.exit_all() {
            self.timers.cancel_owned(exiting);
            self.events.push(CoreEvent::ToastExiting {
                toast_id: exiting,
                at: now,
            });
            self.timers.arm_for(exiting, sweep_at, TimerKind::SweepExiting);
        }
        self.events.push(CoreEvent::NavigateToEvent {
            event_id: event_id.clone(),
            at: now,
        });
        self.interest.mark_viewed(&event_id);
        true
    }

    /// Flip interest. Becoming interested in an upcoming, unregistered
    /// event shows a forced feedback toast. Returns the new interest state.
    pub fn toggle_interested(&mut self, event_id: &str) -> bool {
        if !self.interest.toggle_interested(event_id) {
            return false;
        }
        let catalog = Arc::clone(&self.catalog);
        let today = self.today();
        match catalog.get(event_id) {
            Some(event) if !self.interest.is_registered(event_id) && event.is_upcoming(today) => {
                let text = compose_feedback(event, &self.config.messages, &mut self.rng);
                self.create(text, event.title.clone(), event.id.clone(), true);
            }
            Some(_) => {}
            None => tracing::debug!(event_id, "interest toggled for event missing from catalog"),
        }
        true
    }

    pub fn mark_not_interested(&mut self, event_id: &str) {
        self.interest.mark_not_interested(event_id);
        self.hard_purge(event_id);
    }

    pub fn register(&mut self, event_id: &str) {
        self.interest.register(event_id);
        self.hard_purge(event_id);
    }

    pub fn clear_notifications(&mut self) {
        self.history.clear();
    }

    pub fn mark_notifications_read(&mut self) {
        self.history.mark_all_read();
    }

    pub fn mark_event_viewed(&mut self, event_id: &str) {
        self.interest.mark_viewed(event_id);
    }

    /// While set, automatic nudges are suppressed.
    pub fn set_exploring(&mut self, exploring: bool) {
        self.exploring = exploring;
    }
}
