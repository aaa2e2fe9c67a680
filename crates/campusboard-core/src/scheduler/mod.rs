//! Toast scheduler.
//!
//! Owns the toast slot, notification history, interest store and every
//! timer. There is no internal thread: time moves when the caller invokes
//! [`ToastScheduler::run_due`], which fires each due timer against the
//! scheduler's *current* state. A timer carries nothing but the toast id it
//! targets, so a timer that outlives its toast simply finds nothing to do.
//!
//! ## Usage
//!
//! ```ignore
//! let mut scheduler = ToastScheduler::new(catalog, Config::load_or_default())?;
//! scheduler.start();
//! // In a loop:
//! scheduler.run_due();
//! for event in scheduler.drain_events() { /* render */ }
//! ```

mod commands;
mod snapshot;

pub use snapshot::DashboardSnapshot;

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::eligibility::eligible_pools;
use crate::error::ConfigError;
use crate::events::{CoreEvent, RemovalReason, TickOutcome};
use crate::history::{NotificationHistory, NotificationRecord};
use crate::interest::InterestStore;
use crate::selection::{compose_nudge, pick_event};
use crate::storage::Config;
use crate::timer::{Clock, FiredTimer, SystemClock, TimerId, TimerKind, TimerQueue};
use crate::toast::{ToastItem, ToastPhase, ToastSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Idle,
    Running,
    Stopped,
}

pub struct ToastScheduler {
    catalog: Arc<Catalog>,
    config: Config,
    clock: Box<dyn Clock>,
    rng: Mcg128Xsl64,
    slot: ToastSlot,
    history: NotificationHistory,
    interest: InterestStore,
    timers: TimerQueue,
    tick_timer: Option<TimerId>,
    lifecycle: Lifecycle,
    exploring: bool,
    last_toast_id: u64,
    events: Vec<CoreEvent>,
}

impl ToastScheduler {
    /// Scheduler on the system clock.
    pub fn new(catalog: Arc<Catalog>, config: Config) -> Result<Self, ConfigError> {
        Self::with_clock(catalog, config, SystemClock)
    }

    /// # Errors
    ///
    /// Returns an error if `config` does not pass [`Config::validate`].
    pub fn with_clock(
        catalog: Arc<Catalog>,
        config: Config,
        clock: impl Clock + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.selection.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Ok(Self {
            catalog,
            config,
            clock: Box::new(clock),
            rng,
            slot: ToastSlot::new(),
            history: NotificationHistory::new(),
            interest: InterestStore::new(),
            timers: TimerQueue::new(),
            tick_timer: None,
            lifecycle: Lifecycle::Idle,
            exploring: false,
            last_toast_id: 0,
            events: Vec::new(),
        })
    }

    /// Replace the random source, e.g. to replay a run.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Mcg128Xsl64::seed_from_u64(seed);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn current_toast(&self) -> Option<&ToastItem> {
        self.slot.current()
    }

    pub fn phase(&self) -> ToastPhase {
        self.slot.phase()
    }

    pub fn history(&self) -> &NotificationHistory {
        &self.history
    }

    pub fn interest(&self) -> &InterestStore {
        &self.interest
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_exploring(&self) -> bool {
        self.exploring
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().date()
    }

    pub fn unread_count(&self) -> usize {
        self.history.unread_count()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.timers.next_deadline()
    }

    /// Take every event produced since the last call.
    pub fn drain_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Arm the periodic tick. No-op once stopped.
    pub fn start(&mut self) {
        match self.lifecycle {
            Lifecycle::Running => {}
            Lifecycle::Stopped => tracing::warn!("start() on a stopped toast scheduler ignored"),
            Lifecycle::Idle => {
                self.lifecycle = Lifecycle::Running;
                let deadline = later(self.now(), self.tick_interval());
                self.tick_timer = Some(self.timers.arm(deadline, TimerKind::Tick));
                tracing::info!(
                    interval_ms = self.config.timing.tick_interval_ms,
                    events = self.catalog.len(),
                    "toast scheduler started"
                );
            }
        }
    }

    /// Cancel every outstanding timer. The scheduler accepts no new toasts
    /// afterwards.
    pub fn stop(&mut self) {
        if self.lifecycle == Lifecycle::Stopped {
            return;
        }
        let cancelled = self.timers.cancel_all();
        self.tick_timer = None;
        self.lifecycle = Lifecycle::Stopped;
        tracing::info!(cancelled, "toast scheduler stopped");
    }

    /// Fire every timer that is due. Returns how many fired.
    pub fn run_due(&mut self) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.timers.pop_due(self.clock.now()) {
            self.fire(timer);
            fired += 1;
        }
        fired
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Run one nudge attempt right now. Returns the new toast id, if any.
    pub fn tick(&mut self) -> Option<u64> {
        if self.lifecycle == Lifecycle::Stopped {
            return None;
        }
        let skipped = if self.slot.is_occupied() {
            Some(TickOutcome::SlotOccupied)
        } else if self.exploring {
            Some(TickOutcome::Exploring)
        } else {
            None
        };
        if let Some(outcome) = skipped {
            return self.skip_tick(outcome);
        }

        let catalog = Arc::clone(&self.catalog);
        let pools = eligible_pools(&catalog, &self.interest, self.today());
        let Some(event) = pick_event(&pools, &self.config.selection, &mut self.rng) else {
            return self.skip_tick(TickOutcome::NothingEligible);
        };
        let interested = self.interest.is_interested(&event.id);
        let text = compose_nudge(
            event,
            interested,
            &self.config.selection,
            &self.config.messages,
            &mut self.rng,
        );
        self.create(text, event.title.clone(), event.id.clone(), false)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn create(
        &mut self,
        text: String,
        event_name: String,
        event_id: String,
        force: bool,
    ) -> Option<u64> {
        let rejection = if self.lifecycle == Lifecycle::Stopped {
            Some("scheduler stopped")
        } else if self.interest.is_registered(&event_id) {
            Some("event registered")
        } else if force && self.slot.holds_event(&event_id) {
            Some("event already showing")
        } else if !force && self.slot.is_occupied() {
            Some("slot occupied")
        } else if !force && self.exploring {
            Some("user exploring")
        } else {
            None
        };
        if let Some(reason) = rejection {
            tracing::debug!(event_id = %event_id, force, reason, "toast rejected");
            return None;
        }

        let now = self.now();
        if let Some(previous) = self.slot.current().map(|t| t.id) {
            self.remove_occupant(previous, RemovalReason::Replaced);
        }

        let toast = ToastItem {
            id: self.next_toast_id(now),
            text,
            event_name,
            event_id,
            is_exiting: false,
            created_at: now,
        };
        let toast_id = toast.id;
        self.history.append(NotificationRecord::from(&toast));
        tracing::info!(toast_id, event_id = %toast.event_id, forced = force, "toast shown");
        self.slot.show(toast.clone());
        self.events.push(CoreEvent::ToastShown {
            toast,
            forced: force,
            at: now,
        });

        let exit_at = later(now, self.visible_duration());
        let remove_at = later(exit_at, self.exit_duration());
        self.timers.arm_for(toast_id, exit_at, TimerKind::BeginExit { toast_id });
        self.timers.arm_for(toast_id, remove_at, TimerKind::Remove { toast_id });
        Some(toast_id)
    }

    fn fire(&mut self, timer: FiredTimer) {
        let now = self.now();
        match timer.kind {
            TimerKind::Tick => {
                self.tick_timer = None;
                self.tick();
                if self.lifecycle == Lifecycle::Running {
                    // Coalesce ticks missed while nobody drove the queue.
                    let mut next = later(timer.deadline, self.tick_interval());
                    if next <= now {
                        next = later(now, self.tick_interval());
                    }
                    self.tick_timer = Some(self.timers.arm(next, TimerKind::Tick));
                }
            }
            TimerKind::BeginExit { toast_id } => {
                if self.slot.begin_exit(toast_id) {
                    self.events.push(CoreEvent::ToastExiting { toast_id, at: now });
                } else {
                    tracing::trace!(toast_id, "stale exit timer");
                }
            }
            TimerKind::Remove { toast_id } => {
                if self.slot.holds(toast_id) {
                    self.remove_occupant(toast_id, RemovalReason::Expired);
                } else {
                    tracing::trace!(toast_id, "stale removal timer");
                }
            }
            TimerKind::SweepExiting => {
                if let Some(toast) = self.slot.remove_exiting() {
                    self.finish_removal(toast, RemovalReason::Expired);
                }
            }
        }
    }

    fn skip_tick(&mut self, outcome: TickOutcome) -> Option<u64> {
        tracing::debug!(?outcome, "tick skipped");
        self.events.push(CoreEvent::TickSkipped {
            outcome,
            at: self.now(),
        });
        None
    }

    /// Drop the event's toast at once, skipping the exit animation.
    fn hard_purge(&mut self, event_id: &str) {
        if let Some(toast) = self.slot.purge_event(event_id) {
            self.finish_removal(toast, RemovalReason::Purged);
        }
    }

    fn remove_occupant(&mut self, toast_id: u64, reason: RemovalReason) {
        if let Some(toast) = self.slot.remove(toast_id) {
            self.finish_removal(toast, reason);
        }
    }

    fn finish_removal(&mut self, toast: ToastItem, reason: RemovalReason) {
        self.timers.cancel_owned(toast.id);
        tracing::debug!(toast_id = toast.id, ?reason, "toast removed");
        self.events.push(CoreEvent::ToastRemoved {
            toast_id: toast.id,
            event_id: toast.event_id,
            reason,
            at: self.now(),
        });
    }

    /// Epoch milliseconds of `now`, bumped past the previous id if needed.
    fn next_toast_id(&mut self, now: NaiveDateTime) -> u64 {
        let ms = u64::try_from(now.and_utc().timestamp_millis()).unwrap_or(0);
        let id = ms.max(self.last_toast_id + 1);
        self.last_toast_id = id;
        id
    }

    fn tick_interval(&self) -> Duration {
        millis(self.config.timing.tick_interval_ms)
    }

    fn visible_duration(&self) -> Duration {
        millis(self.config.timing.visible_ms)
    }

    fn exit_duration(&self) -> Duration {
        millis(self.config.timing.exit_ms)
    }
}

fn millis(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

/// `at + delay`, saturating at the end of representable time.
fn later(at: NaiveDateTime, delay: Duration) -> NaiveDateTime {
    at.checked_add_signed(delay).unwrap_or(NaiveDateTime::MAX)
}
