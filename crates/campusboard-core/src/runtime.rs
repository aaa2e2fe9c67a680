//! Tokio driver for a [`ToastScheduler`].
//!
//! The scheduler is a plain state machine; this task polls it on a
//! `tokio::time::interval` so its timers fire in a running application.
//! Dropping or shutting down the handle stops the scheduler, which cancels
//! all of its timers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::scheduler::ToastScheduler;

/// Default polling period for [`spawn_driver`].
pub const DEFAULT_POLL: Duration = Duration::from_millis(100);

pub struct DriverHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl DriverHandle {
    /// Stop the scheduler and wait for the driver task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            tracing::warn!("toast driver ended abnormally: {e}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Start `scheduler` and keep firing its due timers every `poll`.
pub fn spawn_driver(scheduler: Arc<Mutex<ToastScheduler>>, poll: Duration) -> DriverHandle {
    let (shutdown, mut stop_rx) = watch::channel(false);
    let join = tokio::spawn(async move {
        scheduler.lock().await.start();
        tracing::debug!(poll_ms = poll.as_millis() as u64, "toast driver started");

        let mut interval = tokio::time::interval(poll);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    scheduler.lock().await.run_due();
                }
                changed = stop_rx.changed() => {
                    // Sender dropped counts as a shutdown request.
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }

        scheduler.lock().await.stop();
    });
    DriverHandle { shutdown, join }
}
