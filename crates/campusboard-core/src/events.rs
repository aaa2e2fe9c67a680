use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::toast::ToastItem;

/// Why a toast left the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// Exit animation finished.
    Expired,
    /// Event was registered or marked not interested.
    Purged,
    /// A forced toast took its place.
    Replaced,
}

/// Why a tick produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    SlotOccupied,
    Exploring,
    NothingEligible,
}

/// Every slot transition produces a CoreEvent.
/// The UI layer polls for them with `ToastScheduler::drain_events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CoreEvent {
    ToastShown {
        toast: ToastItem,
        forced: bool,
        at: NaiveDateTime,
    },
    ToastExiting {
        toast_id: u64,
        at: NaiveDateTime,
    },
    ToastRemoved {
        toast_id: u64,
        event_id: String,
        reason: RemovalReason,
        at: NaiveDateTime,
    },
    TickSkipped {
        outcome: TickOutcome,
        at: NaiveDateTime,
    },
    /// User clicked a toast; the UI should open the event's detail view.
    NavigateToEvent {
        event_id: String,
        at: NaiveDateTime,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn serializes_with_type_tag() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let json = serde_json::to_value(CoreEvent::TickSkipped {
            outcome: TickOutcome::SlotOccupied,
            at,
        })
        .unwrap();
        assert_eq!(json["type"], "TickSkipped");
        assert_eq!(json["outcome"], "slot_occupied");
    }
}
