//! Integration tests for the toast lifecycle.
//!
//! Time is driven by a `ManualClock`; every test starts at noon on
//! 16 Oct 2026 with a fixed RNG seed.

use std::sync::Arc;

use campusboard_core::{
    CampusEvent, Catalog, Config, CoreEvent, ManualClock, RemovalReason, TickOutcome,
    ToastPhase, ToastScheduler,
};
use chrono::{NaiveDate, NaiveDateTime};

// ============================================================================
// Test Helpers
// ============================================================================

fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn setup(events: Vec<CampusEvent>) -> (ToastScheduler, ManualClock) {
    let clock = ManualClock::new(noon());
    let mut config = Config::default();
    config.selection.seed = Some(2026);
    let catalog = Arc::new(Catalog::new(events).unwrap());
    let scheduler = ToastScheduler::with_clock(catalog, config, clock.clone()).unwrap();
    (scheduler, clock)
}

fn campus() -> Vec<CampusEvent> {
    vec![
        CampusEvent::new("e1", "Hackathon", "17 Oct 2026"),
        CampusEvent::new("e2", "Choir Night", "18 Oct 2026")
            .with_jokes(["Sing like nobody is grading you."]),
        CampusEvent::new("old", "Orientation", "01 Sep 2026"),
    ]
}

fn removals(events: &[CoreEvent]) -> Vec<(String, RemovalReason)> {
    events
        .iter()
        .filter_map(|e| match e {
            CoreEvent::ToastRemoved {
                event_id, reason, ..
            } => Some((event_id.clone(), *reason)),
            _ => None,
        })
        .collect()
}

fn exiting_count(events: &[CoreEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, CoreEvent::ToastExiting { .. }))
        .count()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_tick_on_empty_slot_creates_promo_toast() {
    let (mut s, clock) = setup(vec![CampusEvent::new("e1", "Hackathon", "17 Oct 2026")]);
    s.start();

    clock.advance_ms(39_999);
    s.run_due();
    assert!(s.current_toast().is_none());

    clock.advance_ms(1);
    s.run_due();
    let toast = s.current_toast().expect("tick should create a toast").clone();
    assert_eq!(toast.event_id, "e1");
    assert_eq!(toast.event_name, "Hackathon");
    assert!(s.config().messages.promo.contains(&toast.text));
    assert_eq!(s.phase(), ToastPhase::Visible);

    assert_eq!(s.history().len(), 1);
    let record = s.history().latest().unwrap();
    assert_eq!(record.id, toast.id);
    assert_eq!(record.text, toast.text);
    assert_eq!(record.event_name, toast.event_name);
    assert_eq!(record.event_id, toast.event_id);
    assert_eq!(record.timestamp, toast.created_at);
    assert!(!record.read);
}

#[test]
fn test_visible_then_exiting_then_removed_on_schedule() {
    let (mut s, clock) = setup(campus());
    let id = s.add_toast("Come hack", "Hackathon", "e1", false).unwrap();

    clock.advance_ms(5_999);
    s.run_due();
    assert_eq!(s.phase(), ToastPhase::Visible);

    clock.advance_ms(1);
    s.run_due();
    assert_eq!(s.phase(), ToastPhase::Exiting);
    assert!(s.current_toast().unwrap().is_exiting);

    clock.advance_ms(299);
    s.run_due();
    assert_eq!(s.phase(), ToastPhase::Exiting);

    clock.advance_ms(1);
    s.run_due();
    assert_eq!(s.phase(), ToastPhase::Empty);

    let events = s.drain_events();
    assert_eq!(exiting_count(&events), 1);
    assert_eq!(removals(&events), [("e1".to_string(), RemovalReason::Expired)]);
    assert!(matches!(
        events.first(),
        Some(CoreEvent::ToastShown { toast, forced: false, .. }) if toast.id == id
    ));
}

#[test]
fn test_toggle_interest_preempts_other_visible_toast() {
    let (mut s, clock) = setup(campus());
    let first = s.add_toast("Sing!", "Choir Night", "e2", false).unwrap();
    s.drain_events();

    clock.advance_ms(1_000);
    assert!(s.toggle_interested("e1"));
    assert!(s.interest().is_interested("e1"));

    let toast = s.current_toast().unwrap();
    assert_eq!(toast.event_id, "e1");
    assert_ne!(toast.id, first);
    assert!(s.config().messages.feedback.contains(&toast.text));
    assert_eq!(s.history().len(), 2);

    let events = s.drain_events();
    assert_eq!(removals(&events), [("e2".to_string(), RemovalReason::Replaced)]);
    assert!(matches!(events.last(), Some(CoreEvent::ToastShown { forced: true, .. })));

    // The displaced toast's timers are gone; only the new pair remains.
    assert_eq!(s.pending_timers(), 2);
    clock.advance_ms(5_000);
    s.run_due();
    assert_eq!(s.phase(), ToastPhase::Visible);
}

#[test]
fn test_toggle_interest_prefers_event_jokes() {
    let (mut s, _) = setup(campus());
    s.toggle_interested("e2");
    assert_eq!(
        s.current_toast().unwrap().text,
        "Sing like nobody is grading you."
    );
}

#[test]
fn test_forced_toast_for_same_event_is_deduplicated() {
    let (mut s, _) = setup(campus());
    s.toggle_interested("e1");
    let id = s.current_toast().unwrap().id;

    assert!(!s.toggle_interested("e1"));
    assert!(s.toggle_interested("e1"));
    assert_eq!(s.current_toast().unwrap().id, id);
    assert_eq!(s.history().len(), 1);
    assert!(s.add_toast("again", "Hackathon", "e1", true).is_none());
}

#[test]
fn test_toggle_interest_skips_registered_and_past_events() {
    let (mut s, _) = setup(campus());
    s.register("e1");
    assert!(s.toggle_interested("e1"));
    assert!(s.toggle_interested("old"));
    assert!(s.toggle_interested("not-in-catalog"));
    assert!(s.current_toast().is_none());
    assert!(s.history().is_empty());
}

#[test]
fn test_register_purges_visible_toast_without_exit() {
    let (mut s, clock) = setup(campus());
    s.add_toast("Come hack", "Hackathon", "e1", false);
    s.drain_events();

    s.register("e1");
    assert_eq!(s.phase(), ToastPhase::Empty);
    assert_eq!(s.pending_timers(), 0);

    let events = s.drain_events();
    assert_eq!(exiting_count(&events), 0);
    assert_eq!(removals(&events), [("e1".to_string(), RemovalReason::Purged)]);

    clock.advance_ms(10_000);
    assert_eq!(s.run_due(), 0);
    assert!(s.add_toast("nope", "Hackathon", "e1", true).is_none());
    assert_eq!(s.history().len(), 1);
}

#[test]
fn test_not_interested_purges_exiting_toast() {
    let (mut s, clock) = setup(campus());
    s.toggle_interested("e1");
    let id = s.current_toast().unwrap().id;
    clock.advance_ms(100);
    assert!(s.dismiss_toast(id));
    assert_eq!(s.phase(), ToastPhase::Exiting);

    s.mark_not_interested("e1");
    assert_eq!(s.phase(), ToastPhase::Empty);
    assert!(!s.interest().is_interested("e1"));
    assert!(s.interest().is_not_interested("e1"));
    assert_eq!(s.pending_timers(), 0);
}

#[test]
fn test_purge_leaves_other_events_alone() {
    let (mut s, _) = setup(campus());
    s.add_toast("Sing!", "Choir Night", "e2", false);
    s.register("e1");
    s.mark_not_interested("old");
    assert_eq!(s.current_toast().unwrap().event_id, "e2");
}

#[test]
fn test_tick_skips_when_slot_occupied() {
    let (mut s, _) = setup(campus());
    s.add_toast("Come hack", "Hackathon", "e1", false);
    s.drain_events();

    assert!(s.tick().is_none());
    assert_eq!(s.history().len(), 1);
    assert!(matches!(
        s.drain_events().as_slice(),
        [CoreEvent::TickSkipped { outcome: TickOutcome::SlotOccupied, .. }]
    ));
}

#[test]
fn test_tick_reads_slot_at_fire_time() {
    let (mut s, clock) = setup(campus());
    s.start();

    // A user action fills the slot just before the tick is due.
    clock.advance_ms(39_900);
    s.run_due();
    s.toggle_interested("e2");
    clock.advance_ms(100);
    s.run_due();

    assert_eq!(s.current_toast().unwrap().event_id, "e2");
    assert_eq!(s.history().len(), 1);
}

#[test]
fn test_exploring_suppresses_ticks_but_not_forced_toasts() {
    let (mut s, _) = setup(campus());
    s.set_exploring(true);
    assert!(s.tick().is_none());
    assert!(s.add_toast("quiet", "Hackathon", "e1", false).is_none());
    assert!(matches!(
        s.drain_events().as_slice(),
        [CoreEvent::TickSkipped { outcome: TickOutcome::Exploring, .. }]
    ));

    s.toggle_interested("e2");
    assert_eq!(s.current_toast().unwrap().event_id, "e2");

    s.set_exploring(false);
    s.register("e2");
    assert!(s.tick().is_some());
}

#[test]
fn test_empty_pool_is_a_no_op() {
    let (mut s, clock) = setup(campus());
    s.register("e1");
    s.mark_not_interested("e2");
    s.start();
    clock.advance_ms(40_000);
    s.run_due();
    assert!(s.current_toast().is_none());
    assert!(s.history().is_empty());
    assert!(s.drain_events().iter().any(|e| matches!(
        e,
        CoreEvent::TickSkipped { outcome: TickOutcome::NothingEligible, .. }
    )));
}

#[test]
fn test_click_exits_navigates_and_marks_viewed() {
    let (mut s, clock) = setup(campus());
    let id = s.add_toast("Sing!", "Choir Night", "e2", false).unwrap();
    assert_eq!(s.unopened_count(), 2);
    s.drain_events();

    clock.advance_ms(2_000);
    assert!(s.click_toast(id));
    assert_eq!(s.phase(), ToastPhase::Exiting);
    assert!(s.interest().is_viewed("e2"));
    assert_eq!(s.unopened_count(), 1);

    let events = s.drain_events();
    assert_eq!(exiting_count(&events), 1);
    assert!(events.iter().any(|e| matches!(
        e,
        CoreEvent::NavigateToEvent { event_id, .. } if event_id == "e2"
    )));

    clock.advance_ms(300);
    s.run_due();
    assert_eq!(s.phase(), ToastPhase::Empty);
    assert_eq!(s.pending_timers(), 0);
    assert!(!s.click_toast(id));
}

#[test]
fn test_stale_timers_do_not_touch_newer_toast() {
    let (mut s, clock) = setup(campus());
    let first = s.add_toast("one", "Hackathon", "e1", false).unwrap();
    clock.advance_ms(1_000);
    s.dismiss_toast(first);
    clock.advance_ms(300);
    s.run_due();
    assert_eq!(s.phase(), ToastPhase::Empty);

    clock.advance_ms(700);
    let second = s.add_toast("two", "Choir Night", "e2", false).unwrap();

    // 6s after the first toast: its original timers must not fire on the second.
    clock.advance_ms(4_000);
    s.run_due();
    assert_eq!(s.current_toast().map(|t| t.id), Some(second));
    assert_eq!(s.phase(), ToastPhase::Visible);

    clock.advance_ms(2_000);
    s.run_due();
    assert_eq!(s.phase(), ToastPhase::Exiting);
}

#[test]
fn test_history_commands() {
    let (mut s, clock) = setup(campus());
    let a = s.add_toast("one", "Hackathon", "e1", false).unwrap();
    clock.advance_ms(7_000);
    s.run_due();
    let b = s.add_toast("two", "Choir Night", "e2", false).unwrap();

    let ids: Vec<_> = s.history().iter().map(|r| r.id).collect();
    assert_eq!(ids, [b, a]);
    assert_eq!(s.unread_count(), 2);

    s.mark_notifications_read();
    assert_eq!(s.unread_count(), 0);

    s.clear_notifications();
    assert!(s.history().is_empty());
    // Clearing history does not touch the visible toast.
    assert_eq!(s.current_toast().map(|t| t.id), Some(b));
}

#[test]
fn test_unopened_count_ignores_past_events() {
    let (mut s, _) = setup(vec![
        CampusEvent::new("a", "A", "16 Oct 2026"),
        CampusEvent::new("b", "B", "15 Oct 2026"),
        CampusEvent::new("c", "C", "whenever"),
    ]);
    assert_eq!(s.unopened_count(), 2);
    s.mark_event_viewed("a");
    s.mark_event_viewed("b");
    assert_eq!(s.unopened_count(), 1);
}

#[test]
fn test_snapshot_serializes_for_ui() {
    let (mut s, _) = setup(campus());
    s.add_toast("Come hack", "Hackathon", "e1", false);
    let json = serde_json::to_value(s.snapshot()).unwrap();
    assert_eq!(json["phase"], "visible");
    assert_eq!(json["toast"]["eventId"], "e1");
    assert_eq!(json["notifications"].as_array().unwrap().len(), 1);
    assert_eq!(json["unreadCount"], 1);
    assert_eq!(json["unopenedCount"], 2);
}
