//! Weighted random choice of the next nudge.
//!
//! Two independent draws: first which event, then which line of text. Both
//! take any [`rand::Rng`] so tests can drive each level with its own seeded
//! generator.
//!
//! ```text
//! interested pool ──(p = interested_chance)──► event
//!        │ miss / empty
//!        ▼
//! discovery pool ──(uniform)──► event
//!        │ empty
//!        ▼
//! all eligible ──(uniform)──► event
//! ```

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::CampusEvent;
use crate::eligibility::EligiblePools;
use crate::storage::config::{MessagesConfig, SelectionConfig};

/// `gen_bool` panics outside `0.0..=1.0`; treat junk probabilities as never.
fn roll<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if !probability.is_finite() || probability <= 0.0 {
        return false;
    }
    rng.gen_bool(probability.min(1.0))
}

/// Pick one eligible event, or `None` when nothing is eligible.
pub fn pick_event<'a, R: Rng + ?Sized>(
    pools: &EligiblePools<'a>,
    settings: &SelectionConfig,
    rng: &mut R,
) -> Option<&'a CampusEvent> {
    if !pools.interested.is_empty() && roll(rng, settings.interested_chance) {
        return pools.interested.choose(rng).copied();
    }
    if let Some(event) = pools.discovery.choose(rng) {
        return Some(*event);
    }
    pools.all.choose(rng).copied()
}

/// Text for a scheduled nudge about `event`.
pub fn compose_nudge<R: Rng + ?Sized>(
    event: &CampusEvent,
    interested: bool,
    settings: &SelectionConfig,
    messages: &MessagesConfig,
    rng: &mut R,
) -> String {
    if interested {
        return event
            .jokes
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| messages.interested_fallback.clone());
    }
    if !event.jokes.is_empty() && roll(rng, settings.discovery_flavor_chance) {
        if let Some(joke) = event.jokes.choose(rng) {
            return joke.clone();
        }
    }
    promo_line(event, messages, rng)
}

/// Text shown right after the user marks `event` as interesting.
pub fn compose_feedback<R: Rng + ?Sized>(
    event: &CampusEvent,
    messages: &MessagesConfig,
    rng: &mut R,
) -> String {
    event
        .jokes
        .choose(rng)
        .or_else(|| messages.feedback.choose(rng))
        .cloned()
        .unwrap_or_else(|| messages.interested_fallback.clone())
}

fn promo_line<R: Rng + ?Sized>(
    event: &CampusEvent,
    messages: &MessagesConfig,
    rng: &mut R,
) -> String {
    messages
        .promo
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| format!("{} is coming up.", event.title))
}
