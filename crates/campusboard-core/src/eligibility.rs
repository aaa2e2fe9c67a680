//! Which catalog events may be nudged right now.

use chrono::NaiveDate;

use crate::catalog::{CampusEvent, Catalog};
use crate::interest::InterestStore;

/// Eligible events in catalog order, split by interest.
#[derive(Debug, Clone, Default)]
pub struct EligiblePools<'a> {
    pub all: Vec<&'a CampusEvent>,
    pub interested: Vec<&'a CampusEvent>,
    pub discovery: Vec<&'a CampusEvent>,
}

impl<'a> EligiblePools<'a> {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// An event is eligible when it is not registered, not marked not-interested
/// and dated `today` or later.
pub fn is_eligible(event: &CampusEvent, interest: &InterestStore, today: NaiveDate) -> bool {
    !interest.is_registered(&event.id)
        && !interest.is_not_interested(&event.id)
        && event.is_upcoming(today)
}

pub fn eligible_pools<'a>(
    catalog: &'a Catalog,
    interest: &InterestStore,
    today: NaiveDate,
) -> EligiblePools<'a> {
    let mut pools = EligiblePools::default();
    for event in catalog.iter().filter(|e| is_eligible(e, interest, today)) {
        pools.all.push(event);
        if interest.is_interested(&event.id) {
            pools.interested.push(event);
        } else {
            pools.discovery.push(event);
        }
    }
    pools
}
