//! Partition Module
//!
//! Splits an ordered record list into stale and fresh subsets while keeping
//! every record in its original slot, so the merge can restore input order
//! by position rather than by id.

use chrono::{DateTime, Duration, Utc};

use super::staleness::is_stale;
use crate::models::CachedUserRecord;

/// Which subset a slot was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// One input position and the record it held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub record: CachedUserRecord,
    pub freshness: Freshness,
}

/// Ordered list of slots tagged fresh or stale.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    slots: Vec<Slot>,
}

impl Partition {
    // == Constructor ==
    /// Tags every record against `now` and `threshold`, keeping input order.
    pub fn new(records: Vec<CachedUserRecord>, now: DateTime<Utc>, threshold: Duration) -> Self {
        let slots = records
            .into_iter()
            .map(|record| {
                let freshness = if is_stale(&record, now, threshold) {
                    Freshness::Stale
                } else {
                    Freshness::Fresh
                };
                Slot { record, freshness }
            })
            .collect();

        Self { slots }
    }

    /// Records routed to the stale subset, in input order.
    pub fn stale_records(&self) -> impl Iterator<Item = &CachedUserRecord> {
        self.records_tagged(Freshness::Stale)
    }

    /// Records routed to the fresh subset, in input order.
    pub fn fresh_records(&self) -> impl Iterator<Item = &CachedUserRecord> {
        self.records_tagged(Freshness::Fresh)
    }

    fn records_tagged(&self, tag: Freshness) -> impl Iterator<Item = &CachedUserRecord> {
        self.slots
            .iter()
            .filter(move |slot| slot.freshness == tag)
            .map(|slot| &slot.record)
    }

    /// Positional tags, one per input index.
    pub fn tags(&self) -> impl Iterator<Item = Freshness> + '_ {
        self.slots.iter().map(|slot| slot.freshness)
    }

    pub fn stale_count(&self) -> usize {
        self.stale_records().count()
    }

    pub fn fresh_count(&self) -> usize {
        self.fresh_records().count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Releases the slots in input order.
    pub fn into_slots(self) -> Vec<Slot> {
        self.slots
    }

    /// Releases the records in input order, untouched.
    pub fn into_records(self) -> Vec<CachedUserRecord> {
        self.slots.into_iter().map(|slot| slot.record).collect()
    }
}
