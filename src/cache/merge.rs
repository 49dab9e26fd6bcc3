//! Merge Module
//!
//! Recombines refreshed and untouched records into the original input order.

use std::iter::Peekable;

use super::partition::{Freshness, Partition};
use crate::models::CachedUserRecord;

// == Merge ==
/// Rebuilds the input list from a partition and the refreshed records.
///
/// Fresh slots keep their record. Each stale slot takes the next refreshed
/// record if it belongs to that slot; otherwise the slot keeps its cached
/// record, old `cached_at` included. `refreshed` must be in stale-subset
/// order, as produced by the batch refresher.
///
/// Output length and position-to-id mapping always equal the input's.
pub fn merge(partition: Partition, refreshed: Vec<CachedUserRecord>) -> Vec<CachedUserRecord> {
    let mut refreshed: Peekable<_> = refreshed.into_iter().peekable();

    partition
        .into_slots()
        .into_iter()
        .map(|slot| match slot.freshness {
            Freshness::Fresh => slot.record,
            Freshness::Stale => refreshed
                .next_if(|candidate| candidate.id == slot.record.id)
                .unwrap_or(slot.record),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::staleness::default_threshold;
    use crate::cache::test_support::{fresh, now, stale};

    fn refreshed(record: &CachedUserRecord) -> CachedUserRecord {
        CachedUserRecord {
            display_name: format!("Renamed {}", record.id),
            cached_at: now(),
            ..record.clone()
        }
    }

    fn ids(records: &[CachedUserRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_merge_restores_order() {
        let input = vec![fresh("a"), stale("b"), fresh("c")];
        let partition = Partition::new(input.clone(), now(), default_threshold());

        let merged = merge(partition, vec![refreshed(&input[1])]);

        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
        assert_eq!(merged[0], input[0]);
        assert_eq!(merged[1].display_name, "Renamed b");
        assert_eq!(merged[2], input[2]);
    }

    #[test]
    fn test_merge_falls_back_for_dropped_record() {
        let input = vec![stale("a"), stale("b"), stale("c")];
        let partition = Partition::new(input.clone(), now(), default_threshold());

        // "b" was omitted by the lookup
        let merged = merge(partition, vec![refreshed(&input[0]), refreshed(&input[2])]);

        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
        assert_eq!(merged[0].cached_at, now());
        assert_eq!(merged[1], input[1], "dropped record keeps cached values");
        assert_eq!(merged[2].display_name, "Renamed c");
    }

    #[test]
    fn test_merge_with_nothing_refreshed() {
        let input = vec![stale("a"), fresh("b"), stale("c")];
        let partition = Partition::new(input.clone(), now(), default_threshold());

        let merged = merge(partition, Vec::new());

        assert_eq!(merged, input);
    }

    #[test]
    fn test_merge_duplicate_ids_by_position() {
        let input = vec![stale("x"), fresh("y"), stale("x")];
        let partition = Partition::new(input.clone(), now(), default_threshold());

        let merged = merge(
            partition,
            vec![refreshed(&input[0]), refreshed(&input[2])],
        );

        assert_eq!(ids(&merged), vec!["x", "y", "x"]);
        assert_eq!(merged[0].cached_at, now());
        assert_eq!(merged[2].cached_at, now());
    }
}
