//! Precomputed index of the instants at which derived state can change.

use std::time::Duration;

use crate::tournament::MatchStore;

/// Ascending, de-duplicated virtual offsets of every recorded lifecycle
/// transition in a snapshot.
///
/// Built once per session. A driver polling on a fixed cadence does not
/// need the index for correctness; it exists so termination and
/// progress questions are O(1) and so a future fast-forward driver can
/// skip dead time between transitions.
#[derive(Debug, Clone)]
pub struct TimelineIndex {
    offsets: Vec<Duration>,
}

impl TimelineIndex {
    /// Collects the change instants of every record in the store.
    pub fn build(store: &MatchStore) -> TimelineIndex {
        let origin = store.origin();
        let to_offset = |ts: i64| Duration::from_secs((ts - origin).max(0) as u64);

        let mut offsets: Vec<Duration> = store
            .records()
            .flat_map(|record| {
                [record.created_at, record.started_at, record.completed_at]
                    .into_iter()
                    .flatten()
                    .map(to_offset)
            })
            .collect();

        offsets.sort_unstable();
        offsets.dedup();
        TimelineIndex { offsets }
    }

    /// All change offsets in ascending order.
    pub fn change_offsets(&self) -> &[Duration] {
        &self.offsets
    }

    /// First change offset strictly after the given virtual offset.
    pub fn next_change_after(&self, offset: Duration) -> Option<Duration> {
        let index = self.offsets.partition_point(|&o| o <= offset);
        self.offsets.get(index).copied()
    }

    /// Offset of the final recorded transition.
    pub fn end_offset(&self) -> Option<Duration> {
        self.offsets.last().copied()
    }

    /// Number of distinct change instants.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True when the snapshot recorded no transitions at all.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
