//! Per-tick derived view of the matches a display should show.

use std::time::Duration;

use super::classify::{Classification, classify};
use crate::tournament::{MatchRecord, MatchStore, SetId};

/// One displayable match with its derived state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleEntry {
    /// Set identity.
    pub id: SetId,
    /// Round text for display.
    pub display_name: String,
    /// First player's tag.
    pub player1: String,
    /// Second player's tag.
    pub player2: String,
    /// Pool label for display grouping.
    pub pool: String,
    /// Derived state at the tick's virtual time.
    pub classification: Classification,
    /// Virtual offset at which the set materialized.
    pub created_offset: Duration,
    /// Virtual offset at which the set started, if recorded.
    pub started_offset: Option<Duration>,
}

impl VisibleEntry {
    fn from_record(record: &MatchRecord, origin: i64, classification: Classification) -> Self {
        let to_offset = |ts: i64| Duration::from_secs((ts - origin).max(0) as u64);
        VisibleEntry {
            id: record.id.clone(),
            display_name: record.display_name(),
            player1: record.player1.tag.clone(),
            player2: record.player2.tag.clone(),
            pool: record.pool_name().to_string(),
            classification,
            created_offset: record.created_at.map(to_offset).unwrap_or_default(),
            started_offset: record.started_at.map(to_offset),
        }
    }
}

/// Ordered collection of currently displayable matches.
///
/// A value regenerated in full on every tick, never patched in place,
/// so no stale entry can outlive a classification change. Ordering is
/// in-progress first, then ready, then waiting; ties break by creation
/// offset, then set id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    entries: Vec<VisibleEntry>,
}

impl VisibleSet {
    /// Classifies every record in the store at `virtual_now` and
    /// assembles the ordered visible set.
    pub fn derive(store: &MatchStore, virtual_now: Duration) -> VisibleSet {
        let origin = store.origin();
        let mut entries: Vec<VisibleEntry> = store
            .records()
            .filter_map(|record| {
                let classification = classify(record, origin, virtual_now);
                (classification != Classification::Excluded)
                    .then(|| VisibleEntry::from_record(record, origin, classification))
            })
            .collect();

        entries.sort_by(|a, b| {
            a.classification
                .display_priority()
                .cmp(&b.classification.display_priority())
                .then(a.created_offset.cmp(&b.created_offset))
                .then(a.id.cmp(&b.id))
        });

        VisibleSet { entries }
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[VisibleEntry] {
        &self.entries
    }

    /// Iterates entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &VisibleEntry> {
        self.entries.iter()
    }

    /// Number of displayable matches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is displayable at this tick.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::test_support::{record, store_of};

    fn at(secs: u64) -> Duration {
        Duration::from_secs(secs)
    }

    fn ids(set: &VisibleSet) -> Vec<SetId> {
        set.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn orders_by_state_priority_regardless_of_id() {
        // Highest id is in progress, lowest is waiting; priority wins.
        let store = store_of(vec![
            record(1, 1, 0, None, None),            // waiting
            record(2, 1, 0, Some(50), None),        // ready (anomalous status)
            record(3, 6, 0, Some(50), None),        // in progress
        ]);

        let set = VisibleSet::derive(&store, at(100));
        assert_eq!(
            ids(&set),
            vec![SetId::Number(3), SetId::Number(2), SetId::Number(1)]
        );
    }

    #[test]
    fn ties_break_by_creation_then_id() {
        let store = store_of(vec![
            record(9, 1, 0, None, None),
            record(4, 1, 0, None, None),
            record(7, 1, 100, None, None),
        ]);

        let set = VisibleSet::derive(&store, at(200));
        assert_eq!(
            ids(&set),
            vec![SetId::Number(4), SetId::Number(9), SetId::Number(7)]
        );
    }

    #[test]
    fn two_record_bracket_walkthrough() {
        let store = store_of(vec![
            record(1, 2, 0, Some(10), Some(20)), // A
            record(2, 1, 5, None, None),         // B
        ]);

        let at_0 = VisibleSet::derive(&store, at(0));
        assert_eq!(ids(&at_0), vec![SetId::Number(1)]);
        assert_eq!(at_0.entries()[0].classification, Classification::Waiting);

        let at_5 = VisibleSet::derive(&store, at(5));
        assert_eq!(ids(&at_5), vec![SetId::Number(1), SetId::Number(2)]);

        let at_12 = VisibleSet::derive(&store, at(12));
        assert_eq!(ids(&at_12), vec![SetId::Number(1), SetId::Number(2)]);
        assert_eq!(
            at_12.entries()[0].classification,
            Classification::InProgress
        );
        assert_eq!(at_12.entries()[1].classification, Classification::Waiting);

        let at_25 = VisibleSet::derive(&store, at(25));
        assert_eq!(ids(&at_25), vec![SetId::Number(2)]);
    }

    #[test]
    fn empty_once_everything_completed() {
        let store = store_of(vec![
            record(1, 3, 0, Some(10), Some(20)),
            record(2, 3, 5, Some(25), Some(40)),
        ]);

        assert!(VisibleSet::derive(&store, at(40)).is_empty());
        assert!(VisibleSet::derive(&store, at(1_000)).is_empty());
    }

    #[test]
    fn derivation_is_deterministic() {
        let store = store_of(vec![
            record(1, 2, 0, Some(10), Some(20)),
            record(2, 1, 5, None, None),
            record(3, 6, 2, Some(8), None),
        ]);

        for secs in [0u64, 5, 9, 12, 21] {
            assert_eq!(
                VisibleSet::derive(&store, at(secs)),
                VisibleSet::derive(&store, at(secs))
            );
        }
    }
}
