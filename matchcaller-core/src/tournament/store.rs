//! Validated, immutable view over a captured snapshot.

use std::collections::HashMap;
use std::time::Duration;

use super::{MatchRecord, SetId, Snapshot, SnapshotError};

/// Immutable match record store backing one replay session.
///
/// Validates the snapshot once at load and derives the instants the
/// replay clock is anchored to. The store is never mutated afterwards,
/// so it is safe to share by reference across tasks without locking.
#[derive(Debug)]
pub struct MatchStore {
    snapshot: Snapshot,
    by_id: HashMap<SetId, usize>,
    origin: i64,
    end_at: i64,
}

impl MatchStore {
    /// Validates a snapshot and builds the store.
    ///
    /// Virtual time zero of a replay corresponds to the earliest
    /// `created_at` across the snapshot; the end instant is the latest
    /// `completed_at`, falling back to the latest `created_at` when no
    /// record ever completed.
    ///
    /// # Errors
    ///
    /// - `SnapshotError::MalformedSnapshot` - Empty match list, missing
    ///   `created_at`, duplicate set id, or a record with both player
    ///   slots unresolved
    pub fn load(snapshot: Snapshot) -> Result<MatchStore, SnapshotError> {
        if snapshot.matches.is_empty() {
            return Err(SnapshotError::MalformedSnapshot {
                reason: "snapshot contains no match records".to_string(),
            });
        }

        let mut by_id = HashMap::with_capacity(snapshot.matches.len());
        let mut origin = i64::MAX;
        let mut end_at = i64::MIN;
        let mut latest_created = i64::MIN;

        for (index, record) in snapshot.matches.iter().enumerate() {
            let Some(created) = record.created_at else {
                return Err(SnapshotError::MalformedSnapshot {
                    reason: format!("set {} has no created_at instant", record.id),
                });
            };

            if !record.player1.is_resolved() && !record.player2.is_resolved() {
                return Err(SnapshotError::MalformedSnapshot {
                    reason: format!("set {} has no resolved players", record.id),
                });
            }

            if by_id.insert(record.id.clone(), index).is_some() {
                return Err(SnapshotError::MalformedSnapshot {
                    reason: format!("duplicate set id {}", record.id),
                });
            }

            origin = origin.min(created);
            latest_created = latest_created.max(created);
            if let Some(completed) = record.completed_at {
                end_at = end_at.max(completed);
            }
        }

        if end_at == i64::MIN {
            end_at = latest_created;
        }

        Ok(MatchStore {
            snapshot,
            by_id,
            origin,
            end_at,
        })
    }

    /// Number of match records in the store.
    pub fn record_count(&self) -> usize {
        self.snapshot.matches.len()
    }

    /// Looks up a record by set id.
    ///
    /// # Errors
    ///
    /// - `SnapshotError::SetNotFound` - Id is not in the snapshot
    pub fn record(&self, id: &SetId) -> Result<&MatchRecord, SnapshotError> {
        self.by_id
            .get(id)
            .map(|&index| &self.snapshot.matches[index])
            .ok_or_else(|| SnapshotError::SetNotFound { id: id.clone() })
    }

    /// Iterates over all records in captured order.
    pub fn records(&self) -> impl Iterator<Item = &MatchRecord> {
        self.snapshot.matches.iter()
    }

    /// The underlying snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Unix instant corresponding to virtual time zero.
    pub fn origin(&self) -> i64 {
        self.origin
    }

    /// Virtual offset at which the replay has nothing left to show.
    pub fn end_offset(&self) -> Duration {
        Duration::from_secs((self.end_at - self.origin).max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::test_support::{BASE, record, snapshot_of};
    use crate::tournament::{PlayerSlot, SetId};

    #[test]
    fn load_derives_origin_and_end() {
        let store = MatchStore::load(snapshot_of(vec![
            record(1, 3, 0, Some(600), Some(1_800)),
            record(2, 3, 300, Some(2_000), Some(3_600)),
        ]))
        .unwrap();

        assert_eq!(store.record_count(), 2);
        assert_eq!(store.origin(), BASE);
        assert_eq!(store.end_offset(), Duration::from_secs(3_600));
    }

    #[test]
    fn end_falls_back_to_latest_creation() {
        let store = MatchStore::load(snapshot_of(vec![
            record(1, 1, 0, None, None),
            record(2, 1, 500, None, None),
        ]))
        .unwrap();

        assert_eq!(store.end_offset(), Duration::from_secs(500));
    }

    #[test]
    fn lookup_by_id() {
        let store = MatchStore::load(snapshot_of(vec![record(7, 2, 0, None, None)])).unwrap();

        let found = store.record(&SetId::Number(7)).unwrap();
        assert_eq!(found.id, SetId::Number(7));

        assert!(matches!(
            store.record(&SetId::Number(8)),
            Err(SnapshotError::SetNotFound { .. })
        ));
    }

    #[test]
    fn rejects_empty_snapshot() {
        assert!(matches!(
            MatchStore::load(snapshot_of(vec![])),
            Err(SnapshotError::MalformedSnapshot { .. })
        ));
    }

    #[test]
    fn rejects_missing_created_at() {
        let mut rec = record(1, 2, 0, None, None);
        rec.created_at = None;

        assert!(matches!(
            MatchStore::load(snapshot_of(vec![rec])),
            Err(SnapshotError::MalformedSnapshot { .. })
        ));
    }

    #[test]
    fn rejects_fully_unresolved_record() {
        let mut rec = record(1, 1, 0, None, None);
        rec.player1 = PlayerSlot::tbd();
        rec.player2 = PlayerSlot::new("");

        assert!(matches!(
            MatchStore::load(snapshot_of(vec![rec])),
            Err(SnapshotError::MalformedSnapshot { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let snapshot = snapshot_of(vec![
            record(1, 2, 0, None, None),
            record(1, 2, 100, None, None),
        ]);

        assert!(matches!(
            MatchStore::load(snapshot),
            Err(SnapshotError::MalformedSnapshot { .. })
        ));
    }

    #[test]
    fn single_tbd_slot_is_allowed() {
        let snapshot = snapshot_of(vec![crate::tournament::test_support::tbd_record(1, 1, 0)]);
        assert!(MatchStore::load(snapshot).is_ok());
    }
}
