//! Shared fixtures for snapshot and replay tests.

use super::{MatchRecord, MatchStore, PlayerSlot, RawStatus, SetId, Snapshot, SnapshotMetadata};

/// Unix instant used as the capture origin in fixtures; record instants
/// are expressed as second offsets from this base.
pub const BASE: i64 = 1_700_000_000;

/// Builds a record with resolved players and instants offset from [`BASE`].
pub fn record(
    id: i64,
    status: u8,
    created: i64,
    started: Option<i64>,
    completed: Option<i64>,
) -> MatchRecord {
    MatchRecord {
        id: SetId::Number(id),
        display_name: Some(format!("Round {id}")),
        player1: PlayerSlot::new(format!("P{id}a")),
        player2: PlayerSlot::new(format!("P{id}b")),
        status: RawStatus::from(status),
        created_at: Some(BASE + created),
        started_at: started.map(|s| BASE + s),
        completed_at: completed.map(|c| BASE + c),
        phase_group: Some("A1".to_string()),
        phase_name: Some("Bracket".to_string()),
    }
}

/// Builds a record whose second player slot is unresolved.
pub fn tbd_record(id: i64, status: u8, created: i64) -> MatchRecord {
    let mut rec = record(id, status, created, None, None);
    rec.player2 = PlayerSlot::tbd();
    rec
}

/// Wraps records in a snapshot with consistent metadata.
pub fn snapshot_of(matches: Vec<MatchRecord>) -> Snapshot {
    Snapshot {
        metadata: SnapshotMetadata {
            event_name: "Test Event".to_string(),
            tournament_name: "Test Tournament".to_string(),
            event_slug: None,
            tournament_slug: None,
            cloned_at: Some(BASE + 86_400),
            total_matches: matches.len(),
        },
        duration_minutes: 0,
        matches,
    }
}

/// Builds a validated store from records.
pub fn store_of(matches: Vec<MatchRecord>) -> MatchStore {
    MatchStore::load(snapshot_of(matches)).expect("fixture snapshot must validate")
}
