//! Pure derivation of display state from captured timestamps.

use std::time::Duration;

use crate::tournament::{MatchRecord, RawStatus};

/// Display-relevant state of a set at a given virtual time.
///
/// Replaces the raw captured status code downstream: a raw `2` means
/// nothing without timestamp context, while a `Classification` is
/// unambiguous for the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Not shown: unresolved slot, not yet materialized, or already done.
    Excluded,
    /// Materialized but not yet called to start.
    Waiting,
    /// Called and waiting for players to begin.
    Ready,
    /// Being played right now.
    InProgress,
}

impl Classification {
    /// Sort key for the visible set; lower sorts first.
    pub fn display_priority(self) -> u8 {
        match self {
            Classification::InProgress => 0,
            Classification::Ready => 1,
            Classification::Waiting => 2,
            Classification::Excluded => 3,
        }
    }

    /// Human-readable label matching the live display.
    pub fn label(self) -> &'static str {
        match self {
            Classification::InProgress => "In Progress",
            Classification::Ready => "Ready",
            Classification::Waiting => "Waiting",
            Classification::Excluded => "Excluded",
        }
    }
}

fn offset_from(origin: i64, instant: i64) -> Duration {
    Duration::from_secs((instant - origin).max(0) as u64)
}

/// Classifies a record at `virtual_now`, measured from the snapshot
/// origin (virtual time zero is the earliest `created_at`).
///
/// Mirrors how a live consumer interprets the raw status at a given
/// instant, so a replayed feed is indistinguishable from a live one:
///
/// 1. unresolved player slot, not yet created, or completion instant
///    reached (boundary inclusive) excludes the set;
/// 2. before the recorded start instant (or with none recorded) the set
///    is waiting;
/// 3. past its start instant a set is in progress unless its status
///    claims it never started, which is read as ready.
pub fn classify(record: &MatchRecord, origin: i64, virtual_now: Duration) -> Classification {
    if record.has_unresolved_player() {
        return Classification::Excluded;
    }

    // Guaranteed present after store validation.
    let Some(created) = record.created_at else {
        return Classification::Excluded;
    };
    if virtual_now < offset_from(origin, created) {
        return Classification::Excluded;
    }

    if let Some(completed) = record.completed_at
        && virtual_now >= offset_from(origin, completed)
    {
        return Classification::Excluded;
    }

    match record.started_at {
        None => return Classification::Waiting,
        Some(started) if virtual_now < offset_from(origin, started) => {
            return Classification::Waiting;
        }
        Some(_) => {}
    }

    match record.status {
        RawStatus::InProgress => Classification::InProgress,
        // A reached start instant promotes ready/completed statuses: the
        // capture recorded the set as actually being played at this point.
        RawStatus::Ready | RawStatus::Completed => Classification::InProgress,
        // Not-started status with a recorded start instant is a capture
        // anomaly; read it conservatively as called-but-not-begun.
        RawStatus::NotStarted | RawStatus::Other(_) => Classification::Ready,
    }
}
