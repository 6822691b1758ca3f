//! Tournament snapshot data model shared by capture tooling and replay.

pub mod snapshot;
pub mod store;
#[cfg(test)]
pub mod test_support;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use snapshot::{Snapshot, SnapshotFileInfo, SnapshotMetadata, list_snapshot_files};
pub use store::MatchStore;

/// Identity of a single bracket set, unique within one snapshot.
///
/// Captured ids are numeric for most sources but some exports use
/// string ids (preview sets), so both forms are preserved as captured.
/// The ordering is total and stable, which keeps display tie-breaks
/// deterministic across replays.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SetId {
    /// Numeric set id as assigned by the bracket service.
    Number(i64),
    /// String set id, used for preview or placeholder sets.
    Text(String),
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetId::Number(n) => write!(f, "{n}"),
            SetId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for SetId {
    fn from(id: i64) -> Self {
        SetId::Number(id)
    }
}

impl From<&str> for SetId {
    fn from(id: &str) -> Self {
        SetId::Text(id.to_string())
    }
}

/// Raw set status code as captured from the bracket service.
///
/// Codes `1`, `2`, `3` and `6` are the values the service actually
/// emits. Anything else is carried through as `Other` and treated like
/// a not-started set by the state deriver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum RawStatus {
    /// Set has not started; waiting on earlier sets.
    NotStarted,
    /// Set is ready to be called, or in progress once a start instant exists.
    Ready,
    /// Set finished before capture.
    Completed,
    /// Set was explicitly marked in progress.
    InProgress,
    /// Unrecognized status code, preserved as captured.
    Other(u8),
}

impl From<u8> for RawStatus {
    fn from(code: u8) -> Self {
        match code {
            1 => RawStatus::NotStarted,
            2 => RawStatus::Ready,
            3 => RawStatus::Completed,
            6 => RawStatus::InProgress,
            other => RawStatus::Other(other),
        }
    }
}

impl From<RawStatus> for u8 {
    fn from(status: RawStatus) -> Self {
        match status {
            RawStatus::NotStarted => 1,
            RawStatus::Ready => 2,
            RawStatus::Completed => 3,
            RawStatus::InProgress => 6,
            RawStatus::Other(code) => code,
        }
    }
}

/// One player slot of a set: a resolved gamer tag or a to-be-determined
/// placeholder for a slot still waiting on an earlier result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    /// Gamer tag as captured; `"TBD"` or empty marks an unresolved slot.
    pub tag: String,
    /// Entrant id when the capture resolved one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl PlayerSlot {
    /// Creates a resolved slot for the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
        }
    }

    /// Creates an unresolved to-be-determined slot.
    pub fn tbd() -> Self {
        Self::new("TBD")
    }

    /// Returns true when the slot holds an actual player.
    pub fn is_resolved(&self) -> bool {
        !self.tag.is_empty() && self.tag != "TBD"
    }
}

/// One captured bracket set with its full recorded lifecycle.
///
/// Records are immutable after load. The three instants are unix
/// seconds as captured; `created_at` is guaranteed present once the
/// record passed store validation, the other two may be absent for
/// sets that never reached that transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Set identity, unique within the snapshot.
    pub id: SetId,
    /// Round text of the set, e.g. "Winners Semi-Final".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// First player slot.
    pub player1: PlayerSlot,
    /// Second player slot.
    pub player2: PlayerSlot,
    /// Raw status code at capture time.
    #[serde(rename = "state")]
    pub status: RawStatus,
    /// Instant the set materialized in the bracket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Instant the set was started, if it ever was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    /// Instant the set completed, if it ever did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    /// Pool/group identifier, carried through for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_group: Option<String>,
    /// Phase name, carried through for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_name: Option<String>,
}

impl MatchRecord {
    /// Returns the round text, falling back to the set id.
    pub fn display_name(&self) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => format!("Set {}", self.id),
        }
    }

    /// Returns the pool label used for display grouping.
    pub fn pool_name(&self) -> &str {
        self.phase_group
            .as_deref()
            .or(self.phase_name.as_deref())
            .unwrap_or("Pool")
    }

    /// Returns true when either player slot is still unresolved.
    pub fn has_unresolved_player(&self) -> bool {
        !self.player1.is_resolved() || !self.player2.is_resolved()
    }
}

/// Errors that can occur while loading or querying a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Structural defect detected at load time; never repaired silently.
    #[error("Malformed snapshot: {reason}")]
    MalformedSnapshot {
        /// What the validation found.
        reason: String,
    },

    /// Lookup of a set id that does not exist in the snapshot.
    #[error("Set {id} not found in snapshot")]
    SetNotFound {
        /// The id that was requested.
        id: SetId,
    },

    /// Snapshot file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON for the expected layout.
    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}
