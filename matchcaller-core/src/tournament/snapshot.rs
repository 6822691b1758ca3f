//! Captured tournament snapshots and their on-disk layout.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchRecord, SnapshotError};

/// Metadata block written by the capture tool alongside the match list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Event name as shown on the bracket service.
    pub event_name: String,
    /// Tournament name the event belongs to.
    pub tournament_name: String,
    /// Event slug on the source service, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_slug: Option<String>,
    /// Tournament slug on the source service, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_slug: Option<String>,
    /// Unix instant the snapshot was captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloned_at: Option<i64>,
    /// Number of match records in the snapshot.
    pub total_matches: usize,
}

impl SnapshotMetadata {
    /// Returns the capture instant as a UTC timestamp, when recorded.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.cloned_at.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

/// A captured tournament: metadata plus the full ordered match history.
///
/// Snapshots are plain captured data. Validation and derived values
/// (origin instant, end offset) live in [`super::MatchStore`], which
/// owns a snapshot for the lifetime of a replay session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Capture metadata.
    pub metadata: SnapshotMetadata,
    /// Nominal tournament duration as computed at capture time.
    #[serde(default)]
    pub duration_minutes: i64,
    /// Match records ordered by creation, as written by the capture tool.
    pub matches: Vec<MatchRecord>,
}

impl Snapshot {
    /// Loads a snapshot from a capture file.
    ///
    /// # Errors
    ///
    /// - `SnapshotError::Io` - File could not be read
    /// - `SnapshotError::Parse` - File is not a valid snapshot document
    pub fn load_file(path: impl AsRef<Path>) -> Result<Snapshot, SnapshotError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Directory listing entry for one capture file.
#[derive(Debug, Clone)]
pub struct SnapshotFileInfo {
    /// Path of the capture file.
    pub path: PathBuf,
    /// Parsed metadata block.
    pub metadata: SnapshotMetadata,
    /// Nominal duration recorded at capture time.
    pub duration_minutes: i64,
}

/// Lists capture files (`tournament_*.json`) in a directory, newest first.
///
/// Files that fail to parse are skipped with a warning rather than
/// failing the whole listing, matching the capture tool's behavior.
///
/// # Errors
///
/// - `SnapshotError::Io` - Directory could not be read
pub fn list_snapshot_files(dir: impl AsRef<Path>) -> Result<Vec<SnapshotFileInfo>, SnapshotError> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with("tournament_") || !name.ends_with(".json") {
            continue;
        }

        match Snapshot::load_file(&path) {
            Ok(snapshot) => entries.push(SnapshotFileInfo {
                path,
                metadata: snapshot.metadata,
                duration_minutes: snapshot.duration_minutes,
            }),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unreadable capture file");
            }
        }
    }

    entries.sort_by_key(|info| std::cmp::Reverse(info.metadata.cloned_at.unwrap_or(0)));
    Ok(entries)
}
