//! Matchcaller Core - tournament bracket replay engine
//!
//! This crate turns a captured tournament snapshot into a time-varying
//! feed of display state: a virtual clock advances at a configurable
//! multiple of wall time, every match record is re-classified on each
//! tick, and the resulting visible set is delivered to a subscriber or
//! polled through the same contract a live data source exposes.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use matchcaller_core::{MatchStore, ReplayAdapter, ReplayConfig, ReplaySession, Snapshot};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshot = Snapshot::load_file("tournament_weekly_42.json")?;
//! let store = Arc::new(MatchStore::load(snapshot)?);
//!
//! let session = ReplaySession::new(store, ReplayConfig::default());
//! let adapter = ReplayAdapter::new();
//! let handle = session.start(adapter.clone())?;
//!
//! // A display client polls the adapter exactly like a live source.
//! let matches = adapter.latest();
//! println!("{} matches on display", matches.len());
//!
//! handle.stop().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]

pub mod config;
pub mod replay;
pub mod tournament;

// Re-export main types for convenient access
pub use config::ReplayConfig;
pub use replay::{
    Classification, MatchSource, ReplayAdapter, ReplayClock, ReplayError, ReplayHandle,
    ReplayProgress, ReplaySession, ReplaySubscriber, SessionState, SubscriberFault, TimelineIndex,
    VisibleEntry, VisibleSet, classify,
};
pub use tournament::{
    MatchRecord, MatchStore, PlayerSlot, RawStatus, SetId, Snapshot, SnapshotError,
    SnapshotFileInfo, SnapshotMetadata, list_snapshot_files,
};
