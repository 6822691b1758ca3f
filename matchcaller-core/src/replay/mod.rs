//! Replay engine: virtual clock, state derivation, and the tick driver.

pub mod adapter;
pub mod classify;
pub mod clock;
pub mod driver;
pub mod timeline;
pub mod visible;

pub use adapter::{MatchSource, ReplayAdapter};
pub use classify::{Classification, classify};
pub use clock::ReplayClock;
pub use driver::{
    ReplayHandle, ReplayProgress, ReplaySession, ReplaySubscriber, SessionState, SubscriberFault,
};
pub use timeline::TimelineIndex;
pub use visible::{VisibleEntry, VisibleSet};

use crate::tournament::SnapshotError;

/// Errors that can occur while configuring or driving a replay.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Speed multiplier was zero, negative, or not finite.
    #[error("Invalid replay speed: {speed}")]
    InvalidSpeed {
        /// The rejected multiplier.
        speed: f64,
    },

    /// Tick interval was zero.
    #[error("Tick interval must be non-zero")]
    InvalidTickInterval,

    /// `start` was called on a session that already left `Idle`.
    #[error("Replay session already started")]
    AlreadyRunning,

    /// The session's tick loop has terminated and can no longer answer.
    #[error("Replay session has shut down")]
    SessionShutdown,

    /// Snapshot problem surfaced during session setup.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}
