//! Drop-in replacement for a live match source, fed by a replay session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::driver::{ReplaySubscriber, SubscriberFault};
use super::visible::VisibleSet;

/// Pull-style contract a display client polls for current matches.
///
/// The live implementation answers from the bracket service; the replay
/// implementation answers from simulated state. A display client can be
/// swapped between the two without knowing which it is talking to.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// The freshest known set of displayable matches.
    async fn current_matches(&self) -> VisibleSet;
}

/// Exposes a replay session's latest visible set through [`MatchSource`].
///
/// Holds only the most recent delivery (last-write-wins, no queueing),
/// so a polling consumer always sees the freshest classification. The
/// single slot is the only mutable state shared between the tick loop
/// and readers; the write is a short exclusive swap.
#[derive(Clone, Default)]
pub struct ReplayAdapter {
    latest: Arc<RwLock<VisibleSet>>,
}

impl ReplayAdapter {
    /// Creates an adapter with an empty visible set.
    pub fn new() -> ReplayAdapter {
        ReplayAdapter::default()
    }

    /// Synchronous accessor for callers outside an async context.
    pub fn latest(&self) -> VisibleSet {
        self.latest.read().clone()
    }
}

impl ReplaySubscriber for ReplayAdapter {
    fn on_tick(
        &mut self,
        visible: &VisibleSet,
        _virtual_now: Duration,
    ) -> Result<(), SubscriberFault> {
        *self.latest.write() = visible.clone();
        Ok(())
    }
}

#[async_trait]
impl MatchSource for ReplayAdapter {
    async fn current_matches(&self) -> VisibleSet {
        self.latest()
    }
}
