//! Tick driver replaying a snapshot against a subscriber.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use super::ReplayError;
use super::clock::ReplayClock;
use super::timeline::TimelineIndex;
use super::visible::VisibleSet;
use crate::config::ReplayConfig;
use crate::tournament::MatchStore;

/// Error a subscriber may surface from a tick; logged, never fatal.
pub type SubscriberFault = Box<dyn std::error::Error + Send + Sync>;

/// Consumer of per-tick derived state.
///
/// Invocations for one session are strictly ordered by non-decreasing
/// virtual time and never overlap. A fault (error return or panic) is
/// logged by the driver and does not stop the session; the simulator's
/// job is to keep producing deterministic ticks regardless of a
/// misbehaving consumer.
pub trait ReplaySubscriber: Send {
    /// Receives the visible set derived at `virtual_now`.
    ///
    /// Must return promptly; the next tick cannot start until this does.
    ///
    /// # Errors
    ///
    /// Any error the consumer wants logged against this tick.
    fn on_tick(&mut self, visible: &VisibleSet, virtual_now: Duration)
    -> Result<(), SubscriberFault>;
}

impl<F> ReplaySubscriber for F
where
    F: FnMut(&VisibleSet, Duration) -> Result<(), SubscriberFault> + Send,
{
    fn on_tick(
        &mut self,
        visible: &VisibleSet,
        virtual_now: Duration,
    ) -> Result<(), SubscriberFault> {
        self(visible, virtual_now)
    }
}

/// Lifecycle of a replay session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet started.
    Idle,
    /// Tick loop is running.
    Running,
    /// Virtual time passed the end of the snapshot; terminal.
    Finished,
    /// Explicitly cancelled; terminal.
    Stopped,
}

/// Point-in-time answer to "how far along is the replay".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayProgress {
    /// Completed fraction of the snapshot's duration, in `[0, 1]`.
    pub fraction: f64,
    /// Current virtual offset.
    pub virtual_now: Duration,
    /// Virtual offset of the snapshot's end (latest completion, or
    /// latest creation when nothing completes).
    pub end_offset: Duration,
    /// Size of the most recently derived visible set.
    pub visible_count: usize,
}

enum ReplayCommand {
    Stop {
        responder: oneshot::Sender<()>,
    },
    Progress {
        responder: oneshot::Sender<ReplayProgress>,
    },
    JumpToProgress {
        fraction: f64,
        responder: oneshot::Sender<Duration>,
    },
}

/// One replay session over one snapshot.
///
/// State machine `Idle -> Running -> Finished | Stopped`. Independent
/// sessions share nothing mutable, so any number may replay different
/// snapshots (or the same store) concurrently.
pub struct ReplaySession {
    store: Arc<MatchStore>,
    timeline: TimelineIndex,
    config: ReplayConfig,
    state: Arc<Mutex<SessionState>>,
}

impl ReplaySession {
    /// Creates an idle session over a loaded store.
    pub fn new(store: Arc<MatchStore>, config: ReplayConfig) -> ReplaySession {
        let timeline = TimelineIndex::build(&store);
        ReplaySession {
            store,
            timeline,
            config,
            state: Arc::new(Mutex::new(SessionState::Idle)),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Starts the tick loop, delivering derived state to `subscriber`.
    ///
    /// Captures the wall-clock origin at call time and spawns a single
    /// task that owns the subscriber for the session's lifetime.
    ///
    /// # Errors
    ///
    /// - `ReplayError::AlreadyRunning` - Session is not `Idle`
    /// - `ReplayError::InvalidSpeed` - Configured speed is not positive
    /// - `ReplayError::InvalidTickInterval` - Configured interval is zero
    pub fn start<S>(&self, subscriber: S) -> Result<ReplayHandle, ReplayError>
    where
        S: ReplaySubscriber + 'static,
    {
        let clock = {
            let mut state = self.state.lock();
            if *state != SessionState::Idle {
                return Err(ReplayError::AlreadyRunning);
            }
            self.config.validate()?;
            let clock = ReplayClock::new(self.config.speed)?;
            *state = SessionState::Running;
            clock
        };

        let (sender, receiver) = mpsc::channel(16);
        let loop_state = Arc::clone(&self.state);
        let store = Arc::clone(&self.store);
        let timeline = self.timeline.clone();
        let tick_interval = self.config.tick_interval;

        tokio::spawn(async move {
            run_replay_loop(
                store,
                timeline,
                clock,
                tick_interval,
                loop_state,
                subscriber,
                receiver,
            )
            .await;
        });

        Ok(ReplayHandle { sender })
    }
}

/// Handle for controlling and querying a running replay.
///
/// Cheap to clone; all operations go over the session's command channel
/// and are answered by the tick loop itself, which is what makes the
/// stop guarantee airtight.
#[derive(Clone)]
pub struct ReplayHandle {
    sender: mpsc::Sender<ReplayCommand>,
}

impl ReplayHandle {
    /// Stops the session.
    ///
    /// Once this returns, no further subscriber invocation occurs.
    /// Idempotent: stopping an already-terminal session is a no-op.
    pub async fn stop(&self) {
        let (responder, ack) = oneshot::channel();
        if self
            .sender
            .send(ReplayCommand::Stop { responder })
            .await
            .is_err()
        {
            // Loop already terminated; nothing left to stop.
            return;
        }
        let _ = ack.await;
    }

    /// Reports current replay progress.
    ///
    /// # Errors
    ///
    /// - `ReplayError::SessionShutdown` - Tick loop has terminated
    pub async fn progress(&self) -> Result<ReplayProgress, ReplayError> {
        let (responder, rx) = oneshot::channel();
        self.sender
            .send(ReplayCommand::Progress { responder })
            .await
            .map_err(|_| ReplayError::SessionShutdown)?;
        rx.await.map_err(|_| ReplayError::SessionShutdown)
    }

    /// Jumps the replay forward to the given fraction of the snapshot's
    /// duration and returns the resulting virtual offset.
    ///
    /// Forward-only: a fraction behind the current position leaves the
    /// clock where it is, keeping delivered virtual times non-decreasing.
    ///
    /// # Errors
    ///
    /// - `ReplayError::SessionShutdown` - Tick loop has terminated
    pub async fn jump_to_progress(&self, fraction: f64) -> Result<Duration, ReplayError> {
        let (responder, rx) = oneshot::channel();
        self.sender
            .send(ReplayCommand::JumpToProgress {
                fraction: fraction.clamp(0.0, 1.0),
                responder,
            })
            .await
            .map_err(|_| ReplayError::SessionShutdown)?;
        rx.await.map_err(|_| ReplayError::SessionShutdown)
    }

    /// True while the tick loop is alive.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }
}

async fn run_replay_loop<S>(
    store: Arc<MatchStore>,
    timeline: TimelineIndex,
    clock: ReplayClock,
    tick_interval: Duration,
    state: Arc<Mutex<SessionState>>,
    mut subscriber: S,
    mut receiver: mpsc::Receiver<ReplayCommand>,
) where
    S: ReplaySubscriber,
{
    let wall_start = Instant::now();
    let end_offset = store.end_offset();
    // Virtual time skipped over by jump commands, never reduced.
    let mut jumped = Duration::ZERO;
    let mut visible_count = 0usize;

    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    tracing::debug!(
        records = store.record_count(),
        transitions = timeline.len(),
        speed = clock.speed(),
        "replay session started"
    );

    loop {
        tokio::select! {
            biased;

            Some(command) = receiver.recv() => {
                let virtual_now =
                    clock.virtual_elapsed(wall_start, Instant::now()).saturating_add(jumped);
                match command {
                    ReplayCommand::Stop { responder } => {
                        *state.lock() = SessionState::Stopped;
                        tracing::debug!(?virtual_now, "replay session stopped");
                        let _ = responder.send(());
                        break;
                    }
                    ReplayCommand::Progress { responder } => {
                        let _ = responder.send(progress_at(virtual_now, end_offset, visible_count));
                    }
                    ReplayCommand::JumpToProgress { fraction, responder } => {
                        let target = end_offset.mul_f64(fraction);
                        if target > virtual_now {
                            jumped += target - virtual_now;
                        }
                        let _ = responder.send(virtual_now.max(target));
                    }
                }
            }

            _ = ticker.tick() => {
                let virtual_now =
                    clock.virtual_elapsed(wall_start, Instant::now()).saturating_add(jumped);
                let visible = VisibleSet::derive(&store, virtual_now);
                visible_count = visible.len();
                deliver(&mut subscriber, &visible, virtual_now);

                if virtual_now > end_offset {
                    *state.lock() = SessionState::Finished;
                    tracing::debug!(?virtual_now, "replay session finished");
                    break;
                }
            }
        }
    }
}

fn progress_at(virtual_now: Duration, end_offset: Duration, visible_count: usize) -> ReplayProgress {
    let fraction = if end_offset.is_zero() {
        1.0
    } else {
        (virtual_now.as_secs_f64() / end_offset.as_secs_f64()).clamp(0.0, 1.0)
    };
    ReplayProgress {
        fraction,
        virtual_now,
        end_offset,
        visible_count,
    }
}

/// Invokes the subscriber with fault isolation: an error return or a
/// panic is logged and the session keeps ticking.
fn deliver<S: ReplaySubscriber>(subscriber: &mut S, visible: &VisibleSet, virtual_now: Duration) {
    let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
        subscriber.on_tick(visible, virtual_now)
    }));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(error)) => {
            tracing::warn!(%error, ?virtual_now, "subscriber failed; replay continues");
        }
        Err(_) => {
            tracing::warn!(?virtual_now, "subscriber panicked; replay continues");
        }
    }
}
